//! Inbound message parsing
//!
//! Messages are either keyboard button presses (matched verbatim) or slash
//! commands. Anything else falls through to [`Command::Unknown`].

use tapcoin_core::UserId;

/// Keyboard button labels, shared with the renderer
pub mod buttons {
    pub const TAP: &str = "👇 Tap";
    pub const PROFILE: &str = "📊 Profile";
    pub const SHOP: &str = "🛒 Shop";
    pub const TOP: &str = "🏆 Top";
    pub const UPGRADE_TAP: &str = "🖱 Tap power +1";
    pub const UPGRADE_REGEN: &str = "🔋 Regen +0.5";
    pub const UPGRADE_AUTO_FARM: &str = "🤖 Auto-farm +1";
    pub const UPGRADE_MAX_ENERGY: &str = "🔼 Max energy +25";
    pub const BUY_ENERGY: &str = "⚡ Refill energy";
    pub const BACK: &str = "⬅️ Back";
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Start,
    Help,
    Tap,
    Profile,
    Shop,
    UpgradeTap,
    UpgradeRegen,
    UpgradeAutoFarm,
    UpgradeMaxEnergy,
    BuyEnergy,
    /// Leaderboard request; `None` means the default kind
    Top(Option<String>),
    Admin,
    Logout,
    Cancel,
    Grant {
        user_id: UserId,
        target: String,
        amount: f64,
    },
    /// Well-known command with malformed arguments; carries a usage hint
    Invalid(&'static str),
    Unknown,
}

impl Command {
    pub fn parse(text: &str) -> Command {
        let text = text.trim();

        match text {
            buttons::TAP => return Command::Tap,
            buttons::PROFILE => return Command::Profile,
            buttons::SHOP => return Command::Shop,
            buttons::TOP => return Command::Top(None),
            buttons::UPGRADE_TAP => return Command::UpgradeTap,
            buttons::UPGRADE_REGEN => return Command::UpgradeRegen,
            buttons::UPGRADE_AUTO_FARM => return Command::UpgradeAutoFarm,
            buttons::UPGRADE_MAX_ENERGY => return Command::UpgradeMaxEnergy,
            buttons::BUY_ENERGY => return Command::BuyEnergy,
            buttons::BACK => return Command::Start,
            _ => {}
        }

        let mut parts = text.split_whitespace();
        let head = match parts.next() {
            Some(head) => head,
            None => return Command::Unknown,
        };

        match head {
            "/start" => Command::Start,
            "/help" => Command::Help,
            "/tap" => Command::Tap,
            "/profile" => Command::Profile,
            "/shop" => Command::Shop,
            "/upgrade_tap" => Command::UpgradeTap,
            "/upgrade_regen" => Command::UpgradeRegen,
            "/upgrade_auto_farm" => Command::UpgradeAutoFarm,
            "/upgrade_max_energy" => Command::UpgradeMaxEnergy,
            "/buy_energy" => Command::BuyEnergy,
            "/top" => Command::Top(parts.next().map(str::to_string)),
            "/admin" => Command::Admin,
            "/logout" => Command::Logout,
            "/cancel" => Command::Cancel,
            "/grant" => parse_grant(parts),
            _ => Command::Unknown,
        }
    }
}

const GRANT_USAGE: &str = "usage: /grant <user_id> <target> <amount>";

fn parse_grant<'a>(mut parts: impl Iterator<Item = &'a str>) -> Command {
    let (Some(user_id), Some(target), Some(amount), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Command::Invalid(GRANT_USAGE);
    };

    let (Ok(user_id), Ok(amount)) = (user_id.parse::<UserId>(), amount.parse::<f64>()) else {
        return Command::Invalid(GRANT_USAGE);
    };

    Command::Grant {
        user_id,
        target: target.to_string(),
        amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buttons_parse() {
        assert_eq!(Command::parse("👇 Tap"), Command::Tap);
        assert_eq!(Command::parse("  📊 Profile  "), Command::Profile);
        assert_eq!(Command::parse("⚡ Refill energy"), Command::BuyEnergy);
    }

    #[test]
    fn test_slash_commands_parse() {
        assert_eq!(Command::parse("/start"), Command::Start);
        assert_eq!(Command::parse("/top"), Command::Top(None));
        assert_eq!(
            Command::parse("/top auto-farm"),
            Command::Top(Some("auto-farm".to_string()))
        );
    }

    #[test]
    fn test_grant_parses_arguments() {
        assert_eq!(
            Command::parse("/grant 42 balance 100"),
            Command::Grant {
                user_id: 42,
                target: "balance".to_string(),
                amount: 100.0,
            }
        );
        assert_eq!(
            Command::parse("/grant 42 energy_regen -0.5"),
            Command::Grant {
                user_id: 42,
                target: "energy_regen".to_string(),
                amount: -0.5,
            }
        );
    }

    #[test]
    fn test_malformed_grant_is_invalid() {
        assert!(matches!(Command::parse("/grant"), Command::Invalid(_)));
        assert!(matches!(
            Command::parse("/grant abc balance 10"),
            Command::Invalid(_)
        ));
        assert!(matches!(
            Command::parse("/grant 1 balance ten"),
            Command::Invalid(_)
        ));
        assert!(matches!(
            Command::parse("/grant 1 balance 10 extra"),
            Command::Invalid(_)
        ));
    }

    #[test]
    fn test_free_text_is_unknown() {
        assert_eq!(Command::parse("hello there"), Command::Unknown);
        assert_eq!(Command::parse(""), Command::Unknown);
    }
}
