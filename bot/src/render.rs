//! Reply rendering: message text plus an optional reply keyboard

use tapcoin_core::{AccountView, EngineError, LeaderboardEntry, LeaderboardKey};

use crate::command::buttons;

/// Rows of button labels, in the order a chat client should show them
pub type Keyboard = Vec<Vec<String>>;

/// One outbound message
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Reply {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Reply {
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }
}

fn row(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|l| l.to_string()).collect()
}

pub fn main_keyboard() -> Keyboard {
    vec![
        row(&[buttons::TAP]),
        row(&[buttons::PROFILE, buttons::SHOP]),
        row(&[buttons::TOP]),
    ]
}

pub fn shop_keyboard() -> Keyboard {
    vec![
        row(&[buttons::UPGRADE_TAP, buttons::UPGRADE_REGEN]),
        row(&[buttons::UPGRADE_AUTO_FARM, buttons::UPGRADE_MAX_ENERGY]),
        row(&[buttons::BUY_ENERGY]),
        row(&[buttons::BACK]),
    ]
}

pub fn welcome_text(view: &AccountView) -> String {
    format!(
        "🔥 Welcome!\n\n💰 Balance: {}\n⚡ Energy: {}",
        view.balance, view.energy
    )
}

pub fn tap_text(view: &AccountView) -> String {
    format!("💰 Balance: {}\n⚡ Energy: {}", view.balance, view.energy)
}

pub fn profile_text(view: &AccountView) -> String {
    let farm = if view.auto_farm_enabled {
        format!("{}/s", view.auto_farm_level)
    } else {
        "off".to_string()
    };
    format!(
        "📊 Profile\n\n\
         💰 Balance: {}\n\
         ⚡ Energy: {}/{}\n\
         👆 Tap power: {}\n\
         🔋 Regen: {}/s\n\
         🤖 Auto-farm: {}",
        view.balance, view.energy, view.max_energy, view.tap_power, view.energy_regen, farm
    )
}

pub fn shop_text(view: &AccountView) -> String {
    format!(
        "🛒 Shop - balance {}\n\n\
         🖱 Tap power +1 - {} coins\n\
         🔋 Regen +0.5/s - {} coins\n\
         🤖 Auto-farm +1/s - {} coins\n\
         🔼 Max energy +25 - {} coins\n\
         ⚡ Full refill - {} coins",
        view.balance,
        view.costs.tap_upgrade,
        view.costs.regen_upgrade,
        view.costs.auto_farm_upgrade,
        view.costs.max_energy_upgrade,
        view.costs.buy_energy
    )
}

pub fn top_text(key: LeaderboardKey, entries: &[LeaderboardEntry]) -> String {
    if entries.is_empty() {
        return "🏆 Nobody here yet".to_string();
    }

    let mut text = String::from("🏆 Top players\n");
    for (i, entry) in entries.iter().enumerate() {
        let value = match key {
            LeaderboardKey::Balance => entry.balance.to_string(),
            LeaderboardKey::AutoFarm => format!("{}/s", entry.auto_farm_level),
            LeaderboardKey::Regen => format!("{}/s", entry.energy_regen),
        };
        text.push_str(&format!("\n{}. {} - {}", i + 1, entry.user_id, value));
    }
    text
}

pub fn error_text(err: &EngineError) -> String {
    match err {
        EngineError::InsufficientEnergy => "❌ No energy!".to_string(),
        EngineError::InsufficientFunds { required } => {
            format!("❌ Need {} coins", required)
        }
        EngineError::Unauthorized => "❌ Not allowed".to_string(),
        EngineError::ZeroAmount => "❌ Amount must be non-zero".to_string(),
        EngineError::TargetNotFound(target) => format!("❌ Unknown target: {}", target),
        EngineError::AccountNotFound(user_id) => format!("❌ No account for {}", user_id),
    }
}

pub fn help_text() -> String {
    "Commands:\n\
     /tap - tap once\n\
     /profile - your stats\n\
     /shop - upgrades\n\
     /top [balance|auto-farm|regen] - leaderboard\n\
     /admin - admin login"
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tapcoin_core::Account;

    #[test]
    fn test_profile_shows_truncated_energy() {
        let mut account = Account::new(1, Utc::now());
        account.energy = 99.7;
        let text = profile_text(&account.view());

        assert!(text.contains("⚡ Energy: 99/100"));
        assert!(text.contains("🤖 Auto-farm: off"));
    }

    #[test]
    fn test_top_text_ranks_entries() {
        let entries = vec![
            LeaderboardEntry {
                user_id: 7,
                balance: 500,
                auto_farm_level: 0,
                energy_regen: 1.0,
            },
            LeaderboardEntry {
                user_id: 3,
                balance: 250,
                auto_farm_level: 0,
                energy_regen: 1.0,
            },
        ];

        let text = top_text(LeaderboardKey::Balance, &entries);

        assert!(text.contains("1. 7 - 500"));
        assert!(text.contains("2. 3 - 250"));
    }
}
