//! Message dispatcher: routes parsed commands into the ledger engine

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tapcoin_core::{Action, Caller, GrantKind, LeaderboardKey, Ledger, UserId};
use tracing::{info, warn};

use crate::command::Command;
use crate::render::{self, Reply};
use crate::session::{PendingInput, SessionStore};

/// Leaderboard size shown in chat
const TOP_LIMIT: usize = 5;

#[derive(Debug, Clone, Default)]
pub struct BotConfig {
    /// Password arming the admin session; `None` disables the admin flow
    pub admin_password: Option<String>,
    /// The owner identity; may apply negative grants without logging in
    pub owner_id: Option<UserId>,
}

pub struct BotService {
    ledger: Arc<Ledger>,
    sessions: SessionStore,
    config: BotConfig,
}

impl BotService {
    pub fn new(ledger: Arc<Ledger>, config: BotConfig) -> Self {
        BotService {
            ledger,
            sessions: SessionStore::new(),
            config,
        }
    }

    /// Handle one inbound message and produce the reply to send back
    pub fn handle_message(&self, user_id: UserId, text: &str, now: DateTime<Utc>) -> Reply {
        // An armed prompt consumes the next message, whatever it is.
        if let Some(PendingInput::AdminPassword) = self.sessions.take_pending(user_id) {
            return self.check_password(user_id, text.trim());
        }

        match Command::parse(text) {
            Command::Start => {
                let view = self.ledger.profile(user_id, now);
                Reply::with_keyboard(render::welcome_text(&view), render::main_keyboard())
            }
            Command::Help => Reply::text(render::help_text()),
            Command::Tap => self.action(user_id, Action::Tap, now, render::tap_text),
            Command::Profile => {
                let view = self.ledger.profile(user_id, now);
                Reply::text(render::profile_text(&view))
            }
            Command::Shop => {
                let view = self.ledger.profile(user_id, now);
                Reply::with_keyboard(render::shop_text(&view), render::shop_keyboard())
            }
            Command::UpgradeTap => self.action(user_id, Action::UpgradeTap, now, |view| {
                format!("🖱 Tap power is now {}", view.tap_power)
            }),
            Command::UpgradeRegen => self.action(user_id, Action::UpgradeRegen, now, |view| {
                format!("🔋 Regen is now {}/s", view.energy_regen)
            }),
            Command::UpgradeAutoFarm => {
                self.action(user_id, Action::UpgradeAutoFarm, now, |view| {
                    format!("🤖 Auto-farm is now {}/s", view.auto_farm_level)
                })
            }
            Command::UpgradeMaxEnergy => {
                self.action(user_id, Action::UpgradeMaxEnergy, now, |view| {
                    format!("🔼 Max energy is now {}", view.max_energy)
                })
            }
            Command::BuyEnergy => self.action(user_id, Action::BuyEnergy, now, |view| {
                format!("⚡ Energy restored to {}", view.energy)
            }),
            Command::Top(kind) => self.top(kind.as_deref()),
            Command::Admin => self.start_admin_login(user_id),
            Command::Logout => {
                self.sessions.set_admin(user_id, false);
                Reply::text("🔒 Admin mode disabled")
            }
            Command::Cancel => Reply::text("Nothing to cancel"),
            Command::Grant {
                user_id: target_id,
                target,
                amount,
            } => self.grant(user_id, target_id, &target, amount, now),
            Command::Invalid(usage) => Reply::text(usage),
            Command::Unknown => Reply::text(render::help_text()),
        }
    }

    fn action(
        &self,
        user_id: UserId,
        action: Action,
        now: DateTime<Utc>,
        render_ok: impl Fn(&tapcoin_core::AccountView) -> String,
    ) -> Reply {
        match self.ledger.apply(user_id, action, now) {
            Ok(view) => Reply::text(render_ok(&view)),
            Err(err) => Reply::text(render::error_text(&err)),
        }
    }

    fn top(&self, kind: Option<&str>) -> Reply {
        let key = match kind.unwrap_or("balance").parse::<LeaderboardKey>() {
            Ok(key) => key,
            Err(err) => return Reply::text(render::error_text(&err)),
        };
        let entries = self.ledger.leaderboard(key, TOP_LIMIT);
        Reply::text(render::top_text(key, &entries))
    }

    fn start_admin_login(&self, user_id: UserId) -> Reply {
        if self.config.admin_password.is_none() {
            return Reply::text("Admin mode is not configured");
        }
        if self.caller(user_id).admin {
            return Reply::text("🔓 Already in admin mode");
        }
        self.sessions.set_pending(user_id, PendingInput::AdminPassword);
        Reply::text("🔑 Enter the admin password (or /cancel):")
    }

    fn check_password(&self, user_id: UserId, text: &str) -> Reply {
        if text == "/cancel" {
            return Reply::text("Login cancelled");
        }
        match &self.config.admin_password {
            Some(password) if password == text => {
                self.sessions.set_admin(user_id, true);
                info!(user_id, "admin session opened");
                Reply::text("🔓 Admin mode enabled")
            }
            _ => {
                warn!(user_id, "failed admin login");
                Reply::text("❌ Wrong password")
            }
        }
    }

    fn grant(
        &self,
        caller_id: UserId,
        target_id: UserId,
        target: &str,
        amount: f64,
        now: DateTime<Utc>,
    ) -> Reply {
        let caller = self.caller(caller_id);
        if !caller.admin {
            return Reply::text("❌ Admins only");
        }

        let kind = match GrantKind::parse(target, amount) {
            Ok(kind) => kind,
            Err(err) => return Reply::text(render::error_text(&err)),
        };

        match self.ledger.admin_grant(caller, target_id, kind, now) {
            Ok(view) => Reply::text(format!(
                "✅ Granted {} {} to {} (balance now {})",
                amount, target, target_id, view.balance
            )),
            Err(err) => Reply::text(render::error_text(&err)),
        }
    }

    /// Capabilities of the sender: the owner identity needs no password,
    /// everyone else earns the admin flag through the password flow.
    fn caller(&self, user_id: UserId) -> Caller {
        let owner = self.config.owner_id == Some(user_id);
        Caller {
            admin: owner || self.sessions.is_admin(user_id),
            owner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn service() -> BotService {
        BotService::new(
            Arc::new(Ledger::new()),
            BotConfig {
                admin_password: Some("hunter2".to_string()),
                owner_id: Some(1000),
            },
        )
    }

    #[test]
    fn test_start_creates_account_and_shows_keyboard() {
        let bot = service();

        let reply = bot.handle_message(1, "/start", base_time());

        assert!(reply.text.contains("💰 Balance: 0"));
        assert!(reply.text.contains("⚡ Energy: 100"));
        assert!(reply.keyboard.is_some());
    }

    #[test]
    fn test_tap_button_earns_a_coin() {
        let bot = service();
        let t0 = base_time();
        bot.handle_message(1, "/start", t0);

        let reply = bot.handle_message(1, "👇 Tap", t0);

        assert!(reply.text.contains("💰 Balance: 1"));
        assert!(reply.text.contains("⚡ Energy: 99"));
    }

    #[test]
    fn test_unaffordable_upgrade_reports_price() {
        let bot = service();
        let t0 = base_time();
        bot.handle_message(1, "/start", t0);

        let reply = bot.handle_message(1, "🖱 Tap power +1", t0);

        assert_eq!(reply.text, "❌ Need 100 coins");
    }

    #[test]
    fn test_admin_password_flow() {
        let bot = service();
        let t0 = base_time();
        bot.handle_message(5, "/start", t0);

        let reply = bot.handle_message(5, "/admin", t0);
        assert!(reply.text.contains("password"));

        // Wrong password first; the prompt is consumed either way.
        let reply = bot.handle_message(5, "swordfish", t0);
        assert_eq!(reply.text, "❌ Wrong password");

        bot.handle_message(5, "/admin", t0);
        let reply = bot.handle_message(5, "hunter2", t0);
        assert_eq!(reply.text, "🔓 Admin mode enabled");

        // Now grants work.
        let reply = bot.handle_message(5, "/grant 5 balance 100", t0);
        assert!(reply.text.starts_with("✅ Granted"));
    }

    #[test]
    fn test_grant_denied_without_admin_session() {
        let bot = service();
        let t0 = base_time();
        bot.handle_message(2, "/start", t0);

        let reply = bot.handle_message(2, "/grant 2 balance 100", t0);

        assert_eq!(reply.text, "❌ Admins only");
    }

    #[test]
    fn test_negative_grant_requires_owner() {
        let bot = service();
        let t0 = base_time();
        bot.handle_message(3, "/start", t0);
        bot.handle_message(3, "/admin", t0);
        bot.handle_message(3, "hunter2", t0);

        let reply = bot.handle_message(3, "/grant 3 balance -50", t0);
        assert_eq!(reply.text, "❌ Not allowed");

        // The owner can, without any password.
        bot.handle_message(1000, "/start", t0);
        bot.handle_message(1000, "/grant 1000 balance 80", t0);
        let reply = bot.handle_message(1000, "/grant 1000 balance -50", t0);
        assert!(reply.text.contains("balance now 30"));
    }

    #[test]
    fn test_cancel_aborts_password_prompt() {
        let bot = service();
        let t0 = base_time();

        bot.handle_message(7, "/admin", t0);
        let reply = bot.handle_message(7, "/cancel", t0);
        assert_eq!(reply.text, "Login cancelled");

        // The prompt is gone: the next message parses as a command again.
        let reply = bot.handle_message(7, "/profile", t0);
        assert!(reply.text.contains("📊 Profile"));
    }

    #[test]
    fn test_idle_time_earns_auto_farm_income() {
        let bot = service();
        let t0 = base_time();
        bot.handle_message(1000, "/start", t0);
        bot.handle_message(1000, "/grant 1000 auto_farm 2", t0);

        let reply = bot.handle_message(1000, "/profile", t0 + Duration::seconds(10));

        assert!(reply.text.contains("💰 Balance: 20"));
        assert!(reply.text.contains("🤖 Auto-farm: 2/s"));
    }

    #[test]
    fn test_shop_lists_live_prices() {
        let bot = service();
        let t0 = base_time();
        bot.handle_message(1, "/start", t0);

        let reply = bot.handle_message(1, "🛒 Shop", t0);

        assert!(reply.text.contains("🖱 Tap power +1 - 100 coins"));
        assert!(reply.text.contains("⚡ Full refill - 200 coins"));
        assert!(reply.keyboard.is_some());
    }

    #[test]
    fn test_top_unknown_kind_reports_error() {
        let bot = service();

        let reply = bot.handle_message(1, "/top energy", base_time());

        assert_eq!(reply.text, "❌ Unknown target: energy");
    }
}
