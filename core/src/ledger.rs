//! Shared account registry
//!
//! Each operation holds the map's exclusive entry guard for its account
//! across the whole read-accrue-evaluate-write sequence, so two front-ends
//! racing on one account serialize instead of committing divergent states.
//! Operations on different accounts proceed in parallel.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use dashmap::mapref::one::RefMut;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::account::{Account, AccountView, UserId};
use crate::accrual;
use crate::engine::{self, Action};
use crate::error::{EngineError, EngineResult};
use crate::grant::{self, Caller, GrantKind};

#[derive(Debug, Default)]
pub struct Ledger {
    accounts: DashMap<UserId, Account>,
}

impl Ledger {
    pub fn new() -> Self {
        Ledger {
            accounts: DashMap::new(),
        }
    }

    /// Rebuild a ledger from persisted accounts
    pub fn from_accounts<I>(accounts: I) -> Self
    where
        I: IntoIterator<Item = Account>,
    {
        let ledger = Ledger::new();
        for account in accounts {
            ledger.accounts.insert(account.user_id, account);
        }
        ledger
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Bring an account up to date and return a fresh snapshot, creating
    /// the account on first contact.
    pub fn profile(&self, user_id: UserId, now: DateTime<Utc>) -> AccountView {
        let mut entry = self.entry_or_create(user_id, now);
        let account = entry.value_mut();
        accrue(account, now);
        account.view()
    }

    /// Run one action as a single accrue-evaluate-commit step.
    ///
    /// Accrued energy and farm income stay committed even when the action
    /// itself is rejected.
    pub fn apply(&self, user_id: UserId, action: Action, now: DateTime<Utc>) -> EngineResult<AccountView> {
        let mut entry = self.entry_or_create(user_id, now);
        let account = entry.value_mut();
        accrue(account, now);
        engine::apply(account, action)?;
        Ok(account.view())
    }

    /// Privileged stat adjustment. Never creates the target account.
    pub fn admin_grant(
        &self,
        caller: Caller,
        user_id: UserId,
        kind: GrantKind,
        now: DateTime<Utc>,
    ) -> EngineResult<AccountView> {
        let mut entry = self
            .accounts
            .get_mut(&user_id)
            .ok_or(EngineError::AccountNotFound(user_id))?;
        let account = entry.value_mut();
        accrue(account, now);
        grant::apply_grant(account, caller, kind)?;
        info!(user_id, ?kind, "admin grant applied");
        Ok(account.view())
    }

    /// Top accounts ordered by the chosen stat. Values are as last
    /// committed; no accrual runs for a read-only projection.
    pub fn leaderboard(&self, key: LeaderboardKey, limit: usize) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<LeaderboardEntry> = self
            .accounts
            .iter()
            .map(|entry| {
                let account = entry.value();
                LeaderboardEntry {
                    user_id: account.user_id,
                    balance: account.balance,
                    auto_farm_level: account.auto_farm_level,
                    energy_regen: account.energy_regen,
                }
            })
            .collect();

        entries.sort_by(|a, b| match key {
            LeaderboardKey::Balance => b.balance.cmp(&a.balance),
            LeaderboardKey::AutoFarm => b.auto_farm_level.cmp(&a.auto_farm_level),
            LeaderboardKey::Regen => b.energy_regen.total_cmp(&a.energy_regen),
        });
        entries.truncate(limit);
        entries
    }

    /// Clone out every account, ordered by id, for the storage layer
    pub fn export_accounts(&self) -> BTreeMap<UserId, Account> {
        self.accounts
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect()
    }

    fn entry_or_create(&self, user_id: UserId, now: DateTime<Utc>) -> RefMut<'_, UserId, Account> {
        self.accounts.entry(user_id).or_insert_with(|| {
            debug!(user_id, "creating account on first contact");
            Account::new(user_id, now)
        })
    }
}

fn accrue(account: &mut Account, now: DateTime<Utc>) {
    accrual::accrue_energy(account, now);
    accrual::accrue_auto_farm(account, now);
}

/// Stat a leaderboard is ranked by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderboardKey {
    Balance,
    AutoFarm,
    Regen,
}

impl FromStr for LeaderboardKey {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "balance" => Ok(LeaderboardKey::Balance),
            "auto-farm" => Ok(LeaderboardKey::AutoFarm),
            "regen" => Ok(LeaderboardKey::Regen),
            other => Err(EngineError::TargetNotFound(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: UserId,
    pub balance: u64,
    pub auto_farm_level: u64,
    pub energy_regen: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use chrono::TimeZone;

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_account_created_lazily_with_full_energy() {
        let ledger = Ledger::new();
        let t0 = base_time();

        let view = ledger.profile(42, t0);

        assert_eq!(ledger.len(), 1);
        assert_eq!(view.user_id, 42);
        assert_eq!(view.balance, 0);
        assert_eq!(view.energy, 100);
    }

    #[test]
    fn test_apply_accrues_before_evaluating() {
        let ledger = Ledger::new();
        let t0 = base_time();
        ledger.profile(1, t0);

        // Drain energy down to nothing, then wait long enough to afford
        // exactly one more tap.
        for _ in 0..100 {
            ledger.apply(1, Action::Tap, t0).unwrap();
        }
        assert_eq!(
            ledger.apply(1, Action::Tap, t0),
            Err(EngineError::InsufficientEnergy)
        );

        let view = ledger.apply(1, Action::Tap, t0 + Duration::seconds(1)).unwrap();
        assert_eq!(view.balance, 101);
        assert_eq!(view.energy, 0);
    }

    #[test]
    fn test_rejection_still_commits_accrual() {
        let ledger = Ledger::new();
        let t0 = base_time();
        ledger.profile(1, t0);

        // Nothing affordable, but the elapsed time must still be credited.
        let result = ledger.apply(1, Action::UpgradeTap, t0 + Duration::seconds(30));
        assert_eq!(
            result,
            Err(EngineError::InsufficientFunds { required: 100 })
        );

        let view = ledger.profile(1, t0 + Duration::seconds(30));
        assert_eq!(view.energy, 100); // was already full; clock advanced
        let exported = ledger.export_accounts();
        assert_eq!(
            exported.get(&1).unwrap().last_energy_update,
            t0 + Duration::seconds(30)
        );
    }

    #[test]
    fn test_admin_grant_does_not_create_accounts() {
        let ledger = Ledger::new();

        let result = ledger.admin_grant(
            Caller::owner(),
            99,
            GrantKind::Balance(10),
            base_time(),
        );

        assert_eq!(result, Err(EngineError::AccountNotFound(99)));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_leaderboard_orders_and_limits() {
        let ledger = Ledger::new();
        let t0 = base_time();
        for (id, balance) in [(1, 50u64), (2, 200), (3, 125)] {
            ledger.profile(id, t0);
            ledger
                .admin_grant(Caller::admin(), id, GrantKind::Balance(balance as i64), t0)
                .unwrap();
        }

        let top = ledger.leaderboard(LeaderboardKey::Balance, 2);

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].user_id, 2);
        assert_eq!(top[1].user_id, 3);
    }

    #[test]
    fn test_leaderboard_key_parsing() {
        assert_eq!("balance".parse(), Ok(LeaderboardKey::Balance));
        assert_eq!("auto-farm".parse(), Ok(LeaderboardKey::AutoFarm));
        assert_eq!("regen".parse(), Ok(LeaderboardKey::Regen));
        assert!("energy".parse::<LeaderboardKey>().is_err());
    }

    #[test]
    fn test_racing_taps_never_lose_updates() {
        // 8 threads race 200 taps against 100 energy at a frozen instant;
        // exactly 100 must land.
        let ledger = std::sync::Arc::new(Ledger::new());
        let t0 = base_time();
        ledger.profile(1, t0);

        std::thread::scope(|scope| {
            for _ in 0..8 {
                let ledger = std::sync::Arc::clone(&ledger);
                scope.spawn(move || {
                    for _ in 0..25 {
                        let _ = ledger.apply(1, Action::Tap, t0);
                    }
                });
            }
        });

        let view = ledger.profile(1, t0);
        assert_eq!(view.balance, 100);
        assert_eq!(view.energy, 0);
    }

    #[test]
    fn test_export_import_round_trip() {
        let ledger = Ledger::new();
        let t0 = base_time();
        ledger.profile(1, t0);
        ledger.profile(2, t0);
        ledger
            .admin_grant(Caller::admin(), 2, GrantKind::Balance(77), t0)
            .unwrap();

        let restored = Ledger::from_accounts(ledger.export_accounts().into_values());

        assert_eq!(restored.len(), 2);
        assert_eq!(restored.profile(2, t0).balance, 77);
    }
}
