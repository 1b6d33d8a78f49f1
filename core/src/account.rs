//! Per-user game account state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ENERGY_REGEN, DEFAULT_MAX_ENERGY, DEFAULT_TAP_POWER};
use crate::costs::CostTable;

/// Stable numeric identity of an end user (chat id / API caller id)
pub type UserId = i64;

/// Persisted per-user game state.
///
/// `energy` is a real number; it is only truncated at the display edge
/// (see [`Account::display_energy`]), never inside the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub user_id: UserId,
    pub balance: u64,
    pub energy: f64,
    pub max_energy: u64,
    pub tap_power: u64,
    pub energy_regen: f64,
    pub auto_farm_level: u64,
    pub auto_farm_enabled: bool,
    pub last_energy_update: DateTime<Utc>,
    pub last_farm_update: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Default snapshot for an account created on first contact: empty
    /// balance, full energy, both accrual clocks at the creation instant.
    pub fn new(user_id: UserId, now: DateTime<Utc>) -> Self {
        Account {
            user_id,
            balance: 0,
            energy: DEFAULT_MAX_ENERGY as f64,
            max_energy: DEFAULT_MAX_ENERGY,
            tap_power: DEFAULT_TAP_POWER,
            energy_regen: DEFAULT_ENERGY_REGEN,
            auto_farm_level: 0,
            auto_farm_enabled: false,
            last_energy_update: now,
            last_farm_update: now,
            created_at: now,
        }
    }

    /// Energy as shown to users: whole units, fractional part hidden
    pub fn display_energy(&self) -> u64 {
        self.energy.max(0.0) as u64
    }

    /// Snapshot handed back to adapters after every operation
    pub fn view(&self) -> AccountView {
        AccountView {
            user_id: self.user_id,
            balance: self.balance,
            energy: self.display_energy(),
            max_energy: self.max_energy,
            tap_power: self.tap_power,
            energy_regen: self.energy_regen,
            auto_farm_level: self.auto_farm_level,
            auto_farm_enabled: self.auto_farm_enabled,
            costs: CostTable::for_account(self),
        }
    }
}

/// Read-only projection of an [`Account`] plus the live cost table.
///
/// `energy` is the truncated display value; the authoritative float stays
/// inside the account record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountView {
    pub user_id: UserId,
    pub balance: u64,
    pub energy: u64,
    pub max_energy: u64,
    pub tap_power: u64,
    pub energy_regen: f64,
    pub auto_farm_level: u64,
    pub auto_farm_enabled: bool,
    pub costs: CostTable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_defaults() {
        let now = Utc::now();
        let account = Account::new(7, now);

        assert_eq!(account.balance, 0);
        assert_eq!(account.energy, DEFAULT_MAX_ENERGY as f64);
        assert_eq!(account.max_energy, DEFAULT_MAX_ENERGY);
        assert_eq!(account.tap_power, DEFAULT_TAP_POWER);
        assert_eq!(account.energy_regen, DEFAULT_ENERGY_REGEN);
        assert_eq!(account.auto_farm_level, 0);
        assert!(!account.auto_farm_enabled);
        assert_eq!(account.last_energy_update, now);
        assert_eq!(account.last_farm_update, now);
    }

    #[test]
    fn test_display_energy_truncates() {
        let mut account = Account::new(1, Utc::now());
        account.energy = 99.9;
        assert_eq!(account.display_energy(), 99);

        account.energy = 0.4;
        assert_eq!(account.display_energy(), 0);
    }

    #[test]
    fn test_view_carries_costs() {
        let account = Account::new(1, Utc::now());
        let view = account.view();

        assert_eq!(view.energy, 100);
        assert_eq!(view.costs.tap_upgrade, 100);
        assert_eq!(view.costs.buy_energy, 200);
    }
}
