//! Upgrade pricing
//!
//! Every cost is a pure function of the current stat value and is recomputed
//! fresh at evaluation time, never cached.

use serde::{Deserialize, Serialize};

use crate::account::Account;
use crate::constants::{
    AUTO_FARM_UPGRADE_RATE, ENERGY_REFILL_COST, MAX_ENERGY_UPGRADE_RATE, REGEN_UPGRADE_RATE,
    TAP_UPGRADE_RATE,
};

/// Price of raising `tap_power` by one
pub fn tap_upgrade_cost(tap_power: u64) -> u64 {
    tap_power.saturating_mul(TAP_UPGRADE_RATE)
}

/// Price of raising `energy_regen` by one step.
///
/// Truncated to whole coins; the regen rate itself stays fractional.
pub fn regen_upgrade_cost(energy_regen: f64) -> u64 {
    (energy_regen * REGEN_UPGRADE_RATE) as u64
}

/// Price of raising `auto_farm_level` to `level + 1`
pub fn auto_farm_upgrade_cost(auto_farm_level: u64) -> u64 {
    auto_farm_level
        .saturating_add(1)
        .saturating_mul(AUTO_FARM_UPGRADE_RATE)
}

/// Price of raising `max_energy` by one step
pub fn max_energy_upgrade_cost(max_energy: u64) -> u64 {
    max_energy.saturating_mul(MAX_ENERGY_UPGRADE_RATE)
}

/// Current price of every purchasable upgrade for one account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostTable {
    pub tap_upgrade: u64,
    pub regen_upgrade: u64,
    pub auto_farm_upgrade: u64,
    pub buy_energy: u64,
    pub max_energy_upgrade: u64,
}

impl CostTable {
    pub fn for_account(account: &Account) -> Self {
        CostTable {
            tap_upgrade: tap_upgrade_cost(account.tap_power),
            regen_upgrade: regen_upgrade_cost(account.energy_regen),
            auto_farm_upgrade: auto_farm_upgrade_cost(account.auto_farm_level),
            buy_energy: ENERGY_REFILL_COST,
            max_energy_upgrade: max_energy_upgrade_cost(account.max_energy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_starting_prices() {
        let account = Account::new(1, Utc::now());
        let costs = CostTable::for_account(&account);

        assert_eq!(costs.tap_upgrade, 100);
        assert_eq!(costs.regen_upgrade, 200);
        assert_eq!(costs.auto_farm_upgrade, 500);
        assert_eq!(costs.buy_energy, 200);
        assert_eq!(costs.max_energy_upgrade, 1000);
    }

    #[test]
    fn test_regen_cost_truncates_to_whole_coins() {
        // 1.5 regen * 200 = 300 exactly; 1.7 * 200 = 340.0000...
        assert_eq!(regen_upgrade_cost(1.5), 300);
        // fractional products lose the sub-coin part
        assert_eq!(regen_upgrade_cost(1.0005), 200);
    }

    #[test]
    fn test_costs_increase_with_stat() {
        assert!(tap_upgrade_cost(2) > tap_upgrade_cost(1));
        assert!(regen_upgrade_cost(1.5) > regen_upgrade_cost(1.0));
        assert!(auto_farm_upgrade_cost(1) > auto_farm_upgrade_cost(0));
        assert!(max_energy_upgrade_cost(125) > max_energy_upgrade_cost(100));
    }
}
