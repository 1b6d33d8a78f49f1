//! Action operations over a single account
//!
//! Every operation assumes the caller has already run the accrual pair for
//! the current instant; [`crate::ledger::Ledger`] enforces that ordering.
//! Rejections happen before any mutation, so a failed action leaves the
//! account exactly as accrual left it.

use serde::{Deserialize, Serialize};

use crate::account::Account;
use crate::constants::{ENERGY_REFILL_COST, MAX_ENERGY_UPGRADE_STEP, REGEN_UPGRADE_STEP};
use crate::costs;
use crate::error::{EngineError, EngineResult};

/// Player-facing actions, all spending either energy or balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Tap,
    UpgradeTap,
    UpgradeRegen,
    UpgradeAutoFarm,
    UpgradeMaxEnergy,
    BuyEnergy,
}

/// Apply one action to an already-accrued account
pub fn apply(account: &mut Account, action: Action) -> EngineResult<()> {
    match action {
        Action::Tap => tap(account),
        Action::UpgradeTap => upgrade_tap(account),
        Action::UpgradeRegen => upgrade_regen(account),
        Action::UpgradeAutoFarm => upgrade_auto_farm(account),
        Action::UpgradeMaxEnergy => upgrade_max_energy(account),
        Action::BuyEnergy => buy_energy(account),
    }
}

/// Deduct `cost` or reject without touching the account
fn charge(account: &mut Account, cost: u64) -> EngineResult<()> {
    if account.balance < cost {
        return Err(EngineError::InsufficientFunds { required: cost });
    }
    account.balance -= cost;
    Ok(())
}

/// Convert `tap_power` energy into `tap_power` coins
pub fn tap(account: &mut Account) -> EngineResult<()> {
    let needed = account.tap_power as f64;
    if account.energy < needed {
        return Err(EngineError::InsufficientEnergy);
    }
    account.energy -= needed;
    account.balance = account.balance.saturating_add(account.tap_power);
    Ok(())
}

pub fn upgrade_tap(account: &mut Account) -> EngineResult<()> {
    let cost = costs::tap_upgrade_cost(account.tap_power);
    charge(account, cost)?;
    account.tap_power = account.tap_power.saturating_add(1);
    Ok(())
}

pub fn upgrade_regen(account: &mut Account) -> EngineResult<()> {
    let cost = costs::regen_upgrade_cost(account.energy_regen);
    charge(account, cost)?;
    account.energy_regen += REGEN_UPGRADE_STEP;
    Ok(())
}

/// Buying the first level also switches the farm on; it is never switched
/// off again by the engine.
pub fn upgrade_auto_farm(account: &mut Account) -> EngineResult<()> {
    let cost = costs::auto_farm_upgrade_cost(account.auto_farm_level);
    charge(account, cost)?;
    account.auto_farm_level = account.auto_farm_level.saturating_add(1);
    account.auto_farm_enabled = true;
    Ok(())
}

pub fn upgrade_max_energy(account: &mut Account) -> EngineResult<()> {
    let cost = costs::max_energy_upgrade_cost(account.max_energy);
    charge(account, cost)?;
    account.max_energy = account.max_energy.saturating_add(MAX_ENERGY_UPGRADE_STEP);
    let cap = account.max_energy as f64;
    account.energy = (account.energy + MAX_ENERGY_UPGRADE_STEP as f64).min(cap);
    Ok(())
}

/// Full refill, not additive
pub fn buy_energy(account: &mut Account) -> EngineResult<()> {
    charge(account, ENERGY_REFILL_COST)?;
    account.energy = account.max_energy as f64;
    Ok(())
}
