//! Privileged stat grants
//!
//! Adapters authenticate callers however they like (password session, API
//! token); the engine only sees the resulting capability flags.

use crate::account::Account;
use crate::constants::{DEFAULT_MAX_ENERGY, DEFAULT_TAP_POWER};
use crate::error::{EngineError, EngineResult};

/// Capabilities of the identity invoking a privileged operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Caller {
    pub admin: bool,
    /// The single owner identity; alone allowed to apply negative grants
    pub owner: bool,
}

impl Caller {
    pub fn admin() -> Self {
        Caller {
            admin: true,
            owner: false,
        }
    }

    pub fn owner() -> Self {
        Caller {
            admin: true,
            owner: true,
        }
    }
}

/// Target stat and signed amount of an admin grant
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GrantKind {
    Balance(i64),
    TapPower(i64),
    EnergyRegen(f64),
    AutoFarm(i64),
    /// Raises capacity and current energy together
    MaxEnergy(i64),
}

impl GrantKind {
    /// Map an adapter-supplied target name and amount onto a grant.
    ///
    /// Integer targets truncate the amount toward zero, mirroring how those
    /// stats are stored.
    pub fn parse(target: &str, amount: f64) -> EngineResult<Self> {
        match target {
            "balance" => Ok(GrantKind::Balance(amount as i64)),
            "tap_power" => Ok(GrantKind::TapPower(amount as i64)),
            "energy_regen" => Ok(GrantKind::EnergyRegen(amount)),
            "auto_farm" => Ok(GrantKind::AutoFarm(amount as i64)),
            "max_energy" => Ok(GrantKind::MaxEnergy(amount as i64)),
            other => Err(EngineError::TargetNotFound(other.to_string())),
        }
    }

    fn is_zero(&self) -> bool {
        match *self {
            GrantKind::Balance(a)
            | GrantKind::TapPower(a)
            | GrantKind::AutoFarm(a)
            | GrantKind::MaxEnergy(a) => a == 0,
            GrantKind::EnergyRegen(a) => a == 0.0,
        }
    }

    fn is_negative(&self) -> bool {
        match *self {
            GrantKind::Balance(a)
            | GrantKind::TapPower(a)
            | GrantKind::AutoFarm(a)
            | GrantKind::MaxEnergy(a) => a < 0,
            GrantKind::EnergyRegen(a) => a < 0.0,
        }
    }
}

/// Apply a grant to an already-accrued account.
///
/// Results clamp at each stat's lower bound so no grant can break the
/// account invariants; a grant leaving the auto-farm at a positive level
/// switches it on.
pub fn apply_grant(account: &mut Account, caller: Caller, kind: GrantKind) -> EngineResult<()> {
    if !caller.admin {
        return Err(EngineError::Unauthorized);
    }
    if kind.is_zero() {
        return Err(EngineError::ZeroAmount);
    }
    if kind.is_negative() && !caller.owner {
        return Err(EngineError::Unauthorized);
    }

    match kind {
        GrantKind::Balance(amount) => {
            account.balance = add_clamped(account.balance, amount, 0);
        }
        GrantKind::TapPower(amount) => {
            account.tap_power = add_clamped(account.tap_power, amount, DEFAULT_TAP_POWER);
        }
        GrantKind::EnergyRegen(amount) => {
            account.energy_regen = (account.energy_regen + amount).max(0.0);
        }
        GrantKind::AutoFarm(amount) => {
            account.auto_farm_level = add_clamped(account.auto_farm_level, amount, 0);
            if account.auto_farm_level > 0 {
                account.auto_farm_enabled = true;
            }
        }
        GrantKind::MaxEnergy(amount) => {
            account.max_energy = add_clamped(account.max_energy, amount, DEFAULT_MAX_ENERGY);
            let cap = account.max_energy as f64;
            account.energy = (account.energy + amount as f64).clamp(0.0, cap);
        }
    }

    Ok(())
}

/// Signed add on an unsigned stat with a lower bound
fn add_clamped(value: u64, amount: i64, floor: u64) -> u64 {
    let next = if amount >= 0 {
        value.saturating_add(amount as u64)
    } else {
        value.saturating_sub(amount.unsigned_abs())
    };
    next.max(floor)
}
