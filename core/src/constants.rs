//! Engine constants - single source of truth for game balance parameters

/// Starting energy capacity; `max_energy` never drops below this
pub const DEFAULT_MAX_ENERGY: u64 = 100;

/// Starting currency per tap; `tap_power` never drops below this
pub const DEFAULT_TAP_POWER: u64 = 1;

/// Starting energy regeneration (units per second)
pub const DEFAULT_ENERGY_REGEN: f64 = 1.0;

/// Flat price of a full energy refill
pub const ENERGY_REFILL_COST: u64 = 200;

/// Tap upgrade price per current tap power
pub const TAP_UPGRADE_RATE: u64 = 100;

/// Regen upgrade price per unit of current regen rate
pub const REGEN_UPGRADE_RATE: f64 = 200.0;

/// Regen gained per upgrade (units per second)
pub const REGEN_UPGRADE_STEP: f64 = 0.5;

/// Auto-farm upgrade price per target level
pub const AUTO_FARM_UPGRADE_RATE: u64 = 500;

/// Max-energy upgrade price per current capacity point
pub const MAX_ENERGY_UPGRADE_RATE: u64 = 10;

/// Capacity gained per max-energy upgrade
pub const MAX_ENERGY_UPGRADE_STEP: u64 = 25;
