//! TapCoin Core Library
//!
//! The account ledger engine: energy regeneration, auto-farm accrual,
//! tap actions and upgrade purchases over per-user game accounts.

pub mod account;
pub mod accrual;
pub mod constants;
pub mod costs;
pub mod engine;
pub mod error;
pub mod grant;
pub mod ledger;

// Re-export main types
pub use account::{Account, AccountView, UserId};
pub use costs::CostTable;
pub use engine::Action;
pub use error::{EngineError, EngineResult};
pub use grant::{Caller, GrantKind};
pub use ledger::{LeaderboardEntry, LeaderboardKey, Ledger};
