//! Engine error taxonomy
//!
//! Every variant is a recoverable rejection reported back to the caller;
//! nothing here is fatal to the process.

use thiserror::Error;

use crate::account::UserId;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("not enough energy")]
    InsufficientEnergy,

    #[error("insufficient funds: need {required}")]
    InsufficientFunds { required: u64 },

    #[error("unauthorized")]
    Unauthorized,

    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("unknown target: {0}")]
    TargetNotFound(String),

    #[error("account {0} not found")]
    AccountNotFound(UserId),
}
