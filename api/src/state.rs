//! API State Management

use std::sync::Arc;

use tapcoin_core::{Caller, Ledger};

use crate::error::{ApiError, ApiResult};

#[derive(Clone)]
pub struct ApiState {
    pub ledger: Arc<Ledger>,
    pub start_time: std::time::Instant,
    /// Bearer token granting the admin capability, if configured
    pub admin_token: Option<String>,
    /// Bearer token granting the owner capability (negative grants)
    pub owner_token: Option<String>,
}

impl ApiState {
    pub fn new(ledger: Arc<Ledger>) -> Self {
        Self {
            ledger,
            start_time: std::time::Instant::now(),
            admin_token: None,
            owner_token: None,
        }
    }

    /// Set the admin bearer token (called after ApiState creation)
    pub fn with_admin_token(mut self, token: Option<String>) -> Self {
        self.admin_token = token;
        self
    }

    /// Set the owner bearer token
    pub fn with_owner_token(mut self, token: Option<String>) -> Self {
        self.owner_token = token;
        self
    }

    /// Map a presented bearer token onto engine capabilities
    pub fn caller_for_token(&self, token: &str) -> ApiResult<Caller> {
        if self.owner_token.as_deref() == Some(token) {
            return Ok(Caller::owner());
        }
        if self.admin_token.as_deref() == Some(token) {
            return Ok(Caller::admin());
        }
        Err(ApiError::Unauthorized("invalid admin token".to_string()))
    }
}
