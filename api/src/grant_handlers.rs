//! Admin Grant Handlers
//!
//! Stat grants are gated by bearer tokens from the node config: the admin
//! token maps to the admin capability, the owner token additionally allows
//! negative amounts.

use axum::extract::State;
use axum::http::{header::AUTHORIZATION, HeaderMap};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tapcoin_core::{GrantKind, UserId};
use tracing::warn;

use crate::routes::ActionResponse;
use crate::{ApiError, ApiResult, ApiState};

#[derive(Debug, Deserialize)]
pub struct GrantRequest {
    pub user_id: UserId,
    /// Stat name: balance, tap_power, energy_regen, auto_farm, max_energy
    pub target: String,
    pub amount: f64,
}

pub async fn admin_grant(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(request): Json<GrantRequest>,
) -> ApiResult<Json<ActionResponse>> {
    let token = bearer_token(&headers)
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))?;
    let caller = state.caller_for_token(token).inspect_err(|_| {
        warn!(user_id = request.user_id, "grant rejected: bad token");
    })?;

    let kind = GrantKind::parse(&request.target, request.amount)?;
    let view = state
        .ledger
        .admin_grant(caller, request.user_id, kind, Utc::now())?;

    Ok(Json(ActionResponse::new(
        format!("granted {} {}", request.amount, request.target),
        view,
    )))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
