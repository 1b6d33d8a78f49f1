//! Route table and player-facing handlers

use axum::extract::{Path, Query, State};
use axum::{
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tapcoin_core::{AccountView, Action, LeaderboardEntry, LeaderboardKey, UserId};
use tracing::debug;

use crate::grant_handlers::admin_grant;
use crate::{ApiResult, ApiState};

/// Default number of rows served by the leaderboard endpoint
const DEFAULT_TOP_LIMIT: usize = 5;
/// Hard cap on requested leaderboard size
const MAX_TOP_LIMIT: usize = 100;

pub fn create_routes() -> Router<ApiState> {
    Router::new()
        // Core game endpoints
        .route("/api/profile", post(profile))
        .route("/api/tap", post(tap))
        .route("/api/upgrade/tap", post(upgrade_tap))
        .route("/api/upgrade/regen", post(upgrade_regen))
        .route("/api/upgrade/auto-farm", post(upgrade_auto_farm))
        .route("/api/upgrade/max-energy", post(upgrade_max_energy))
        .route("/api/buy-energy", post(buy_energy))
        // Leaderboard
        .route("/api/top/{kind}", get(top))
        // Admin endpoints
        .route("/api/admin/grant", post(admin_grant))
        // Service endpoints
        .route("/", get(root))
        .route("/health", get(health_check))
}

#[derive(Debug, Deserialize)]
pub struct UserPayload {
    pub user_id: UserId,
}

/// Post-operation snapshot returned by every action endpoint
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub ok: bool,
    pub message: String,
    #[serde(flatten)]
    pub account: AccountView,
}

impl ActionResponse {
    pub fn new(message: impl Into<String>, account: AccountView) -> Self {
        ActionResponse {
            ok: true,
            message: message.into(),
            account,
        }
    }
}

async fn profile(
    State(state): State<ApiState>,
    Json(payload): Json<UserPayload>,
) -> ApiResult<Json<ActionResponse>> {
    let view = state.ledger.profile(payload.user_id, Utc::now());
    Ok(Json(ActionResponse::new("profile refreshed", view)))
}

async fn tap(
    State(state): State<ApiState>,
    Json(payload): Json<UserPayload>,
) -> ApiResult<Json<ActionResponse>> {
    let view = state.ledger.apply(payload.user_id, Action::Tap, Utc::now())?;
    debug!(user_id = payload.user_id, balance = view.balance, "tap");
    Ok(Json(ActionResponse::new("tap registered", view)))
}

async fn upgrade_tap(
    State(state): State<ApiState>,
    Json(payload): Json<UserPayload>,
) -> ApiResult<Json<ActionResponse>> {
    let view = state
        .ledger
        .apply(payload.user_id, Action::UpgradeTap, Utc::now())?;
    Ok(Json(ActionResponse::new(
        format!("tap power is now {}", view.tap_power),
        view,
    )))
}

async fn upgrade_regen(
    State(state): State<ApiState>,
    Json(payload): Json<UserPayload>,
) -> ApiResult<Json<ActionResponse>> {
    let view = state
        .ledger
        .apply(payload.user_id, Action::UpgradeRegen, Utc::now())?;
    Ok(Json(ActionResponse::new(
        format!("regen is now {}/s", view.energy_regen),
        view,
    )))
}

async fn upgrade_auto_farm(
    State(state): State<ApiState>,
    Json(payload): Json<UserPayload>,
) -> ApiResult<Json<ActionResponse>> {
    let view = state
        .ledger
        .apply(payload.user_id, Action::UpgradeAutoFarm, Utc::now())?;
    Ok(Json(ActionResponse::new(
        format!("auto-farm is now {}/s", view.auto_farm_level),
        view,
    )))
}

async fn upgrade_max_energy(
    State(state): State<ApiState>,
    Json(payload): Json<UserPayload>,
) -> ApiResult<Json<ActionResponse>> {
    let view = state
        .ledger
        .apply(payload.user_id, Action::UpgradeMaxEnergy, Utc::now())?;
    Ok(Json(ActionResponse::new(
        format!("max energy is now {}", view.max_energy),
        view,
    )))
}

async fn buy_energy(
    State(state): State<ApiState>,
    Json(payload): Json<UserPayload>,
) -> ApiResult<Json<ActionResponse>> {
    let view = state
        .ledger
        .apply(payload.user_id, Action::BuyEnergy, Utc::now())?;
    Ok(Json(ActionResponse::new("energy restored", view)))
}

#[derive(Debug, Deserialize)]
pub struct TopQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct TopResponse {
    pub kind: String,
    pub items: Vec<LeaderboardEntry>,
}

async fn top(
    State(state): State<ApiState>,
    Path(kind): Path<String>,
    Query(query): Query<TopQuery>,
) -> ApiResult<Json<TopResponse>> {
    let key: LeaderboardKey = kind.parse()?;
    let limit = query.limit.unwrap_or(DEFAULT_TOP_LIMIT).min(MAX_TOP_LIMIT);

    Ok(Json(TopResponse {
        kind,
        items: state.ledger.leaderboard(key, limit),
    }))
}

async fn root() -> &'static str {
    "TapCoin API"
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    uptime_secs: u64,
    accounts: usize,
}

async fn health_check(State(state): State<ApiState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        accounts: state.ledger.len(),
    })
}
