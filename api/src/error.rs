//! API Error Handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tapcoin_core::EngineError;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::Engine(err) => {
                let (status, error_type) = match &err {
                    EngineError::InsufficientEnergy => (StatusCode::BAD_REQUEST, "insufficient_energy"),
                    EngineError::InsufficientFunds { .. } => {
                        (StatusCode::BAD_REQUEST, "insufficient_funds")
                    }
                    EngineError::ZeroAmount => (StatusCode::BAD_REQUEST, "zero_amount"),
                    EngineError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
                    EngineError::TargetNotFound(_) => (StatusCode::NOT_FOUND, "target_not_found"),
                    EngineError::AccountNotFound(_) => (StatusCode::NOT_FOUND, "account_not_found"),
                };
                (status, error_type, err.to_string())
            }
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
        };

        let body = Json(json!({
            "error": error_type,
            "message": message,
        }));

        (status, body).into_response()
    }
}
