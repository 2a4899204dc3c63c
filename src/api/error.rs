use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use super::assets;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request: a required field is absent or empty.
    #[error("Missing {0}")]
    MissingField(&'static str),

    #[error("Unknown pharmacy")]
    UnknownPharmacy,

    /// Deliberately undifferentiated: unknown login, wrong password and
    /// missing superuser privilege all surface as this one error.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::MissingField(_) | Self::UnknownPharmacy => {
                error_json(StatusCode::BAD_REQUEST, self.to_string())
            }
            // The login form is re-rendered with the generic message.
            Self::InvalidCredentials => (
                StatusCode::BAD_REQUEST,
                assets::login_page(Some("Invalid credentials")),
            )
                .into_response(),
            Self::Unauthenticated => error_json(StatusCode::UNAUTHORIZED, self.to_string()),
            Self::Database(msg) => {
                tracing::error!("Database error: {msg}");
                error_json(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred",
                )
            }
            Self::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                error_json(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred",
                )
            }
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

fn error_json(status: StatusCode, message: impl Into<String>) -> Response {
    let body = json!({ "ok": false, "error": message.into() });
    (status, Json(body)).into_response()
}
