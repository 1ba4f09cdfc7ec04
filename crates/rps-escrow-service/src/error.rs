//! HTTP error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rps_escrow_core::{ErrorKind, EscrowError, GameId};

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// A rejected escrow operation
    Escrow(EscrowError),
    /// Read of a game that does not exist
    GameNotFound(GameId),
    /// Missing or malformed `X-Account` header
    Unauthenticated(String),
    /// Malformed path or body value
    BadRequest(String),
    /// Endpoint not enabled in this configuration
    Disabled(&'static str),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Escrow(EscrowError::InvalidMove(_)) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Escrow(e) => match e.kind() {
                ErrorKind::Funds => StatusCode::BAD_REQUEST,
                ErrorKind::Authorization => StatusCode::FORBIDDEN,
                ErrorKind::Lifecycle | ErrorKind::Timing => StatusCode::CONFLICT,
                ErrorKind::Transfer => StatusCode::BAD_GATEWAY,
            },
            AppError::GameNotFound(_) | AppError::Disabled(_) => StatusCode::NOT_FOUND,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
        }
    }

    fn kind(&self) -> serde_json::Value {
        match self {
            AppError::Escrow(EscrowError::InvalidMove(_)) | AppError::BadRequest(_) => {
                "invalid_input".into()
            }
            AppError::Escrow(e) => serde_json::json!(e.kind()),
            AppError::GameNotFound(_) => "not_found".into(),
            AppError::Unauthenticated(_) => "unauthenticated".into(),
            AppError::Disabled(_) => "disabled".into(),
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Escrow(e) => e.to_string(),
            AppError::GameNotFound(game_id) => format!("Game {game_id} not found"),
            AppError::Unauthenticated(reason) | AppError::BadRequest(reason) => reason.clone(),
            AppError::Disabled(what) => format!("{what} is disabled"),
        }
    }
}

impl From<EscrowError> for AppError {
    fn from(e: EscrowError) -> Self {
        AppError::Escrow(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.message(),
            "kind": self.kind(),
        });
        (self.status(), Json(body)).into_response()
    }
}
