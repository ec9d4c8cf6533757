//! Error taxonomy shared by the token lifecycle, the Spotify client and the
//! HTTP handlers.
//!
//! Every variant knows how to render itself as an HTTP response, so handlers
//! can simply return `Result<_, AppError>`:
//!
//! - [`AppError::SessionMissing`] and [`AppError::AuthExchange`] send the
//!   browser back to `/login`
//! - [`AppError::Upstream`] carries the Spotify status code through to the
//!   client together with a `{"error": ...}` body
//! - transport failures become `502 Bad Gateway`

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::api::found;

#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or malformed configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The token endpoint refused a code or refresh grant, or answered with garbage.
    #[error("Token exchange failed: {message}")]
    AuthExchange {
        status: Option<u16>,
        message: String,
    },

    /// A Web API call came back with a non-success status.
    #[error("{message} (upstream status {status})")]
    Upstream { status: u16, message: String },

    /// The request carries no session, or the session holds no token.
    #[error("No authenticated session")]
    SessionMissing,

    /// Transport failure talking to Spotify.
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Local I/O failure, e.g. binding the listener.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn upstream(status: reqwest::StatusCode, message: impl Into<String>) -> Self {
        AppError::Upstream {
            status: status.as_u16(),
            message: message.into(),
        }
    }

    pub fn auth_exchange(status: Option<reqwest::StatusCode>, message: impl Into<String>) -> Self {
        AppError::AuthExchange {
            status: status.map(|s| s.as_u16()),
            message: message.into(),
        }
    }

    /// Replaces the message of an upstream error, leaving other variants as they are.
    ///
    /// The Spotify client only knows the status it received; the pipeline stage
    /// that made the call knows what failed.
    pub fn context(self, message: &str) -> Self {
        match self {
            AppError::Upstream { status, .. } => AppError::Upstream {
                status,
                message: message.to_string(),
            },
            other => other,
        }
    }

    /// The status code this error is rendered with, redirects excluded.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            AppError::Http(_) | AppError::AuthExchange { .. } => StatusCode::BAD_GATEWAY,
            AppError::SessionMissing => StatusCode::UNAUTHORIZED,
            AppError::Config(_) | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::SessionMissing | AppError::AuthExchange { .. } => found("/login"),
            AppError::Upstream { ref message, .. } => {
                (self.status_code(), Json(json!({ "error": message }))).into_response()
            }
            other => (
                other.status_code(),
                Json(json!({ "error": other.to_string() })),
            )
                .into_response(),
        }
    }
}
