//! Errors surfaced by the sync layer.
//!
//! - [`Validation`] a required field is empty, detected locally.
//! - [`Http`] the server answered with a non-2xx status.
//! - [`Network`] the request never completed (connection, timeout).
//!
//! None of them is fatal: the caller shows them and lets the user retry.
//!
//!  [`Validation`]: SyncError::Validation
//!  [`Http`]: SyncError::Http
//!  [`Network`]: SyncError::Network
use serde::Deserialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SyncError>;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum SyncError {
    #[error("missing required fields: {}", missing_fields.join(", "))]
    Validation { missing_fields: Vec<String> },
    #[error("http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("network error: {message}")]
    Network { message: String, timeout: bool },
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
    #[error("operation not supported: {0}")]
    Unsupported(&'static str),
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    detail: serde_json::Value,
}

impl SyncError {
    /// Human message carried by an HTTP error body, if the server sent one.
    ///
    /// The backend answers `{"detail": "..."}` for handled errors and
    /// `{"detail": [...]}` for request validation failures.
    pub fn detail(&self) -> Option<String> {
        let Self::Http { body, .. } = self else {
            return None;
        };
        let parsed = serde_json::from_str::<ErrorResponse>(body).ok()?;
        match parsed.detail {
            serde_json::Value::String(message) => Some(message),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            return Self::Decode(value.to_string());
        }
        Self::Network {
            timeout: value.is_timeout(),
            message: value.to_string(),
        }
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value.to_string())
    }
}
