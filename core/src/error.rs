//! Error types for the page-builder API client.
//!
//! # Design
//! Each variant is one failure category of the call protocol. The rendered
//! `Display` form (`"<Category>: <detail>"`) is the compatibility surface
//! callers and tests match on, so the literal prefixes must not change.
//! `ErrorKind` gives callers a payload-free value to branch on.

use thiserror::Error;

/// Errors returned by `ApiClient` operations and `parse_*` methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The service answered with a status other than 200.
    #[error("Connection failure: {reason}")]
    ConnectionFailure { status: u16, reason: String },

    /// The envelope carried `error: true`.
    #[error("Authentication failure: {0}")]
    AuthenticationFailure(String),

    /// The envelope carried `success: false`.
    #[error("API call failure: {0}")]
    ApiCallFailure(String),

    /// The body was not a well-formed envelope, or a successful envelope
    /// lacked the fields the operation extracts.
    #[error("Parse failure: {0}")]
    ParseFailure(String),

    /// The transport could not complete the round-trip.
    #[error("Transport failure: {0}")]
    Transport(String),
}

/// Payload-free category of an `ApiError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ConnectionFailure,
    AuthenticationFailure,
    ApiCallFailure,
    ParseFailure,
    Transport,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::ConnectionFailure { .. } => ErrorKind::ConnectionFailure,
            ApiError::AuthenticationFailure(_) => ErrorKind::AuthenticationFailure,
            ApiError::ApiCallFailure(_) => ErrorKind::ApiCallFailure,
            ApiError::ParseFailure(_) => ErrorKind::ParseFailure,
            ApiError::Transport(_) => ErrorKind::Transport,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::ParseFailure(err.to_string())
    }
}
