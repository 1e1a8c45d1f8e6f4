//! Configuration and wire types for the page-builder API.
//!
//! # Design
//! `ApiResponse` is the envelope every `/ajax/services/*` call answers with.
//! `success` and `error` are required; a body missing either is not an
//! envelope at all. Pages are passed through as raw JSON values because the
//! client never reads inside them.

use serde::{Deserialize, Serialize};

/// Immutable client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Host (optionally with scheme) of the page-builder API.
    pub api_host: String,
    /// Origin of the calling application, sent as the `service` param.
    pub service_origin: String,
}

impl ClientConfig {
    pub fn new(api_host: impl Into<String>, service_origin: impl Into<String>) -> Self {
        Self {
            api_host: api_host.into(),
            service_origin: service_origin.into(),
        }
    }
}

/// Session credentials issued by `login`. The caller owns their storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub user_id: Option<u64>,
    pub plugin_hash: String,
}

/// Response envelope of the call protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// An opaque page record from `data.pages`.
pub type Page = serde_json::Value;

#[derive(Debug, Deserialize)]
pub(crate) struct PagesData {
    pub pages: Vec<Page>,
}
