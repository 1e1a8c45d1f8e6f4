//! HTTP transport types and the blocking transport seam.
//!
//! # Design
//! Requests and responses are plain data. `ApiClient::build_*` produces an
//! `HttpRequest`, a `Transport` turns it into an `HttpResponse`, and
//! `ApiClient::parse_*` interprets the result. Only the `Transport`
//! implementation touches the network.
//!
//! Every request the page-builder service receives is a form-encoded POST,
//! so the request type carries no method.

use std::io::Read;

use tracing::trace;

use crate::error::ApiError;

/// An HTTP POST described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Path on the API host, or an absolute `http(s)://` URL.
    pub path: String,
    pub headers: Vec<(String, String)>,
    /// Form-url-encoded body. Empty when there are no params.
    pub body: String,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    /// Reason phrase accompanying `status`, e.g. `"Not Found"`.
    /// `UreqTransport` reports the canonical phrase for the status, not the
    /// phrase the server sent.
    pub reason: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Decode the body as UTF-8 text.
    pub fn text(&self) -> Result<String, ApiError> {
        String::from_utf8(self.body.clone())
            .map_err(|e| ApiError::ParseFailure(format!("body is not valid UTF-8: {e}")))
    }
}

/// Executes a single synchronous POST against `host`.
pub trait Transport {
    fn post(&self, host: &str, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn post(&self, host: &str, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).post(host, request)
    }
}

/// Blocking transport backed by `ureq`.
///
/// A fresh agent is built for every call, so no connection outlives the
/// request that opened it. Non-2xx statuses come back as data rather than
/// errors; interpreting them is the caller's job. Redirects are never
/// followed: a 3xx is returned as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct UreqTransport;

impl Transport for UreqTransport {
    fn post(&self, host: &str, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = resolve_url(host, &request.path);
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(0)
            .max_redirects_will_error(false)
            .build()
            .new_agent();

        let mut builder = agent.post(&url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let mut response = builder
            .send(request.body.as_bytes())
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let mut body = Vec::new();
        response
            .body_mut()
            .as_reader()
            .read_to_end(&mut body)
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        trace!(%url, status = status.as_u16(), bytes = body.len(), "response received");

        Ok(HttpResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }
}

/// Join `path` onto `host` unless `path` is already an absolute URL.
fn resolve_url(host: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        format!("{host}{path}")
    } else {
        format!("http://{host}{path}")
    }
}
