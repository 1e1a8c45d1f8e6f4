//! Blocking client for the page-builder plugin API.
//!
//! # Design
//! `ApiClient` holds only its `ClientConfig`, a `Transport` and a
//! `CredentialEncoder`, and carries no mutable state between calls. Each
//! operation is split into a `build_*` method that produces an `HttpRequest`
//! and a `parse_*` method that consumes an `HttpResponse`; the executing
//! method (`login`, `get_user_pages`, ...) runs build, transport, parse in
//! sequence. The build and parse halves never touch the network.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::encoding::{encode_form, Base64Encoder, CredentialEncoder};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport, UreqTransport};
use crate::types::{ApiResponse, ClientConfig, Credentials, Page, PagesData};

pub const SERVICE_TYPE: &str = "Wordpress";
pub const PLUGIN_VERSION: &str = "2.21";

const ACCEPT_ENCODING: &str = "deflate;q=1.0, compress;q=0.5";
const CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// Synchronous, stateless client for the page-builder plugin API.
#[derive(Debug, Clone)]
pub struct ApiClient<T = UreqTransport, E = Base64Encoder> {
    config: ClientConfig,
    transport: T,
    encoder: E,
}

impl ApiClient {
    /// Client using the blocking `ureq` transport and base64 credentials.
    pub fn new(api_host: impl Into<String>, service_origin: impl Into<String>) -> Self {
        Self::with_transport(ClientConfig::new(api_host, service_origin), UreqTransport)
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            encoder: Base64Encoder,
        }
    }
}

impl<T, E> ApiClient<T, E> {
    /// Replace the credential encoder used by `login`.
    pub fn with_encoder<E2>(self, encoder: E2) -> ApiClient<T, E2> {
        ApiClient {
            config: self.config,
            transport: self.transport,
            encoder,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: Transport, E: CredentialEncoder> ApiClient<T, E> {
    /// Log in as a plugin and return the issued credentials.
    pub fn login(&self, email: &str, password: &str) -> Result<Credentials, ApiError> {
        let request = self.build_login(email, password);
        let response = self.execute(&request)?;
        parse_login(response)
    }

    pub fn build_login(&self, email: &str, password: &str) -> HttpRequest {
        let email = self.encoder.encode(email);
        let password = self.encoder.encode(password);
        self.build_api_call(
            "user-login",
            &[("user_id", ""), ("email", &email), ("password", &password)],
        )
    }
}

impl<T: Transport, E> ApiClient<T, E> {
    /// List the pages owned by `user_id`, in the order the service sent them.
    pub fn get_user_pages(&self, user_id: u64, plugin_hash: &str) -> Result<Vec<Page>, ApiError> {
        let request = self.build_get_user_pages(user_id, plugin_hash);
        let response = self.execute(&request)?;
        parse_get_user_pages(response)
    }

    /// Fetch the rendered HTML of a page.
    ///
    /// The status is not checked: an error page from the service is returned
    /// as text like any other body.
    pub fn get_page(&self, page_id: u64) -> Result<String, ApiError> {
        let request = self.build_get_page(page_id);
        let response = self.execute(&request)?;
        parse_get_page(&response)
    }

    /// POST `params` to `url` and return the raw response.
    pub fn request_page(&self, url: &str, params: &[(&str, &str)]) -> Result<HttpResponse, ApiError> {
        let request = self.build_request_page(url, params);
        self.execute(&request)
    }

    /// Call a named service and validate its envelope.
    pub fn api_call(&self, service: &str, params: &[(&str, &str)]) -> Result<ApiResponse, ApiError> {
        debug!(service, "calling page-builder service");
        let request = self.build_api_call(service, params);
        let response = self.execute(&request)?;
        parse_api_call(response)
    }

    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(path = %request.path, "POST");
        let response = self.transport.post(&self.config.api_host, request)?;
        debug!(path = %request.path, status = response.status, "response");
        Ok(response)
    }
}

impl<T, E> ApiClient<T, E> {
    pub fn build_get_user_pages(&self, user_id: u64, plugin_hash: &str) -> HttpRequest {
        let user_id = user_id.to_string();
        self.build_api_call("my-pages", &[("user_id", &user_id), ("plugin_hash", plugin_hash)])
    }

    pub fn build_get_page(&self, page_id: u64) -> HttpRequest {
        self.build_request_page(&format!("/server/view-by-id/{page_id}"), &[])
    }

    pub fn build_request_page(&self, url: &str, params: &[(&str, &str)]) -> HttpRequest {
        HttpRequest {
            path: url.to_string(),
            headers: base_headers(),
            body: encode_form(params.iter().copied()),
        }
    }

    /// Build `/ajax/services/{service}`: base params first, then each caller
    /// param renamed to `data[name]`, both in order.
    pub fn build_api_call(&self, service: &str, params: &[(&str, &str)]) -> HttpRequest {
        let data_keys: Vec<String> = params.iter().map(|(name, _)| format!("data[{name}]")).collect();
        let base = [
            ("service-type", SERVICE_TYPE),
            ("service", self.config.service_origin.as_str()),
            ("version", PLUGIN_VERSION),
        ];
        let data = data_keys
            .iter()
            .zip(params)
            .map(|(key, (_, value))| (key.as_str(), *value));

        HttpRequest {
            path: format!("/ajax/services/{service}"),
            headers: base_headers(),
            body: encode_form(base.into_iter().chain(data)),
        }
    }
}

fn base_headers() -> Vec<(String, String)> {
    vec![
        ("Accept-Encoding".to_string(), ACCEPT_ENCODING.to_string()),
        ("Content-Type".to_string(), CONTENT_TYPE.to_string()),
    ]
}

/// Validate a call-protocol response.
///
/// Order matters: the status is checked before the body is parsed, and
/// `error` is checked before `success`.
pub fn parse_api_call(response: HttpResponse) -> Result<ApiResponse, ApiError> {
    if response.status != 200 {
        return Err(ApiError::ConnectionFailure {
            status: response.status,
            reason: response.reason,
        });
    }
    let body: serde_json::Value = serde_json::from_slice(&response.body)?;
    let envelope: ApiResponse = from_object(body, "response body")?;
    if envelope.error {
        return Err(ApiError::AuthenticationFailure(
            envelope.error_message.unwrap_or_default(),
        ));
    }
    if !envelope.success {
        return Err(ApiError::ApiCallFailure(envelope.message.unwrap_or_default()));
    }
    Ok(envelope)
}

pub fn parse_login(response: HttpResponse) -> Result<Credentials, ApiError> {
    let data = require_data(parse_api_call(response)?)?;
    from_object(data, "login data")
}

pub fn parse_get_user_pages(response: HttpResponse) -> Result<Vec<Page>, ApiError> {
    let data = require_data(parse_api_call(response)?)?;
    let pages: PagesData = from_object(data, "pages data")?;
    Ok(pages.pages)
}

/// Return the body verbatim, whatever the status.
pub fn parse_get_page(response: &HttpResponse) -> Result<String, ApiError> {
    response.text()
}

/// Deserialize `value` only if it is a JSON object. Derived struct
/// deserializers also accept positional arrays, which no envelope uses.
fn from_object<D: DeserializeOwned>(value: serde_json::Value, what: &str) -> Result<D, ApiError> {
    if !value.is_object() {
        return Err(ApiError::ParseFailure(format!("{what} is not a JSON object")));
    }
    Ok(serde_json::from_value(value)?)
}

fn require_data(envelope: ApiResponse) -> Result<serde_json::Value, ApiError> {
    envelope
        .data
        .ok_or_else(|| ApiError::ParseFailure("successful response carried no data".to_string()))
}
