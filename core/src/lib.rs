//! Synchronous client core for the page-builder plugin API.
//!
//! # Overview
//! Logs a user in as a plugin, lists the user's pages and fetches rendered
//! page HTML. Requests are form-encoded POSTs; `/ajax/services/*` answers are
//! validated against a fixed JSON envelope before data is extracted.
//!
//! # Design
//! - `ApiClient` is stateless: it holds an immutable `ClientConfig`, a
//!   `Transport` and a `CredentialEncoder`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit and the
//!   wire format is testable without a network.
//! - The default `UreqTransport` opens a fresh connection per call.

pub mod client;
pub mod encoding;
pub mod error;
pub mod http;
pub mod types;

pub use client::ApiClient;
pub use encoding::{Base64Encoder, CredentialEncoder};
pub use error::{ApiError, ErrorKind};
pub use http::{HttpRequest, HttpResponse, Transport, UreqTransport};
pub use types::{ApiResponse, ClientConfig, Credentials, Page};
