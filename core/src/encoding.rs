//! Credential and form-body encoding.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Encodes a plaintext credential before it is placed on the wire.
pub trait CredentialEncoder {
    fn encode(&self, plaintext: &str) -> String;
}

/// Standard-alphabet, padded base64. This is what the service expects for
/// `data[email]` and `data[password]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64Encoder;

impl CredentialEncoder for Base64Encoder {
    fn encode(&self, plaintext: &str) -> String {
        STANDARD.encode(plaintext.as_bytes())
    }
}

impl<F> CredentialEncoder for F
where
    F: Fn(&str) -> String,
{
    fn encode(&self, plaintext: &str) -> String {
        self(plaintext)
    }
}

/// Form-url-encode `pairs` in order.
pub(crate) fn encode_form<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}
