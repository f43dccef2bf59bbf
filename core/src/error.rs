//! Error types for the SendGrid template client.
//!
//! # Design
//! Every failure surfaces to the caller unchanged: nothing is retried or
//! recovered locally. Statuses of 300 and above land in `HttpError` with the raw
//! status code and body so callers can inspect the provider's `errors`
//! payload themselves.

use thiserror::Error;

/// Errors returned by `TemplateClient` and `SendGridClient`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body was absent or could not be encoded as JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// A template version body carried no `template.id`, so no request path
    /// could be built for it.
    #[error("template version has no template id")]
    MissingTemplateId,

    /// The transport could not complete the round-trip.
    #[error("transport failed: {0}")]
    TransportError(String),

    /// The server answered with a status code of 300 or above.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),
}

impl ApiError {
    /// Status code of an `HttpError`, `None` for every other variant.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }
}
