//! Error types for the HoodPay client.
//!
//! # Design
//! Failures fall into two kinds. Transport failures mean no usable response
//! came back: the connection failed, the server answered with a non-2xx
//! status, or the body was not JSON. Request failures mean a well-formed
//! response signalled an application-level problem; only `list_payments`
//! checks for those, because it is the only operation with a typed result.

use serde_json::Value;
use thiserror::Error;

/// Boxed cause of a transport failure, whichever HTTP stack produced it.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by `HoodPayClient` and both transports.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP round-trip itself failed (connection, TLS, I/O).
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// The server returned a non-2xx status for a raw-document operation.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be decoded as JSON.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The server answered, but not with the payment list that was asked for.
    #[error("request failed: {message}")]
    RequestError { message: String },

    /// Client configuration is missing or malformed.
    #[error("invalid configuration: {0}")]
    ConfigError(String),
}

impl ApiError {
    pub(crate) fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ApiError::Transport(Box::new(err))
    }

    /// True for failures where no usable response body was obtained.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ApiError::Transport(_)
                | ApiError::HttpError { .. }
                | ApiError::DeserializationError(_)
                | ApiError::SerializationError(_)
        )
    }

    pub fn is_request(&self) -> bool {
        matches!(self, ApiError::RequestError { .. })
    }

    /// The `message` field of the server's JSON error body, if there is one.
    pub fn server_message(&self) -> Option<String> {
        match self {
            ApiError::RequestError { message } => Some(message.clone()),
            ApiError::HttpError { body, .. } => serde_json::from_str::<Value>(body)
                .ok()?
                .get("message")?
                .as_str()
                .map(str::to_owned),
            _ => None,
        }
    }
}
