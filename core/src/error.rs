//! Error types for the content API client.
//!
//! # Design
//! A 404 on a read is not an error; managers surface it as `None` or an empty
//! result. The variants here are the outcomes a caller must handle:
//! ownership failures (`AccessDenied`), a missing resource on write
//! (`NotFound`), an unexpected status on an operation that promised an entity
//! (`BadRequest`), and input rejected before any request was sent.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 403 for an ownership-sensitive moodboard call.
    #[error("access denied")]
    AccessDenied,

    /// The server returned 404 for a write that requires the resource.
    #[error("resource not found")]
    NotFound,

    /// The server returned a status the operation cannot turn into a result.
    #[error("bad request: unexpected status {status}")]
    BadRequest { status: u16 },

    /// Caller input rejected before any request was issued.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The transport failed to produce a response at all.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

pub type ApiResult<T> = Result<T, ApiError>;
