//! Error types.
//!
//! Only two kinds of failure leave this crate as `Err`:
//!
//! - [`SendError`]: a question refused before any network activity
//! - [`RagError`]: a failed ingest or health call
//!
//! A failed chat stream is not an `Err`. It ends the turn in
//! [`SessionState::Failed`](crate::state::SessionState::Failed) with the
//! reason written into the assistant message. Malformed or unknown frames
//! never surface at all.

use thiserror::Error;

use crate::traits::HttpError;

/// Reasons a question is refused synchronously.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    /// Input was empty after trimming
    #[error("message is empty")]
    EmptyMessage,

    /// A turn is still streaming
    #[error("a response is still streaming")]
    AlreadyStreaming,

    /// Retrieval depth outside the accepted range
    #[error("top_k must be between {min} and {max}, got {value}")]
    InvalidTopK { value: u32, min: u32, max: u32 },
}

/// Errors from the non-streaming backend endpoints.
#[derive(Debug, Error)]
pub enum RagError {
    /// Transport failed
    #[error("{0}")]
    Http(#[from] HttpError),

    /// Backend answered with a non-2xx status
    #[error("backend rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Response body was not the expected JSON
    #[error("invalid response body: {0}")]
    Json(#[from] serde_json::Error),

    /// Local file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
