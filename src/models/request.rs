use serde::{Deserialize, Serialize};

use crate::error::SendError;

/// Smallest accepted retrieval depth.
pub const MIN_TOP_K: u32 = 1;
/// Largest accepted retrieval depth.
pub const MAX_TOP_K: u32 = 20;
/// Collection the backend uses when none is given.
pub const DEFAULT_COLLECTION: &str = "docs";
/// Retrieval depth the backend uses when none is given.
pub const DEFAULT_TOP_K: u32 = 6;

/// Where the backend should retrieve context from.
///
/// `doc_id` must be the identifier the document was ingested under. It is
/// not checked locally; a mismatch shows up as an answer without context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalScope {
    pub collection: String,
    pub doc_id: String,
    pub top_k: u32,
}

impl RetrievalScope {
    pub fn new(collection: impl Into<String>, doc_id: impl Into<String>, top_k: u32) -> Self {
        Self {
            collection: collection.into(),
            doc_id: doc_id.into(),
            top_k,
        }
    }

    /// Check that `top_k` is within bounds.
    pub fn validate(&self) -> Result<(), SendError> {
        if (MIN_TOP_K..=MAX_TOP_K).contains(&self.top_k) {
            Ok(())
        } else {
            Err(SendError::InvalidTopK {
                value: self.top_k,
                min: MIN_TOP_K,
                max: MAX_TOP_K,
            })
        }
    }
}

impl Default for RetrievalScope {
    fn default() -> Self {
        Self::new(DEFAULT_COLLECTION, "", DEFAULT_TOP_K)
    }
}

/// Body of `POST /rag/chat/stream`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    pub collection: String,
    pub doc_id: String,
    pub top_k: u32,
}

impl ChatRequest {
    /// Build a request for `message`, trimmed, against `scope`.
    pub fn new(message: &str, scope: &RetrievalScope) -> Result<Self, SendError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(SendError::EmptyMessage);
        }
        scope.validate()?;

        Ok(Self {
            message: message.to_string(),
            collection: scope.collection.clone(),
            doc_id: scope.doc_id.clone(),
            top_k: scope.top_k,
        })
    }
}

/// Response of `POST /rag/ingest`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngestResponse {
    /// Identifier to use as `doc_id` in later chat turns
    pub doc_id: String,
    /// Number of chunks stored
    #[serde(default)]
    pub chunks: u32,
    /// `ok`, or `no_text_extracted` for PDFs without a text layer
    #[serde(default)]
    pub status: Option<String>,
}

impl IngestResponse {
    /// True when the document produced no searchable chunks.
    pub fn is_empty(&self) -> bool {
        self.chunks == 0
    }
}
