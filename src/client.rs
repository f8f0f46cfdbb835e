//! Client for the document chat backend.
//!
//! Three endpoints are used:
//! - `POST /rag/chat/stream` - the answer as a stream of frames
//! - `POST /rag/ingest` - upload a PDF, get back its document id
//! - `GET /health` - liveness probe

use std::path::Path;

use bytes::Bytes;

use crate::adapters::ReqwestHttpClient;
use crate::error::RagError;
use crate::models::{ChatRequest, IngestResponse};
use crate::traits::{ByteStream, FilePart, Headers, HttpClient, HttpError};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const CHAT_STREAM_PATH: &str = "/rag/chat/stream";
pub const INGEST_PATH: &str = "/rag/ingest";
pub const HEALTH_PATH: &str = "/health";

/// Client for the RAG backend API.
#[derive(Debug, Clone)]
pub struct RagClient<C: HttpClient = ReqwestHttpClient> {
    /// Base URL without trailing slash
    base_url: String,
    /// Transport
    http: C,
}

impl RagClient<ReqwestHttpClient> {
    /// Create a client talking to `base_url` over reqwest.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http(base_url, ReqwestHttpClient::new())
    }
}

impl<C: HttpClient> RagClient<C> {
    /// Create a client over a custom transport.
    pub fn with_http(base_url: impl Into<String>, http: C) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn http(&self) -> &C {
        &self.http
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Open the answer stream for `request`.
    ///
    /// Fails before yielding anything on a transport error, a non-2xx
    /// status, or a response without body.
    pub async fn stream_chat(&self, request: &ChatRequest) -> Result<ByteStream, HttpError> {
        let body = serde_json::to_string(request).map_err(|e| HttpError::Other(e.to_string()))?;

        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "text/event-stream".to_string());

        tracing::debug!(
            collection = %request.collection,
            doc_id = %request.doc_id,
            top_k = request.top_k,
            "Opening chat stream"
        );
        self.http
            .post_stream(&self.url(CHAT_STREAM_PATH), &body, &headers)
            .await
    }

    /// Upload a PDF into `collection`.
    pub async fn ingest(
        &self,
        file_name: &str,
        bytes: Bytes,
        collection: &str,
    ) -> Result<IngestResponse, RagError> {
        let url = format!(
            "{}?collection={}",
            self.url(INGEST_PATH),
            urlencoding::encode(collection)
        );
        let part = FilePart {
            field: "file".to_string(),
            file_name: file_name.to_string(),
            content_type: "application/pdf".to_string(),
            bytes,
        };

        let response = self.http.post_multipart(&url, part, &Headers::new()).await?;
        if !response.is_success() {
            return Err(RagError::Rejected {
                status: response.status,
                message: response.text().unwrap_or_default(),
            });
        }

        let ingested: IngestResponse = response.json()?;
        tracing::info!(
            doc_id = %ingested.doc_id,
            chunks = ingested.chunks,
            "Document ingested"
        );
        Ok(ingested)
    }

    /// Read `path` and upload it. The file name becomes the document id.
    pub async fn ingest_file(
        &self,
        path: &Path,
        collection: &str,
    ) -> Result<IngestResponse, RagError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| RagError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        self.ingest(&file_name, Bytes::from(bytes), collection).await
    }

    /// Check if the backend is reachable.
    ///
    /// # Returns
    /// `true` if the health endpoint returns 2xx, `false` otherwise
    pub async fn health_check(&self) -> Result<bool, RagError> {
        let response = self.http.get(&self.url(HEALTH_PATH), &Headers::new()).await?;
        Ok(response.is_success())
    }
}

impl Default for RagClient<ReqwestHttpClient> {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
