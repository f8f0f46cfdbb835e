//! Client configuration.
//!
//! Values come from defaults, then `RAGCHAT_*` environment variables, then
//! command-line flags, each layer overriding the previous one.

use crate::client::DEFAULT_BASE_URL;
use crate::models::{RetrievalScope, DEFAULT_COLLECTION, DEFAULT_TOP_K, MAX_TOP_K, MIN_TOP_K};

pub const URL_ENV: &str = "RAGCHAT_URL";
pub const COLLECTION_ENV: &str = "RAGCHAT_COLLECTION";
pub const DOC_ID_ENV: &str = "RAGCHAT_DOC_ID";
pub const TOP_K_ENV: &str = "RAGCHAT_TOP_K";

/// Where to reach the backend and what to retrieve from.
///
/// # Example
///
/// ```ignore
/// use ragchat::config::ChatConfig;
///
/// let config = ChatConfig::from_env()
///     .with_doc_id("cv.pdf")
///     .with_top_k(4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Backend base URL (default: http://localhost:8000)
    pub base_url: String,
    /// Vector collection (default: docs)
    pub collection: String,
    /// Document to answer from; must match the id used at ingestion
    pub doc_id: String,
    /// Number of chunks to retrieve (default: 6)
    pub top_k: u32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            doc_id: String::new(),
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl ChatConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn with_doc_id(mut self, doc_id: impl Into<String>) -> Self {
        self.doc_id = doc_id.into();
        self
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k;
        self
    }

    /// Defaults overridden by any `RAGCHAT_*` variables that are set.
    ///
    /// An unparsable `RAGCHAT_TOP_K` is ignored; an out-of-range one is
    /// clamped into 1..=20.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(url) = non_empty_var(URL_ENV) {
            config.base_url = url;
        }
        if let Some(collection) = non_empty_var(COLLECTION_ENV) {
            config.collection = collection;
        }
        if let Some(doc_id) = non_empty_var(DOC_ID_ENV) {
            config.doc_id = doc_id;
        }
        if let Some(raw) = non_empty_var(TOP_K_ENV) {
            match raw.trim().parse::<u32>() {
                Ok(top_k) => {
                    let clamped = top_k.clamp(MIN_TOP_K, MAX_TOP_K);
                    if clamped != top_k {
                        tracing::warn!(top_k, clamped, "{} out of range", TOP_K_ENV);
                    }
                    config.top_k = clamped;
                }
                Err(e) => tracing::warn!(value = %raw, error = %e, "Ignoring {}", TOP_K_ENV),
            }
        }

        config
    }

    /// The retrieval part of the configuration.
    pub fn scope(&self) -> RetrievalScope {
        RetrievalScope::new(&self.collection, &self.doc_id, self.top_k)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for name in [URL_ENV, COLLECTION_ENV, DOC_ID_ENV, TOP_K_ENV] {
            std::env::remove_var(name);
        }
    }

    #[test]
    fn test_default_matches_backend() {
        let config = ChatConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.collection, "docs");
        assert_eq!(config.doc_id, "");
        assert_eq!(config.top_k, 6);
    }

    #[test]
    fn test_builders() {
        let config = ChatConfig::new()
            .with_base_url("http://rag:9000")
            .with_collection("papers")
            .with_doc_id("paper.pdf")
            .with_top_k(3);
        assert_eq!(config.scope(), RetrievalScope::new("papers", "paper.pdf", 3));
        assert_eq!(config.base_url, "http://rag:9000");
    }

    #[test]
    #[serial]
    fn test_from_env_unset() {
        clear_env();
        assert_eq!(ChatConfig::from_env(), ChatConfig::default());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var(URL_ENV, "http://rag:9000");
        std::env::set_var(COLLECTION_ENV, "papers");
        std::env::set_var(DOC_ID_ENV, "cv.pdf");
        std::env::set_var(TOP_K_ENV, "10");

        let config = ChatConfig::from_env();
        clear_env();

        assert_eq!(config.base_url, "http://rag:9000");
        assert_eq!(config.collection, "papers");
        assert_eq!(config.doc_id, "cv.pdf");
        assert_eq!(config.top_k, 10);
    }

    #[test]
    #[serial]
    fn test_from_env_top_k_bounds() {
        clear_env();
        std::env::set_var(TOP_K_ENV, "50");
        assert_eq!(ChatConfig::from_env().top_k, 20);

        std::env::set_var(TOP_K_ENV, "0");
        assert_eq!(ChatConfig::from_env().top_k, 1);

        std::env::set_var(TOP_K_ENV, "many");
        assert_eq!(ChatConfig::from_env().top_k, 6);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_empty_env_ignored() {
        clear_env();
        std::env::set_var(COLLECTION_ENV, "");
        assert_eq!(ChatConfig::from_env().collection, "docs");
        clear_env();
    }
}
