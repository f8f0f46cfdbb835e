use serde::{Deserialize, Serialize};

/// A source passage backing the current answer.
///
/// The backend sends `{"i", "doc_id", "page", "stable_id", "score"}`; the
/// camelCase names are accepted as well.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    /// 1-based position in the retrieved context
    #[serde(alias = "i")]
    pub index: u32,
    /// Document the passage was taken from
    #[serde(alias = "doc_id")]
    pub document_id: String,
    /// Page number inside the document
    pub page: u32,
    /// Chunk identifier assigned at ingestion, e.g. `cv.pdf:p2:c0`
    #[serde(default, alias = "stable_id", skip_serializing_if = "Option::is_none")]
    pub stable_id: Option<String>,
    /// Similarity score reported by the vector store
    #[serde(default, alias = "score", skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
}

impl Citation {
    pub fn new(index: u32, document_id: impl Into<String>, page: u32) -> Self {
        Self {
            index,
            document_id: document_id.into(),
            page,
            stable_id: None,
            relevance_score: None,
        }
    }

    pub fn with_stable_id(mut self, stable_id: impl Into<String>) -> Self {
        self.stable_id = Some(stable_id.into());
        self
    }

    pub fn with_relevance_score(mut self, score: f64) -> Self {
        self.relevance_score = Some(score);
        self
    }

    /// Short source label such as `[1] cv.pdf p.2 (0.91)`.
    pub fn label(&self) -> String {
        let mut label = format!("[{}] {} p.{}", self.index, self.document_id, self.page);
        if let Some(score) = self.relevance_score {
            label.push_str(&format!(" ({:.2})", score));
        }
        label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_shape() {
        let citation: Citation = serde_json::from_str(
            r#"{"i": 1, "doc_id": "cv.pdf", "page": 2, "stable_id": "cv.pdf:p2:c0", "score": 0.91}"#,
        )
        .unwrap();
        assert_eq!(
            citation,
            Citation::new(1, "cv.pdf", 2)
                .with_stable_id("cv.pdf:p2:c0")
                .with_relevance_score(0.91)
        );
    }

    #[test]
    fn test_deserialize_camel_case_and_nulls() {
        let citation: Citation = serde_json::from_str(
            r#"{"index": 3, "documentId": "a.pdf", "page": 7, "stableId": null}"#,
        )
        .unwrap();
        assert_eq!(citation, Citation::new(3, "a.pdf", 7));
    }

    #[test]
    fn test_missing_page_is_rejected() {
        let result = serde_json::from_str::<Citation>(r#"{"i": 1, "doc_id": "a.pdf"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_label() {
        assert_eq!(Citation::new(2, "cv.pdf", 4).label(), "[2] cv.pdf p.4");
        assert_eq!(
            Citation::new(1, "cv.pdf", 2)
                .with_relevance_score(0.914)
                .label(),
            "[1] cv.pdf p.2 (0.91)"
        );
    }
}
