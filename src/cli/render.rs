//! Plain line-based output for the CLI.

use crate::models::{Citation, IngestResponse};

/// Line width for separators.
const LINE_WIDTH: usize = 60;

/// Status icons
pub mod icons {
    pub const SUCCESS: &str = "✓";
    pub const FAILURE: &str = "✗";
    pub const WARNING: &str = "⚠";
}

/// Numbered source list printed under an answer.
///
/// ```text
/// ────────────────────────────────────────────────────────────
/// Sources
///   [1] cv.pdf p.2 (0.91)
///   [2] cv.pdf p.3
/// ```
///
/// Empty when there are no citations.
pub fn format_sources(citations: &[Citation]) -> String {
    if citations.is_empty() {
        return String::new();
    }

    let mut out = format!("{}\nSources\n", "─".repeat(LINE_WIDTH));
    for citation in citations {
        out.push_str("  ");
        out.push_str(&citation.label());
        out.push('\n');
    }
    out
}

/// Summary of an upload.
pub fn format_ingested(ingested: &IngestResponse) -> String {
    if ingested.is_empty() {
        let status = ingested.status.as_deref().unwrap_or("no chunks stored");
        format!(
            "{} {} ingested without searchable text ({})",
            icons::WARNING,
            ingested.doc_id,
            status
        )
    } else {
        format!(
            "{} {} ingested ({} chunks)\n  Use --doc {} to ask about it",
            icons::SUCCESS,
            ingested.doc_id,
            ingested.chunks,
            ingested.doc_id
        )
    }
}

/// Health probe result.
pub fn format_health(base_url: &str, healthy: bool) -> String {
    if healthy {
        format!("{} {} is up", icons::SUCCESS, base_url)
    } else {
        format!("{} {} answered but is not healthy", icons::FAILURE, base_url)
    }
}
