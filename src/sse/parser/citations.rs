//! Citation list extraction

use serde::Deserialize;

use crate::models::Citation;

/// Decode the `citations` field of a citations event.
///
/// A missing or null list is empty. Entries that do not decode (no
/// `doc_id`, no `page`, wrong types) are dropped one by one.
pub(super) fn parse_citations(list: Option<&serde_json::Value>) -> Vec<Citation> {
    let items = match list {
        None | Some(serde_json::Value::Null) => return Vec::new(),
        Some(serde_json::Value::Array(items)) => items,
        Some(other) => {
            tracing::debug!("Ignoring non-array citations field: {}", other);
            return Vec::new();
        }
    };

    items
        .iter()
        .filter_map(|item| match Citation::deserialize(item) {
            Ok(citation) => Some(citation),
            Err(e) => {
                tracing::debug!("Dropping malformed citation {}: {}", item, e);
                None
            }
        })
        .collect()
}
