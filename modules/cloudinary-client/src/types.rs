use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Provider-side ordering for a search request. `None` on the request means
/// the provider returns its default relevance order and any ordering is the
/// caller's problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortHint {
    CreatedAtDesc,
    CreatedAtAsc,
    FilenameAsc,
}

impl SortHint {
    /// The `sort_by` entry the search API expects: `[{"field": "direction"}]`.
    pub(crate) fn to_sort_by(self) -> serde_json::Value {
        match self {
            SortHint::CreatedAtDesc => serde_json::json!({ "created_at": "desc" }),
            SortHint::CreatedAtAsc => serde_json::json!({ "created_at": "asc" }),
            SortHint::FilenameAsc => serde_json::json!({ "filename": "asc" }),
        }
    }
}

/// Input for one search API call.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Filter expression in the provider's query syntax, e.g.
    /// `resource_type:image AND folder:"gallery/*"`.
    pub expression: String,
    pub max_results: u32,
    pub sort_by: Option<SortHint>,
}

/// Response envelope from the search API.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub resources: Vec<ResourceRecord>,
    /// Total matches known to the provider, which may exceed `resources.len()`.
    #[serde(default)]
    pub total_count: u64,
}

/// A single asset record as returned by the search API.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceRecord {
    /// Opaque asset identifier, unique within the account. Includes the
    /// folder path prefix.
    pub public_id: String,
    #[serde(default)]
    pub filename: String,
    /// Storage folder path, e.g. `gallery/animals`.
    #[serde(default)]
    pub folder: String,
    pub created_at: Option<DateTime<Utc>>,
    /// Contextual key/value metadata attached at upload time.
    #[serde(default)]
    pub context: HashMap<String, String>,
}

impl ResourceRecord {
    /// Display caption from contextual metadata, if one was attached.
    pub fn caption(&self) -> Option<&str> {
        self.context.get("caption").map(String::as_str)
    }
}
