use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One image in a gallery result.
///
/// Constructed fresh for every query; cached copies are shared read-only
/// snapshots and are never mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageDescriptor {
    /// Opaque provider asset id, unique within the account. Identity field;
    /// everything else is display data.
    pub id: String,
    pub filename: String,
    /// Sub-category derived from the asset's folder path.
    pub category: String,
    pub created_at: Option<DateTime<Utc>>,
    /// Fully formatted delivery URL.
    pub delivery_url: String,
    pub caption: Option<String>,
}

/// Requested result ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Re-sampled on every call; never cached, never deterministic.
    Random,
    Newest,
    Oldest,
    Name,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Random => "random",
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
            SortOrder::Name => "name",
        }
    }
}

/// One page request against the gallery.
#[derive(Debug, Clone)]
pub struct QueryFilter {
    /// Sub-category name, the root collection name, or empty. Empty and the
    /// root name both mean "search every sub-category".
    pub category: String,
    pub search_term: String,
    pub sort: SortOrder,
    /// 1-based page number.
    pub page: u32,
    pub page_size: u32,
}

impl Default for QueryFilter {
    fn default() -> Self {
        Self {
            category: String::new(),
            search_term: String::new(),
            sort: SortOrder::Random,
            page: 1,
            page_size: 12,
        }
    }
}

/// Result of one page query.
#[derive(Debug, Clone, Serialize)]
pub struct GalleryPage {
    pub items: Vec<ImageDescriptor>,
    /// Whether further pages of the same query would return anything.
    pub has_more: bool,
}

impl GalleryPage {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            has_more: false,
        }
    }
}
