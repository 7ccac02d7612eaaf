// Remote search seam and filter-expression construction.
//
// SearchBackend is the one trait boundary of the core: the real
// implementation wraps CloudinaryClient, tests swap in MockSearchBackend.
// One network call per search, no retries.

use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use cloudinary_client::{CloudinaryClient, ResourceRecord, SearchRequest, SortHint};

use crate::config::GalleryConfig;
use crate::types::SortOrder;

#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Execute one remote search and return the raw records.
    async fn search(&self, request: &SearchRequest) -> Result<Vec<ResourceRecord>>;
}

/// Production backend: Cloudinary search API, bounded by a timeout on top
/// of the client's own connection timeout.
pub struct CloudinaryBackend {
    client: CloudinaryClient,
    timeout: Duration,
}

impl CloudinaryBackend {
    pub fn new(client: CloudinaryClient, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

#[async_trait]
impl SearchBackend for CloudinaryBackend {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<ResourceRecord>> {
        let response = tokio::time::timeout(self.timeout, self.client.search(request))
            .await
            .map_err(|_| anyhow!("search timed out after {:?}", self.timeout))??;
        Ok(response.resources)
    }
}

/// Build the provider request for a gallery query.
///
/// A recognized sub-category constrains to its exact folder and fetches
/// exactly `page_size` records. The root name and the empty category both
/// mean "everything": a wildcard under the root, widened to
/// `balance_fetch_size` so the balancer can draw a fair sample from every
/// sub-category.
pub fn build_search_request(
    config: &GalleryConfig,
    category: &str,
    search_term: &str,
    sort: SortOrder,
    page_size: u32,
) -> SearchRequest {
    let scoped = is_recognized_category(config, category);

    let folder = if scoped {
        format!("folder:\"{}/{}\"", config.root_folder, category)
    } else {
        format!("folder:\"{}/*\"", config.root_folder)
    };

    let mut expression = format!("resource_type:image AND {folder}");
    let term = search_term.trim();
    if !term.is_empty() {
        expression.push_str(" AND ");
        expression.push_str(term);
    }

    SearchRequest {
        expression,
        max_results: if scoped {
            page_size
        } else {
            config.balance_fetch_size
        },
        sort_by: sort_hint(sort),
    }
}

/// Whether `category` names a single recognized sub-category. The empty
/// string and the root collection name are both "everything", not a scope.
pub fn is_recognized_category(config: &GalleryConfig, category: &str) -> bool {
    !category.is_empty()
        && category != config.root_folder
        && config.categories.iter().any(|c| c == category)
}

/// Deterministic orderings are delegated to the provider where it supports
/// them; random performs no remote-side ordering.
fn sort_hint(sort: SortOrder) -> Option<SortHint> {
    match sort {
        SortOrder::Random => None,
        SortOrder::Newest => Some(SortHint::CreatedAtDesc),
        SortOrder::Oldest => Some(SortHint::CreatedAtAsc),
        SortOrder::Name => Some(SortHint::FilenameAsc),
    }
}
