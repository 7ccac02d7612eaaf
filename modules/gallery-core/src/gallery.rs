// Gallery query facade.
//
// One page request flows: validate → cache consult (non-random only) → on
// miss, fetch a superset → balance/sample → deterministic sort → cache →
// slice the requested page. Provider failures degrade to an empty page;
// they never become an error the caller has to handle.

use std::sync::Arc;

use cloudinary_client::{format_delivery_url, ResourceRecord, TransformOptions};
use tracing::{info, warn};

use crate::balance::{balance, category_of, sort_descriptors};
use crate::cache::ResultCache;
use crate::config::GalleryConfig;
use crate::error::{GalleryError, Result};
use crate::search::{build_search_request, is_recognized_category, SearchBackend};
use crate::types::{GalleryPage, ImageDescriptor, QueryFilter, SortOrder};

pub struct Gallery {
    config: GalleryConfig,
    backend: Arc<dyn SearchBackend>,
    cache: ResultCache,
}

impl Gallery {
    pub fn new(config: GalleryConfig, backend: Arc<dyn SearchBackend>) -> Self {
        let cache = ResultCache::new(config.cache_ttl);
        Self {
            config,
            backend,
            cache,
        }
    }

    /// Run one page query.
    ///
    /// Returns `GalleryError::InvalidFilter` for malformed filters, before
    /// any remote work. A provider failure is recovered as an empty page
    /// with `has_more = false`.
    pub async fn query(&self, filter: &QueryFilter) -> Result<GalleryPage> {
        validate(filter)?;

        // Random queries bypass the cache entirely and re-sample every call.
        if filter.sort == SortOrder::Random {
            return match self.fetch_and_balance(filter).await {
                Ok(superset) => Ok(paginate(&superset, filter)),
                Err(err) => Ok(self.recover_unavailable(err)),
            };
        }

        let key = ResultCache::key_for(&filter.category, &filter.search_term, filter.sort);
        match self
            .cache
            .get_or_compute(&key, || self.fetch_and_balance(filter))
            .await
        {
            Ok(superset) => Ok(paginate(&superset, filter)),
            Err(err) => Ok(self.recover_unavailable(err)),
        }
    }

    /// Fetch the raw superset and reduce it to the pre-pagination result:
    /// balanced when the query spans categories or is random, then
    /// deterministically sorted unless random.
    ///
    /// The balance target is independent of `page_size` for cacheable
    /// queries: the stored superset must serve every later page (and every
    /// later page size) of the same key, so only `paginate` gets to look at
    /// `page_size`. Random queries are never cached and sample exactly the
    /// page the caller asked for.
    async fn fetch_and_balance(
        &self,
        filter: &QueryFilter,
    ) -> anyhow::Result<Vec<ImageDescriptor>> {
        let request = build_search_request(
            &self.config,
            &filter.category,
            &filter.search_term,
            filter.sort,
            filter.page_size,
        );
        let records = self.backend.search(&request).await?;
        info!(
            expression = %request.expression,
            count = records.len(),
            "Fetched gallery records"
        );

        let mut items: Vec<ImageDescriptor> = records
            .into_iter()
            .map(|record| self.descriptor_from(record))
            .collect();

        let scoped = is_recognized_category(&self.config, &filter.category);
        if filter.sort == SortOrder::Random {
            items = balance(items, filter.page_size as usize);
        } else if !scoped {
            items = balance(items, self.config.balance_fetch_size as usize);
        }
        sort_descriptors(&mut items, filter.sort);
        Ok(items)
    }

    fn descriptor_from(&self, record: ResourceRecord) -> ImageDescriptor {
        let delivery_url = format_delivery_url(
            &self.config.cloud_name,
            &record.public_id,
            &TransformOptions::default(),
        );
        ImageDescriptor {
            category: category_of(&record.folder).to_string(),
            caption: record.caption().map(str::to_string),
            id: record.public_id,
            filename: record.filename,
            created_at: record.created_at,
            delivery_url,
        }
    }

    fn recover_unavailable(&self, err: anyhow::Error) -> GalleryPage {
        let err = GalleryError::SearchUnavailable(err);
        warn!(error = %err, "Returning empty page");
        GalleryPage::empty()
    }
}

fn validate(filter: &QueryFilter) -> Result<()> {
    if filter.page < 1 {
        return Err(GalleryError::InvalidFilter("page must be >= 1".into()));
    }
    if filter.page_size < 1 {
        return Err(GalleryError::InvalidFilter(
            "page_size must be >= 1".into(),
        ));
    }
    Ok(())
}

/// Slice the requested 1-based page out of the pre-pagination superset.
fn paginate(superset: &[ImageDescriptor], filter: &QueryFilter) -> GalleryPage {
    let page = filter.page as usize;
    let size = filter.page_size as usize;
    let items: Vec<ImageDescriptor> = superset
        .iter()
        .skip((page - 1) * size)
        .take(size)
        .cloned()
        .collect();
    GalleryPage {
        items,
        has_more: superset.len() > page * size,
    }
}
