/// Guide listing and lookup on top of the configured `GuideStore`.
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::AppError;
use crate::filter::QueryFilter;
use crate::model::Guide;
use crate::store::{GuideStore, SeedOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Guides matching the filter, before limit/offset.
    pub total: u64,
    pub limit: u32,
    pub offset: u64,
    pub has_more: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    pub guides: Vec<Guide>,
    pub pagination: Pagination,
}

pub struct GuideQueryService {
    store: GuideStore,
    init_lock: Mutex<()>,
}

impl GuideQueryService {
    pub fn new(store: GuideStore) -> Self {
        Self {
            store,
            init_lock: Mutex::new(()),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    pub async fn is_available(&self) -> bool {
        self.store.is_available().await
    }

    /// One page of guides matching `filter`, newest first, with the size of the full match set.
    pub async fn list_guides(&self, filter: &QueryFilter) -> Result<PageResult, AppError> {
        let total = self.store.count(filter).await?;

        let guides = if filter.limit == 0 || filter.offset >= total {
            Vec::new()
        } else {
            self.store.fetch_page(filter).await?
        };

        debug!(
            total,
            returned = guides.len(),
            limit = filter.limit,
            offset = filter.offset,
            "listed guides"
        );

        Ok(PageResult {
            guides,
            pagination: Pagination {
                total,
                limit: filter.limit,
                offset: filter.offset,
                has_more: filter.has_more(total),
            },
        })
    }

    pub async fn get_guide_by_slug(&self, slug: &str) -> Result<Guide, AppError> {
        let slug = slug.trim();
        if slug.is_empty() {
            return Err(AppError::Validation("Guide slug is required".to_string()));
        }

        self.store
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound("Guide not found".to_string()))
    }

    /// Create and seed the store if needed. Concurrent calls run one at a time.
    pub async fn initialize(&self) -> Result<SeedOutcome, AppError> {
        let _guard = self.init_lock.lock().await;
        let outcome = self.store.initialize().await?;
        info!(
            store = self.backend_name(),
            seeded = outcome.seeded,
            guide_count = outcome.guide_count,
            "store initialized"
        );
        Ok(outcome)
    }
}
