/// Guide record stores.
///
/// The server runs on exactly one backend, chosen at startup: the SQLite file when
/// `GUIDES_DATABASE_PATH` is configured and reachable, otherwise the in-memory sample set.
/// Both backends apply the same filter semantics (see `QueryFilter::matches`).
use std::cmp::Ordering;

use site_common::error::CommonError;
use tokio::sync::RwLock;

use crate::filter::QueryFilter;
use crate::model::Guide;
use crate::seed;
use crate::sqlite_store::SqliteGuideStore;

/// Outcome of an initialization pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedOutcome {
    /// Whether sample data was written by this pass.
    pub seeded: bool,
    /// Guides in the store afterwards.
    pub guide_count: u64,
}

pub enum GuideStore {
    Sqlite(SqliteGuideStore),
    Memory(MemoryGuideStore),
}

impl GuideStore {
    pub fn backend_name(&self) -> &'static str {
        match self {
            GuideStore::Sqlite(_) => "sqlite",
            GuideStore::Memory(_) => "memory",
        }
    }

    pub async fn is_available(&self) -> bool {
        match self {
            GuideStore::Sqlite(store) => store.is_available().await,
            GuideStore::Memory(_) => true,
        }
    }

    /// Number of guides matching the filter, ignoring limit and offset.
    pub async fn count(&self, filter: &QueryFilter) -> Result<u64, CommonError> {
        match self {
            GuideStore::Sqlite(store) => store.count(filter).await,
            GuideStore::Memory(store) => Ok(store.count(filter).await),
        }
    }

    /// The filtered guides, newest first, sliced by offset and limit.
    pub async fn fetch_page(&self, filter: &QueryFilter) -> Result<Vec<Guide>, CommonError> {
        match self {
            GuideStore::Sqlite(store) => store.fetch_page(filter).await,
            GuideStore::Memory(store) => Ok(store.fetch_page(filter).await),
        }
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Guide>, CommonError> {
        match self {
            GuideStore::Sqlite(store) => store.find_by_slug(slug).await,
            GuideStore::Memory(store) => Ok(store.find_by_slug(slug).await),
        }
    }

    /// Prepare the store and load the sample data when it holds no guides.
    pub async fn initialize(&self) -> Result<SeedOutcome, CommonError> {
        match self {
            GuideStore::Sqlite(store) => store.initialize().await,
            GuideStore::Memory(store) => store.initialize().await,
        }
    }
}

/// Newest first; equal timestamps fall back to the higher id first.
pub fn newest_first(a: &Guide, b: &Guide) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}

/// Mock data store used when no SQLite file is configured.
pub struct MemoryGuideStore {
    guides: RwLock<Vec<Guide>>,
}

impl MemoryGuideStore {
    pub fn new() -> Self {
        Self::from_guides(Vec::new())
    }

    pub fn from_guides(guides: Vec<Guide>) -> Self {
        Self {
            guides: RwLock::new(guides),
        }
    }

    async fn count(&self, filter: &QueryFilter) -> u64 {
        let guides = self.guides.read().await;
        guides.iter().filter(|g| filter.matches(g)).count() as u64
    }

    async fn fetch_page(&self, filter: &QueryFilter) -> Vec<Guide> {
        let guides = self.guides.read().await;
        let mut matching: Vec<&Guide> = guides.iter().filter(|g| filter.matches(g)).collect();
        matching.sort_by(|a, b| newest_first(a, b));
        matching
            .into_iter()
            .skip(usize::try_from(filter.offset).unwrap_or(usize::MAX))
            .take(filter.limit as usize)
            .cloned()
            .collect()
    }

    async fn find_by_slug(&self, slug: &str) -> Option<Guide> {
        let guides = self.guides.read().await;
        guides.iter().find(|g| g.slug == slug).cloned()
    }

    async fn initialize(&self) -> Result<SeedOutcome, CommonError> {
        let mut guides = self.guides.write().await;
        if !guides.is_empty() {
            return Ok(SeedOutcome {
                seeded: false,
                guide_count: guides.len() as u64,
            });
        }
        let samples = seed::sample_guides();
        seed::validate_guides(&samples)?;
        *guides = samples;
        Ok(SeedOutcome {
            seeded: true,
            guide_count: guides.len() as u64,
        })
    }
}

impl Default for MemoryGuideStore {
    fn default() -> Self {
        Self::new()
    }
}
