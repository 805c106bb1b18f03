/// Typed guide-list filter, built once per request from the raw query string.
use site_common::site_api::ListGuidesParams;

use crate::error::AppError;
use crate::model::{Difficulty, Guide};

pub const DEFAULT_LIMIT: u32 = 10;
pub const DEFAULT_OFFSET: u64 = 0;
pub const MAX_LIMIT: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFilter {
    /// Exact match on `category`.
    pub category: Option<String>,
    /// Exact match on `difficulty`.
    pub difficulty: Option<Difficulty>,
    /// Substring of title, description or content, ignoring ASCII case.
    pub search: Option<String>,
    pub limit: u32,
    pub offset: u64,
}

impl Default for QueryFilter {
    fn default() -> Self {
        Self {
            category: None,
            difficulty: None,
            search: None,
            limit: DEFAULT_LIMIT,
            offset: DEFAULT_OFFSET,
        }
    }
}

impl QueryFilter {
    /// Coerce raw query values into a filter.
    ///
    /// Blank text values count as absent. `limit` and `offset` that are not
    /// non-negative integers fall back to their defaults; `limit` is capped at
    /// `MAX_LIMIT`, however large. Only an unrecognised difficulty is rejected.
    pub fn from_params(params: ListGuidesParams) -> Result<Self, AppError> {
        let difficulty = match non_blank(params.difficulty) {
            None => None,
            Some(raw) => Some(raw.parse::<Difficulty>().map_err(|value| {
                AppError::Validation(format!(
                    "unknown difficulty '{value}', expected one of: Beginner, Intermediate, Advanced"
                ))
            })?),
        };

        Ok(Self {
            category: non_blank(params.category),
            difficulty,
            search: non_blank(params.search),
            limit: parse_count(params.limit.as_deref())
                .map_or(DEFAULT_LIMIT, |n| n.min(u64::from(MAX_LIMIT)) as u32),
            offset: parse_count(params.offset.as_deref()).unwrap_or(DEFAULT_OFFSET),
        })
    }

    /// Whether `guide` satisfies every predicate present in the filter.
    pub fn matches(&self, guide: &Guide) -> bool {
        if let Some(category) = &self.category {
            if guide.category != *category {
                return false;
            }
        }
        if let Some(difficulty) = self.difficulty {
            if guide.difficulty != difficulty {
                return false;
            }
        }
        if let Some(term) = &self.search {
            let term = term.to_ascii_lowercase();
            let hit = [&guide.title, &guide.description, &guide.content]
                .into_iter()
                .any(|field| field.to_ascii_lowercase().contains(&term));
            if !hit {
                return false;
            }
        }
        true
    }

    /// `offset + limit < total`, without overflowing.
    pub fn has_more(&self, total: u64) -> bool {
        self.offset.saturating_add(u64::from(self.limit)) < total
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_count(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
}
