use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw query string of `GET /api/guides`. Every value arrives as text and is
/// coerced by the server before it reaches the store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListGuidesParams {
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub search: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// Raw query string of `GET /api/colonists`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ColonistsParams {
    pub count: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GuideResponse {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub difficulty: String,
    pub category: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationResponse {
    pub total: u64,
    pub limit: u32,
    pub offset: u64,
    pub has_more: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuideListResponse {
    pub guides: Vec<GuideResponse>,
    pub pagination: PaginationResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitResponse {
    pub success: bool,
    pub message: String,
    pub guide_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub store: String,
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status_code: u16,
    pub status_message: String,
}
