/// HTTP surface of the guide site.
///
/// Routes:
/// - `GET  /api/guides`: filtered, paginated guide list
/// - `GET  /api/guides/{slug}`: a single guide
/// - `POST /api/db/init`: create and seed the store (idempotent)
/// - `GET  /api/colonist`, `GET /api/colonists`, `GET /api/colony`: random decorative colony data
/// - `GET  /api/health`: store backend and reachability
use std::any::Any;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use site_common::site_api::{
    ColonistsParams, ErrorResponse, GuideListResponse, GuideResponse, HealthResponse,
    InitResponse, ListGuidesParams, PaginationResponse,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::colonist::{self, Colonist, ColonySnapshot};
use crate::error::{AppError, INTERNAL_MESSAGE};
use crate::filter::QueryFilter;
use crate::model::Guide;
use crate::service::{GuideQueryService, PageResult};

const DEFAULT_COLONISTS: usize = 4;
const COLONY_SIZE: usize = 3;

#[derive(Clone)]
pub struct AppState {
    pub guides: Arc<GuideQueryService>,
}

pub fn create_router(state: AppState, cors_any: bool) -> Router {
    let router = Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/guides", get(list_guides_handler))
        .route("/api/guides/", get(missing_slug_handler))
        .route("/api/guides/{slug}", get(get_guide_handler))
        .route("/api/db/init", post(init_handler))
        .route("/api/colonist", get(colonist_handler))
        .route("/api/colonists", get(colonists_handler))
        .route("/api/colony", get(colony_handler))
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http());

    if cors_any {
        router.layer(
            CorsLayer::new()
                .allow_origin(AnyOrigin)
                .allow_methods(AnyOrigin)
                .allow_headers(AnyOrigin),
        )
    } else {
        router
    }
}

// --- Handlers ---

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = if state.guides.is_available().await {
        "ok"
    } else {
        "unavailable"
    };
    Json(HealthResponse {
        status: status.to_string(),
        store: state.guides.backend_name().to_string(),
    })
}

async fn list_guides_handler(
    State(state): State<AppState>,
    Query(params): Query<ListGuidesParams>,
) -> Result<Json<GuideListResponse>, AppError> {
    let filter = QueryFilter::from_params(params)?;
    let page = state.guides.list_guides(&filter).await?;
    Ok(Json(to_api_page(page)))
}

async fn get_guide_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<GuideResponse>, AppError> {
    let guide = state.guides.get_guide_by_slug(&slug).await?;
    Ok(Json(to_api_guide(guide)))
}

async fn missing_slug_handler(
    State(state): State<AppState>,
) -> Result<Json<GuideResponse>, AppError> {
    let guide = state.guides.get_guide_by_slug("").await?;
    Ok(Json(to_api_guide(guide)))
}

async fn init_handler(State(state): State<AppState>) -> Result<Json<InitResponse>, AppError> {
    let outcome = state.guides.initialize().await?;
    let message = if outcome.seeded {
        "Database initialized with sample data"
    } else {
        "Database already initialized"
    };
    Ok(Json(InitResponse {
        success: true,
        message: message.to_string(),
        guide_count: outcome.guide_count,
    }))
}

async fn colonist_handler() -> Json<Colonist> {
    Json(colonist::generate_colonist(&mut rand::thread_rng()))
}

async fn colonists_handler(Query(params): Query<ColonistsParams>) -> Json<Vec<Colonist>> {
    let count = params
        .count
        .as_deref()
        .and_then(|c| c.trim().parse::<usize>().ok())
        .unwrap_or(DEFAULT_COLONISTS);
    Json(colonist::generate_colonists(&mut rand::thread_rng(), count))
}

async fn colony_handler() -> Json<ColonySnapshot> {
    Json(colonist::generate_colony(&mut rand::thread_rng(), COLONY_SIZE))
}

// --- Conversions ---

fn to_api_guide(guide: Guide) -> GuideResponse {
    GuideResponse {
        id: guide.id,
        slug: guide.slug,
        title: guide.title,
        description: guide.description,
        content: guide.content,
        difficulty: guide.difficulty.as_str().to_string(),
        category: guide.category,
        tags: guide.tags,
        created_at: guide.created_at,
        updated_at: guide.updated_at,
    }
}

fn to_api_page(page: PageResult) -> GuideListResponse {
    GuideListResponse {
        guides: page.guides.into_iter().map(to_api_guide).collect(),
        pagination: PaginationResponse {
            total: page.pagination.total,
            limit: page.pagination.limit,
            offset: page.pagination.offset,
            has_more: page.pagination.has_more,
        },
    }
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    error!(panic = detail, "request handler panicked");

    let status = StatusCode::INTERNAL_SERVER_ERROR;
    let body = ErrorResponse {
        status_code: status.as_u16(),
        status_message: INTERNAL_MESSAGE.to_string(),
    };
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Method, Request};
    use serde_json::Value;
    use site_common::sqlite::Database;
    use tower::ServiceExt;

    use super::*;
    use crate::seed;
    use crate::sqlite_store::SqliteGuideStore;
    use crate::store::{GuideStore, MemoryGuideStore};

    async fn memory_app() -> Router {
        let service = GuideQueryService::new(GuideStore::Memory(MemoryGuideStore::new()));
        service.initialize().await.unwrap();
        create_router(
            AppState {
                guides: Arc::new(service),
            },
            false,
        )
    }

    async fn call(app: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn slugs(body: &Value) -> Vec<String> {
        body["guides"]
            .as_array()
            .unwrap()
            .iter()
            .map(|g| g["slug"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn list_defaults_and_pagination_shape() {
        let app = memory_app().await;
        let total = seed::sample_guides().len() as u64;

        let (status, body) = call(&app, Method::GET, "/api/guides").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["guides"].as_array().unwrap().len() as u64, total);
        assert_eq!(body["pagination"]["total"], total);
        assert_eq!(body["pagination"]["limit"], 10);
        assert_eq!(body["pagination"]["offset"], 0);
        assert_eq!(body["pagination"]["hasMore"], false);
        assert_eq!(slugs(&body)[0], "ship-launch");
        assert!(body["guides"][0]["tags"].is_array());
        assert!(body["guides"][0]["created_at"].is_string());
    }

    #[tokio::test]
    async fn list_pages_and_bad_numbers_default() {
        let app = memory_app().await;

        let (_, first) = call(&app, Method::GET, "/api/guides?limit=2&offset=0").await;
        assert_eq!(slugs(&first), vec!["ship-launch", "base-defense"]);
        assert_eq!(first["pagination"]["hasMore"], true);

        let (_, last) = call(&app, Method::GET, "/api/guides?limit=2&offset=4").await;
        assert_eq!(slugs(&last), vec!["food-production", "getting-started"]);
        assert_eq!(last["pagination"]["hasMore"], false);

        let (status, coerced) = call(&app, Method::GET, "/api/guides?limit=abc&offset=-1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(coerced["pagination"]["limit"], 10);
        assert_eq!(coerced["pagination"]["offset"], 0);
    }

    #[tokio::test]
    async fn list_filters() {
        let app = memory_app().await;

        let (_, combat) = call(
            &app,
            Method::GET,
            "/api/guides?category=Combat&difficulty=Advanced",
        )
        .await;
        assert_eq!(slugs(&combat), vec!["base-defense"]);

        let (_, searched) = call(&app, Method::GET, "/api/guides?search=Killboxes").await;
        assert_eq!(slugs(&searched), vec!["base-defense"]);

        let (_, searched) =
            call(&app, Method::GET, "/api/guides?search=getting%20started").await;
        assert_eq!(slugs(&searched), vec!["getting-started"]);
        assert_eq!(searched["pagination"]["total"], 1);

        let (status, empty) = call(&app, Method::GET, "/api/guides?category=Nowhere&limit=5").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(empty["guides"], serde_json::json!([]));
        assert_eq!(
            empty["pagination"],
            serde_json::json!({ "total": 0, "limit": 5, "offset": 0, "hasMore": false })
        );

        let (status, body) = call(&app, Method::GET, "/api/guides?difficulty=Expert").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["statusCode"], 400);
    }

    #[tokio::test]
    async fn guide_by_slug() {
        let app = memory_app().await;

        let (status, body) = call(&app, Method::GET, "/api/guides/base-defense").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["slug"], "base-defense");
        assert_eq!(body["difficulty"], "Advanced");
        assert_eq!(body["tags"], serde_json::json!(["defense", "raids", "turrets"]));

        let (status, body) = call(&app, Method::GET, "/api/guides/nonexistent-slug").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["statusMessage"], "Guide not found");

        let (status, body) = call(&app, Method::GET, "/api/guides/").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["statusMessage"], "Guide slug is required");

        let (status, _) = call(&app, Method::GET, "/api/guides/%20").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn init_is_idempotent() {
        let app = memory_app().await;
        let count = seed::sample_guides().len() as u64;

        for _ in 0..2 {
            let (status, body) = call(&app, Method::POST, "/api/db/init").await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["success"], true);
            assert_eq!(body["guideCount"], count);
            assert_eq!(body["message"], "Database already initialized");
        }
    }

    #[tokio::test]
    async fn storage_faults_hide_details() {
        let db = Database::in_memory().await.unwrap();
        let service = GuideQueryService::new(GuideStore::Sqlite(SqliteGuideStore::new(db.clone())));
        service.initialize().await.unwrap();
        sqlx::query("UPDATE guides SET tags = '{broken' WHERE slug = 'base-defense'")
            .execute(db.pool())
            .await
            .unwrap();
        let app = create_router(
            AppState {
                guides: Arc::new(service),
            },
            false,
        );

        let (status, body) = call(&app, Method::GET, "/api/guides/base-defense").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["statusMessage"], "Internal server error");
        assert!(!body.to_string().contains("base-defense"));

        let (status, _) = call(&app, Method::GET, "/api/guides").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (status, body) = call(&app, Method::GET, "/api/guides/getting-started").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tags"], serde_json::json!(["beginner", "colony", "setup"]));

        let (status, body) = call(&app, Method::GET, "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["store"], "sqlite");
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn colonist_endpoints() {
        let app = memory_app().await;

        let (status, body) = call(&app, Method::GET, "/api/colonists?count=3").await;
        assert_eq!(status, StatusCode::OK);
        let names: std::collections::HashSet<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(names.len(), 3);

        let (_, body) = call(&app, Method::GET, "/api/colonists?count=lots").await;
        assert_eq!(body.as_array().unwrap().len(), DEFAULT_COLONISTS);

        let (status, body) = call(&app, Method::GET, "/api/colonist").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["skills"].as_array().unwrap().len() >= 3);

        let (status, body) = call(&app, Method::GET, "/api/colony").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["colonists"].as_array().unwrap().len(), COLONY_SIZE);
        assert!(body["baseName"].is_string());
    }

    #[test]
    fn panics_become_generic_500() {
        let response = panic_response(Box::new("index out of bounds".to_string()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
