/// SQLite database wrapper.
///
/// Owns the `sqlx` connection pool and the table layout used by the guide site:
/// - guides: id, slug (unique), title, description, content, difficulty, category,
///   tags (JSON array text), created_at, updated_at
/// - tips: id, title, content, category, difficulty
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::error::CommonError;

const CREATE_GUIDES_TABLE: &str = "CREATE TABLE IF NOT EXISTS guides (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    slug TEXT NOT NULL UNIQUE,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    content TEXT NOT NULL DEFAULT '',
    difficulty TEXT NOT NULL,
    category TEXT NOT NULL,
    tags TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)";

const CREATE_GUIDES_CREATED_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_guides_created_at ON guides (created_at DESC, id DESC)";

const CREATE_TIPS_TABLE: &str = "CREATE TABLE IF NOT EXISTS tips (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    category TEXT NOT NULL,
    difficulty TEXT NOT NULL
)";

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (or create) the SQLite file at `path`.
    pub async fn open(path: &str, max_connections: u32) -> Result<Self, CommonError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        info!(path, max_connections, "sqlite connected");
        Ok(Self { pool })
    }

    /// A private in-memory database. Pinned to one connection that never expires,
    /// since every new connection to `:memory:` would see an empty database.
    pub async fn in_memory() -> Result<Self, CommonError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the `guides` and `tips` tables when they do not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), CommonError> {
        for ddl in [CREATE_GUIDES_TABLE, CREATE_GUIDES_CREATED_INDEX, CREATE_TIPS_TABLE] {
            sqlx::query(ddl).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Ping the database with a trivial query.
    pub async fn is_available(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

/// Serialize tags into the JSON array text stored in `guides.tags`.
pub fn encode_tags(tags: &[String]) -> String {
    serde_json::Value::from(tags.to_vec()).to_string()
}

/// Decode the stored `guides.tags` column. NULL and empty text decode to no tags.
pub fn decode_tags(slug: &str, raw: Option<&str>) -> Result<Vec<String>, CommonError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Vec::new()),
        Some(text) => serde_json::from_str(text).map_err(|source| CommonError::TagDecode {
            slug: slug.to_string(),
            source,
        }),
    }
}
