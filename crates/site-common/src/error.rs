/// Error types shared by the site crates.
///
/// These cover the storage layer (SQLite access, stored-row decoding, seed data).
/// Server-specific errors live in each server crate and wrap `CommonError` via `#[from]`.

#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("stored tags for guide '{slug}' are not a JSON string array: {source}")]
    TagDecode {
        slug: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("stored difficulty is not recognised: {0}")]
    UnknownDifficulty(String),

    #[error("invalid seed data: {0}")]
    InvalidSeed(String),
}
