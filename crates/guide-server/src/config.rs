use crate::error::AppError;

const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Application configuration loaded explicitly from environment variables.
///
/// The SQLite path is optional; without it the server runs on the in-memory sample guides.
#[derive(Debug, Clone)]
pub struct Config {
    /// Filesystem path to the SQLite guide database. `None` selects the in-memory store.
    pub database_path: Option<String>,
    /// Socket address the HTTP listener binds to.
    pub listen_addr: String,
    /// Upper bound on pooled SQLite connections.
    pub max_connections: u32,
    /// Answer CORS preflights for any origin.
    pub cors_any: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `GUIDES_DATABASE_PATH`: SQLite file (created if missing)
    /// - `GUIDES_LISTEN_ADDR`: default "127.0.0.1:3000"
    /// - `GUIDES_DB_MAX_CONNECTIONS`: default 5, must be greater than zero
    /// - `GUIDES_CORS_ANY`: "1" or "true" to allow any origin
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let database_path = lookup("GUIDES_DATABASE_PATH")
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        let listen_addr =
            lookup("GUIDES_LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());

        let max_connections = match lookup("GUIDES_DB_MAX_CONNECTIONS") {
            None => DEFAULT_MAX_CONNECTIONS,
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| {
                    AppError::Config(format!(
                        "GUIDES_DB_MAX_CONNECTIONS must be a positive integer, got '{raw}'"
                    ))
                })?,
        };

        let cors_any = lookup("GUIDES_CORS_ANY")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            database_path,
            listen_addr,
            max_connections,
            cors_any,
        })
    }
}
