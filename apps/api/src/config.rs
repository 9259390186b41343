use anyhow::{ensure, Context, Result};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://recruit.sqlite3";

/// Application configuration loaded from environment variables.
/// Every value has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub port: u16,
    pub rust_log: String,
    pub session_ttl_hours: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let session_ttl_hours = var("SESSION_TTL_HOURS", "24")
            .parse::<i64>()
            .context("SESSION_TTL_HOURS must be an integer")?;
        ensure!(session_ttl_hours > 0, "SESSION_TTL_HOURS must be positive");

        Ok(Config {
            database_url: var("DATABASE_URL", DEFAULT_DATABASE_URL),
            db_max_connections: var("DB_MAX_CONNECTIONS", "5")
                .parse::<u32>()
                .context("DB_MAX_CONNECTIONS must be a positive integer")?,
            port: var("PORT", "4000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG", "info"),
            session_ttl_hours,
        })
    }
}
