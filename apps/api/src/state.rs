use sqlx::SqlitePool;

use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no per-user data: caller identity is resolved per request from the session store.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Config,
}
