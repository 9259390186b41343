//! Per-request caller identity.
//!
//! Login and registration mint an opaque token stored in the `sessions` table.
//! Clients send it back as the `session_id` cookie or as a bearer token, and
//! handlers that act on behalf of an applicant take a [`CurrentApplicant`].

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "session_id";

/// The applicant on whose behalf the current request runs.
#[derive(Debug, Clone)]
pub struct CurrentApplicant {
    pub applicant_id: i64,
    pub token: String,
}

/// Opens a new session for `applicant_id` and returns its token.
/// Sessions older than `ttl_hours` are swept first.
pub async fn start_session(
    pool: &SqlitePool,
    applicant_id: i64,
    ttl_hours: i64,
) -> Result<String, AppError> {
    purge_expired(pool, ttl_hours).await?;

    let token = Uuid::new_v4().to_string();
    sqlx::query("INSERT INTO sessions (token, applicant_id, created_at) VALUES (?, ?, ?)")
        .bind(&token)
        .bind(applicant_id)
        .bind(Utc::now())
        .execute(pool)
        .await?;

    info!(applicant_id, "Session started");
    Ok(token)
}

/// Deletes every session created more than `ttl_hours` ago.
pub async fn purge_expired(pool: &SqlitePool, ttl_hours: i64) -> Result<u64, AppError> {
    let cutoff = Utc::now() - Duration::hours(ttl_hours);
    let purged = sqlx::query("DELETE FROM sessions WHERE julianday(created_at) <= julianday(?)")
        .bind(cutoff)
        .execute(pool)
        .await?
        .rows_affected();

    if purged > 0 {
        debug!(purged, "Expired sessions removed");
    }
    Ok(purged)
}

/// Resolves a token to its applicant id. Expired tokens resolve to `None`
/// and are deleted on the spot.
pub async fn resolve_session(
    pool: &SqlitePool,
    token: &str,
    ttl_hours: i64,
) -> Result<Option<i64>, AppError> {
    let row: Option<(i64, DateTime<Utc>)> =
        sqlx::query_as("SELECT applicant_id, created_at FROM sessions WHERE token = ?")
            .bind(token)
            .fetch_optional(pool)
            .await?;

    let deadline = Utc::now() - Duration::hours(ttl_hours);
    match row {
        Some((applicant_id, created_at)) if created_at > deadline => Ok(Some(applicant_id)),
        Some((applicant_id, _)) => {
            debug!(applicant_id, "Session token expired");
            end_session(pool, token).await?;
            Ok(None)
        }
        None => Ok(None),
    }
}

pub async fn end_session(pool: &SqlitePool, token: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

/// `Set-Cookie` value carrying `token`.
pub fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
}

/// `Set-Cookie` value that clears the session cookie.
pub fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Finds the session token in the request, cookie first, then bearer header.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string());

    from_cookie.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    })
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentApplicant {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let token = token_from_headers(&parts.headers).ok_or(AppError::Unauthorized)?;
        let applicant_id = resolve_session(&state.db, &token, state.config.session_ttl_hours)
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(CurrentApplicant {
            applicant_id,
            token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    use crate::db::test_pool;

    async fn insert_applicant(pool: &SqlitePool) -> i64 {
        sqlx::query("INSERT INTO applicants (first_name, last_name) VALUES ('Ann', 'Lee')")
            .execute(pool)
            .await
            .unwrap()
            .last_insert_rowid()
    }

    #[test]
    fn test_token_read_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; session_id=abc-123"),
        );
        assert_eq!(token_from_headers(&headers).as_deref(), Some("abc-123"));
    }

    #[test]
    fn test_token_read_from_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer xyz"));
        assert_eq!(token_from_headers(&headers).as_deref(), Some("xyz"));
    }

    #[test]
    fn test_missing_or_blank_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(token_from_headers(&headers), None);
        headers.insert(header::COOKIE, HeaderValue::from_static("session_id="));
        assert_eq!(token_from_headers(&headers), None);
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let pool = test_pool().await;
        let first = insert_applicant(&pool).await;
        let second = insert_applicant(&pool).await;

        let t1 = start_session(&pool, first, 24).await.unwrap();
        let t2 = start_session(&pool, second, 24).await.unwrap();

        assert_ne!(t1, t2);
        assert_eq!(resolve_session(&pool, &t1, 24).await.unwrap(), Some(first));
        assert_eq!(resolve_session(&pool, &t2, 24).await.unwrap(), Some(second));
    }

    async fn insert_stale_session(pool: &SqlitePool, token: &str, applicant: i64) {
        sqlx::query("INSERT INTO sessions (token, applicant_id, created_at) VALUES (?, ?, ?)")
            .bind(token)
            .bind(applicant)
            .bind(Utc::now() - Duration::hours(48))
            .execute(pool)
            .await
            .unwrap();
    }

    async fn session_exists(pool: &SqlitePool, token: &str) -> bool {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sessions WHERE token = ?")
            .bind(token)
            .fetch_one(pool)
            .await
            .unwrap()
            > 0
    }

    #[tokio::test]
    async fn test_expired_session_does_not_resolve() {
        let pool = test_pool().await;
        let applicant = insert_applicant(&pool).await;
        insert_stale_session(&pool, "old", applicant).await;

        assert_eq!(resolve_session(&pool, "old", 24).await.unwrap(), None);
        assert!(!session_exists(&pool, "old").await, "expired row is deleted");
    }

    #[tokio::test]
    async fn test_start_session_sweeps_expired_rows() {
        let pool = test_pool().await;
        let applicant = insert_applicant(&pool).await;
        insert_stale_session(&pool, "stale-a", applicant).await;
        insert_stale_session(&pool, "stale-b", applicant).await;
        let live = start_session(&pool, applicant, 24).await.unwrap();

        let fresh = start_session(&pool, applicant, 24).await.unwrap();

        assert!(!session_exists(&pool, "stale-a").await);
        assert!(!session_exists(&pool, "stale-b").await);
        assert!(session_exists(&pool, &live).await);
        assert_eq!(resolve_session(&pool, &fresh, 24).await.unwrap(), Some(applicant));
    }

    #[tokio::test]
    async fn test_end_session_revokes_token() {
        let pool = test_pool().await;
        let applicant = insert_applicant(&pool).await;
        let token = start_session(&pool, applicant, 24).await.unwrap();

        end_session(&pool, &token).await.unwrap();

        assert_eq!(resolve_session(&pool, &token, 24).await.unwrap(), None);
    }
}
