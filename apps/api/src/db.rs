use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

/// Table definitions, in dependency order. Every statement is idempotent.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS universities (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        location TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS landmarks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL UNIQUE,
        location TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS cvs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        experience TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS cv_universities (
        cv_id INTEGER NOT NULL REFERENCES cvs(id),
        university_id INTEGER NOT NULL REFERENCES universities(id),
        PRIMARY KEY (cv_id, university_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS applicants (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        cv_id INTEGER UNIQUE REFERENCES cvs(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS positions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        salary INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS position_landmarks (
        position_id INTEGER NOT NULL REFERENCES positions(id),
        landmark_id INTEGER NOT NULL REFERENCES landmarks(id),
        PRIMARY KEY (position_id, landmark_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS applications (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        recommendation TEXT,
        applicant_id INTEGER NOT NULL REFERENCES applicants(id),
        position_id INTEGER NOT NULL REFERENCES positions(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS offers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        offered_salary INTEGER NOT NULL,
        accepted INTEGER NOT NULL DEFAULT 0 CHECK (accepted IN (-1, 0, 1)),
        applicant_id INTEGER NOT NULL REFERENCES applicants(id),
        position_id INTEGER NOT NULL REFERENCES positions(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS companies (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT,
        employee_count INTEGER
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS hr_managers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        first_name TEXT,
        last_name TEXT,
        position_level TEXT,
        company_id INTEGER REFERENCES companies(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS sessions (
        token TEXT PRIMARY KEY,
        applicant_id INTEGER NOT NULL REFERENCES applicants(id),
        created_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_applications_position ON applications(position_id)",
    "CREATE INDEX IF NOT EXISTS idx_offers_applicant ON offers(applicant_id)",
];

/// Creates and returns a SQLite connection pool.
/// The database file is created if it does not exist; foreign keys are enforced.
/// WAL lets readers proceed while a writer holds the lock.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    info!("Opening SQLite database at {database_url}");

    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid DATABASE_URL '{database_url}'"))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    info!("SQLite connection pool established");
    Ok(pool)
}

/// Creates every table that does not exist yet.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    let mut tx = pool.begin().await?;
    for statement in SCHEMA {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    Ok(())
}

/// Single-connection in-memory pool with the schema applied. The connection
/// never expires, so the database lives as long as the pool.
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();
    init_schema(&pool).await.unwrap();
    pool
}
