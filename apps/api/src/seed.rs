use anyhow::Result;
use sqlx::SqlitePool;
use tracing::info;

use crate::db::init_schema;

/// Universities offered on the registration form: (name, location).
pub const UNIVERSITIES: [(&str, &str); 5] = [
    ("Harvard", "Massachusetts"),
    ("Oxford", "California"),
    ("UCU", "Lviv"),
    ("LNU", "Lviv"),
    ("KPI", "Lviv"),
];

/// Landmarks positions can be tagged with: (title, location).
pub const LANDMARKS: [(&str, &str); 4] = [
    ("Eiffel Tower", "Paris"),
    ("Statue of Liberty", "New York"),
    ("Colosseum", "Rome"),
    ("Sydney Opera House", "Sydney"),
];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub universities_inserted: u64,
    pub landmarks_inserted: u64,
}

/// Ensures the schema exists and the reference rows are present.
/// Safe to run on every startup: existing names are left alone.
pub async fn bootstrap(pool: &SqlitePool) -> Result<SeedReport> {
    init_schema(pool).await?;

    let mut report = SeedReport::default();
    let mut tx = pool.begin().await?;

    for (name, location) in UNIVERSITIES {
        report.universities_inserted += sqlx::query(
            "INSERT INTO universities (name, location) VALUES (?, ?) ON CONFLICT(name) DO NOTHING",
        )
        .bind(name)
        .bind(location)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }

    for (title, location) in LANDMARKS {
        report.landmarks_inserted += sqlx::query(
            "INSERT INTO landmarks (title, location) VALUES (?, ?) ON CONFLICT(title) DO NOTHING",
        )
        .bind(title)
        .bind(location)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }

    tx.commit().await?;

    info!(
        universities = report.universities_inserted,
        landmarks = report.landmarks_inserted,
        "Reference data seeded"
    );
    Ok(report)
}
