use std::collections::HashMap;

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::models::position::{LandmarkRow, PositionRow, PositionWithLandmarks};

#[derive(Debug, Clone)]
pub struct NewPosition {
    pub title: String,
    pub salary: i64,
    pub landmarks: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedPosition {
    #[serde(flatten)]
    pub position: PositionWithLandmarks,
    /// Submitted titles with no matching landmark. They are ignored.
    pub skipped_landmarks: Vec<String>,
}

/// Inserts a position tagged with every landmark whose title matches.
/// Titles without a landmark are skipped.
pub async fn create_position(
    pool: &SqlitePool,
    new: NewPosition,
) -> Result<CreatedPosition, AppError> {
    let mut tx = pool.begin().await?;

    let position_id = sqlx::query("INSERT INTO positions (title, salary) VALUES (?, ?)")
        .bind(&new.title)
        .bind(new.salary)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

    let mut landmarks: Vec<LandmarkRow> = Vec::new();
    let mut skipped_landmarks = Vec::new();
    for title in new.landmarks {
        let found: Option<LandmarkRow> =
            sqlx::query_as("SELECT * FROM landmarks WHERE title = ? ORDER BY id LIMIT 1")
                .bind(&title)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(landmark) = found else {
            debug!(landmark = %title, "Unknown landmark ignored");
            skipped_landmarks.push(title);
            continue;
        };
        if landmarks.iter().any(|l| l.id == landmark.id) {
            continue;
        }

        sqlx::query("INSERT INTO position_landmarks (position_id, landmark_id) VALUES (?, ?)")
            .bind(position_id)
            .bind(landmark.id)
            .execute(&mut *tx)
            .await?;
        landmarks.push(landmark);
    }

    tx.commit().await?;

    info!(position_id, landmarks = landmarks.len(), "Position created");

    Ok(CreatedPosition {
        position: PositionWithLandmarks {
            position: PositionRow {
                id: position_id,
                title: new.title,
                salary: new.salary,
            },
            landmarks,
        },
        skipped_landmarks,
    })
}

pub async fn get_position(pool: &SqlitePool, id: i64) -> Result<Option<PositionRow>, AppError> {
    Ok(sqlx::query_as("SELECT * FROM positions WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?)
}

/// Every position with its landmarks, in id order.
pub async fn list_positions(pool: &SqlitePool) -> Result<Vec<PositionWithLandmarks>, AppError> {
    let positions: Vec<PositionRow> = sqlx::query_as("SELECT * FROM positions ORDER BY id")
        .fetch_all(pool)
        .await?;

    let links: Vec<(i64, i64, String, String)> = sqlx::query_as(
        r#"
        SELECT pl.position_id, l.id, l.title, l.location
        FROM position_landmarks pl
        JOIN landmarks l ON l.id = pl.landmark_id
        ORDER BY l.id
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut by_position: HashMap<i64, Vec<LandmarkRow>> = HashMap::new();
    for (position_id, id, title, location) in links {
        by_position
            .entry(position_id)
            .or_default()
            .push(LandmarkRow {
                id,
                title,
                location,
            });
    }

    Ok(positions
        .into_iter()
        .map(|position| PositionWithLandmarks {
            landmarks: by_position.remove(&position.id).unwrap_or_default(),
            position,
        })
        .collect())
}
