use sqlx::SqlitePool;
use tracing::info;

use crate::errors::AppError;
use crate::models::application::{ApplicationRow, ApplicationView};
use crate::positions::catalog::get_position;

/// Which side of the review queue to read.
///
/// A recommendation is absent (`NULL`), empty (`''`) or written. Only a written
/// one counts as reviewed, so the two filters split every application exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewFilter {
    Unreviewed,
    Reviewed,
}

impl ReviewFilter {
    fn predicate(self) -> &'static str {
        match self {
            ReviewFilter::Unreviewed => "(a.recommendation IS NULL OR a.recommendation = '')",
            ReviewFilter::Reviewed => "(a.recommendation IS NOT NULL AND a.recommendation <> '')",
        }
    }
}

/// Files an application from `applicant_id` for `position_id`.
pub async fn submit_application(
    pool: &SqlitePool,
    applicant_id: i64,
    position_id: i64,
) -> Result<ApplicationRow, AppError> {
    if get_position(pool, position_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Position {position_id} not found")));
    }

    let id = sqlx::query("INSERT INTO applications (applicant_id, position_id) VALUES (?, ?)")
        .bind(applicant_id)
        .bind(position_id)
        .execute(pool)
        .await?
        .last_insert_rowid();

    info!(application_id = id, applicant_id, position_id, "Application submitted");

    Ok(ApplicationRow {
        id,
        recommendation: None,
        applicant_id,
        position_id,
    })
}

/// Applications on one side of the review queue, with applicant and position names.
pub async fn list_applications(
    pool: &SqlitePool,
    filter: ReviewFilter,
) -> Result<Vec<ApplicationView>, AppError> {
    let sql = format!(
        r#"
        SELECT a.id, a.recommendation, a.applicant_id, ap.first_name, ap.last_name,
               a.position_id, p.title AS position_title
        FROM applications a
        JOIN applicants ap ON ap.id = a.applicant_id
        JOIN positions p ON p.id = a.position_id
        WHERE {}
        ORDER BY a.id
        "#,
        filter.predicate()
    );

    Ok(sqlx::query_as(&sql).fetch_all(pool).await?)
}

/// Replaces the recommendation of one application.
pub async fn update_recommendation(
    pool: &SqlitePool,
    id: i64,
    recommendation: &str,
) -> Result<ApplicationRow, AppError> {
    let application: ApplicationRow =
        sqlx::query_as("UPDATE applications SET recommendation = ? WHERE id = ? RETURNING *")
            .bind(recommendation)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;

    info!(application_id = id, "Recommendation updated");
    Ok(application)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, init_schema, test_pool};

    async fn get_application(pool: &SqlitePool, id: i64) -> Option<ApplicationRow> {
        sqlx::query_as("SELECT * FROM applications WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
            .unwrap()
    }

    async fn fixture(pool: &SqlitePool) -> (i64, i64) {
        let applicant =
            sqlx::query("INSERT INTO applicants (first_name, last_name) VALUES ('Ann', 'Lee')")
                .execute(pool)
                .await
                .unwrap()
                .last_insert_rowid();
        let position = sqlx::query("INSERT INTO positions (title, salary) VALUES ('Dev', 100)")
            .execute(pool)
            .await
            .unwrap()
            .last_insert_rowid();
        (applicant, position)
    }

    async fn insert_with(
        pool: &SqlitePool,
        applicant: i64,
        position: i64,
        rec: Option<&str>,
    ) -> i64 {
        sqlx::query(
            "INSERT INTO applications (recommendation, applicant_id, position_id) \
             VALUES (?, ?, ?)",
        )
        .bind(rec)
        .bind(applicant)
        .bind(position)
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid()
    }

    #[tokio::test]
    async fn test_review_filters_partition_all_rows() {
        let pool = test_pool().await;
        let (applicant, position) = fixture(&pool).await;
        let absent = insert_with(&pool, applicant, position, None).await;
        let empty = insert_with(&pool, applicant, position, Some("")).await;
        let written = insert_with(&pool, applicant, position, Some("Strong hire")).await;

        let unreviewed: Vec<i64> = list_applications(&pool, ReviewFilter::Unreviewed)
            .await
            .unwrap()
            .iter()
            .map(|a| a.id)
            .collect();
        let reviewed: Vec<i64> = list_applications(&pool, ReviewFilter::Reviewed)
            .await
            .unwrap()
            .iter()
            .map(|a| a.id)
            .collect();

        assert_eq!(unreviewed, vec![absent, empty]);
        assert_eq!(reviewed, vec![written]);
    }

    #[tokio::test]
    async fn test_submit_application_requires_existing_position() {
        let pool = test_pool().await;
        let (applicant, _) = fixture(&pool).await;

        let err = submit_application(&pool, applicant, 999).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_submit_application_rejects_unknown_applicant() {
        let pool = test_pool().await;
        let (_, position) = fixture(&pool).await;

        let err = submit_application(&pool, 999, position).await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }

    #[tokio::test]
    async fn test_update_recommendation_touches_one_row() {
        let pool = test_pool().await;
        let (applicant, position) = fixture(&pool).await;
        let target = submit_application(&pool, applicant, position).await.unwrap();
        let other = submit_application(&pool, applicant, position).await.unwrap();

        let updated = update_recommendation(&pool, target.id, "Invite to interview")
            .await
            .unwrap();

        assert_eq!(updated.recommendation.as_deref(), Some("Invite to interview"));
        let reloaded = get_application(&pool, target.id).await.unwrap();
        assert_eq!(reloaded.recommendation.as_deref(), Some("Invite to interview"));
        let untouched = get_application(&pool, other.id).await.unwrap();
        assert_eq!(untouched.recommendation, None);
    }

    #[tokio::test]
    async fn test_update_recommendation_missing_application() {
        let pool = test_pool().await;
        let err = update_recommendation(&pool, 7, "x").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg == "Application not found"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_recommendations_on_shared_file() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("review.sqlite3").display());
        let pool = create_pool(&url, 8).await.unwrap();
        init_schema(&pool).await.unwrap();
        let (applicant, position) = fixture(&pool).await;
        let mut ids = Vec::new();
        for _ in 0..20 {
            ids.push(insert_with(&pool, applicant, position, None).await);
        }

        let mut tasks = Vec::new();
        for round in 0..15 {
            for &id in &ids {
                let pool = pool.clone();
                tasks.push(tokio::spawn(async move {
                    update_recommendation(&pool, id, &format!("round {round}")).await
                }));
            }
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let unreviewed = list_applications(&pool, ReviewFilter::Unreviewed).await.unwrap();
        assert!(unreviewed.is_empty());
    }
}
