use sqlx::SqlitePool;

use crate::errors::AppError;
use crate::models::applicant::ApplicantSummary;
use crate::models::position::PositionRow;

/// Applicants that filed at least one application.
pub async fn applicants_with_applications(
    pool: &SqlitePool,
) -> Result<Vec<ApplicantSummary>, AppError> {
    Ok(sqlx::query_as(
        r#"
        SELECT ap.id, ap.first_name, ap.last_name
        FROM applicants ap
        WHERE EXISTS (SELECT 1 FROM applications a WHERE a.applicant_id = ap.id)
        ORDER BY ap.id
        "#,
    )
    .fetch_all(pool)
    .await?)
}

/// Positions with at least `min_applications` applications.
pub async fn positions_with_min_applications(
    pool: &SqlitePool,
    min_applications: i64,
) -> Result<Vec<PositionRow>, AppError> {
    Ok(sqlx::query_as(
        r#"
        SELECT p.id, p.title, p.salary
        FROM positions p
        JOIN applications a ON a.position_id = p.id
        GROUP BY p.id, p.title, p.salary
        HAVING COUNT(a.id) >= ?
        ORDER BY p.id
        "#,
    )
    .bind(min_applications)
    .fetch_all(pool)
    .await?)
}

/// Applicants that received at least one offer.
pub async fn applicants_with_offers(pool: &SqlitePool) -> Result<Vec<ApplicantSummary>, AppError> {
    Ok(sqlx::query_as(
        r#"
        SELECT ap.id, ap.first_name, ap.last_name
        FROM applicants ap
        WHERE EXISTS (SELECT 1 FROM offers o WHERE o.applicant_id = ap.id)
        ORDER BY ap.id
        "#,
    )
    .fetch_all(pool)
    .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    async fn insert(pool: &SqlitePool, sql: &str, binds: &[i64]) -> i64 {
        let mut query = sqlx::query(sql);
        for b in binds {
            query = query.bind(*b);
        }
        query.execute(pool).await.unwrap().last_insert_rowid()
    }

    async fn applicant(pool: &SqlitePool) -> i64 {
        insert(pool, "INSERT INTO applicants (first_name, last_name) VALUES ('A', 'B')", &[]).await
    }

    async fn position(pool: &SqlitePool) -> i64 {
        insert(pool, "INSERT INTO positions (title, salary) VALUES ('P', 1)", &[]).await
    }

    async fn apply(pool: &SqlitePool, applicant: i64, position: i64) {
        insert(
            pool,
            "INSERT INTO applications (applicant_id, position_id) VALUES (?, ?)",
            &[applicant, position],
        )
        .await;
    }

    #[tokio::test]
    async fn test_three_application_threshold() {
        let pool = test_pool().await;
        let people = [
            applicant(&pool).await,
            applicant(&pool).await,
            applicant(&pool).await,
        ];
        let two = position(&pool).await;
        let three = position(&pool).await;
        position(&pool).await;

        apply(&pool, people[0], two).await;
        apply(&pool, people[1], two).await;
        for p in people {
            apply(&pool, p, three).await;
        }

        let ids: Vec<i64> = positions_with_min_applications(&pool, 3)
            .await
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![three]);
    }

    #[tokio::test]
    async fn test_applicants_listed_once() {
        let pool = test_pool().await;
        let busy = applicant(&pool).await;
        let idle = applicant(&pool).await;
        let pos = position(&pool).await;
        apply(&pool, busy, pos).await;
        apply(&pool, busy, pos).await;

        let listed = applicants_with_applications(&pool).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, busy);
        assert!(listed.iter().all(|a| a.id != idle));
    }

    #[tokio::test]
    async fn test_applicants_with_offers() {
        let pool = test_pool().await;
        let offered = applicant(&pool).await;
        applicant(&pool).await;
        let pos = position(&pool).await;
        insert(
            &pool,
            "INSERT INTO offers (offered_salary, accepted, applicant_id, position_id) \
             VALUES (10, 0, ?, ?)",
            &[offered, pos],
        )
        .await;

        let listed = applicants_with_offers(&pool).await.unwrap();
        assert_eq!(
            listed,
            vec![ApplicantSummary {
                id: offered,
                first_name: "A".to_string(),
                last_name: "B".to_string(),
            }]
        );
    }
}
