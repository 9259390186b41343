use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::models::applicant::{ApplicantRow, CvRow};
use crate::models::university::UniversityRow;

/// Default option of the university dropdown; never a real choice.
pub const UNIVERSITY_PLACEHOLDER: &str = "Choose University";

#[derive(Debug, Clone)]
pub struct NewApplicant {
    pub first_name: String,
    pub last_name: String,
    pub experience: String,
    pub universities: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct Registration {
    pub applicant: ApplicantRow,
    pub cv: CvRow,
    pub universities: Vec<UniversityRow>,
    /// Submitted names with no matching university. They are ignored.
    pub skipped_universities: Vec<String>,
}

/// Creates the CV, links it to the known universities and creates the applicant,
/// all in one transaction. Unknown university names are dropped, not rejected.
///
/// Universities are resolved before the transaction opens, so it only ever writes.
pub async fn register_applicant(
    pool: &SqlitePool,
    new: NewApplicant,
) -> Result<Registration, AppError> {
    let mut names: Vec<String> = Vec::new();
    for name in new.universities {
        if name != UNIVERSITY_PLACEHOLDER && !names.contains(&name) {
            names.push(name);
        }
    }

    let mut universities: Vec<UniversityRow> = Vec::new();
    let mut skipped_universities = Vec::new();
    for name in names {
        match find_university(pool, &name).await? {
            Some(u) if !universities.iter().any(|known| known.id == u.id) => universities.push(u),
            Some(_) => {}
            None => {
                debug!(university = %name, "Unknown university ignored");
                skipped_universities.push(name);
            }
        }
    }

    let mut tx = pool.begin().await?;

    let cv_id = sqlx::query("INSERT INTO cvs (experience) VALUES (?)")
        .bind(&new.experience)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

    for university in &universities {
        sqlx::query("INSERT INTO cv_universities (cv_id, university_id) VALUES (?, ?)")
            .bind(cv_id)
            .bind(university.id)
            .execute(&mut *tx)
            .await?;
    }

    let applicant_id =
        sqlx::query("INSERT INTO applicants (first_name, last_name, cv_id) VALUES (?, ?, ?)")
            .bind(&new.first_name)
            .bind(&new.last_name)
            .bind(cv_id)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();

    tx.commit().await?;

    info!(
        applicant_id,
        cv_id,
        universities = universities.len(),
        "Applicant registered"
    );

    Ok(Registration {
        applicant: ApplicantRow {
            id: applicant_id,
            first_name: new.first_name,
            last_name: new.last_name,
            cv_id: Some(cv_id),
        },
        cv: CvRow {
            id: cv_id,
            experience: new.experience,
        },
        universities,
        skipped_universities,
    })
}

async fn find_university(
    pool: &SqlitePool,
    name: &str,
) -> Result<Option<UniversityRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM universities WHERE name = ? ORDER BY id LIMIT 1")
        .bind(name)
        .fetch_optional(pool)
        .await
}

/// First applicant with this first name, in insertion order.
pub async fn find_by_first_name(
    pool: &SqlitePool,
    first_name: &str,
) -> Result<Option<ApplicantRow>, AppError> {
    Ok(
        sqlx::query_as("SELECT * FROM applicants WHERE first_name = ? ORDER BY id LIMIT 1")
            .bind(first_name)
            .fetch_optional(pool)
            .await?,
    )
}
