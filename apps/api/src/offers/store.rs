use sqlx::SqlitePool;
use tracing::info;

use crate::errors::AppError;
use crate::models::offer::{OfferRow, OfferStatus, OfferView};

/// Creates a pending offer for the applicant and position of an application.
/// Copying the references happens inside one INSERT, so no read lock is held
/// across the write.
pub async fn send_offer(
    pool: &SqlitePool,
    application_id: i64,
    offered_salary: i64,
) -> Result<OfferRow, AppError> {
    let offer: OfferRow = sqlx::query_as(
        r#"
        INSERT INTO offers (offered_salary, accepted, applicant_id, position_id)
        SELECT ?, ?, applicant_id, position_id FROM applications WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(offered_salary)
    .bind(OfferStatus::Pending)
    .bind(application_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Application {application_id} not found")))?;

    info!(offer_id = offer.id, application_id, offered_salary, "Offer sent");
    Ok(offer)
}

/// Records `applicant_id`'s decision on one of their own offers.
/// Offers addressed to someone else are reported as missing.
pub async fn set_acceptance(
    pool: &SqlitePool,
    offer_id: i64,
    applicant_id: i64,
    accept: bool,
) -> Result<OfferRow, AppError> {
    let offer: OfferRow = sqlx::query_as(
        "UPDATE offers SET accepted = ? WHERE id = ? AND applicant_id = ? RETURNING *",
    )
    .bind(OfferStatus::from_decision(accept))
    .bind(offer_id)
    .bind(applicant_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Offer {offer_id} not found")))?;

    info!(offer_id, status = ?offer.accepted, "Offer decision recorded");
    Ok(offer)
}

/// Offers addressed to one applicant.
pub async fn offers_for_applicant(
    pool: &SqlitePool,
    applicant_id: i64,
) -> Result<Vec<OfferView>, AppError> {
    Ok(sqlx::query_as(
        r#"
        SELECT o.id, o.offered_salary, o.accepted, o.position_id, p.title AS position_title
        FROM offers o
        JOIN positions p ON p.id = o.position_id
        WHERE o.applicant_id = ?
        ORDER BY o.id
        "#,
    )
    .bind(applicant_id)
    .fetch_all(pool)
    .await?)
}
