use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::models::applicant::ApplicantSummary;
use crate::models::position::PositionRow;
use crate::reports::queries::{
    applicants_with_applications, applicants_with_offers, positions_with_min_applications,
};
use crate::state::AppState;

const POPULAR_POSITION_THRESHOLD: i64 = 3;

/// GET /applicants_with_applications
pub async fn handle_applicants_with_applications(
    State(state): State<AppState>,
) -> Result<Json<Vec<ApplicantSummary>>, AppError> {
    Ok(Json(applicants_with_applications(&state.db).await?))
}

/// GET /positions_with_three_applicants
pub async fn handle_positions_with_three_applicants(
    State(state): State<AppState>,
) -> Result<Json<Vec<PositionRow>>, AppError> {
    Ok(Json(
        positions_with_min_applications(&state.db, POPULAR_POSITION_THRESHOLD).await?,
    ))
}

/// GET /applicants_with_offers
pub async fn handle_applicants_with_offers(
    State(state): State<AppState>,
) -> Result<Json<Vec<ApplicantSummary>>, AppError> {
    Ok(Json(applicants_with_offers(&state.db).await?))
}
