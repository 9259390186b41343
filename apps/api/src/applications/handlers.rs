use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::applications::review::{
    list_applications, submit_application, update_recommendation, ReviewFilter,
};
use crate::errors::AppError;
use crate::models::application::ApplicationView;
use crate::session::CurrentApplicant;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub recommendation: String,
}

/// GET /applications
pub async fn handle_list_unreviewed(
    State(state): State<AppState>,
) -> Result<Json<Vec<ApplicationView>>, AppError> {
    Ok(Json(
        list_applications(&state.db, ReviewFilter::Unreviewed).await?,
    ))
}

/// GET /applications_filled
pub async fn handle_list_reviewed(
    State(state): State<AppState>,
) -> Result<Json<Vec<ApplicationView>>, AppError> {
    Ok(Json(
        list_applications(&state.db, ReviewFilter::Reviewed).await?,
    ))
}

/// POST /applications/:id
pub async fn handle_update_recommendation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<RecommendationRequest>,
) -> Result<(StatusCode, &'static str), AppError> {
    update_recommendation(&state.db, id, &req.recommendation).await?;
    Ok((StatusCode::OK, "Recommendation updated successfully"))
}

/// POST /positions/:id
pub async fn handle_apply(
    State(state): State<AppState>,
    current: CurrentApplicant,
    Path(position_id): Path<i64>,
) -> Result<(StatusCode, &'static str), AppError> {
    submit_application(&state.db, current.applicant_id, position_id).await?;
    Ok((StatusCode::CREATED, "Application received"))
}
