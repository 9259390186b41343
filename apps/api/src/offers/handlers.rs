use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::offer::{OfferStatus, OfferView};
use crate::offers::store::{offers_for_applicant, send_offer, set_acceptance};
use crate::session::CurrentApplicant;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SendOfferRequest {
    pub salary: i64,
}

#[derive(Debug, Deserialize)]
pub struct AcceptanceRequest {
    pub accept: bool,
}

/// POST /applications_filled/:id
pub async fn handle_send_offer(
    State(state): State<AppState>,
    Path(application_id): Path<i64>,
    Json(req): Json<SendOfferRequest>,
) -> Result<(StatusCode, &'static str), AppError> {
    send_offer(&state.db, application_id, req.salary).await?;
    Ok((StatusCode::CREATED, "Offer sent"))
}

/// POST /acceptance/:id
///
/// Only the applicant the offer was made to can decide on it.
pub async fn handle_acceptance(
    State(state): State<AppState>,
    current: CurrentApplicant,
    Path(offer_id): Path<i64>,
    Json(req): Json<AcceptanceRequest>,
) -> Result<&'static str, AppError> {
    let offer = set_acceptance(&state.db, offer_id, current.applicant_id, req.accept).await?;
    Ok(match offer.accepted {
        OfferStatus::Accepted => "Offer accepted",
        _ => "Offer rejected",
    })
}

/// GET /offers
pub async fn handle_my_offers(
    State(state): State<AppState>,
    current: CurrentApplicant,
) -> Result<Json<Vec<OfferView>>, AppError> {
    Ok(Json(
        offers_for_applicant(&state.db, current.applicant_id).await?,
    ))
}
