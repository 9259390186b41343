use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Acceptance state of an offer, stored as -1 / 0 / 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum OfferStatus {
    Rejected = -1,
    Pending = 0,
    Accepted = 1,
}

impl OfferStatus {
    pub fn from_decision(accept: bool) -> Self {
        if accept {
            OfferStatus::Accepted
        } else {
            OfferStatus::Rejected
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct OfferRow {
    pub id: i64,
    pub offered_salary: i64,
    pub accepted: OfferStatus,
    pub applicant_id: i64,
    pub position_id: i64,
}

/// An offer as shown to the applicant who received it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OfferView {
    pub id: i64,
    pub offered_salary: i64,
    pub accepted: OfferStatus,
    pub position_id: i64,
    pub position_title: String,
}
