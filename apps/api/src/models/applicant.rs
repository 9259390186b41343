use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicantRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub cv_id: Option<i64>,
}

/// Public projection used by the report endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ApplicantSummary {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CvRow {
    pub id: i64,
    pub experience: String,
}
