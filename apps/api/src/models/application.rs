use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: i64,
    pub recommendation: Option<String>,
    pub applicant_id: i64,
    pub position_id: i64,
}

/// An application joined with the names HR needs to review it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationView {
    pub id: i64,
    pub recommendation: Option<String>,
    pub applicant_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub position_id: i64,
    pub position_title: String,
}
