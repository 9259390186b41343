use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PositionRow {
    pub id: i64,
    pub title: String,
    pub salary: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct LandmarkRow {
    pub id: i64,
    pub title: String,
    pub location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionWithLandmarks {
    #[serde(flatten)]
    pub position: PositionRow,
    pub landmarks: Vec<LandmarkRow>,
}
