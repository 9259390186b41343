use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UniversityRow {
    pub id: i64,
    pub name: String,
    pub location: String,
}
