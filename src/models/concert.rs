use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Concert {
    pub id: i64,
    pub name: String,
    pub date: NaiveDateTime,
    pub theater_id: i64,
}
