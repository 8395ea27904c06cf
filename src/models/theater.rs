use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Immutable after creation: the seat grid of every concert hosted here is
// generated from rows x columns.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Theater {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub rows: i64,
    pub columns: i64,
}
