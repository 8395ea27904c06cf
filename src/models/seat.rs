use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Server-authoritative seat state. The client additionally renders transient
// requested/conflicted display states, but those never persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    Available,
    Occupied,
}

// Seats are per-concert, not shared across concerts in the same theater.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Seat {
    pub id: i64,
    pub code: String,
    pub row: i64,
    pub column: i64,
    pub concert_id: i64,
    pub status: SeatStatus,
}
