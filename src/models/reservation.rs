use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// A committed claim by one user on a set of seats for one concert. At most
// one per (user, concert); created and destroyed together with its
// ReservedSeat rows, never independently.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub user_id: i64,
    pub concert_id: i64,
}

// Join row between a reservation and a seat, projected together with the
// concert id so the client can cancel without re-fetching the catalog.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ReservedSeat {
    pub reservation_id: i64,
    pub seat_id: i64,
    pub concert_id: i64,
}
