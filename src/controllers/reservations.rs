//! Authenticated reservation endpoints: `seatsToReserve` in,
//! `{success, conflictedSeats}` out.

use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::middleware::AuthUser;
use crate::models::{Reservation, ReservedSeat, Seat};
use crate::store::{catalog, ledger};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/user-reservations", get(user_reservations))
        .route("/user-seats", get(user_seats))
        .route("/user-seat-id/{seat_ids}", get(seats_by_ids))
        .route("/seats-update", post(reserve_seats))
        .route("/reserved-seats", delete(cancel_reserved_seats))
}

// GET /api/user-reservations
async fn user_reservations(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Vec<Reservation>>> {
    let reservations = ledger::reservations_for_user(&state.db.pool, user.user_id).await?;
    Ok(Json(reservations))
}

// GET /api/user-seats
async fn user_seats(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Vec<ReservedSeat>>> {
    let reservations = ledger::reservations_for_user(&state.db.pool, user.user_id).await?;
    let reservation_ids: Vec<i64> = reservations.iter().map(|r| r.id).collect();
    let seats = ledger::reserved_seats_for(&state.db.pool, &reservation_ids).await?;
    Ok(Json(seats))
}

// GET /api/user-seat-id/{seat_ids} with a comma-separated id list
async fn seats_by_ids(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(seat_ids): Path<String>,
) -> Result<Json<Vec<Seat>>> {
    let ids = seat_ids
        .split(',')
        .map(|s| s.trim().parse::<i64>())
        .collect::<std::result::Result<Vec<i64>, _>>()
        .map_err(|_| Error::Validation("all seat ids must be valid numbers".to_string()))?;

    if ids.is_empty() {
        return Err(Error::Validation("no seat ids specified".to_string()));
    }

    Ok(Json(catalog::seats_by_ids(&state.db.pool, &ids).await?))
}

#[derive(Debug, Deserialize)]
struct SeatRef {
    id: i64,
    concert_id: i64,
}

#[derive(Debug, Deserialize)]
struct SeatsUpdateRequest {
    #[serde(rename = "seatsToReserve")]
    seats_to_reserve: Vec<SeatRef>,
}

// POST /api/seats-update
async fn reserve_seats(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<SeatsUpdateRequest>,
) -> Result<Json<serde_json::Value>> {
    let Some(first) = req.seats_to_reserve.first() else {
        return Err(Error::Validation("no seats specified".to_string()));
    };
    let concert_id = first.concert_id;

    if req.seats_to_reserve.iter().any(|s| s.concert_id != concert_id) {
        return Err(Error::Validation(
            "all seats must belong to the same concert".to_string(),
        ));
    }

    let seat_ids: Vec<i64> = req.seats_to_reserve.iter().map(|s| s.id).collect();

    state
        .reservations
        .reserve(user.user_id, concert_id, &seat_ids)
        .await?;

    Ok(Json(json!({ "success": true })))
}

#[derive(Debug, Deserialize)]
struct ReservedSeatRef {
    reservation_id: i64,
    seat_id: i64,
    concert_id: i64,
}

#[derive(Debug, Deserialize)]
struct CancelRequest {
    #[serde(rename = "reservedSeats")]
    reserved_seats: Vec<ReservedSeatRef>,
}

// DELETE /api/reserved-seats
async fn cancel_reserved_seats(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<CancelRequest>,
) -> Result<()> {
    let concert_ids: BTreeSet<i64> = req.reserved_seats.iter().map(|s| s.concert_id).collect();
    let reservation_ids: BTreeSet<i64> =
        req.reserved_seats.iter().map(|s| s.reservation_id).collect();
    let seat_ids: Vec<i64> = req.reserved_seats.iter().map(|s| s.seat_id).collect();

    state
        .reservations
        .cancel(
            user.user_id,
            &concert_ids.into_iter().collect::<Vec<_>>(),
            &reservation_ids.into_iter().collect::<Vec<_>>(),
            &seat_ids,
        )
        .await
}
