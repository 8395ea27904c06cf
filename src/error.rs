use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("not authenticated")]
    NotAuthenticated,

    // The user already holds a reservation for this concert. Distinct from a
    // seat conflict: the client must not retry, only cancel-then-reserve.
    #[error("reservation conflict")]
    ReservationConflict,

    // Requested seats no longer available. An expected outcome, not a fault:
    // carries the exact ids so the client can re-offer a reduced set.
    #[error("some seats are no longer available")]
    SeatConflict(Vec<i64>),

    #[error("timed out waiting for the lock on concert {0}")]
    LockTimeout(i64),

    #[error("database error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Validation(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": [msg] }))).into_response()
            }
            Error::NotAuthenticated => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "errors": ["Not authenticated"] })),
            )
                .into_response(),
            Error::ReservationConflict => (
                StatusCode::CONFLICT,
                Json(json!({ "success": false, "errors": ["Reservation conflict"] })),
            )
                .into_response(),
            // Compatibility shape: HTTP 200 with success:false, so the client
            // can distinguish "pick other seats" from a hard failure.
            Error::SeatConflict(seat_ids) => (
                StatusCode::OK,
                Json(json!({
                    "success": false,
                    "errors": ["Some seats are no longer available"],
                    "conflictedSeats": seat_ids,
                })),
            )
                .into_response(),
            Error::LockTimeout(concert_id) => {
                tracing::error!("lock acquisition timed out for concert {}", concert_id);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({ "errors": ["Service busy, retry later"] })),
                )
                    .into_response()
            }
            Error::Storage(e) => {
                tracing::error!("storage error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "errors": ["Database error"] })),
                )
                    .into_response()
            }
            Error::Token(e) => {
                tracing::error!("token error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "errors": ["Token error"] })),
                )
                    .into_response()
            }
        }
    }
}
