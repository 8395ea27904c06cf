//! Durable record of reservations and the seat-to-reservation join.
//!
//! Mutating functions are meant to run inside the coordinator's transaction;
//! they never commit on their own.

use sqlx::SqliteExecutor;

use super::placeholders;
use crate::models::{Reservation, ReservedSeat, SeatStatus};

pub async fn reservation_for<'e, E>(
    exec: E,
    user_id: i64,
    concert_id: i64,
) -> sqlx::Result<Option<Reservation>>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Reservation>(
        "SELECT id, user_id, concert_id FROM reservations WHERE user_id = ? AND concert_id = ?",
    )
    .bind(user_id)
    .bind(concert_id)
    .fetch_optional(exec)
    .await
}

pub async fn reservations_for_user<'e, E>(exec: E, user_id: i64) -> sqlx::Result<Vec<Reservation>>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Reservation>(
        "SELECT id, user_id, concert_id FROM reservations WHERE user_id = ? ORDER BY id",
    )
    .bind(user_id)
    .fetch_all(exec)
    .await
}

// Join rows for a set of reservations, projected with the concert id.
pub async fn reserved_seats_for<'e, E>(
    exec: E,
    reservation_ids: &[i64],
) -> sqlx::Result<Vec<ReservedSeat>>
where
    E: SqliteExecutor<'e>,
{
    if reservation_ids.is_empty() {
        return Ok(vec![]);
    }

    let sql = format!(
        "SELECT reserved_seats.reservation_id, reserved_seats.seat_id, reservations.concert_id
         FROM reserved_seats
         JOIN reservations ON reserved_seats.reservation_id = reservations.id
         WHERE reservations.id IN ({})
         ORDER BY reserved_seats.seat_id",
        placeholders(reservation_ids.len())
    );
    let mut query = sqlx::query_as::<_, ReservedSeat>(&sql);
    for id in reservation_ids {
        query = query.bind(id);
    }
    query.fetch_all(exec).await
}

// The availability double check: a seat counts as free only when its status
// flag says 'available' AND no active join row claims it. The two can only
// disagree after a partially failed write; intersecting them means such a
// seat is never handed out.
pub async fn available_seats<'e, E>(
    exec: E,
    concert_id: i64,
) -> sqlx::Result<Vec<(i64, SeatStatus)>>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, (i64, SeatStatus)>(
        "SELECT id, status FROM seats
         WHERE concert_id = ? AND status = 'available'
           AND id NOT IN (
             SELECT reserved_seats.seat_id
             FROM reserved_seats
             JOIN reservations ON reserved_seats.reservation_id = reservations.id
             WHERE reservations.concert_id = ?
           )
         ORDER BY id",
    )
    .bind(concert_id)
    .bind(concert_id)
    .fetch_all(exec)
    .await
}

// Reservation ids come from the storage-owned sequence, unique under
// concurrency, replacing the racy max(id)+1 read-then-write.
pub async fn insert_reservation<'e, E>(exec: E, user_id: i64, concert_id: i64) -> sqlx::Result<i64>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO reservations (user_id, concert_id) VALUES (?, ?) RETURNING id",
    )
    .bind(user_id)
    .bind(concert_id)
    .fetch_one(exec)
    .await
}

pub async fn mark_seats<'e, E>(exec: E, seat_ids: &[i64], status: SeatStatus) -> sqlx::Result<()>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!(
        "UPDATE seats SET status = ? WHERE id IN ({})",
        placeholders(seat_ids.len())
    );
    let mut query = sqlx::query(&sql).bind(status);
    for id in seat_ids {
        query = query.bind(id);
    }
    query.execute(exec).await?;
    Ok(())
}

pub async fn insert_reserved_seats<'e, E>(
    exec: E,
    reservation_id: i64,
    seat_ids: &[i64],
) -> sqlx::Result<()>
where
    E: SqliteExecutor<'e>,
{
    let mut sql = String::from("INSERT INTO reserved_seats (reservation_id, seat_id) VALUES ");
    for i in 0..seat_ids.len() {
        if i > 0 {
            sql.push(',');
        }
        sql.push_str("(?,?)");
    }
    let mut query = sqlx::query(&sql);
    for id in seat_ids {
        query = query.bind(reservation_id).bind(id);
    }
    query.execute(exec).await?;
    Ok(())
}

// How many of the named reservations actually belong to this user.
pub async fn owned_reservation_count<'e, E>(
    exec: E,
    user_id: i64,
    reservation_ids: &[i64],
) -> sqlx::Result<i64>
where
    E: SqliteExecutor<'e>,
{
    if reservation_ids.is_empty() {
        return Ok(0);
    }

    let sql = format!(
        "SELECT COUNT(*) FROM reservations WHERE user_id = ? AND id IN ({})",
        placeholders(reservation_ids.len())
    );
    let mut query = sqlx::query_scalar::<_, i64>(&sql).bind(user_id);
    for id in reservation_ids {
        query = query.bind(id);
    }
    query.fetch_one(exec).await
}

// Total seats held by the named reservations; a cancellation must cover all
// of them, partial release is not supported.
pub async fn seat_count_for_reservations<'e, E>(
    exec: E,
    reservation_ids: &[i64],
) -> sqlx::Result<i64>
where
    E: SqliteExecutor<'e>,
{
    if reservation_ids.is_empty() {
        return Ok(0);
    }

    let sql = format!(
        "SELECT COUNT(*) FROM reserved_seats WHERE reservation_id IN ({})",
        placeholders(reservation_ids.len())
    );
    let mut query = sqlx::query_scalar::<_, i64>(&sql);
    for id in reservation_ids {
        query = query.bind(id);
    }
    query.fetch_one(exec).await
}

// Deletes the join rows and returns the seat ids actually freed, so the
// caller can verify the named set matched before touching seat status.
pub async fn release_reserved_seats<'e, E>(
    exec: E,
    reservation_ids: &[i64],
    seat_ids: &[i64],
) -> sqlx::Result<Vec<i64>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!(
        "DELETE FROM reserved_seats WHERE reservation_id IN ({}) AND seat_id IN ({}) RETURNING seat_id",
        placeholders(reservation_ids.len()),
        placeholders(seat_ids.len())
    );
    let mut query = sqlx::query_scalar::<_, i64>(&sql);
    for id in reservation_ids {
        query = query.bind(id);
    }
    for id in seat_ids {
        query = query.bind(id);
    }
    query.fetch_all(exec).await
}

// Only ever deletes rows matching the user_id filter.
pub async fn delete_reservations<'e, E>(
    exec: E,
    user_id: i64,
    concert_ids: &[i64],
) -> sqlx::Result<()>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!(
        "DELETE FROM reservations WHERE user_id = ? AND concert_id IN ({})",
        placeholders(concert_ids.len())
    );
    let mut query = sqlx::query(&sql).bind(user_id);
    for id in concert_ids {
        query = query.bind(id);
    }
    query.execute(exec).await?;
    Ok(())
}
