//! Read accessors for the durable theater/concert/seat catalog.
//!
//! All functions are generic over the executor so the coordinator can run
//! them either on the pool or inside an open transaction.

use sqlx::SqliteExecutor;

use super::placeholders;
use crate::models::{Concert, Seat, Theater};

pub async fn list_theaters<'e, E>(exec: E) -> sqlx::Result<Vec<Theater>>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Theater>("SELECT id, name, address, rows, columns FROM theaters ORDER BY id")
        .fetch_all(exec)
        .await
}

pub async fn list_concerts<'e, E>(exec: E) -> sqlx::Result<Vec<Concert>>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Concert>("SELECT id, name, date, theater_id FROM concerts ORDER BY date")
        .fetch_all(exec)
        .await
}

pub async fn list_seats<'e, E>(exec: E) -> sqlx::Result<Vec<Seat>>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Seat>(
        r#"SELECT id, code, row, "column", concert_id, status FROM seats ORDER BY concert_id, row, "column""#,
    )
    .fetch_all(exec)
    .await
}

pub async fn seats_by_ids<'e, E>(exec: E, seat_ids: &[i64]) -> sqlx::Result<Vec<Seat>>
where
    E: SqliteExecutor<'e>,
{
    if seat_ids.is_empty() {
        return Ok(vec![]);
    }

    let sql = format!(
        r#"SELECT id, code, row, "column", concert_id, status FROM seats WHERE id IN ({}) ORDER BY id"#,
        placeholders(seat_ids.len())
    );
    let mut query = sqlx::query_as::<_, Seat>(&sql);
    for id in seat_ids {
        query = query.bind(id);
    }
    query.fetch_all(exec).await
}
