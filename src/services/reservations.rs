//! Availability resolution and the reservation conflict protocol.
//!
//! `reserve` and `cancel` are the only paths that move a seat between
//! `available` and `occupied`, and both apply the seat-status update and the
//! ledger rows as one transaction: the catalog and the ledger never diverge.

use std::collections::{BTreeMap, HashSet};

use tracing::{debug, info};

use crate::database::Database;
use crate::error::{Error, Result};
use crate::models::SeatStatus;
use crate::services::locks::ConcertLocks;
use crate::store::{catalog, ledger};

#[derive(Clone)]
pub struct ReservationService {
    db: Database,
    locks: ConcertLocks,
}

impl ReservationService {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            locks: ConcertLocks::new(),
        }
    }

    /// Current free-seat set for a concert, keyed by seat id.
    ///
    /// A seat is free only when its status flag is `available` and no active
    /// reservation claims it. Read-only, no locking: the query runs at the
    /// storage engine's default read consistency.
    pub async fn available_seats(&self, concert_id: i64) -> Result<BTreeMap<i64, SeatStatus>> {
        let rows = ledger::available_seats(&self.db.pool, concert_id).await?;
        Ok(rows.into_iter().collect())
    }

    /// Atomically claim `seat_ids` for `user_id`, or report the conflict.
    ///
    /// First committer wins. A loser gets `Error::SeatConflict` carrying the
    /// exact ids that were no longer free, and the call leaves no trace in
    /// storage. A second reservation by the same user for the same concert is
    /// `Error::ReservationConflict` regardless of seat overlap; the only way
    /// to change a reservation is cancel-then-reserve.
    pub async fn reserve(&self, user_id: i64, concert_id: i64, seat_ids: &[i64]) -> Result<i64> {
        if seat_ids.is_empty() {
            return Err(Error::Validation("no seats requested".to_string()));
        }

        let mut requested = seat_ids.to_vec();
        requested.sort_unstable();
        requested.dedup();

        // Reject unknown seats and seats of another concert before touching
        // any state.
        let seats = catalog::seats_by_ids(&self.db.pool, &requested).await?;
        if seats.len() != requested.len() {
            return Err(Error::Validation("unknown seat id".to_string()));
        }
        if seats.iter().any(|s| s.concert_id != concert_id) {
            return Err(Error::Validation(
                "seat does not belong to the concert".to_string(),
            ));
        }

        // Everything from the existing-reservation check to the commit runs
        // under the concert lock: no other reserve or cancel can interleave
        // between our availability snapshot and our writes.
        let _guard = self.locks.acquire(concert_id).await?;

        if ledger::reservation_for(&self.db.pool, user_id, concert_id)
            .await?
            .is_some()
        {
            debug!(user_id, concert_id, "reservation already exists");
            return Err(Error::ReservationConflict);
        }

        let mut tx = self.db.pool.begin().await?;

        let available: HashSet<i64> = ledger::available_seats(&mut *tx, concert_id)
            .await?
            .into_iter()
            .map(|(id, _)| id)
            .collect();

        let conflicting: Vec<i64> = requested
            .iter()
            .copied()
            .filter(|id| !available.contains(id))
            .collect();

        if !conflicting.is_empty() {
            // Critical atomicity boundary: nothing was written yet, and
            // nothing will be.
            tx.rollback().await?;
            debug!(user_id, concert_id, ?conflicting, "seat conflict");
            return Err(Error::SeatConflict(conflicting));
        }

        let reservation_id = ledger::insert_reservation(&mut *tx, user_id, concert_id).await?;
        ledger::mark_seats(&mut *tx, &requested, SeatStatus::Occupied).await?;
        ledger::insert_reserved_seats(&mut *tx, reservation_id, &requested).await?;

        tx.commit().await?;

        info!(
            reservation_id,
            user_id,
            concert_id,
            seats = requested.len(),
            "reservation committed"
        );
        Ok(reservation_id)
    }

    /// Atomically release a user's reservations and free their seats.
    ///
    /// Either every named seat is released and the named reservations fully
    /// removed, or nothing changes. Rows belonging to other users are never
    /// touched: every delete is filtered by `user_id`.
    pub async fn cancel(
        &self,
        user_id: i64,
        concert_ids: &[i64],
        reservation_ids: &[i64],
        seat_ids: &[i64],
    ) -> Result<()> {
        if concert_ids.is_empty() || reservation_ids.is_empty() || seat_ids.is_empty() {
            return Err(Error::Validation("no reserved seats specified".to_string()));
        }

        let mut concerts = concert_ids.to_vec();
        concerts.sort_unstable();
        concerts.dedup();
        let mut reservations = reservation_ids.to_vec();
        reservations.sort_unstable();
        reservations.dedup();
        let mut seats = seat_ids.to_vec();
        seats.sort_unstable();
        seats.dedup();

        let _guards = self.locks.acquire_many(&concerts).await?;

        let mut tx = self.db.pool.begin().await?;

        let owned = ledger::owned_reservation_count(&mut *tx, user_id, &reservations).await?;
        if owned != reservations.len() as i64 {
            tx.rollback().await?;
            return Err(Error::Validation(
                "reservation does not belong to the user".to_string(),
            ));
        }

        // Partial cancellation is unsupported: the named seats must cover the
        // named reservations exactly, otherwise join rows would be orphaned.
        let held = ledger::seat_count_for_reservations(&mut *tx, &reservations).await?;
        if held != seats.len() as i64 {
            tx.rollback().await?;
            return Err(Error::Validation(
                "cancellation must name every seat of the reservation".to_string(),
            ));
        }

        let freed = ledger::release_reserved_seats(&mut *tx, &reservations, &seats).await?;
        if freed.len() != seats.len() {
            tx.rollback().await?;
            return Err(Error::Validation(
                "seats do not match the named reservations".to_string(),
            ));
        }

        ledger::mark_seats(&mut *tx, &freed, SeatStatus::Available).await?;
        ledger::delete_reservations(&mut *tx, user_id, &concerts).await?;

        tx.commit().await?;

        info!(user_id, seats = freed.len(), "reservation cancelled");
        Ok(())
    }
}
