//! Service-level tests of the conflict-resolution protocol: the resolver,
//! the transaction coordinator, and the cancellation coordinator against a
//! real (in-memory) database.

mod common;

use concert_seats::error::Error;
use concert_seats::models::SeatStatus;
use concert_seats::store::catalog;

#[tokio::test]
async fn reserve_commits_and_occupies_seats() {
    let state = common::test_state().await;
    let alice = common::create_user(&state, "alice", "pw", false).await;
    let seats = common::free_seat_ids(&state, 1, 2).await;

    let reservation_id = state.reservations.reserve(alice, 1, &seats).await.unwrap();
    assert!(reservation_id > 0);

    let available = state.reservations.available_seats(1).await.unwrap();
    for id in &seats {
        assert!(!available.contains_key(id));
    }

    // the status flag moved together with the ledger rows
    let rows = catalog::seats_by_ids(&state.db.pool, &seats).await.unwrap();
    assert!(rows.iter().all(|s| s.status == SeatStatus::Occupied));
}

#[tokio::test]
async fn empty_request_is_rejected() {
    let state = common::test_state().await;
    let alice = common::create_user(&state, "alice", "pw", false).await;

    let err = state.reservations.reserve(alice, 1, &[]).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn unknown_seat_is_rejected() {
    let state = common::test_state().await;
    let alice = common::create_user(&state, "alice", "pw", false).await;

    let err = state
        .reservations
        .reserve(alice, 1, &[999_999])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn seat_of_another_concert_is_rejected() {
    let state = common::test_state().await;
    let alice = common::create_user(&state, "alice", "pw", false).await;
    let foreign = common::free_seat_ids(&state, 2, 1).await;

    let err = state
        .reservations
        .reserve(alice, 1, &foreign)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn one_reservation_per_user_per_concert() {
    let state = common::test_state().await;
    let alice = common::create_user(&state, "alice", "pw", false).await;
    let seats = common::free_seat_ids(&state, 1, 4).await;

    state
        .reservations
        .reserve(alice, 1, &seats[..2])
        .await
        .unwrap();

    // disjoint seat set, same concert: still rejected
    let err = state
        .reservations
        .reserve(alice, 1, &seats[2..])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ReservationConflict));

    // a different concert is fine
    let other = common::free_seat_ids(&state, 2, 1).await;
    state.reservations.reserve(alice, 2, &other).await.unwrap();
}

#[tokio::test]
async fn loser_receives_the_exact_conflicting_seats() {
    let state = common::test_state().await;
    let alice = common::create_user(&state, "alice", "pw", false).await;
    let bruno = common::create_user(&state, "bruno", "pw", false).await;
    let seats = common::free_seat_ids(&state, 1, 3).await;
    let (s1, s2, s3) = (seats[0], seats[1], seats[2]);

    state.reservations.reserve(alice, 1, &[s1, s2]).await.unwrap();

    let err = state
        .reservations
        .reserve(bruno, 1, &[s2, s3])
        .await
        .unwrap_err();
    match err {
        Error::SeatConflict(ids) => assert_eq!(ids, vec![s2]),
        other => panic!("expected SeatConflict, got {other:?}"),
    }

    // final available set: everything but alice's two seats; s3 stayed free
    let available = state.reservations.available_seats(1).await.unwrap();
    assert!(!available.contains_key(&s1));
    assert!(!available.contains_key(&s2));
    assert!(available.contains_key(&s3));
}

#[tokio::test]
async fn conflict_path_leaves_state_unchanged() {
    let state = common::test_state().await;
    let alice = common::create_user(&state, "alice", "pw", false).await;
    let bruno = common::create_user(&state, "bruno", "pw", false).await;
    let seats = common::free_seat_ids(&state, 1, 2).await;

    state.reservations.reserve(alice, 1, &seats).await.unwrap();

    let reservations_before = common::count(&state, "SELECT COUNT(*) FROM reservations").await;
    let joins_before = common::count(&state, "SELECT COUNT(*) FROM reserved_seats").await;
    let occupied_before =
        common::count(&state, "SELECT COUNT(*) FROM seats WHERE status = 'occupied'").await;
    let available_before = state.reservations.available_seats(1).await.unwrap();

    let err = state
        .reservations
        .reserve(bruno, 1, &seats)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::SeatConflict(_)));

    assert_eq!(
        common::count(&state, "SELECT COUNT(*) FROM reservations").await,
        reservations_before
    );
    assert_eq!(
        common::count(&state, "SELECT COUNT(*) FROM reserved_seats").await,
        joins_before
    );
    assert_eq!(
        common::count(&state, "SELECT COUNT(*) FROM seats WHERE status = 'occupied'").await,
        occupied_before
    );
    assert_eq!(
        state.reservations.available_seats(1).await.unwrap(),
        available_before
    );
}

#[tokio::test]
async fn concurrent_overlapping_reserves_have_one_winner() {
    let state = common::test_state().await;
    let alice = common::create_user(&state, "alice", "pw", false).await;
    let bruno = common::create_user(&state, "bruno", "pw", false).await;
    let seats = common::free_seat_ids(&state, 1, 3).await;
    let (s1, s2, s3) = (seats[0], seats[1], seats[2]);

    let state_a = state.clone();
    let a = tokio::spawn(async move { state_a.reservations.reserve(alice, 1, &[s1, s2]).await });
    let state_b = state.clone();
    let b = tokio::spawn(async move { state_b.reservations.reserve(bruno, 1, &[s2, s3]).await });

    let results = vec![a.await.unwrap(), b.await.unwrap()];
    let committed = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(committed, 1, "exactly one of the overlapping reserves wins");

    // whichever lost was told about the contended seat, and only that one
    let conflict = results.into_iter().find_map(|r| match r {
        Err(Error::SeatConflict(ids)) => Some(ids),
        _ => None,
    });
    assert_eq!(conflict.unwrap(), vec![s2]);

    // the contended seat is claimed by exactly one join row
    let claims = common::count(
        &state,
        &format!("SELECT COUNT(*) FROM reserved_seats WHERE seat_id = {s2}"),
    )
    .await;
    assert_eq!(claims, 1);
}

#[tokio::test]
async fn cancel_then_reserve_round_trip() {
    let state = common::test_state().await;
    let alice = common::create_user(&state, "alice", "pw", false).await;
    let bruno = common::create_user(&state, "bruno", "pw", false).await;
    let seats = common::free_seat_ids(&state, 1, 2).await;

    let rid = state.reservations.reserve(alice, 1, &seats).await.unwrap();
    state
        .reservations
        .cancel(alice, &[1], &[rid], &seats)
        .await
        .unwrap();

    // both seats free again, reservation gone
    let available = state.reservations.available_seats(1).await.unwrap();
    for id in &seats {
        assert!(available.contains_key(id));
    }
    assert_eq!(
        common::count(&state, "SELECT COUNT(*) FROM reservations").await,
        0
    );

    // a different user can claim the same seats; alice may also rebook later
    state.reservations.reserve(bruno, 1, &seats).await.unwrap();
    assert_eq!(
        common::count(&state, "SELECT COUNT(*) FROM reservations").await,
        1
    );
}

#[tokio::test]
async fn cancel_requires_ownership() {
    let state = common::test_state().await;
    let alice = common::create_user(&state, "alice", "pw", false).await;
    let bruno = common::create_user(&state, "bruno", "pw", false).await;
    let seats = common::free_seat_ids(&state, 1, 2).await;

    let rid = state.reservations.reserve(alice, 1, &seats).await.unwrap();

    let err = state
        .reservations
        .cancel(bruno, &[1], &[rid], &seats)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    // alice's reservation is untouched
    assert_eq!(
        common::count(&state, "SELECT COUNT(*) FROM reserved_seats").await,
        2
    );
}

#[tokio::test]
async fn cancel_must_name_every_seat() {
    let state = common::test_state().await;
    let alice = common::create_user(&state, "alice", "pw", false).await;
    let seats = common::free_seat_ids(&state, 1, 3).await;

    let rid = state.reservations.reserve(alice, 1, &seats).await.unwrap();

    // naming a subset would orphan the remaining join rows
    let err = state
        .reservations
        .cancel(alice, &[1], &[rid], &seats[..1])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    assert_eq!(
        common::count(&state, "SELECT COUNT(*) FROM reserved_seats").await,
        3
    );
    assert_eq!(
        common::count(&state, "SELECT COUNT(*) FROM seats WHERE status = 'occupied'").await,
        3
    );
}

#[tokio::test]
async fn availability_intersects_both_sources_of_truth() {
    let state = common::test_state().await;
    let seats = common::free_seat_ids(&state, 1, 1).await;
    let seat = seats[0];

    // simulate drift: flag says occupied, but no join row claims the seat
    sqlx::query("UPDATE seats SET status = 'occupied' WHERE id = ?")
        .bind(seat)
        .execute(&state.db.pool)
        .await
        .unwrap();
    let available = state.reservations.available_seats(1).await.unwrap();
    assert!(!available.contains_key(&seat));

    // restore the flag: free again
    sqlx::query("UPDATE seats SET status = 'available' WHERE id = ?")
        .bind(seat)
        .execute(&state.db.pool)
        .await
        .unwrap();
    let available = state.reservations.available_seats(1).await.unwrap();
    assert!(available.contains_key(&seat));
}
