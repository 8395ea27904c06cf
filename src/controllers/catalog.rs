//! Open catalog endpoints: non-authenticated users can access these.

use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

use crate::error::Result;
use crate::models::{Concert, Seat, Theater};
use crate::store::catalog;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/concerts", get(get_concerts))
        .route("/theaters", get(get_theaters))
        .route("/seats", get(get_seats))
}

async fn get_concerts(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Concert>>> {
    Ok(Json(catalog::list_concerts(&state.db.pool).await?))
}

async fn get_theaters(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Theater>>> {
    Ok(Json(catalog::list_theaters(&state.db.pool).await?))
}

async fn get_seats(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Seat>>> {
    Ok(Json(catalog::list_seats(&state.db.pool).await?))
}
