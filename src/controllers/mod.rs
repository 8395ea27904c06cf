pub mod catalog;
pub mod discount;
pub mod reservations;
pub mod session;

use axum::Router;
use std::sync::Arc;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(catalog::routes())
        .merge(reservations::routes())
        .merge(session::routes())
}
