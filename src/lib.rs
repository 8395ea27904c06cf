pub mod config;
pub mod controllers;
pub mod database;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
pub mod store;

use std::sync::Arc;

use crate::services::reservations::ReservationService;

// Shared state for the reservation API
#[derive(Clone)]
pub struct AppState {
    pub db: database::Database,
    pub config: config::Config,
    pub reservations: ReservationService,
}

impl AppState {
    pub async fn new(config: config::Config) -> Result<Arc<Self>, Box<dyn std::error::Error>> {
        let db = database::Database::new(&config.database.url, config.database.pool_size).await?;

        db.run_migrations().await?;

        let reservations = ReservationService::new(db.clone());
        let state = Arc::new(Self {
            db,
            config,
            reservations,
        });

        Ok(state)
    }
}
