#![allow(dead_code)]

use std::sync::Arc;

use concert_seats::config::{AppConfig, AuthConfig, Config, DatabaseConfig, DiscountConfig};
use concert_seats::AppState;

pub const JWT_SECRET: &str = "test-secret";

pub fn test_config() -> Config {
    Config {
        app: AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origin: "http://localhost:5173".to_string(),
            rust_log: "warn".to_string(),
        },
        database: DatabaseConfig {
            // one connection: every pool checkout sees the same in-memory db
            url: "sqlite::memory:".to_string(),
            pool_size: 1,
        },
        auth: AuthConfig {
            jwt_secret: JWT_SECRET.to_string(),
            token_ttl_secs: 60,
        },
        discount: DiscountConfig { port: 0 },
    }
}

// Fresh in-memory database with the schema and demo catalog applied.
pub async fn test_state() -> Arc<AppState> {
    AppState::new(test_config())
        .await
        .expect("failed to build test state")
}

pub async fn create_user(state: &AppState, username: &str, password: &str, loyal: bool) -> i64 {
    // low cost keeps the test suite fast
    let hash = bcrypt::hash(password, 4).expect("bcrypt hash");
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (username, password_hash, loyal) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(username)
    .bind(hash)
    .bind(loyal)
    .fetch_one(&state.db.pool)
    .await
    .expect("insert user")
}

// First `n` free seat ids of a concert, ascending.
pub async fn free_seat_ids(state: &AppState, concert_id: i64, n: usize) -> Vec<i64> {
    let available = state
        .reservations
        .available_seats(concert_id)
        .await
        .expect("available seats");
    available.keys().copied().take(n).collect()
}

pub async fn count(state: &AppState, sql: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(sql)
        .fetch_one(&state.db.pool)
        .await
        .expect("count query")
}
