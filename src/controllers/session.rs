//! Session lifecycle and discount-token issuance.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::middleware::AuthUser;
use crate::models::User;
use crate::services::discount::TokenClaims;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/session", post(login).delete(logout))
        .route("/auth-token", get(auth_token))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

// POST /api/session
async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Response> {
    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(Error::Validation(
            "username and password must be non-empty".to_string(),
        ));
    }

    let user = User::find_by_username(&req.username, &state.db).await?;
    let user = match user {
        Some(u) if u.verify_password(&req.password) => u,
        _ => {
            return Ok((
                StatusCode::UNAUTHORIZED,
                Json(json!({ "errors": ["Incorrect username or password"] })),
            )
                .into_response())
        }
    };

    let token = Uuid::new_v4().to_string();
    sqlx::query("INSERT INTO sessions (token, user_id) VALUES (?, ?)")
        .bind(&token)
        .bind(user.id)
        .execute(&state.db.pool)
        .await?;

    tracing::info!(user_id = user.id, "user logged in");
    Ok(Json(json!({ "username": user.username, "token": token })).into_response())
}

// DELETE /api/session
async fn logout(State(state): State<Arc<AppState>>, user: AuthUser) -> Result<StatusCode> {
    sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(&user.token)
        .execute(&state.db.pool)
        .await?;
    Ok(StatusCode::OK)
}

// GET /api/auth-token: short-lived signed token for the discount service
async fn auth_token(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<serde_json::Value>> {
    let claims = TokenClaims {
        user_id: user.user_id,
        loyal: user.loyal,
        exp: Utc::now().timestamp() + state.config.auth.token_ttl_secs,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.config.auth.jwt_secret.as_bytes()),
    )?;

    Ok(Json(json!({ "token": token })))
}
