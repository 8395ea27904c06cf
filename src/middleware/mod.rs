use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use std::sync::Arc;

use crate::error::Error;

// The authenticated caller, resolved from an opaque session bearer token.
// The core trusts this to already be verified.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub username: String,
    pub loyal: bool,
    pub token: String,
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    user_id: i64,
    username: String,
    loyal: bool,
}

// Session bearer-token extractor
impl FromRequestParts<Arc<crate::AppState>> for AuthUser {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<crate::AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(Error::NotAuthenticated)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(Error::NotAuthenticated)?;

        let row: Option<SessionRow> = sqlx::query_as(
            "SELECT users.id AS user_id, users.username, users.loyal
             FROM sessions
             JOIN users ON users.id = sessions.user_id
             WHERE sessions.token = ?",
        )
        .bind(token)
        .fetch_optional(&state.db.pool)
        .await?;

        let session = row.ok_or(Error::NotAuthenticated)?;

        Ok(AuthUser {
            user_id: session.user_id,
            username: session.username,
            loyal: session.loyal,
            token: token.to_string(),
        })
    }
}
