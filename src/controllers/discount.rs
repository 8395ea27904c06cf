//! Discount micro-service surface. Stateless: no coupling to the reservation
//! core beyond the seat summaries the client forwards and the shared token
//! secret.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
    routing::post,
    Json, Router,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::services::discount::{compute_discount, TokenClaims};

#[derive(Clone)]
pub struct DiscountState {
    pub jwt_secret: Arc<String>,
}

pub fn routes(state: DiscountState) -> Router {
    Router::new()
        .route("/api/discount", post(discount))
        .with_state(state)
}

// Verified bearer-token extractor: rejects missing, malformed, or expired
// tokens before the handler runs.
pub struct Bearer(pub TokenClaims);

impl FromRequestParts<DiscountState> for Bearer {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &DiscountState,
    ) -> Result<Self> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(Error::NotAuthenticated)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(Error::NotAuthenticated)?;

        let data = decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| Error::NotAuthenticated)?;

        Ok(Bearer(data.claims))
    }
}

#[derive(Debug, Deserialize)]
struct SeatSummary {
    row: i64,
}

#[derive(Debug, Deserialize)]
struct DiscountRequest {
    #[serde(rename = "seatsRes")]
    seats_res: Vec<SeatSummary>,
}

// POST /api/discount
async fn discount(
    Bearer(claims): Bearer,
    Json(req): Json<DiscountRequest>,
) -> Json<serde_json::Value> {
    let rows: Vec<i64> = req.seats_res.iter().map(|s| s.row).collect();
    let discount = compute_discount(&rows, claims.loyal);

    Json(json!({ "discount": discount }))
}
