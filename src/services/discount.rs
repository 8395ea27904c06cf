//! Loyalty discount formula and the claims of the token that gates it.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Claims of the short-lived HS256 token the reservation service issues for
/// the discount service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    pub user_id: i64,
    pub loyal: bool,
    pub exp: i64,
}

/// Discount from the row numbers of a user's reserved seats.
///
/// Sum of rows (divided by 3 for non-loyal users) plus a uniform random
/// addition in [5, 20], rounded, clipped to [5, 50].
pub fn compute_discount(seat_rows: &[i64], loyal: bool) -> i64 {
    let row_sum: i64 = seat_rows.iter().sum();
    let base = if loyal {
        row_sum as f64
    } else {
        row_sum as f64 / 3.0
    };
    let addition = rand::thread_rng().gen_range(5..=20) as f64;

    ((base + addition).round() as i64).clamp(5, 50)
}
