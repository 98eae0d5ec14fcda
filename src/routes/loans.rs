use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::ApiError;
use crate::pricing::{self, LoanQuote};
use crate::rates;
use crate::state::AppState;

const MAX_TERM_MONTHS: u32 = 480;

#[derive(Debug, Deserialize)]
pub struct LoanQuoteBody {
    principal: f64,
    term_months: u32,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/loan-quote", post(api_loan_quote))
}

/// POST /api/loan-quote — amortized quote at the current dynamic rate.
///
/// The amortization formula assumes a positive principal and term, so both
/// are guarded here before it runs.
async fn api_loan_quote(
    State(_state): State<Arc<AppState>>,
    Json(body): Json<LoanQuoteBody>,
) -> Result<Json<LoanQuote>, ApiError> {
    if !body.principal.is_finite() || body.principal <= 0.0 {
        return Err(ApiError::Validation("principal must be a positive number".into()));
    }
    if body.term_months == 0 || body.term_months > MAX_TERM_MONTHS {
        return Err(ApiError::Validation(format!(
            "term_months must be between 1 and {MAX_TERM_MONTHS}"
        )));
    }

    let rate = pricing::dynamic_interest_rate(rates::MOCK_TVL);
    Ok(Json(LoanQuote::compute(body.principal, rate, body.term_months)))
}
