use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::error::ApiError;
use crate::oracle::{FinancialPlan, PlanInput};
use crate::state::AppState;

/// Longest concept text the explainer accepts; anything larger is a paste
/// accident, not a question.
const MAX_CONCEPT_LEN: usize = 500;

#[derive(Debug, Deserialize)]
pub struct ExplainBody {
    concept: String,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/advisor/explain", post(api_explain))
        .route("/api/advisor/plan", post(api_plan))
}

/// POST /api/advisor/explain — plain-language explanation of a concept.
async fn api_explain(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ExplainBody>,
) -> Result<Json<Value>, ApiError> {
    let concept = body.concept.trim();
    if concept.is_empty() {
        return Err(ApiError::Validation("concept is required".into()));
    }
    if concept.len() > MAX_CONCEPT_LEN {
        return Err(ApiError::Validation(format!(
            "concept must be at most {MAX_CONCEPT_LEN} characters"
        )));
    }

    let explanation = state.oracle.explain_concept(concept).await.map_err(|e| {
        tracing::error!("oracle explain failed: {e}");
        ApiError::Oracle(e)
    })?;
    Ok(Json(json!({ "explanation": explanation })))
}

/// POST /api/advisor/plan — structured profile in, schema-validated plan out.
async fn api_plan(
    State(state): State<Arc<AppState>>,
    Json(input): Json<PlanInput>,
) -> Result<Json<FinancialPlan>, ApiError> {
    input.validate().map_err(ApiError::Validation)?;

    let plan = state.oracle.plan_financials(&input).await.map_err(|e| {
        tracing::error!("oracle plan failed: {e}");
        ApiError::Oracle(e)
    })?;
    Ok(Json(plan))
}
