use axum::extract::Query;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::error::ApiError;
use crate::state::AppState;
use crate::testdata;

const MAX_GROUPS: usize = 20;

#[derive(Debug, Deserialize)]
pub struct GroupsQuery {
    #[serde(default = "default_seed")]
    seed: u64,
    #[serde(default = "default_count")]
    count: usize,
}

fn default_seed() -> u64 {
    7
}

fn default_count() -> usize {
    4
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/rosca/groups", get(api_groups))
}

/// GET /api/rosca/groups — deterministic mock groups for the ROSCA page.
async fn api_groups(Query(q): Query<GroupsQuery>) -> Result<Json<Value>, ApiError> {
    if q.count == 0 || q.count > MAX_GROUPS {
        return Err(ApiError::Validation(format!(
            "count must be between 1 and {MAX_GROUPS}"
        )));
    }
    let groups = testdata::rosca_groups(q.seed, q.count);
    Ok(Json(json!({ "seed": q.seed, "groups": groups })))
}
