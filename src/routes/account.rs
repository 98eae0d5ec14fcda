use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::db::{accounts, ledger};
use crate::error::ApiError;
use crate::pricing;
use crate::rates;
use crate::state::AppState;
use crate::testdata;

// ── Request shapes ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AccountQuery {
    address: String,
}

#[derive(Debug, Deserialize)]
pub struct AmountBody {
    address: String,
    amount: f64,
}

#[derive(Debug, Deserialize)]
pub struct LockupBody {
    address: String,
    months: u32,
}

#[derive(Debug, Deserialize)]
pub struct ProjectionQuery {
    initial: f64,
    #[serde(default = "default_projection_months")]
    months: u32,
    #[serde(default = "default_projection_lockup")]
    lockup: u32,
}

fn default_projection_months() -> u32 {
    12
}

fn default_projection_lockup() -> u32 {
    12
}

const MAX_DEMO_ENTRIES: usize = 50;

#[derive(Debug, Deserialize)]
pub struct DemoHistoryQuery {
    #[serde(default = "default_demo_seed")]
    seed: u64,
    #[serde(default = "default_demo_count")]
    count: usize,
}

fn default_demo_seed() -> u64 {
    7
}

fn default_demo_count() -> usize {
    8
}

// ── Route definitions ────────────────────────────────────────────────────

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/account", get(api_account))
        .route("/api/deposit", post(api_deposit))
        .route("/api/withdraw", post(api_withdraw))
        .route("/api/lockup", post(api_lockup))
        .route("/api/projection", get(api_projection))
        .route("/api/history/demo", get(api_demo_history))
}

// ── Validation helpers ───────────────────────────────────────────────────

fn require_address(address: &str) -> Result<&str, ApiError> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Validation("address is required".into()));
    }
    Ok(trimmed)
}

fn require_positive_amount(amount: f64) -> Result<f64, ApiError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ApiError::Validation("amount must be a positive number".into()));
    }
    Ok(amount)
}

// ── Handlers ─────────────────────────────────────────────────────────────

/// GET /api/account — account snapshot plus recent transaction entries.
///
/// A persistence failure must not break the dashboard: the handler logs it
/// and falls back to zeroed values with a `degraded` marker.
async fn api_account(
    State(state): State<Arc<AppState>>,
    Query(q): Query<AccountQuery>,
) -> Result<Json<Value>, ApiError> {
    let address = require_address(&q.address)?;

    let snapshot = state
        .pool
        .get()
        .map_err(ApiError::from)
        .and_then(|conn| {
            let account = accounts::ensure_account(&conn, address)?;
            let entries = ledger::recent_entries(&conn, address, 25)?;
            Ok((account, entries))
        });

    match snapshot {
        Ok((account, entries)) => Ok(Json(json!({
            "account": account,
            "entries": entries,
            "degraded": false,
        }))),
        Err(e) => {
            tracing::warn!("account read failed for {address}, serving zeroed snapshot: {e}");
            Ok(Json(json!({
                "account": accounts::Account::zeroed(address),
                "entries": Vec::<ledger::LedgerEntry>::new(),
                "degraded": true,
            })))
        }
    }
}

/// POST /api/deposit — split a deposit across the three buckets.
async fn api_deposit(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AmountBody>,
) -> Result<Json<Value>, ApiError> {
    let address = require_address(&body.address)?;
    let amount = require_positive_amount(body.amount)?;

    let conn = state.pool.get()?;
    let account = accounts::apply_deposit(&conn, address, amount).map_err(|e| {
        tracing::error!("deposit failed for {address}: {e}");
        e
    })?;
    Ok(Json(json!({ "account": account })))
}

/// POST /api/withdraw — record a pending withdrawal entry.
async fn api_withdraw(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AmountBody>,
) -> Result<Json<Value>, ApiError> {
    let address = require_address(&body.address)?;
    let amount = require_positive_amount(body.amount)?;

    let conn = state.pool.get()?;
    let entry = accounts::record_withdrawal(&conn, address, amount).map_err(|e| {
        tracing::error!("withdrawal failed for {address}: {e}");
        e
    })?;
    Ok(Json(json!({ "entry": entry })))
}

/// POST /api/lockup — replace the lock-up period, recompute the APY.
async fn api_lockup(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LockupBody>,
) -> Result<Json<Value>, ApiError> {
    let address = require_address(&body.address)?;
    if !rates::known_lockup(body.months) {
        let supported: Vec<String> = rates::LOCKUP_BASE_RATES
            .iter()
            .map(|(m, _)| m.to_string())
            .collect();
        return Err(ApiError::Validation(format!(
            "unsupported lock-up period; supported months: {}",
            supported.join(", ")
        )));
    }

    let conn = state.pool.get()?;
    let account = accounts::set_lockup(&conn, address, body.months).map_err(|e| {
        tracing::error!("lockup update failed for {address}: {e}");
        e
    })?;
    Ok(Json(json!({ "account": account })))
}

/// GET /api/projection — compounding series at the current dynamic APY.
async fn api_projection(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ProjectionQuery>,
) -> Result<Json<Value>, ApiError> {
    if !q.initial.is_finite() || q.initial < 0.0 {
        return Err(ApiError::Validation("initial must be a non-negative number".into()));
    }
    let max_months = state.config.projection_max_months;
    if q.months == 0 || q.months > max_months {
        return Err(ApiError::Validation(format!(
            "months must be between 1 and {max_months}"
        )));
    }

    let apy = pricing::dynamic_apy(q.lockup, rates::MOCK_TVL);
    let points = pricing::generate_projection(q.initial, apy / 12.0, q.months);
    Ok(Json(json!({
        "apy": apy,
        "lockup": q.lockup,
        "points": points,
    })))
}

/// GET /api/history/demo — seeded sample transaction history for demo
/// accounts. Never touches the store.
async fn api_demo_history(Query(q): Query<DemoHistoryQuery>) -> Result<Json<Value>, ApiError> {
    if q.count == 0 || q.count > MAX_DEMO_ENTRIES {
        return Err(ApiError::Validation(format!(
            "count must be between 1 and {MAX_DEMO_ENTRIES}"
        )));
    }
    let entries = testdata::sample_entries(q.seed, q.count);
    Ok(Json(json!({ "seed": q.seed, "entries": entries })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::{broken_pool, memory_pool};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn account_read_failure_degrades_to_zeroed_snapshot() {
        let state = AppState::for_tests("", broken_pool());
        let app = routes().with_state(state);

        let (status, body) = get_json(app, "/api/account?address=0xabc").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["degraded"].as_bool(), Some(true));
        assert_eq!(body["account"]["address"].as_str(), Some("0xabc"));
        assert_eq!(body["account"]["balance"].as_f64(), Some(0.0));
        assert_eq!(body["account"]["active_apy"].as_f64(), Some(0.0));
        assert!(body["entries"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn account_snapshot_reads_store_when_healthy() {
        let pool = memory_pool();
        {
            let conn = pool.get().unwrap();
            accounts::apply_deposit(&conn, "0xabc", 1_000.0).unwrap();
        }
        let state = AppState::for_tests("", pool);
        let app = routes().with_state(state);

        let (status, body) = get_json(app, "/api/account?address=0xabc").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["degraded"].as_bool(), Some(false));
        assert!((body["account"]["balance"].as_f64().unwrap() - 600.0).abs() < 1e-9);
        assert_eq!(body["entries"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn demo_history_is_seeded_and_bounded() {
        let state = AppState::for_tests("", memory_pool());
        let app = routes().with_state(state);

        let (status, first) = get_json(app.clone(), "/api/history/demo?seed=42&count=6").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["entries"].as_array().unwrap().len(), 6);

        let (_, second) = get_json(app.clone(), "/api/history/demo?seed=42&count=6").await;
        let amounts = |v: &Value| -> Vec<f64> {
            v["entries"]
                .as_array()
                .unwrap()
                .iter()
                .map(|e| e["amount"].as_f64().unwrap())
                .collect()
        };
        assert_eq!(amounts(&first), amounts(&second));

        let (status, _) = get_json(app, "/api/history/demo?count=500").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
