use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;
use tokio::sync::Mutex;

use crate::prompts;

/// Async Unix-socket JSON-RPC client for the generative-AI oracle bridge.
///
/// Protocol: newline-delimited JSON, one request → one response. The bridge
/// owns API keys, model choice and rate limits; the hub only ships prompts
/// and validates what comes back.
pub struct OracleClient {
    sock_path: PathBuf,
    /// Single reusable connection. `None` until the first call and after any
    /// wire fault; the next call reconnects.
    conn: Mutex<Option<BridgeConn>>,
    next_id: AtomicU64,
}

struct BridgeConn {
    reader: BufReader<tokio::io::ReadHalf<UnixStream>>,
    writer: tokio::io::WriteHalf<UnixStream>,
}

impl BridgeConn {
    async fn open(path: &std::path::Path) -> Result<Self, String> {
        let stream = UnixStream::connect(path)
            .await
            .map_err(|e| format!("oracle bridge unreachable: {e}"))?;
        let (reader, writer) = tokio::io::split(stream);
        Ok(Self {
            reader: BufReader::new(reader),
            writer,
        })
    }

    /// One round trip: ship a request line, wait for the reply line.
    async fn round_trip(&mut self, line: &str) -> Result<String, String> {
        self.writer
            .write_all(line.as_bytes())
            .await
            .map_err(|e| format!("oracle write failed: {e}"))?;
        self.writer
            .flush()
            .await
            .map_err(|e| format!("oracle flush failed: {e}"))?;

        let mut reply = String::new();
        let n = self
            .reader
            .read_line(&mut reply)
            .await
            .map_err(|e| format!("oracle read failed: {e}"))?;
        if n == 0 {
            return Err("oracle bridge hung up".to_string());
        }
        Ok(reply)
    }
}

#[derive(Debug, Serialize)]
struct RpcRequest {
    id: u64,
    method: String,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    id: u64,
    ok: bool,
    result: Option<Value>,
    error: Option<String>,
}

/// Structured input for the financial-planner feature. Validated at the
/// HTTP boundary before any prompt is rendered.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanInput {
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    #[serde(default)]
    pub current_savings: f64,
    pub risk_tolerance: String,
    pub horizon_years: u32,
}

const RISK_TOLERANCES: &[&str] = &["conservative", "moderate", "aggressive"];

impl PlanInput {
    /// Boundary validation: field-level messages, no side effects.
    pub fn validate(&self) -> Result<(), String> {
        if !self.monthly_income.is_finite() || self.monthly_income <= 0.0 {
            return Err("monthly_income must be a positive number".to_string());
        }
        if !self.monthly_expenses.is_finite() || self.monthly_expenses < 0.0 {
            return Err("monthly_expenses must be a non-negative number".to_string());
        }
        if !self.current_savings.is_finite() || self.current_savings < 0.0 {
            return Err("current_savings must be a non-negative number".to_string());
        }
        if !RISK_TOLERANCES.contains(&self.risk_tolerance.as_str()) {
            return Err(format!(
                "risk_tolerance must be one of {}",
                RISK_TOLERANCES.join(", ")
            ));
        }
        if self.horizon_years == 0 || self.horizon_years > 60 {
            return Err("horizon_years must be between 1 and 60".to_string());
        }
        Ok(())
    }
}

/// One allocation bucket of a generated plan.
#[derive(Debug, Clone, Serialize)]
pub struct Allocation {
    pub name: String,
    pub pct: f64,
}

/// Schema-validated output of the financial-planner feature.
#[derive(Debug, Clone, Serialize)]
pub struct FinancialPlan {
    pub summary: String,
    pub monthly_savings_target: f64,
    pub allocations: Vec<Allocation>,
    pub steps: Vec<String>,
}

impl FinancialPlan {
    /// Parse and validate the bridge's JSON output. The bridge is a language
    /// model, so every field is checked before anything reaches the UI.
    pub fn from_value(value: &Value) -> Result<Self, String> {
        let summary = value
            .get("summary")
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
            .ok_or("plan is missing a summary")?
            .to_string();

        let target = value
            .get("monthly_savings_target")
            .and_then(|v| v.as_f64())
            .filter(|t| t.is_finite() && *t >= 0.0)
            .ok_or("plan is missing monthly_savings_target")?;

        let raw_allocs = value
            .get("allocations")
            .and_then(|v| v.as_array())
            .ok_or("plan is missing allocations")?;
        let mut allocations = Vec::with_capacity(raw_allocs.len());
        let mut pct_sum = 0.0;
        for raw in raw_allocs {
            let name = raw
                .get("name")
                .and_then(|v| v.as_str())
                .filter(|s| !s.trim().is_empty())
                .ok_or("allocation missing name")?
                .to_string();
            let pct = raw
                .get("pct")
                .and_then(|v| v.as_f64())
                .filter(|p| p.is_finite() && *p >= 0.0)
                .ok_or("allocation pct must be a non-negative number")?;
            pct_sum += pct;
            allocations.push(Allocation { name, pct });
        }
        if allocations.is_empty() {
            return Err("plan has no allocations".to_string());
        }
        if (pct_sum - 100.0).abs() > 1.0 {
            return Err(format!("allocation percentages sum to {pct_sum}, expected 100"));
        }

        let steps: Vec<String> = value
            .get("steps")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|s| s.as_str())
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default();
        if steps.is_empty() {
            return Err("plan has no steps".to_string());
        }

        Ok(Self {
            summary,
            monthly_savings_target: target,
            allocations,
            steps,
        })
    }
}

impl OracleClient {
    pub fn new(sock_path: PathBuf) -> Self {
        Self {
            sock_path,
            conn: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    async fn rpc(&self, method: &str, params: Value) -> Result<Value, String> {
        let rid = self.next_id.fetch_add(1, Ordering::Relaxed);
        let req = RpcRequest {
            id: rid,
            method: method.to_string(),
            params,
        };
        let mut line = serde_json::to_string(&req).map_err(|e| e.to_string())?;
        line.push('\n');

        // The lock serializes calls; the protocol has no multiplexing.
        let mut slot = self.conn.lock().await;
        let mut conn = match slot.take() {
            Some(conn) => conn,
            None => BridgeConn::open(&self.sock_path).await?,
        };

        // A failed round trip leaves the slot empty so the next call
        // reconnects instead of reading a desynced stream.
        let reply = conn.round_trip(&line).await?;

        let resp: RpcResponse = serde_json::from_str(&reply)
            .map_err(|e| format!("oracle sent malformed JSON-RPC: {e}"))?;
        if resp.id != rid {
            return Err("oracle reply id does not match request".to_string());
        }

        // Only a healthy, in-sync connection goes back for reuse.
        *slot = Some(conn);

        if !resp.ok {
            return Err(resp.error.unwrap_or_else(|| "oracle error".to_string()));
        }
        Ok(resp.result.unwrap_or(Value::Null))
    }

    /// Bridge liveness probe.
    pub async fn health(&self) -> Result<Value, String> {
        self.rpc("health", serde_json::json!({})).await
    }

    /// "AI Oracle" feature: explain a financial concept in plain language.
    pub async fn explain_concept(&self, concept: &str) -> Result<String, String> {
        let prompt = prompts::render_explain(concept);
        let result = self
            .rpc("generate", serde_json::json!({ "prompt": prompt }))
            .await?;
        result
            .get("text")
            .and_then(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| "oracle returned no text".to_string())
    }

    /// "Financial Planner" feature: structured input → schema-validated plan.
    /// `input` must already be validated by the caller.
    pub async fn plan_financials(&self, input: &PlanInput) -> Result<FinancialPlan, String> {
        let prompt = prompts::render_plan(input);
        let result = self
            .rpc(
                "generate",
                serde_json::json!({ "prompt": prompt, "format": "json" }),
            )
            .await?;

        // The bridge returns either the object directly or a JSON string in "text".
        let value = match result.get("text").and_then(|v| v.as_str()) {
            Some(text) => serde_json::from_str::<Value>(text)
                .map_err(|e| format!("oracle returned invalid JSON: {e}"))?,
            None => result,
        };
        FinancialPlan::from_value(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_input() -> PlanInput {
        PlanInput {
            monthly_income: 5000.0,
            monthly_expenses: 3200.0,
            current_savings: 15000.0,
            risk_tolerance: "moderate".to_string(),
            horizon_years: 20,
        }
    }

    #[test]
    fn plan_input_validation() {
        assert!(valid_input().validate().is_ok());

        let mut bad = valid_input();
        bad.monthly_income = 0.0;
        assert!(bad.validate().is_err());

        let mut bad = valid_input();
        bad.risk_tolerance = "yolo".to_string();
        assert!(bad.validate().unwrap_err().contains("risk_tolerance"));

        let mut bad = valid_input();
        bad.horizon_years = 0;
        assert!(bad.validate().is_err());

        let mut bad = valid_input();
        bad.monthly_expenses = f64::NAN;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn financial_plan_accepts_well_formed_output() {
        let value = json!({
            "summary": "Save steadily.",
            "monthly_savings_target": 900.0,
            "allocations": [
                {"name": "stable", "pct": 60.0},
                {"name": "bonds", "pct": 25.0},
                {"name": "equity", "pct": 15.0}
            ],
            "steps": ["Open an account", "Automate transfers", "Review yearly"]
        });
        let plan = FinancialPlan::from_value(&value).unwrap();
        assert_eq!(plan.allocations.len(), 3);
        assert_eq!(plan.monthly_savings_target, 900.0);
        assert_eq!(plan.steps.len(), 3);
    }

    #[test]
    fn financial_plan_rejects_bad_allocation_sum() {
        let value = json!({
            "summary": "ok",
            "monthly_savings_target": 100.0,
            "allocations": [{"name": "stable", "pct": 80.0}],
            "steps": ["do it"]
        });
        let err = FinancialPlan::from_value(&value).unwrap_err();
        assert!(err.contains("sum"), "unexpected error: {err}");
    }

    #[test]
    fn financial_plan_rejects_missing_fields() {
        assert!(FinancialPlan::from_value(&json!({})).is_err());
        let no_steps = json!({
            "summary": "ok",
            "monthly_savings_target": 100.0,
            "allocations": [{"name": "stable", "pct": 100.0}],
            "steps": []
        });
        assert!(FinancialPlan::from_value(&no_steps).is_err());
    }
}
