use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TokenBody {
    #[serde(default)]
    address: Option<String>,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/create-custom-token", post(api_create_custom_token))
}

/// Mint an opaque session token bound to an address. The nonce makes every
/// token unique even for the same address.
pub fn mint_token(secret: &str, address: &str) -> String {
    let nonce = Uuid::new_v4();
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(address.as_bytes());
    hasher.update(nonce.as_bytes());
    hex::encode(hasher.finalize())
}

/// POST /api/create-custom-token — `{address}` → `{token}`.
///
/// 400 when the address is missing or empty, 500 when the hub has no signing
/// secret configured.
async fn api_create_custom_token(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TokenBody>,
) -> Result<Json<Value>, ApiError> {
    let address = body
        .address
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .ok_or_else(|| ApiError::Validation("address is required".to_string()))?;

    let secret = state.config.token_secret.as_str();
    if secret.is_empty() {
        tracing::error!("create-custom-token called without SOLERA_TOKEN_SECRET configured");
        return Err(ApiError::Internal("token backend not configured".to_string()));
    }

    Ok(Json(json!({ "token": mint_token(secret, address) })))
}

#[cfg(test)]
mod tests {
    use super::mint_token;

    #[test]
    fn tokens_are_hex_sha256() {
        let token = mint_token("secret", "0xabc");
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn tokens_are_unique_per_mint() {
        assert_ne!(mint_token("secret", "0xabc"), mint_token("secret", "0xabc"));
    }
}
