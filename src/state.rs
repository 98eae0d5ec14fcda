use std::sync::Arc;

use crate::config::SoleraConfig;
use crate::db::pool::{open_pool, DbPool};
use crate::error::ApiError;
use crate::oracle::OracleClient;

/// Shared application state, passed to all route handlers via `axum::extract::State`.
pub struct AppState {
    pub config: SoleraConfig,
    pub oracle: OracleClient,
    pub pool: DbPool,
}

impl AppState {
    pub fn new(config: SoleraConfig) -> Result<Arc<Self>, ApiError> {
        let oracle = OracleClient::new(config.oracle_sock.clone());
        let pool = open_pool(&config.db_path, 4)?;
        Ok(Arc::new(Self {
            config,
            oracle,
            pool,
        }))
    }
}

#[cfg(test)]
impl AppState {
    /// State for handler tests. The caller supplies the pool; the oracle
    /// points at a socket nothing listens on.
    pub fn for_tests(token: &str, pool: DbPool) -> Arc<Self> {
        let oracle_sock = std::path::PathBuf::from("/tmp/solera-test-oracle.sock");
        let config = SoleraConfig {
            bind: "127.0.0.1".to_string(),
            port: 0,
            token: token.to_string(),
            db_path: std::path::PathBuf::from(":memory:"),
            oracle_sock: oracle_sock.clone(),
            token_secret: "test-secret".to_string(),
            projection_max_months: 600,
        };
        Arc::new(Self {
            config,
            oracle: OracleClient::new(oracle_sock),
            pool,
        })
    }
}
