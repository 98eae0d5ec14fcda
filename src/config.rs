use std::env;
use std::path::PathBuf;

/// Hub configuration derived from environment variables.
///
/// All variables use the `SOLERA_` prefix and have inline defaults so the
/// hub starts with no environment at all (auth and token minting disabled).
#[derive(Debug, Clone)]
pub struct SoleraConfig {
    pub bind: String,
    pub port: u16,
    /// Bearer token for API auth. Empty ⇒ auth disabled.
    pub token: String,

    /// SQLite file backing the account store.
    pub db_path: PathBuf,

    /// Unix socket of the AI oracle bridge.
    pub oracle_sock: PathBuf,

    /// Secret for minting custom tokens. Empty ⇒ the endpoint returns 500.
    pub token_secret: String,

    /// Upper bound on projection horizons, in months.
    pub projection_max_months: u32,
}

fn env_str(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_u16(name: &str, default: u16) -> u16 {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_path(name: &str, default: &str) -> PathBuf {
    PathBuf::from(env_str(name, default))
}

fn default_sock_path() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_RUNTIME_DIR") {
        let xdg = xdg.trim();
        if !xdg.is_empty() {
            return PathBuf::from(xdg).join("solera-oracle.sock");
        }
    }
    PathBuf::from("/tmp/solera-oracle.sock")
}

impl SoleraConfig {
    pub fn from_env() -> Self {
        let oracle_sock = env::var("SOLERA_ORACLE_SOCK")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_sock_path);

        Self {
            bind: env_str("SOLERA_BIND", "127.0.0.1"),
            port: env_u16("SOLERA_PORT", 8090),
            token: env_str("SOLERA_TOKEN", ""),
            db_path: env_path("SOLERA_DB", "solera.db"),
            oracle_sock,
            token_secret: env_str("SOLERA_TOKEN_SECRET", ""),
            projection_max_months: env_u32("SOLERA_PROJECTION_MAX_MONTHS", 600),
        }
    }
}
