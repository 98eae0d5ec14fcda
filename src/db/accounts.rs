use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::db::ledger::{self, LedgerEntry};
use crate::error::ApiError;
use crate::pricing;
use crate::rates;

/// One user's account document.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub address: String,
    pub balance: f64,
    pub bitcoin_reserve: f64,
    pub bnb_reserve: f64,
    pub lockup_months: u32,
    pub active_apy: f64,
    pub updated_at: String,
}

impl Account {
    /// Zeroed snapshot used when the store cannot be read. Rendering must
    /// not fail with the persistence layer.
    pub fn zeroed(address: &str) -> Self {
        Self {
            address: address.to_string(),
            balance: 0.0,
            bitcoin_reserve: 0.0,
            bnb_reserve: 0.0,
            lockup_months: 0,
            active_apy: 0.0,
            updated_at: String::new(),
        }
    }
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

fn row_to_account(row: &rusqlite::Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        address: row.get(0)?,
        balance: row.get(1)?,
        bitcoin_reserve: row.get(2)?,
        bnb_reserve: row.get(3)?,
        lockup_months: row.get::<_, i64>(4)? as u32,
        active_apy: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

const SELECT_ACCOUNT: &str =
    "SELECT address, balance, bitcoin_reserve, bnb_reserve, lockup_months, active_apy, updated_at
     FROM accounts WHERE address = ?1";

pub fn get_account(conn: &Connection, address: &str) -> Result<Option<Account>, ApiError> {
    let account = conn
        .query_row(SELECT_ACCOUNT, params![address], row_to_account)
        .optional()?;
    Ok(account)
}

/// Fetch an account, materializing a default record when none exists yet.
/// New accounts start at the default lock-up with its APY precomputed.
pub fn ensure_account(conn: &Connection, address: &str) -> Result<Account, ApiError> {
    const DEFAULT_LOCKUP: u32 = 3;
    conn.execute(
        "INSERT OR IGNORE INTO accounts
             (address, balance, bitcoin_reserve, bnb_reserve, lockup_months, active_apy, updated_at)
         VALUES (?1, 0, 0, 0, ?2, ?3, ?4)",
        params![
            address,
            DEFAULT_LOCKUP,
            pricing::dynamic_apy(DEFAULT_LOCKUP, rates::MOCK_TVL),
            now_rfc3339()
        ],
    )?;
    get_account(conn, address)?.ok_or_else(|| ApiError::Db("account vanished after insert".into()))
}

/// Apply a deposit: 25% BNB-equivalent, 15% BTC-equivalent, 60% stable.
///
/// All three increments ride one UPDATE so concurrent deposits compose
/// without in-process locking. A ledger entry records the gross amount.
pub fn apply_deposit(conn: &Connection, address: &str, amount: f64) -> Result<Account, ApiError> {
    ensure_account(conn, address)?;
    let split = pricing::split_deposit(amount);
    conn.execute(
        "UPDATE accounts SET
             balance = balance + ?2,
             bnb_reserve = bnb_reserve + ?3,
             bitcoin_reserve = bitcoin_reserve + ?4,
             updated_at = ?5
         WHERE address = ?1",
        params![address, split.stable, split.bnb_units, split.btc_units, now_rfc3339()],
    )?;
    ledger::insert_entry(
        conn,
        address,
        &LedgerEntry {
            date: now_rfc3339(),
            amount,
            status: "confirmed".to_string(),
            protocol: "solera".to_string(),
            kind: "deposit".to_string(),
        },
    )?;
    get_account(conn, address)?.ok_or_else(|| ApiError::Db("account vanished after deposit".into()))
}

/// Replace the lock-up period and recompute the active APY at the mock TVL.
/// Callers validate `months` against the rate table first.
pub fn set_lockup(conn: &Connection, address: &str, months: u32) -> Result<Account, ApiError> {
    ensure_account(conn, address)?;
    let apy = pricing::dynamic_apy(months, rates::MOCK_TVL);
    conn.execute(
        "UPDATE accounts SET lockup_months = ?2, active_apy = ?3, updated_at = ?4
         WHERE address = ?1",
        params![address, months, apy, now_rfc3339()],
    )?;
    get_account(conn, address)?.ok_or_else(|| ApiError::Db("account vanished after update".into()))
}

/// Withdrawals are not settled on-chain yet: they are recorded as a pending
/// ledger entry and leave the balances untouched.
pub fn record_withdrawal(
    conn: &Connection,
    address: &str,
    amount: f64,
) -> Result<LedgerEntry, ApiError> {
    ensure_account(conn, address)?;
    let entry = LedgerEntry {
        date: now_rfc3339(),
        amount,
        status: "pending".to_string(),
        protocol: "solera".to_string(),
        kind: "withdrawal".to_string(),
    };
    ledger::insert_entry(conn, address, &entry)?;
    Ok(entry)
}
