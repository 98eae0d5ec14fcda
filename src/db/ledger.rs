use rusqlite::{params, Connection};
use serde::Serialize;

use crate::error::ApiError;

/// One transaction entry embedded in an account's history.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerEntry {
    pub date: String,
    pub amount: f64,
    pub status: String,
    pub protocol: String,
    pub kind: String,
}

pub fn insert_entry(conn: &Connection, address: &str, entry: &LedgerEntry) -> Result<(), ApiError> {
    conn.execute(
        "INSERT INTO ledger (address, date, amount, status, protocol, kind)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            address,
            entry.date,
            entry.amount,
            entry.status,
            entry.protocol,
            entry.kind
        ],
    )?;
    Ok(())
}

/// Newest-first transaction entries for an account.
pub fn recent_entries(
    conn: &Connection,
    address: &str,
    limit: u32,
) -> Result<Vec<LedgerEntry>, ApiError> {
    let mut stmt = conn.prepare(
        "SELECT date, amount, status, protocol, kind
         FROM ledger WHERE address = ?1
         ORDER BY id DESC LIMIT ?2",
    )?;
    let rows = stmt.query_map(params![address, limit], |row| {
        Ok(LedgerEntry {
            date: row.get(0)?,
            amount: row.get(1)?,
            status: row.get(2)?,
            protocol: row.get(3)?,
            kind: row.get(4)?,
        })
    })?;
    let mut entries = Vec::new();
    for row in rows {
        entries.push(row?);
    }
    Ok(entries)
}
