// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Config;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::types::Type;
use rusqlite::{Connection, Row, Transaction, TransactionBehavior};
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Studioledger", "studioledger"));

pub fn default_db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("studioledger.sqlite"))
}

pub fn db_path(cfg: &Config) -> Result<PathBuf> {
    match &cfg.db_path {
        Some(p) => Ok(p.clone()),
        None => default_db_path(),
    }
}

pub fn open_or_init(cfg: &Config) -> Result<Connection> {
    let path = db_path(cfg)?;
    open(&path, cfg.busy_timeout)
}

/// Opens a file database in WAL mode. Every thread that touches the ledger
/// opens its own connection through this.
pub fn open(path: &Path, busy_timeout: Duration) -> Result<Connection> {
    let conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    conn.busy_timeout(busy_timeout)?;
    let mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |r| r.get(0))?;
    tracing::debug!(path = %path.display(), journal_mode = %mode, "database opened");
    init_schema(&conn)?;
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    // No foreign keys: partner references are checked by the store itself.
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS counters(
        name TEXT PRIMARY KEY,
        value INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS partners(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        share_percentage TEXT NOT NULL DEFAULT '0',
        capital_invested TEXT NOT NULL DEFAULT '0',
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        updated_at TEXT
    );

    CREATE TABLE IF NOT EXISTS sales(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        shoot_id INTEGER NOT NULL UNIQUE,
        date TEXT NOT NULL,
        shoot_type TEXT NOT NULL,
        duration_hours TEXT NOT NULL,
        amount TEXT NOT NULL,
        received_by TEXT NOT NULL,
        payment_mode TEXT NOT NULL,
        cameraman TEXT,
        cameraman_mobile TEXT,
        customer_name TEXT,
        city TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_sales_date ON sales(date);

    CREATE TABLE IF NOT EXISTS expenses(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        category TEXT NOT NULL,
        amount TEXT NOT NULL,
        paid_by TEXT NOT NULL,
        payment_mode TEXT NOT NULL,
        description TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);

    CREATE TABLE IF NOT EXISTS investments(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        partner_id INTEGER NOT NULL,
        amount TEXT NOT NULL,
        description TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_investments_partner ON investments(partner_id);

    -- month_year is the attribution month (YYYY-MM), independent of date
    CREATE TABLE IF NOT EXISTS partner_payments(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        partner_id INTEGER NOT NULL,
        amount TEXT NOT NULL,
        month_year TEXT NOT NULL,
        payment_mode TEXT NOT NULL,
        description TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_partner_payments_month ON partner_payments(month_year);
    "#,
    )?;
    Ok(())
}

/// Starts a write transaction that takes SQLite's writer lock up front.
pub fn begin_write(conn: &mut Connection) -> rusqlite::Result<Transaction<'_>> {
    conn.transaction_with_behavior(TransactionBehavior::Immediate)
}

/// Reads a TEXT decimal column without going through floating point.
pub fn decimal_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(idx)?;
    raw.parse::<Decimal>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
