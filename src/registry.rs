// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Partner registry: names, share percentages and invested capital.
//!
//! Partner names match exactly. "Om", "om" and "Om " are three partners; the
//! registry never merges near-duplicates.

use crate::db::{begin_write, decimal_at};
use crate::error::{LedgerError, LedgerResult};
use crate::models::Partner;
use crate::validator;
use rusqlite::{Connection, OptionalExtension, Row, Transaction, params};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

const PARTNER_COLUMNS: &str = "id, name, share_percentage, capital_invested";

fn partner_from_row(r: &Row<'_>) -> rusqlite::Result<Partner> {
    Ok(Partner {
        id: r.get(0)?,
        name: r.get(1)?,
        share_percentage: decimal_at(r, 2)?,
        capital_invested: decimal_at(r, 3)?,
    })
}

pub fn list_partners(conn: &Connection) -> LedgerResult<Vec<Partner>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {} FROM partners ORDER BY id",
        PARTNER_COLUMNS
    ))?;
    let rows = stmt.query_map([], partner_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn find_partner(conn: &Connection, name: &str) -> LedgerResult<Option<Partner>> {
    let p = conn
        .query_row(
            &format!("SELECT {} FROM partners WHERE name=?1", PARTNER_COLUMNS),
            params![name],
            partner_from_row,
        )
        .optional()?;
    Ok(p)
}

pub fn get_partner(conn: &Connection, id: i64) -> LedgerResult<Option<Partner>> {
    let p = conn
        .query_row(
            &format!("SELECT {} FROM partners WHERE id=?1", PARTNER_COLUMNS),
            params![id],
            partner_from_row,
        )
        .optional()?;
    Ok(p)
}

/// Fails with a validation error on `field` when `id` is not a known partner.
pub fn require_partner(conn: &Connection, id: i64, field: &'static str) -> LedgerResult<Partner> {
    get_partner(conn, id)?
        .ok_or_else(|| LedgerError::validation(field, format!("unknown partner {}", id)))
}

/// Returns the partner called exactly `name`, creating it with 0% share and
/// no capital if there is none.
pub fn get_or_create(conn: &Connection, name: &str) -> LedgerResult<Partner> {
    if name.trim().is_empty() {
        return Err(LedgerError::validation("partner", "is required"));
    }
    let inserted = conn.execute(
        "INSERT INTO partners(name, share_percentage, capital_invested) VALUES (?1, '0', '0')
         ON CONFLICT(name) DO NOTHING",
        params![name],
    )?;
    if inserted > 0 {
        tracing::info!(partner = name, "partner created with 0% share");
    }
    find_partner(conn, name)?
        .ok_or_else(|| LedgerError::validation("partner", format!("'{}' could not be stored", name)))
}

/// Adds invested capital to a partner. Capital only ever grows through this
/// call; it runs inside the caller's write transaction.
pub fn add_capital(tx: &Transaction<'_>, partner_id: i64, amount: Decimal) -> LedgerResult<Decimal> {
    if amount < Decimal::ZERO {
        return Err(LedgerError::validation(
            "amount",
            format!("capital cannot decrease (got {})", amount),
        ));
    }
    let partner = require_partner(tx, partner_id, "partner_id")?;
    let capital = partner
        .capital_invested
        .checked_add(amount)
        .ok_or_else(|| LedgerError::overflow("amount"))?;
    tx.execute(
        "UPDATE partners SET capital_invested=?1, updated_at=datetime('now') WHERE id=?2",
        params![capital.to_string(), partner_id],
    )?;
    Ok(capital)
}

/// Resets a partner's capital to the sum of its investments, after an
/// investment was corrected.
pub fn recompute_capital(tx: &Transaction<'_>, partner_id: i64) -> LedgerResult<Decimal> {
    let mut stmt = tx.prepare_cached("SELECT amount FROM investments WHERE partner_id=?1")?;
    let rows = stmt.query_map(params![partner_id], |r| decimal_at(r, 0))?;
    let mut capital = Decimal::ZERO;
    for row in rows {
        capital = capital
            .checked_add(row?)
            .ok_or_else(|| LedgerError::overflow("capital_invested"))?;
    }
    tx.execute(
        "UPDATE partners SET capital_invested=?1, updated_at=datetime('now') WHERE id=?2",
        params![capital.to_string(), partner_id],
    )?;
    Ok(capital)
}

pub fn list_shares(conn: &Connection) -> LedgerResult<BTreeMap<i64, Decimal>> {
    Ok(list_partners(conn)?
        .into_iter()
        .map(|p| (p.id, p.share_percentage))
        .collect())
}

pub fn share_total(conn: &Connection) -> LedgerResult<Decimal> {
    Ok(list_shares(conn)?.values().copied().sum())
}

/// Replaces every partner's share in one write transaction.
///
/// The known-partner set is read inside the transaction, so a partner created
/// by a concurrent investment is either counted (at 0% when not listed) or is
/// created after this commit. On any violation nothing is written.
pub fn set_shares(
    conn: &mut Connection,
    proposed: &BTreeMap<i64, Decimal>,
) -> LedgerResult<Vec<Partner>> {
    let tx = begin_write(conn)?;
    let known: Vec<i64> = list_partners(&tx)?.into_iter().map(|p| p.id).collect();
    let full = match validator::validate(proposed, &known) {
        Ok(full) => full,
        Err(e) => {
            tracing::warn!(error = %e, "share update rejected");
            return Err(e);
        }
    };
    {
        let mut stmt = tx.prepare_cached(
            "UPDATE partners SET share_percentage=?1, updated_at=datetime('now') WHERE id=?2",
        )?;
        for (id, pct) in &full {
            stmt.execute(params![pct.normalize().to_string(), id])?;
        }
    }
    let partners = list_partners(&tx)?;
    tx.commit()?;
    tracing::info!(partners = partners.len(), "partner shares updated");
    Ok(partners)
}
