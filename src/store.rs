// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Ledger store for sales, expenses, investments and partner payments.
//!
//! Records are created and replaced, never deleted. Every write runs in an
//! `IMMEDIATE` transaction, so concurrent writers on separate connections are
//! serialized by SQLite.

use crate::db::{begin_write, decimal_at};
use crate::error::{LedgerError, LedgerResult, RecordKind};
use crate::models::{
    Entry, Expense, ExpenseEntry, Investment, InvestmentEntry, PartnerPayment, PaymentEntry,
    Record, Sale, SaleEntry,
};
use crate::period::{DateRange, Month};
use crate::registry;
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, Transaction, params, params_from_iter};

const SHOOT_COUNTER: &str = "shoot_id";

const SALE_SELECT: &str = "SELECT id, shoot_id, date, shoot_type, duration_hours, amount, received_by, payment_mode, cameraman, cameraman_mobile, customer_name, city FROM sales";
const EXPENSE_SELECT: &str =
    "SELECT id, date, category, amount, paid_by, payment_mode, description FROM expenses";
const INVESTMENT_SELECT: &str = "SELECT i.id, i.partner_id, p.name, i.date, i.amount, i.description FROM investments i LEFT JOIN partners p ON p.id=i.partner_id";
const PAYMENT_SELECT: &str = "SELECT id, date, partner_id, amount, month_year, payment_mode, description FROM partner_payments";

fn sale_from_row(r: &Row<'_>) -> rusqlite::Result<Sale> {
    Ok(Sale {
        id: r.get(0)?,
        shoot_id: r.get(1)?,
        entry: SaleEntry {
            date: r.get(2)?,
            shoot_type: r.get(3)?,
            duration_hours: decimal_at(r, 4)?,
            amount: decimal_at(r, 5)?,
            received_by: r.get(6)?,
            payment_mode: r.get(7)?,
            cameraman: r.get(8)?,
            cameraman_mobile: r.get(9)?,
            customer_name: r.get(10)?,
            city: r.get(11)?,
        },
    })
}

fn expense_from_row(r: &Row<'_>) -> rusqlite::Result<Expense> {
    Ok(Expense {
        id: r.get(0)?,
        entry: ExpenseEntry {
            date: r.get(1)?,
            category: r.get(2)?,
            amount: decimal_at(r, 3)?,
            paid_by: r.get(4)?,
            payment_mode: r.get(5)?,
            description: r.get(6)?,
        },
    })
}

fn investment_from_row(r: &Row<'_>) -> rusqlite::Result<Investment> {
    let partner: Option<String> = r.get(2)?;
    Ok(Investment {
        id: r.get(0)?,
        partner_id: r.get(1)?,
        entry: InvestmentEntry {
            date: r.get(3)?,
            partner: partner.unwrap_or_default(),
            amount: decimal_at(r, 4)?,
            description: r.get(5)?,
        },
    })
}

fn payment_from_row(r: &Row<'_>) -> rusqlite::Result<PartnerPayment> {
    Ok(PartnerPayment {
        id: r.get(0)?,
        entry: PaymentEntry {
            date: r.get(1)?,
            partner_id: r.get(2)?,
            amount: decimal_at(r, 3)?,
            month_year: r.get(4)?,
            payment_mode: r.get(5)?,
            description: r.get(6)?,
        },
    })
}

/// Runs `base` with an optional `[start, end)` filter on `date_col`, ordered
/// by date then insertion order. The filter binds the inclusive last day.
fn query_dated<T>(
    conn: &Connection,
    base: &str,
    date_col: &str,
    id_col: &str,
    range: Option<DateRange>,
    map: fn(&Row<'_>) -> rusqlite::Result<T>,
) -> LedgerResult<Vec<T>> {
    let mut sql = String::from(base);
    let mut bounds: Vec<NaiveDate> = Vec::new();
    if let Some(r) = range {
        let Some(last) = r.last_day() else {
            return Ok(Vec::new());
        };
        sql.push_str(&format!(" WHERE {0} >= ?1 AND {0} <= ?2", date_col));
        bounds.push(r.start);
        bounds.push(last);
    }
    sql.push_str(&format!(" ORDER BY {}, {}", date_col, id_col));

    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map(params_from_iter(bounds.iter()), map)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn list_sales(conn: &Connection, range: Option<DateRange>) -> LedgerResult<Vec<Sale>> {
    query_dated(conn, SALE_SELECT, "date", "id", range, sale_from_row)
}

pub fn list_expenses(conn: &Connection, range: Option<DateRange>) -> LedgerResult<Vec<Expense>> {
    query_dated(conn, EXPENSE_SELECT, "date", "id", range, expense_from_row)
}

pub fn list_investments(
    conn: &Connection,
    range: Option<DateRange>,
) -> LedgerResult<Vec<Investment>> {
    query_dated(conn, INVESTMENT_SELECT, "i.date", "i.id", range, investment_from_row)
}

/// Partner payments by payment date.
pub fn list_payments(
    conn: &Connection,
    range: Option<DateRange>,
) -> LedgerResult<Vec<PartnerPayment>> {
    query_dated(conn, PAYMENT_SELECT, "date", "id", range, payment_from_row)
}

/// Partner payments whose attribution month lies in `first..=last`.
pub fn payments_attributed(
    conn: &Connection,
    first: Month,
    last: Month,
) -> LedgerResult<Vec<PartnerPayment>> {
    let mut stmt = conn.prepare_cached(&format!(
        "{} WHERE month_year >= ?1 AND month_year <= ?2 ORDER BY month_year, id",
        PAYMENT_SELECT
    ))?;
    let rows = stmt.query_map(params![first, last], payment_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Lists any kind of record in date-then-insertion order.
pub fn list(
    conn: &Connection,
    kind: RecordKind,
    range: Option<DateRange>,
) -> LedgerResult<Vec<Record>> {
    let records = match kind {
        RecordKind::Sale => list_sales(conn, range)?.into_iter().map(Record::Sale).collect(),
        RecordKind::Expense => list_expenses(conn, range)?
            .into_iter()
            .map(Record::Expense)
            .collect(),
        RecordKind::Investment => list_investments(conn, range)?
            .into_iter()
            .map(Record::Investment)
            .collect(),
        RecordKind::PartnerPayment => list_payments(conn, range)?
            .into_iter()
            .map(Record::PartnerPayment)
            .collect(),
    };
    Ok(records)
}

fn fetch_one<T>(
    conn: &Connection,
    base: &str,
    id_col: &str,
    kind: RecordKind,
    id: i64,
    map: fn(&Row<'_>) -> rusqlite::Result<T>,
) -> LedgerResult<T> {
    conn.query_row(&format!("{} WHERE {}=?1", base, id_col), params![id], map)
        .optional()?
        .ok_or_else(|| LedgerError::not_found(kind, id))
}

pub fn get_sale(conn: &Connection, id: i64) -> LedgerResult<Sale> {
    fetch_one(conn, SALE_SELECT, "id", RecordKind::Sale, id, sale_from_row)
}

pub fn get_expense(conn: &Connection, id: i64) -> LedgerResult<Expense> {
    fetch_one(conn, EXPENSE_SELECT, "id", RecordKind::Expense, id, expense_from_row)
}

pub fn get_investment(conn: &Connection, id: i64) -> LedgerResult<Investment> {
    fetch_one(
        conn,
        INVESTMENT_SELECT,
        "i.id",
        RecordKind::Investment,
        id,
        investment_from_row,
    )
}

pub fn get_payment(conn: &Connection, id: i64) -> LedgerResult<PartnerPayment> {
    fetch_one(
        conn,
        PAYMENT_SELECT,
        "id",
        RecordKind::PartnerPayment,
        id,
        payment_from_row,
    )
}

/// Takes the next shoot number. The counter only moves forward and lives in
/// its own row, so it never reuses a number even if sales tables are edited.
pub fn next_shoot_id(tx: &Transaction<'_>) -> LedgerResult<i64> {
    let id: i64 = tx.query_row(
        "INSERT INTO counters(name, value) VALUES (?1, 1)
         ON CONFLICT(name) DO UPDATE SET value=value+1
         RETURNING value",
        params![SHOOT_COUNTER],
        |r| r.get(0),
    )?;
    Ok(id)
}

/// Last shoot number handed out, 0 before the first sale.
pub fn current_shoot_id(conn: &Connection) -> LedgerResult<i64> {
    let v: Option<i64> = conn
        .query_row(
            "SELECT value FROM counters WHERE name=?1",
            params![SHOOT_COUNTER],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v.unwrap_or(0))
}

/// Stores a new record and returns its storage id.
///
/// Sales get the next shoot number. Investments create their partner on
/// first use and add to its capital in the same transaction.
pub fn append(conn: &mut Connection, entry: &Entry) -> LedgerResult<i64> {
    entry.validate()?;
    let tx = begin_write(conn)?;
    let id = match entry {
        Entry::Sale(e) => {
            let shoot_id = next_shoot_id(&tx)?;
            tx.execute(
                "INSERT INTO sales(shoot_id, date, shoot_type, duration_hours, amount, received_by, payment_mode, cameraman, cameraman_mobile, customer_name, city)
                 VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11)",
                params![
                    shoot_id,
                    e.date,
                    e.shoot_type,
                    e.duration_hours.to_string(),
                    e.amount.to_string(),
                    e.received_by,
                    e.payment_mode,
                    e.cameraman,
                    e.cameraman_mobile,
                    e.customer_name,
                    e.city
                ],
            )?;
            let id = tx.last_insert_rowid();
            tracing::info!(id, shoot_id, amount = %e.amount, date = %e.date, "sale recorded");
            id
        }
        Entry::Expense(e) => {
            tx.execute(
                "INSERT INTO expenses(date, category, amount, paid_by, payment_mode, description)
                 VALUES (?1,?2,?3,?4,?5,?6)",
                params![
                    e.date,
                    e.category,
                    e.amount.to_string(),
                    e.paid_by,
                    e.payment_mode,
                    e.description
                ],
            )?;
            let id = tx.last_insert_rowid();
            tracing::info!(id, amount = %e.amount, date = %e.date, "expense recorded");
            id
        }
        Entry::Investment(e) => {
            let partner = registry::get_or_create(&tx, &e.partner)?;
            tx.execute(
                "INSERT INTO investments(date, partner_id, amount, description) VALUES (?1,?2,?3,?4)",
                params![e.date, partner.id, e.amount.to_string(), e.description],
            )?;
            let id = tx.last_insert_rowid();
            let capital = registry::add_capital(&tx, partner.id, e.amount)?;
            tracing::info!(id, partner = %partner.name, amount = %e.amount, capital = %capital, "investment recorded");
            id
        }
        Entry::PartnerPayment(e) => {
            let partner = registry::require_partner(&tx, e.partner_id, "partner_id")?;
            tx.execute(
                "INSERT INTO partner_payments(date, partner_id, amount, month_year, payment_mode, description)
                 VALUES (?1,?2,?3,?4,?5,?6)",
                params![
                    e.date,
                    e.partner_id,
                    e.amount.to_string(),
                    e.month_year,
                    e.payment_mode,
                    e.description
                ],
            )?;
            let id = tx.last_insert_rowid();
            tracing::info!(id, partner = %partner.name, amount = %e.amount, month = %e.month_year, "partner payment recorded");
            id
        }
    };
    tx.commit()?;
    Ok(id)
}

pub fn record_sale(conn: &mut Connection, entry: SaleEntry) -> LedgerResult<Sale> {
    let id = append(conn, &Entry::Sale(entry))?;
    get_sale(conn, id)
}

pub fn record_expense(conn: &mut Connection, entry: ExpenseEntry) -> LedgerResult<Expense> {
    let id = append(conn, &Entry::Expense(entry))?;
    get_expense(conn, id)
}

pub fn record_investment(
    conn: &mut Connection,
    entry: InvestmentEntry,
) -> LedgerResult<Investment> {
    let id = append(conn, &Entry::Investment(entry))?;
    get_investment(conn, id)
}

pub fn record_payment(conn: &mut Connection, entry: PaymentEntry) -> LedgerResult<PartnerPayment> {
    let id = append(conn, &Entry::PartnerPayment(entry))?;
    get_payment(conn, id)
}

fn ensure_updated(changed: usize, kind: RecordKind, id: i64) -> LedgerResult<()> {
    if changed == 0 {
        return Err(LedgerError::not_found(kind, id));
    }
    Ok(())
}

/// Replaces every field of record `id` with `entry`. The record keeps its id,
/// its shoot number (sales) and its place in listings.
pub fn update(conn: &mut Connection, id: i64, entry: &Entry) -> LedgerResult<()> {
    entry.validate()?;
    let tx = begin_write(conn)?;
    match entry {
        Entry::Sale(e) => {
            let n = tx.execute(
                "UPDATE sales SET date=?1, shoot_type=?2, duration_hours=?3, amount=?4, received_by=?5, payment_mode=?6, cameraman=?7, cameraman_mobile=?8, customer_name=?9, city=?10
                 WHERE id=?11",
                params![
                    e.date,
                    e.shoot_type,
                    e.duration_hours.to_string(),
                    e.amount.to_string(),
                    e.received_by,
                    e.payment_mode,
                    e.cameraman,
                    e.cameraman_mobile,
                    e.customer_name,
                    e.city,
                    id
                ],
            )?;
            ensure_updated(n, RecordKind::Sale, id)?;
        }
        Entry::Expense(e) => {
            let n = tx.execute(
                "UPDATE expenses SET date=?1, category=?2, amount=?3, paid_by=?4, payment_mode=?5, description=?6
                 WHERE id=?7",
                params![
                    e.date,
                    e.category,
                    e.amount.to_string(),
                    e.paid_by,
                    e.payment_mode,
                    e.description,
                    id
                ],
            )?;
            ensure_updated(n, RecordKind::Expense, id)?;
        }
        Entry::Investment(e) => {
            let stored = get_investment(&tx, id)?;
            if stored.entry.partner != e.partner {
                return Err(LedgerError::validation(
                    "partner",
                    format!(
                        "investment {} belongs to '{}' and cannot be moved to '{}'",
                        id, stored.entry.partner, e.partner
                    ),
                ));
            }
            tx.execute(
                "UPDATE investments SET date=?1, amount=?2, description=?3 WHERE id=?4",
                params![e.date, e.amount.to_string(), e.description, id],
            )?;
            let capital = registry::recompute_capital(&tx, stored.partner_id)?;
            tracing::info!(id, partner = %e.partner, capital = %capital, "partner capital re-derived");
        }
        Entry::PartnerPayment(e) => {
            registry::require_partner(&tx, e.partner_id, "partner_id")?;
            let n = tx.execute(
                "UPDATE partner_payments SET date=?1, partner_id=?2, amount=?3, month_year=?4, payment_mode=?5, description=?6
                 WHERE id=?7",
                params![
                    e.date,
                    e.partner_id,
                    e.amount.to_string(),
                    e.month_year,
                    e.payment_mode,
                    e.description,
                    id
                ],
            )?;
            ensure_updated(n, RecordKind::PartnerPayment, id)?;
        }
    }
    tx.commit()?;
    tracing::info!(kind = %entry.kind(), id, "record updated");
    Ok(())
}
