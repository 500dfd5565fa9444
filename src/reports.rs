// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Period rollups and partner dues.
//!
//! Every report reads one [`Snapshot`] inside a single read transaction and
//! then computes on plain values, so a report never mixes two versions of the
//! same record.

use crate::clock::Clock;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Expense, MonthSummary, MonthlyReport, Partner, PartnerDistribution, PartnerDue,
    PartnerPayment, Sale, YearlyReport,
};
use crate::period::{Month, Window};
use crate::validator::{SHARE_TOTAL, is_balanced};
use crate::{registry, store};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Point-in-time view of everything a report over one window needs.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub partners: Vec<Partner>,
    pub sales: Vec<Sale>,
    pub expenses: Vec<Expense>,
    /// Payments attributed to a month inside the window.
    pub payments: Vec<PartnerPayment>,
}

pub fn snapshot(conn: &Connection, window: Window) -> LedgerResult<Snapshot> {
    let tx = conn.unchecked_transaction()?;
    let range = window.date_range();
    let snap = Snapshot {
        partners: registry::list_partners(&tx)?,
        sales: store::list_sales(&tx, Some(range))?,
        expenses: store::list_expenses(&tx, Some(range))?,
        payments: store::payments_attributed(&tx, window.first_month(), window.last_month())?,
    };
    tx.commit()?;
    Ok(snap)
}

fn checked_sum(acc: Decimal, value: Decimal, field: &'static str) -> LedgerResult<Decimal> {
    acc.checked_add(value).ok_or_else(|| LedgerError::overflow(field))
}

/// One row per month of the window, zero rows included.
pub fn summarize(snap: &Snapshot, window: Window) -> LedgerResult<Vec<MonthSummary>> {
    let mut rows: BTreeMap<Month, MonthSummary> = window
        .months()
        .into_iter()
        .map(|m| (m, MonthSummary::empty(m)))
        .collect();
    for sale in &snap.sales {
        if let Some(row) = rows.get_mut(&Month::of(sale.entry.date)) {
            row.revenue = checked_sum(row.revenue, sale.entry.amount, "revenue")?;
        }
    }
    for expense in &snap.expenses {
        if let Some(row) = rows.get_mut(&Month::of(expense.entry.date)) {
            row.expenses = checked_sum(row.expenses, expense.entry.amount, "expenses")?;
        }
    }
    rows.into_values()
        .map(|mut row| {
            row.profit = row
                .revenue
                .checked_sub(row.expenses)
                .ok_or_else(|| LedgerError::overflow("profit"))?;
            Ok(row)
        })
        .collect()
}

pub fn total_profit(rows: &[MonthSummary]) -> LedgerResult<Decimal> {
    rows.iter()
        .try_fold(Decimal::ZERO, |acc, r| checked_sum(acc, r.profit, "profit"))
}

/// True when partners exist but none has been given a share yet.
pub fn shares_unassigned(partners: &[Partner]) -> bool {
    !partners.is_empty() && partners.iter().all(|p| p.share_percentage.is_zero())
}

/// Refuses to work with stored shares that do not total 100%.
///
/// A registry where every share is still 0 has never had shares assigned and
/// passes; every partner is then entitled to nothing.
pub fn check_shares(partners: &[Partner]) -> LedgerResult<()> {
    if partners.is_empty() {
        return Ok(());
    }
    if shares_unassigned(partners) {
        tracing::info!(partners = partners.len(), "no partner shares assigned yet");
        return Ok(());
    }
    let sum: Decimal = partners.iter().map(|p| p.share_percentage).sum();
    if !is_balanced(sum) {
        tracing::error!(sum = %sum, "stored partner shares are inconsistent");
        return Err(LedgerError::InconsistentState { sum });
    }
    Ok(())
}

// share/100 is at most 1, so the product stays within |profit|
fn entitlement(profit: Decimal, share_percentage: Decimal) -> LedgerResult<Decimal> {
    (share_percentage / SHARE_TOTAL)
        .checked_mul(profit)
        .ok_or_else(|| LedgerError::overflow("profit"))
}

/// Each partner's percentage of the window's profit, less payments attributed
/// to the window. Losses produce negative entitlements.
pub fn dues(snap: &Snapshot, window: Window) -> LedgerResult<Vec<PartnerDue>> {
    check_shares(&snap.partners)?;
    let profit = total_profit(&summarize(snap, window)?)?;

    let mut paid: BTreeMap<i64, Decimal> = BTreeMap::new();
    for payment in &snap.payments {
        if window.contains_month(payment.entry.month_year) {
            let total = paid.entry(payment.entry.partner_id).or_insert(Decimal::ZERO);
            *total = checked_sum(*total, payment.entry.amount, "total_paid")?;
        }
    }

    snap.partners
        .iter()
        .map(|p| {
            let total_share = entitlement(profit, p.share_percentage)?;
            let total_paid = paid.get(&p.id).copied().unwrap_or(Decimal::ZERO);
            let total_due = total_share
                .checked_sub(total_paid)
                .ok_or_else(|| LedgerError::overflow("total_due"))?;
            Ok(PartnerDue {
                partner_id: p.id,
                partner_name: p.name.clone(),
                total_share,
                total_paid,
                total_due,
            })
        })
        .collect()
}

pub fn distribution(
    partners: &[Partner],
    profit: Decimal,
) -> LedgerResult<Vec<PartnerDistribution>> {
    partners
        .iter()
        .map(|p| {
            Ok(PartnerDistribution {
                partner_id: p.id,
                name: p.name.clone(),
                share_percentage: p.share_percentage,
                amount: entitlement(profit, p.share_percentage)?,
            })
        })
        .collect()
}

pub fn period_summary(
    conn: &Connection,
    year: i32,
    month: Option<u32>,
) -> LedgerResult<Vec<MonthSummary>> {
    let window = Window::new(year, month)?;
    let snap = snapshot(conn, window)?;
    let rows = summarize(&snap, window)?;
    tracing::debug!(window = %window, rows = rows.len(), "period summary computed");
    Ok(rows)
}

pub fn partner_due_summary(
    conn: &Connection,
    year: i32,
    month: Option<u32>,
) -> LedgerResult<Vec<PartnerDue>> {
    let window = Window::new(year, month)?;
    let snap = snapshot(conn, window)?;
    let out = dues(&snap, window)?;
    tracing::debug!(window = %window, partners = out.len(), "partner dues computed");
    Ok(out)
}

/// Monthly rows and partner dues for `(year, optional month)` from one
/// snapshot.
pub fn yearly_report(conn: &Connection, year: i32, month: Option<u32>) -> LedgerResult<YearlyReport> {
    let window = Window::new(year, month)?;
    let snap = snapshot(conn, window)?;
    Ok(YearlyReport {
        year,
        month,
        monthly_data: summarize(&snap, window)?,
        partner_summary: dues(&snap, window)?,
    })
}

pub fn monthly_report(conn: &Connection, month: Month) -> LedgerResult<MonthlyReport> {
    let window = Window::Month(month);
    let snap = snapshot(conn, window)?;
    check_shares(&snap.partners)?;
    let summary = summarize(&snap, window)?
        .into_iter()
        .next()
        .unwrap_or_else(|| MonthSummary::empty(month));
    Ok(MonthlyReport {
        partner_distribution: distribution(&snap.partners, summary.profit)?,
        summary,
        sales_count: snap.sales.len(),
        expenses_count: snap.expenses.len(),
    })
}

/// The month the dashboard shows when none is asked for: the one before
/// today's.
pub fn default_dashboard_month(clock: &dyn Clock) -> Month {
    Month::of(clock.today()).previous()
}

pub fn dashboard(
    conn: &Connection,
    clock: &dyn Clock,
    month: Option<Month>,
) -> LedgerResult<MonthSummary> {
    let month = month.unwrap_or_else(|| default_dashboard_month(clock));
    let rows = period_summary(conn, month.year(), Some(month.number()))?;
    Ok(rows
        .into_iter()
        .next()
        .unwrap_or_else(|| MonthSummary::empty(month)))
}
