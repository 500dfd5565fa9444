// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::required;
use crate::clock::Clock;
use crate::models::{MonthSummary, PartnerDue};
use crate::{registry, reports};
use crate::utils::{fmt_money, fmt_percent, maybe_print_json, parse_month, pretty_table};
use anyhow::{Context, Result};
use chrono::Datelike;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches, clock: &dyn Clock) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, sub, clock)?,
        Some(("dues", sub)) => dues(conn, sub, clock)?,
        Some(("monthly", sub)) => monthly(conn, sub)?,
        Some(("yearly", sub)) => yearly(conn, sub, clock)?,
        Some(("dashboard", sub)) => dashboard(conn, sub, clock)?,
        _ => {}
    }
    Ok(())
}

fn window_args(sub: &clap::ArgMatches, clock: &dyn Clock) -> (i32, Option<u32>) {
    let year = sub
        .get_one::<i32>("year")
        .copied()
        .unwrap_or_else(|| clock.today().year());
    (year, sub.get_one::<u32>("month").copied())
}

fn ratio_percent(ratio: Decimal) -> Decimal {
    ratio
        .checked_mul(Decimal::ONE_HUNDRED)
        .unwrap_or(Decimal::MAX)
        .round_dp(1)
}

pub fn summary_rows(rows: &[MonthSummary]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| {
            vec![
                r.month.to_string(),
                fmt_money(&r.revenue),
                fmt_money(&r.expenses),
                fmt_money(&r.profit),
                format!("{:.1}%", ratio_percent(r.expense_ratio())),
            ]
        })
        .collect()
}

pub fn due_rows(dues: &[PartnerDue]) -> Vec<Vec<String>> {
    dues.iter()
        .map(|d| {
            vec![
                d.partner_name.clone(),
                fmt_money(&d.total_share),
                fmt_money(&d.total_paid),
                fmt_money(&d.total_due),
            ]
        })
        .collect()
}

fn unassigned_note(conn: &Connection) -> Result<()> {
    if reports::shares_unassigned(&registry::list_partners(conn)?) {
        println!("Note: no partner shares are assigned yet; run `partner set-shares`.");
    }
    Ok(())
}

const SUMMARY_HEADERS: [&str; 5] = ["Month", "Revenue", "Expenses", "Profit", "Expense ratio"];
const DUE_HEADERS: [&str; 4] = ["Partner", "Share", "Paid", "Due"];

fn summary(conn: &Connection, sub: &clap::ArgMatches, clock: &dyn Clock) -> Result<()> {
    let (year, month) = window_args(sub, clock);
    let rows = reports::period_summary(conn, year, month).context("Compute period summary")?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        println!("{}", pretty_table(&SUMMARY_HEADERS, summary_rows(&rows)));
    }
    Ok(())
}

fn dues(conn: &Connection, sub: &clap::ArgMatches, clock: &dyn Clock) -> Result<()> {
    let (year, month) = window_args(sub, clock);
    let dues = reports::partner_due_summary(conn, year, month).context("Compute partner dues")?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &dues)? {
        println!("{}", pretty_table(&DUE_HEADERS, due_rows(&dues)));
        unassigned_note(conn)?;
    }
    Ok(())
}

fn monthly(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(required(sub, "month")?)?;
    let report = reports::monthly_report(conn, month).context("Compute monthly report")?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        println!(
            "{}",
            pretty_table(&SUMMARY_HEADERS, summary_rows(std::slice::from_ref(&report.summary)))
        );
        println!(
            "{} sale(s), {} expense(s)",
            report.sales_count, report.expenses_count
        );
        let rows: Vec<Vec<String>> = report
            .partner_distribution
            .iter()
            .map(|d| {
                vec![
                    d.name.clone(),
                    fmt_percent(&d.share_percentage),
                    fmt_money(&d.amount),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Partner", "Share", "Amount"], rows));
    }
    Ok(())
}

fn yearly(conn: &Connection, sub: &clap::ArgMatches, clock: &dyn Clock) -> Result<()> {
    let (year, month) = window_args(sub, clock);
    let report = reports::yearly_report(conn, year, month).context("Compute yearly report")?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        println!("{}", pretty_table(&SUMMARY_HEADERS, summary_rows(&report.monthly_data)));
        println!("{}", pretty_table(&DUE_HEADERS, due_rows(&report.partner_summary)));
        unassigned_note(conn)?;
    }
    Ok(())
}

fn dashboard(conn: &Connection, sub: &clap::ArgMatches, clock: &dyn Clock) -> Result<()> {
    let month = sub
        .get_one::<String>("month")
        .map(|s| parse_month(s))
        .transpose()?;
    let stats = reports::dashboard(conn, clock, month).context("Compute dashboard")?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &stats)? {
        println!("{}", pretty_table(&SUMMARY_HEADERS, summary_rows(std::slice::from_ref(&stats))));
    }
    Ok(())
}
