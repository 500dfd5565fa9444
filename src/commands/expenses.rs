// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{optional, record_id, required};
use crate::models::{EXPENSE_CATEGORIES, Entry, ExpenseEntry, PaymentMode};
use crate::store;
use crate::utils::{date_filter, fmt_money, maybe_print_json, opt_text, parse_date, parse_decimal, pretty_table};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn entry_from_args(sub: &clap::ArgMatches) -> Result<ExpenseEntry> {
    Ok(ExpenseEntry {
        date: parse_date(required(sub, "date")?)?,
        category: required(sub, "category")?.trim().to_string(),
        amount: parse_decimal(required(sub, "amount")?)?,
        paid_by: required(sub, "paid-by")?.trim().to_string(),
        payment_mode: required(sub, "mode")?.parse::<PaymentMode>()?,
        description: optional(sub, "description"),
    })
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let entry = entry_from_args(sub)?;
    if !EXPENSE_CATEGORIES.contains(&entry.category.as_str()) {
        tracing::debug!(category = %entry.category, "expense category outside the usual list");
    }
    let expense = store::record_expense(conn, entry).context("Record expense")?;
    println!(
        "Recorded expense {} ({}) on {} for {}",
        expense.id,
        expense.entry.category,
        expense.entry.date,
        fmt_money(&expense.entry.amount)
    );
    Ok(())
}

fn edit(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = record_id(sub)?;
    let entry = Entry::Expense(entry_from_args(sub)?);
    store::update(conn, id, &entry).with_context(|| format!("Update expense {}", id))?;
    println!("Updated expense {}", id);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let range = date_filter(sub.get_one::<String>("from"), sub.get_one::<String>("to"))?;
    let data = store::list_expenses(conn, range)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|e| {
                vec![
                    e.id.to_string(),
                    e.entry.date.to_string(),
                    e.entry.category.clone(),
                    fmt_money(&e.entry.amount),
                    e.entry.paid_by.clone(),
                    e.entry.payment_mode.to_string(),
                    opt_text(&e.entry.description),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Category", "Amount", "Paid by", "Mode", "Description"],
                rows,
            )
        );
    }
    Ok(())
}
