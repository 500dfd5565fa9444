// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{optional, record_id, required};
use crate::models::{Entry, InvestmentEntry};
use crate::{registry, store};
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

pub fn entry_from_args(sub: &clap::ArgMatches) -> Result<InvestmentEntry> {
    Ok(InvestmentEntry {
        date: parse_date(required(sub, "date")?)?,
        // exact name: no trimming, near-duplicates stay distinct partners
        partner: required(sub, "partner")?.to_string(),
        amount: parse_decimal(required(sub, "amount")?)?,
        description: optional(sub, "description"),
    })
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let entry = entry_from_args(sub)?;
    let is_new = registry::find_partner(conn, &entry.partner)?.is_none();
    let inv = store::record_investment(conn, entry).context("Record investment")?;
    println!(
        "Recorded investment of {} by '{}' on {}",
        fmt_money(&inv.entry.amount),
        inv.entry.partner,
        inv.entry.date
    );
    if is_new {
        println!(
            "'{}' is a new partner at 0% share; run `partner set-shares` to assign shares.",
            inv.entry.partner
        );
    }
    Ok(())
}

fn edit(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = record_id(sub)?;
    let entry = Entry::Investment(entry_from_args(sub)?);
    store::update(conn, id, &entry).with_context(|| format!("Update investment {}", id))?;
    println!("Updated investment {}", id);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let range = date_filter(sub.get_one::<String>("from"), sub.get_one::<String>("to"))?;
    let data = store::list_investments(conn, range)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|i| {
                vec![
                    i.id.to_string(),
                    i.entry.date.to_string(),
                    i.entry.partner.clone(),
                    fmt_money(&i.entry.amount),
                    opt_text(&i.entry.description),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Date", "Partner", "Amount", "Description"], rows)
        );
    }
    Ok(())
}
