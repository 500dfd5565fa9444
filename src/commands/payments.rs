// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{optional, record_id, required};
use crate::models::{Entry, PaymentEntry, PaymentMode};
use crate::utils::{
    date_filter, fmt_money, maybe_print_json, opt_text, parse_date, parse_decimal, parse_month,
    pretty_table,
};
use crate::{registry, store};
use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;
use std::collections::HashMap;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn entry_from_args(conn: &Connection, sub: &clap::ArgMatches) -> Result<PaymentEntry> {
    let name = required(sub, "partner")?;
    let partner = registry::find_partner(conn, name)?
        .ok_or_else(|| anyhow!("Partner '{}' not found", name))?;
    Ok(PaymentEntry {
        date: parse_date(required(sub, "date")?)?,
        partner_id: partner.id,
        amount: parse_decimal(required(sub, "amount")?)?,
        month_year: parse_month(required(sub, "month")?)?,
        payment_mode: required(sub, "mode")?.parse::<PaymentMode>()?,
        description: optional(sub, "description"),
    })
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let entry = entry_from_args(conn, sub)?;
    let payment = store::record_payment(conn, entry).context("Record partner payment")?;
    println!(
        "Recorded payment {} of {} for {}",
        payment.id,
        fmt_money(&payment.entry.amount),
        payment.entry.month_year
    );
    Ok(())
}

fn edit(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = record_id(sub)?;
    let entry = Entry::PartnerPayment(entry_from_args(conn, sub)?);
    store::update(conn, id, &entry).with_context(|| format!("Update partner payment {}", id))?;
    println!("Updated partner payment {}", id);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let range = date_filter(sub.get_one::<String>("from"), sub.get_one::<String>("to"))?;
    let data = store::list_payments(conn, range)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let names: HashMap<i64, String> = registry::list_partners(conn)?
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect();
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|p| {
                vec![
                    p.id.to_string(),
                    p.entry.date.to_string(),
                    names.get(&p.entry.partner_id).cloned().unwrap_or_default(),
                    fmt_money(&p.entry.amount),
                    p.entry.month_year.to_string(),
                    p.entry.payment_mode.to_string(),
                    opt_text(&p.entry.description),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Partner", "Amount", "For month", "Mode", "Description"],
                rows,
            )
        );
    }
    Ok(())
}
