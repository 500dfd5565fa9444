// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{optional, record_id, required};
use crate::models::{Entry, PaymentMode, Sale, SaleEntry, ShootType};
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

pub fn entry_from_args(sub: &clap::ArgMatches) -> Result<SaleEntry> {
    Ok(SaleEntry {
        date: parse_date(required(sub, "date")?)?,
        shoot_type: required(sub, "type")?.parse::<ShootType>()?,
        duration_hours: parse_decimal(required(sub, "hours")?)?,
        amount: parse_decimal(required(sub, "amount")?)?,
        received_by: required(sub, "received-by")?.trim().to_string(),
        payment_mode: required(sub, "mode")?.parse::<PaymentMode>()?,
        cameraman: optional(sub, "cameraman"),
        cameraman_mobile: optional(sub, "cameraman-mobile"),
        customer_name: optional(sub, "customer"),
        city: optional(sub, "city"),
    })
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let sale = store::record_sale(conn, entry_from_args(sub)?).context("Record sale")?;
    println!(
        "Recorded shoot #{} ({}) on {} for {}",
        sale.shoot_id,
        sale.entry.shoot_type,
        sale.entry.date,
        fmt_money(&sale.entry.amount)
    );
    Ok(())
}

fn edit(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = record_id(sub)?;
    let entry = Entry::Sale(entry_from_args(sub)?);
    store::update(conn, id, &entry).with_context(|| format!("Update sale {}", id))?;
    println!("Updated sale {}", id);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let range = date_filter(sub.get_one::<String>("from"), sub.get_one::<String>("to"))?;
    let data: Vec<Sale> = store::list_sales(conn, range)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|s| {
                vec![
                    s.id.to_string(),
                    s.shoot_id.to_string(),
                    s.entry.date.to_string(),
                    s.entry.shoot_type.to_string(),
                    s.entry.duration_hours.normalize().to_string(),
                    fmt_money(&s.entry.amount),
                    s.entry.received_by.clone(),
                    s.entry.payment_mode.to_string(),
                    opt_text(&s.entry.customer_name),
                    opt_text(&s.entry.city),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Shoot", "Date", "Type", "Hours", "Amount", "Received by", "Mode", "Customer", "City"],
                rows,
            )
        );
    }
    Ok(())
}
