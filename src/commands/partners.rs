// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::registry;
use crate::utils::{fmt_money, fmt_percent, maybe_print_json, parse_share, pretty_table};
use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(conn, sub)?,
        Some(("set-shares", sub)) => set_shares(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let partners = registry::list_partners(conn)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &partners)? {
        let total: Decimal = partners.iter().map(|p| p.share_percentage).sum();
        let mut rows: Vec<Vec<String>> = partners
            .iter()
            .map(|p| {
                vec![
                    p.id.to_string(),
                    p.name.clone(),
                    fmt_percent(&p.share_percentage),
                    fmt_money(&p.capital_invested),
                ]
            })
            .collect();
        rows.push(vec![
            String::new(),
            "Total".into(),
            fmt_percent(&total),
            fmt_money(&partners.iter().map(|p| p.capital_invested).sum()),
        ]);
        println!(
            "{}",
            pretty_table(&["ID", "Partner", "Share", "Capital invested"], rows)
        );
    }
    Ok(())
}

/// Resolves `NAME=PERCENT` pairs against the registry by exact name.
pub fn shares_from_args(
    conn: &Connection,
    sub: &clap::ArgMatches,
) -> Result<BTreeMap<i64, Decimal>> {
    let mut proposed = BTreeMap::new();
    for raw in sub.get_many::<String>("share").into_iter().flatten() {
        let (name, pct) = parse_share(raw)?;
        let partner = registry::find_partner(conn, &name)?
            .ok_or_else(|| anyhow!("Partner '{}' not found", name))?;
        if proposed.insert(partner.id, pct).is_some() {
            return Err(anyhow!("Partner '{}' listed more than once", name));
        }
    }
    Ok(proposed)
}

fn set_shares(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let proposed = shares_from_args(conn, sub)?;
    let partners = registry::set_shares(conn, &proposed).context("Update partner shares")?;
    for p in &partners {
        println!("{}: {}", p.name, fmt_percent(&p.share_percentage));
    }
    Ok(())
}
