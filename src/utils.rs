// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::period::{DateRange, Month};
use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_month(s: &str) -> Result<Month> {
    s.trim()
        .parse::<Month>()
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Parses `NAME=PERCENT`. The name is kept exactly as typed after the last
/// `=` is split off; only the percentage is trimmed.
pub fn parse_share(s: &str) -> Result<(String, Decimal)> {
    let (name, pct) = s
        .rsplit_once('=')
        .ok_or_else(|| anyhow!("Invalid share '{}', expected NAME=PERCENT", s))?;
    if name.is_empty() {
        return Err(anyhow!("Invalid share '{}': partner name is empty", s));
    }
    Ok((name.to_string(), parse_decimal(pct)?))
}

/// Builds an optional `[from, to]` date filter; `to` is inclusive.
pub fn date_filter(from: Option<&String>, to: Option<&String>) -> Result<Option<DateRange>> {
    let start = from.map(|s| parse_date(s)).transpose()?;
    let end = to.map(|s| parse_date(s)).transpose()?;
    if start.is_none() && end.is_none() {
        return Ok(None);
    }
    // open ends cover every four-digit year
    let start = start.unwrap_or(NaiveDate::from_ymd_opt(1, 1, 1).context("calendar start")?);
    let end = match end {
        Some(e) => e.succ_opt().context("date out of range")?,
        None => NaiveDate::from_ymd_opt(10000, 1, 1).context("calendar end")?,
    };
    Ok(Some(DateRange::new(start, end)?))
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

pub fn fmt_percent(d: &Decimal) -> String {
    format!("{}%", d.normalize())
}

pub fn opt_text(s: &Option<String>) -> String {
    s.clone().unwrap_or_default()
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
