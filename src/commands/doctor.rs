// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{fmt_money, pretty_table};
use crate::validator::is_balanced;
use crate::{registry, reports, store};
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};
use rust_decimal::Decimal;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub code: &'static str,
    pub detail: String,
}

fn issue(code: &'static str, detail: String) -> Issue {
    Issue { code, detail }
}

pub fn find_issues(conn: &Connection) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();
    let partners = registry::list_partners(conn)?;

    // 1) Shares never assigned, or drifted away from 100
    let total: Decimal = partners.iter().map(|p| p.share_percentage).sum();
    if reports::shares_unassigned(&partners) {
        issues.push(issue(
            "shares_unassigned",
            format!(
                "{} partner(s) and no shares assigned; every entitlement is 0",
                partners.len()
            ),
        ));
    } else if !partners.is_empty() && !is_balanced(total) {
        issues.push(issue("share_total", format!("partner shares total {}%", total.normalize())));
    }

    // 2) Payments and investments pointing at partners that do not exist
    for (table, code) in [
        ("partner_payments", "payment_unknown_partner"),
        ("investments", "investment_unknown_partner"),
    ] {
        let mut stmt = conn.prepare(&format!(
            "SELECT id, partner_id FROM {} WHERE partner_id NOT IN (SELECT id FROM partners) ORDER BY id",
            table
        ))?;
        let mut cur = stmt.query([])?;
        while let Some(r) = cur.next()? {
            let id: i64 = r.get(0)?;
            let pid: i64 = r.get(1)?;
            issues.push(issue(code, format!("{} {} -> partner {}", table, id, pid)));
        }
    }

    // 3) Capital that no longer matches the investments behind it
    let mut invested: HashMap<i64, Decimal> = HashMap::new();
    for inv in store::list_investments(conn, None)? {
        let total = invested.entry(inv.partner_id).or_insert(Decimal::ZERO);
        *total = total.checked_add(inv.entry.amount).unwrap_or(Decimal::MAX);
    }
    for p in &partners {
        let expected = invested.get(&p.id).copied().unwrap_or(Decimal::ZERO);
        if expected != p.capital_invested {
            issues.push(issue(
                "capital_mismatch",
                format!(
                    "{}: capital {} but investments sum to {}",
                    p.name,
                    fmt_money(&p.capital_invested),
                    fmt_money(&expected)
                ),
            ));
        }
    }

    // 4) Shoot counter behind numbers already issued
    let max_shoot: Option<i64> = conn
        .query_row("SELECT MAX(shoot_id) FROM sales", [], |r| r.get(0))
        .optional()?
        .flatten();
    let counter = store::current_shoot_id(conn)?;
    if let Some(max) = max_shoot.filter(|m| *m > counter) {
        issues.push(issue(
            "shoot_counter_behind",
            format!("counter at {} but shoot #{} exists", counter, max),
        ));
    }

    Ok(issues)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let issues = find_issues(conn)?;
    if issues.is_empty() {
        println!("doctor: no issues found");
    } else {
        let rows = issues
            .into_iter()
            .map(|i| vec![i.code.to_string(), i.detail])
            .collect();
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
