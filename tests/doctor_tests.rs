// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::params;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use studioledger::commands::doctor;
use studioledger::models::InvestmentEntry;
use studioledger::{db, registry, store};

#[test]
fn unassigned_then_clean_ledger() {
    let mut conn = db::open_in_memory().unwrap();
    let om = store::record_investment(
        &mut conn,
        InvestmentEntry {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            partner: "Om".into(),
            amount: "5000".parse().unwrap(),
            description: None,
        },
    )
    .unwrap()
    .partner_id;
    let codes: Vec<&str> = doctor::find_issues(&conn)
        .unwrap()
        .into_iter()
        .map(|i| i.code)
        .collect();
    assert_eq!(codes, vec!["shares_unassigned"]);

    let full: BTreeMap<i64, Decimal> = [(om, Decimal::ONE_HUNDRED)].into_iter().collect();
    registry::set_shares(&mut conn, &full).unwrap();
    assert!(doctor::find_issues(&conn).unwrap().is_empty());
}

#[test]
fn reports_drift_and_dangling_references() {
    let conn = db::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        INSERT INTO partners(id, name, share_percentage, capital_invested) VALUES (1, 'Om', '70', '100');
        INSERT INTO partners(id, name, share_percentage, capital_invested) VALUES (2, 'Sai', '20', '0');
        INSERT INTO partner_payments(date, partner_id, amount, month_year, payment_mode)
            VALUES ('2024-03-01', 9, '10', '2024-03', 'Cash');
        INSERT INTO sales(shoot_id, date, shoot_type, duration_hours, amount, received_by, payment_mode)
            VALUES (5, '2024-03-01', 'Baby', '1', '100', 'Om', 'Cash');
        "#,
    )
    .unwrap();
    conn.execute(
        "INSERT INTO counters(name, value) VALUES ('shoot_id', ?1)",
        params![2],
    )
    .unwrap();

    let codes: Vec<&str> = doctor::find_issues(&conn)
        .unwrap()
        .into_iter()
        .map(|i| i.code)
        .collect();
    assert_eq!(
        codes,
        vec![
            "share_total",
            "payment_unknown_partner",
            "capital_mismatch",
            "shoot_counter_behind"
        ]
    );
}
