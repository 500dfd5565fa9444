// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::time::Duration;
use studioledger::models::{
    Entry, ExpenseEntry, InvestmentEntry, PaymentEntry, PaymentMode, Record, SaleEntry, ShootType,
};
use studioledger::utils::date_filter;
use studioledger::{LedgerError, Month, RecordKind, db, registry, store};

fn setup() -> Connection {
    db::open_in_memory().unwrap()
}

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn sale(date: &str, amount: &str) -> SaleEntry {
    SaleEntry {
        date: day(date),
        shoot_type: ShootType::PreWedding,
        duration_hours: d("2"),
        amount: d(amount),
        received_by: "Om".into(),
        payment_mode: PaymentMode::Upi,
        cameraman: None,
        cameraman_mobile: None,
        customer_name: Some("Ravi".into()),
        city: Some("Hyderabad".into()),
    }
}

fn expense(date: &str, amount: &str) -> ExpenseEntry {
    ExpenseEntry {
        date: day(date),
        category: "PROPS".into(),
        amount: d(amount),
        paid_by: "Om".into(),
        payment_mode: PaymentMode::Cash,
        description: None,
    }
}

fn investment(date: &str, partner: &str, amount: &str) -> InvestmentEntry {
    InvestmentEntry {
        date: day(date),
        partner: partner.into(),
        amount: d(amount),
        description: None,
    }
}

#[test]
fn sales_list_by_date_then_insertion() {
    let mut conn = setup();
    store::record_sale(&mut conn, sale("2024-03-10", "300")).unwrap();
    store::record_sale(&mut conn, sale("2024-03-05", "100")).unwrap();
    store::record_sale(&mut conn, sale("2024-03-10", "200")).unwrap();

    let rows = store::list_sales(&conn, None).unwrap();
    let amounts: Vec<Decimal> = rows.iter().map(|s| s.entry.amount).collect();
    assert_eq!(amounts, vec![d("100"), d("300"), d("200")]);
}

#[test]
fn shoot_ids_are_sequential_and_survive_edits() {
    let mut conn = setup();
    let a = store::record_sale(&mut conn, sale("2024-01-01", "10")).unwrap();
    let b = store::record_sale(&mut conn, sale("2024-01-02", "20")).unwrap();
    assert_eq!((a.shoot_id, b.shoot_id), (1, 2));

    store::update(&mut conn, a.id, &Entry::Sale(sale("2024-02-01", "15"))).unwrap();
    let edited = store::get_sale(&conn, a.id).unwrap();
    assert_eq!(edited.shoot_id, 1);
    assert_eq!(edited.entry.amount, d("15"));

    let c = store::record_sale(&mut conn, sale("2024-01-03", "30")).unwrap();
    assert_eq!(c.shoot_id, 3);
    assert_eq!(store::current_shoot_id(&conn).unwrap(), 3);
}

#[test]
fn date_filter_is_inclusive_of_to() {
    let mut conn = setup();
    store::record_expense(&mut conn, expense("2024-03-01", "1")).unwrap();
    store::record_expense(&mut conn, expense("2024-03-31", "2")).unwrap();
    store::record_expense(&mut conn, expense("2024-04-01", "3")).unwrap();

    let from = "2024-03-01".to_string();
    let to = "2024-03-31".to_string();
    let range = date_filter(Some(&from), Some(&to)).unwrap();
    let rows = store::list_expenses(&conn, range).unwrap();
    assert_eq!(rows.len(), 2);

    let open_start = date_filter(None, Some(&to)).unwrap();
    assert_eq!(store::list_expenses(&conn, open_start).unwrap().len(), 2);
}

#[test]
fn last_calendar_year_is_listed() {
    let mut conn = setup();
    store::record_sale(&mut conn, sale("9999-12-05", "100")).unwrap();
    store::record_sale(&mut conn, sale("9999-12-31", "50")).unwrap();

    let from = "9999-12-01".to_string();
    let to = "9999-12-31".to_string();
    let closed = date_filter(Some(&from), Some(&to)).unwrap();
    assert_eq!(store::list_sales(&conn, closed).unwrap().len(), 2);

    let open_end = date_filter(Some(&from), None).unwrap();
    assert_eq!(store::list_sales(&conn, open_end).unwrap().len(), 2);

    let december = Month::new(9999, 12).unwrap().range();
    assert_eq!(store::list_sales(&conn, Some(december)).unwrap().len(), 2);
}

#[test]
fn empty_range_lists_nothing() {
    let mut conn = setup();
    store::record_sale(&mut conn, sale("2024-03-05", "100")).unwrap();
    let range = studioledger::DateRange::new(day("2024-03-05"), day("2024-03-05")).unwrap();
    assert!(store::list_sales(&conn, Some(range)).unwrap().is_empty());
}

#[test]
fn negative_amount_rejected_before_write() {
    let mut conn = setup();
    let err = store::append(&mut conn, &Entry::Expense(expense("2024-03-01", "-5"))).unwrap_err();
    assert!(matches!(err, LedgerError::Validation { field: "amount", .. }));
    assert!(store::list_expenses(&conn, None).unwrap().is_empty());
}

#[test]
fn blank_required_text_rejected() {
    let mut conn = setup();
    let mut e = sale("2024-03-01", "5");
    e.received_by = "  ".into();
    let err = store::append(&mut conn, &Entry::Sale(e)).unwrap_err();
    assert!(matches!(err, LedgerError::Validation { field: "received_by", .. }));
    assert_eq!(store::current_shoot_id(&conn).unwrap(), 0);
}

#[test]
fn update_missing_record_is_not_found() {
    let mut conn = setup();
    let err = store::update(&mut conn, 42, &Entry::Expense(expense("2024-03-01", "5"))).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::NotFound {
            kind: RecordKind::Expense,
            id: 42
        }
    ));
    assert!(matches!(
        store::get_sale(&conn, 7),
        Err(LedgerError::NotFound { kind: RecordKind::Sale, id: 7 })
    ));
}

#[test]
fn payment_requires_known_partner() {
    let mut conn = setup();
    let entry = PaymentEntry {
        date: day("2024-03-05"),
        partner_id: 99,
        amount: d("100"),
        month_year: Month::new(2024, 3).unwrap(),
        payment_mode: PaymentMode::Online,
        description: None,
    };
    let err = store::record_payment(&mut conn, entry).unwrap_err();
    assert!(matches!(err, LedgerError::Validation { field: "partner_id", .. }));
    assert!(store::list_payments(&conn, None).unwrap().is_empty());
}

#[test]
fn investment_edit_rederives_capital() {
    let mut conn = setup();
    let first = store::record_investment(&mut conn, investment("2024-01-01", "Om", "5000")).unwrap();
    store::record_investment(&mut conn, investment("2024-02-01", "Om", "1000")).unwrap();
    let om = registry::find_partner(&conn, "Om").unwrap().unwrap();
    assert_eq!(om.capital_invested, d("6000"));

    store::update(
        &mut conn,
        first.id,
        &Entry::Investment(investment("2024-01-01", "Om", "3000")),
    )
    .unwrap();
    let om = registry::find_partner(&conn, "Om").unwrap().unwrap();
    assert_eq!(om.capital_invested, d("4000"));
}

#[test]
fn investment_cannot_move_to_another_partner() {
    let mut conn = setup();
    let inv = store::record_investment(&mut conn, investment("2024-01-01", "Om", "5000")).unwrap();
    let err = store::update(
        &mut conn,
        inv.id,
        &Entry::Investment(investment("2024-01-01", "Sai", "5000")),
    )
    .unwrap_err();
    assert!(matches!(err, LedgerError::Validation { field: "partner", .. }));
    assert!(registry::find_partner(&conn, "Sai").unwrap().is_none());
}

#[test]
fn list_any_kind_returns_records() {
    let mut conn = setup();
    store::record_sale(&mut conn, sale("2024-03-05", "10")).unwrap();
    store::record_investment(&mut conn, investment("2024-03-01", "Om", "10")).unwrap();

    let sales = store::list(&conn, RecordKind::Sale, None).unwrap();
    assert!(matches!(sales.as_slice(), [Record::Sale(_)]));
    assert_eq!(sales[0].id(), 1);
    assert_eq!(sales[0].date(), day("2024-03-05"));
    let invs = store::list(&conn, RecordKind::Investment, None).unwrap();
    match invs.as_slice() {
        [Record::Investment(i)] => assert_eq!(i.entry.partner, "Om"),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn concurrent_sales_get_distinct_shoot_ids() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.sqlite");
    db::open(&path, Duration::from_secs(10)).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let path = path.clone();
            std::thread::spawn(move || {
                let mut conn = db::open(&path, Duration::from_secs(10)).unwrap();
                (0..10)
                    .map(|i| {
                        let amount = format!("{}", t * 100 + i);
                        store::record_sale(&mut conn, sale("2024-05-01", &amount))
                            .unwrap()
                            .shoot_id
                    })
                    .collect::<Vec<i64>>()
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for h in handles {
        for id in h.join().unwrap() {
            assert!(ids.insert(id), "shoot id {} issued twice", id);
        }
    }
    assert_eq!(ids.len(), 40);
    assert_eq!(ids.iter().max().copied(), Some(40));
}
