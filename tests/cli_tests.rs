// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use studioledger::clock::FixedClock;
use studioledger::commands::{expenses, partners, payments, reports, sales};
use studioledger::models::{PaymentMode, ShootType};
use studioledger::{cli, db, registry, store};

fn run(conn: &mut rusqlite::Connection, args: &[&str]) {
    let mut argv = vec!["studioledger"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().try_get_matches_from(argv).unwrap();
    match matches.subcommand() {
        Some(("sale", sub)) => sales::handle(conn, sub).unwrap(),
        Some(("expense", sub)) => expenses::handle(conn, sub).unwrap(),
        Some(("invest", sub)) => studioledger::commands::investments::handle(conn, sub).unwrap(),
        Some(("payback", sub)) => payments::handle(conn, sub).unwrap(),
        Some(("partner", sub)) => partners::handle(conn, sub).unwrap(),
        Some(("report", sub)) => {
            let clock = FixedClock(chrono::NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
            reports::handle(conn, sub, &clock).unwrap()
        }
        other => panic!("unexpected {:?}", other.map(|(n, _)| n)),
    }
}

#[test]
fn sale_args_parse_into_entry() {
    let matches = cli::build_cli().get_matches_from([
        "studioledger", "sale", "add", "--date", "2024-03-05", "--type", "pre-wedding", "--hours",
        "2.5", "--amount", "10000", "--received-by", "Om", "--mode", "upi", "--city", " ",
    ]);
    if let Some(("sale", sale_m)) = matches.subcommand() {
        if let Some(("add", add_m)) = sale_m.subcommand() {
            let entry = sales::entry_from_args(add_m).unwrap();
            assert_eq!(entry.shoot_type, ShootType::PreWedding);
            assert_eq!(entry.payment_mode, PaymentMode::Upi);
            assert_eq!(entry.duration_hours, "2.5".parse::<Decimal>().unwrap());
            assert_eq!(entry.city, None);
        } else {
            panic!("no add subcommand");
        }
    } else {
        panic!("no sale subcommand");
    }
}

#[test]
fn unknown_shoot_type_rejected() {
    let matches = cli::build_cli().get_matches_from([
        "studioledger", "sale", "add", "--date", "2024-03-05", "--type", "Wedding", "--hours", "1",
        "--amount", "1", "--received-by", "Om", "--mode", "Cash",
    ]);
    let (_, sale_m) = matches.subcommand().unwrap();
    let (_, add_m) = sale_m.subcommand().unwrap();
    assert!(sales::entry_from_args(add_m).is_err());
}

#[test]
fn report_month_out_of_range_is_a_usage_error() {
    let res = cli::build_cli().try_get_matches_from([
        "studioledger", "report", "summary", "--year", "2024", "--month", "13",
    ]);
    assert!(res.is_err());
}

#[test]
fn workflow_through_handlers() {
    let mut conn = db::open_in_memory().unwrap();
    run(&mut conn, &["invest", "add", "--date", "2024-01-01", "--partner", "Om", "--amount", "5000"]);
    run(&mut conn, &["invest", "add", "--date", "2024-01-02", "--partner", "Sai", "--amount", "3000"]);
    run(&mut conn, &["partner", "set-shares", "--share", "Om=60", "--share", "Sai=40"]);
    run(&mut conn, &[
        "sale", "add", "--date", "2024-03-05", "--type", "Baby", "--hours", "2", "--amount",
        "10000", "--received-by", "Om", "--mode", "Cash",
    ]);
    run(&mut conn, &[
        "expense", "add", "--date", "2024-03-10", "--category", "PROPS", "--amount", "2000",
        "--paid-by", "Sai", "--mode", "UPI",
    ]);
    run(&mut conn, &[
        "payback", "add", "--date", "2024-04-01", "--partner", "Om", "--amount", "1000",
        "--month", "2024-03", "--mode", "Online",
    ]);
    run(&mut conn, &["report", "dues", "--month", "3", "--json"]);
    run(&mut conn, &["report", "dashboard"]);

    let om = registry::find_partner(&conn, "Om").unwrap().unwrap();
    assert_eq!(om.share_percentage, Decimal::from(60));
    assert_eq!(store::list_payments(&conn, None).unwrap()[0].entry.partner_id, om.id);
    assert_eq!(store::current_shoot_id(&conn).unwrap(), 1);
}

#[test]
fn set_shares_rejects_unknown_and_duplicate_names() {
    let mut conn = db::open_in_memory().unwrap();
    registry::get_or_create(&conn, "Om").unwrap();

    for args in [
        vec!["studioledger", "partner", "set-shares", "--share", "Ghost=100"],
        vec!["studioledger", "partner", "set-shares", "--share", "Om=50", "--share", "Om=50"],
    ] {
        let matches = cli::build_cli().get_matches_from(args);
        let (_, partner_m) = matches.subcommand().unwrap();
        let (_, set_m) = partner_m.subcommand().unwrap();
        assert!(partners::shares_from_args(&conn, set_m).is_err());
    }

    let matches = cli::build_cli()
        .get_matches_from(["studioledger", "partner", "set-shares", "--share", "Om=99"]);
    let (_, partner_m) = matches.subcommand().unwrap();
    assert!(partners::handle(&mut conn, partner_m).is_err());
    assert_eq!(registry::share_total(&conn).unwrap(), Decimal::ZERO);
}

#[test]
fn payback_for_unknown_partner_fails() {
    let conn = db::open_in_memory().unwrap();
    let matches = cli::build_cli().get_matches_from([
        "studioledger", "payback", "add", "--date", "2024-04-01", "--partner", "Nobody",
        "--amount", "10", "--month", "2024-03", "--mode", "Cash",
    ]);
    let (_, pay_m) = matches.subcommand().unwrap();
    let (_, add_m) = pay_m.subcommand().unwrap();
    assert!(payments::entry_from_args(&conn, add_m).is_err());
}
