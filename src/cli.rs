// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn list_cmd() -> Command {
    json_args(
        Command::new("list")
            .about("List records by date, oldest first")
            .arg(Arg::new("from").long("from").help("First date YYYY-MM-DD"))
            .arg(Arg::new("to").long("to").help("Last date YYYY-MM-DD (inclusive)")),
    )
}

fn id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .value_parser(value_parser!(i64))
        .help("Record id")
}

fn date_arg() -> Arg {
    Arg::new("date").long("date").required(true).help("YYYY-MM-DD")
}

fn amount_arg() -> Arg {
    Arg::new("amount").long("amount").required(true)
}

fn mode_arg() -> Arg {
    Arg::new("mode")
        .long("mode")
        .required(true)
        .help("Payment mode: Cash, UPI or Online")
}

fn sale_args(cmd: Command) -> Command {
    cmd.arg(date_arg())
        .arg(
            Arg::new("type")
                .long("type")
                .required(true)
                .help("Shoot type, e.g. Pre-Wedding, Baby, Family"),
        )
        .arg(Arg::new("hours").long("hours").required(true).help("Shoot duration in hours"))
        .arg(amount_arg())
        .arg(Arg::new("received-by").long("received-by").required(true))
        .arg(mode_arg())
        .arg(Arg::new("cameraman").long("cameraman"))
        .arg(Arg::new("cameraman-mobile").long("cameraman-mobile"))
        .arg(Arg::new("customer").long("customer"))
        .arg(Arg::new("city").long("city"))
}

fn expense_args(cmd: Command) -> Command {
    cmd.arg(date_arg())
        .arg(Arg::new("category").long("category").required(true))
        .arg(amount_arg())
        .arg(Arg::new("paid-by").long("paid-by").required(true))
        .arg(mode_arg())
        .arg(Arg::new("description").long("description"))
}

fn investment_args(cmd: Command) -> Command {
    cmd.arg(date_arg())
        .arg(
            Arg::new("partner")
                .long("partner")
                .required(true)
                .help("Partner name, matched exactly; a new name adds a partner at 0%"),
        )
        .arg(amount_arg())
        .arg(Arg::new("description").long("description"))
}

fn payment_args(cmd: Command) -> Command {
    cmd.arg(date_arg())
        .arg(
            Arg::new("partner")
                .long("partner")
                .required(true)
                .help("Existing partner name, matched exactly"),
        )
        .arg(amount_arg())
        .arg(
            Arg::new("month")
                .long("month")
                .required(true)
                .help("Month the payment is for, YYYY-MM"),
        )
        .arg(mode_arg())
        .arg(Arg::new("description").long("description"))
}

fn record_cmd(name: &'static str, about: &'static str, args: fn(Command) -> Command) -> Command {
    Command::new(name)
        .about(about)
        .subcommand(args(Command::new("add").about("Record a new entry")))
        .subcommand(args(Command::new("edit").about("Replace an existing entry").arg(id_arg())))
        .subcommand(list_cmd())
}

fn year_arg() -> Arg {
    Arg::new("year")
        .long("year")
        .value_parser(value_parser!(i32))
        .help("Calendar year (default: current year)")
}

fn month_number_arg() -> Arg {
    Arg::new("month")
        .long("month")
        .value_parser(value_parser!(u32).range(1..=12))
        .help("Month number 1-12; omit for the whole year")
}

pub fn build_cli() -> Command {
    Command::new("studioledger")
        .version(crate_version!())
        .about("Sales, expenses and partner-equity reconciliation for a photo studio")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .help("SQLite database path (overrides STUDIOLEDGER_DB)"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(record_cmd("sale", "Shoot sales", sale_args))
        .subcommand(record_cmd("expense", "Business expenses", expense_args))
        .subcommand(record_cmd("invest", "Partner capital investments", investment_args))
        .subcommand(record_cmd("payback", "Payments made to partners", payment_args))
        .subcommand(
            Command::new("partner")
                .about("Partners and their shares")
                .subcommand(json_args(Command::new("list").about("List partners")))
                .subcommand(
                    Command::new("set-shares")
                        .about("Set every partner's share at once; shares must total 100")
                        .arg(
                            Arg::new("share")
                                .long("share")
                                .required(true)
                                .action(ArgAction::Append)
                                .help("NAME=PERCENT, repeat for each partner"),
                        ),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Financial rollups")
                .subcommand(json_args(
                    Command::new("summary")
                        .about("Revenue, expenses and profit per month")
                        .arg(year_arg())
                        .arg(month_number_arg()),
                ))
                .subcommand(json_args(
                    Command::new("dues")
                        .about("Partner entitlement, payments and dues")
                        .arg(year_arg())
                        .arg(month_number_arg()),
                ))
                .subcommand(json_args(
                    Command::new("monthly")
                        .about("One month with partner distribution")
                        .arg(Arg::new("month").long("month").required(true).help("YYYY-MM")),
                ))
                .subcommand(json_args(
                    Command::new("yearly")
                        .about("Monthly rows plus partner dues")
                        .arg(year_arg())
                        .arg(month_number_arg()),
                ))
                .subcommand(json_args(
                    Command::new("dashboard")
                        .about("Headline figures for one month (default: last month)")
                        .arg(Arg::new("month").long("month").help("YYYY-MM")),
                )),
        )
        .subcommand(Command::new("doctor").about("Check ledger integrity"))
}
