// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use studioledger::clock::SystemClock;
use studioledger::config::Config;
use studioledger::{cli, commands, db, logging};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let mut cfg = Config::from_env()?;
    if let Some(path) = matches.get_one::<String>("db") {
        cfg = cfg.with_db_path(path);
    }
    logging::init(&cfg.log_filter);

    let mut conn = db::open_or_init(&cfg)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path(&cfg)?.display());
        }
        Some(("sale", sub)) => commands::sales::handle(&mut conn, sub)?,
        Some(("expense", sub)) => commands::expenses::handle(&mut conn, sub)?,
        Some(("invest", sub)) => commands::investments::handle(&mut conn, sub)?,
        Some(("payback", sub)) => commands::payments::handle(&mut conn, sub)?,
        Some(("partner", sub)) => commands::partners::handle(&mut conn, sub)?,
        Some(("report", sub)) => commands::reports::handle(&conn, sub, &SystemClock)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
