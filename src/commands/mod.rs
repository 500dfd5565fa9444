// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod sales;
pub mod expenses;
pub mod investments;
pub mod payments;
pub mod partners;
pub mod reports;
pub mod doctor;

use anyhow::{Context, Result};
use clap::ArgMatches;

pub(crate) fn required<'a>(m: &'a ArgMatches, id: &str) -> Result<&'a str> {
    m.get_one::<String>(id)
        .map(|s| s.as_str())
        .with_context(|| format!("--{} is required", id))
}

/// Optional free text; blank values count as absent.
pub(crate) fn optional(m: &ArgMatches, id: &str) -> Option<String> {
    m.get_one::<String>(id)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

pub(crate) fn record_id(m: &ArgMatches) -> Result<i64> {
    m.get_one::<i64>("id").copied().context("--id is required")
}
