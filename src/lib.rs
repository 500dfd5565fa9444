// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cli;
pub mod clock;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod period;
pub mod registry;
pub mod reports;
pub mod store;
pub mod utils;
pub mod validator;

pub use error::{LedgerError, LedgerResult, RecordKind};
pub use period::{DateRange, Month, Window};
