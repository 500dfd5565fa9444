// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DB_ENV: &str = "STUDIOLEDGER_DB";
pub const BUSY_TIMEOUT_ENV: &str = "STUDIOLEDGER_BUSY_TIMEOUT_MS";
pub const LOG_ENV: &str = "STUDIOLEDGER_LOG";

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_LOG_FILTER: &str = "studioledger=info";

/// Runtime settings resolved from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `None` means the platform data directory.
    pub db_path: Option<PathBuf>,
    pub busy_timeout: Duration,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: None,
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through `lookup` so tests need not touch the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Config::default();
        if let Some(path) = lookup(DB_ENV).filter(|s| !s.trim().is_empty()) {
            cfg.db_path = Some(PathBuf::from(path.trim()));
        }
        if let Some(raw) = lookup(BUSY_TIMEOUT_ENV) {
            let ms: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid {} '{}', expected milliseconds", BUSY_TIMEOUT_ENV, raw))?;
            cfg.busy_timeout = Duration::from_millis(ms);
        }
        if let Some(filter) = lookup(LOG_ENV).filter(|s| !s.trim().is_empty()) {
            cfg.log_filter = filter.trim().to_string();
        }
        Ok(cfg)
    }

    pub fn with_db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_path = Some(path.into());
        self
    }
}
