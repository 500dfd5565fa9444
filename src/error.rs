// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Error model for the ledger core.

use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

pub type LedgerResult<T> = Result<T, LedgerError>;

/// The four transaction kinds held by the ledger store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Sale,
    Expense,
    Investment,
    PartnerPayment,
}

impl RecordKind {
    pub fn table(self) -> &'static str {
        match self {
            RecordKind::Sale => "sales",
            RecordKind::Expense => "expenses",
            RecordKind::Investment => "investments",
            RecordKind::PartnerPayment => "partner_payments",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RecordKind::Sale => "sale",
            RecordKind::Expense => "expense",
            RecordKind::Investment => "investment",
            RecordKind::PartnerPayment => "partner payment",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum LedgerError {
    /// Malformed or out-of-range input, rejected before any write.
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("{kind} {id} not found")]
    NotFound { kind: RecordKind, id: i64 },

    /// A share edit that would break the 100% total. Nothing was written.
    #[error("partner shares must total 100% (submitted total: {sum}%): {detail}")]
    InvariantViolation { sum: Decimal, detail: String },

    /// Stored shares no longer total 100%. Raised by reports, never retried.
    #[error("stored partner shares total {sum}% instead of 100%; refusing to compute dues")]
    InconsistentState { sum: Decimal },

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl LedgerError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// A total that no longer fits in a decimal.
    pub fn overflow(field: &'static str) -> Self {
        Self::validation(field, "total is too large to compute")
    }

    pub fn not_found(kind: RecordKind, id: i64) -> Self {
        Self::NotFound { kind, id }
    }

    pub fn invariant(sum: Decimal, detail: impl Into<String>) -> Self {
        Self::InvariantViolation {
            sum,
            detail: detail.into(),
        }
    }

    /// Integrity failures that indicate corruption outside the engine.
    pub fn is_fatal(&self) -> bool {
        matches!(self, LedgerError::InconsistentState { .. })
    }
}
