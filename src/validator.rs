// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Share-sum checks run before any partner share is written.

use crate::error::{LedgerError, LedgerResult};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

pub const SHARE_TOTAL: Decimal = Decimal::ONE_HUNDRED;

/// 0.01 percentage points.
pub const SHARE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

pub fn is_balanced(sum: Decimal) -> bool {
    (sum - SHARE_TOTAL).abs() <= SHARE_TOLERANCE
}

/// Checks a proposed share assignment against the full set of known partners
/// and returns the mapping to persist, with every known partner present.
///
/// Known partners missing from `proposed` are proposed at 0. Unknown partner
/// ids, values outside 0-100 and totals more than 0.01 away from 100 are
/// rejected with the submitted total attached.
pub fn validate(
    proposed: &BTreeMap<i64, Decimal>,
    known: &[i64],
) -> LedgerResult<BTreeMap<i64, Decimal>> {
    let sum: Decimal = proposed.values().copied().sum();

    let unknown: Vec<String> = proposed
        .keys()
        .filter(|id| !known.contains(id))
        .map(|id| id.to_string())
        .collect();
    if !unknown.is_empty() {
        return Err(LedgerError::invariant(
            sum,
            format!("unknown partner id(s): {}", unknown.join(", ")),
        ));
    }

    if let Some((id, pct)) = proposed
        .iter()
        .find(|(_, pct)| **pct < Decimal::ZERO || **pct > SHARE_TOTAL)
    {
        return Err(LedgerError::invariant(
            sum,
            format!("share {}% for partner {} is outside 0-100", pct, id),
        ));
    }

    let full: BTreeMap<i64, Decimal> = known
        .iter()
        .map(|id| (*id, proposed.get(id).copied().unwrap_or(Decimal::ZERO)))
        .collect();

    if !is_balanced(sum) {
        let omitted = known.iter().filter(|id| !proposed.contains_key(id)).count();
        let detail = if omitted > 0 {
            format!("{} partner(s) not listed were counted at 0%", omitted)
        } else {
            "adjust the shares so they add up to 100".to_string()
        };
        return Err(LedgerError::invariant(sum, detail));
    }

    Ok(full)
}
