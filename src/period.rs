// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Calendar months, date ranges and report windows.

use crate::error::{LedgerError, LedgerResult};
use chrono::{Datelike, NaiveDate};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A calendar month, rendered and stored as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    pub fn new(year: i32, month: u32) -> LedgerResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(LedgerError::validation(
                "month",
                format!("month number {} is outside 1-12", month),
            ));
        }
        if !(1..=9999).contains(&year) {
            return Err(LedgerError::validation(
                "year",
                format!("year {} is outside 1-9999", year),
            ));
        }
        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn number(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        // year and month are range-checked at construction
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn next(&self) -> Month {
        if self.month == 12 {
            Month {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Month {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn previous(&self) -> Month {
        if self.month == 1 {
            Month {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Month {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn last_day(&self) -> NaiveDate {
        self.next().first_day().pred_opt().unwrap_or(NaiveDate::MAX)
    }

    pub fn range(&self) -> DateRange {
        DateRange {
            start: self.first_day(),
            end: self.next().first_day(),
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid =
            || LedgerError::validation("month", format!("'{}' is not a YYYY-MM month", s));
        let (y, m) = s.trim().split_once('-').ok_or_else(invalid)?;
        if y.len() != 4 || m.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = y.parse().map_err(|_| invalid())?;
        let month: u32 = m.parse().map_err(|_| invalid())?;
        Month::new(year, month)
    }
}

impl TryFrom<String> for Month {
    type Error = LedgerError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Month> for String {
    fn from(m: Month) -> Self {
        m.to_string()
    }
}

impl ToSql for Month {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for Month {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// Half-open date range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> LedgerResult<Self> {
        if end < start {
            return Err(LedgerError::validation(
                "range",
                format!("end {} is before start {}", end, start),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    /// Last date inside the range, `None` when the range is empty. Stored
    /// dates are compared against this inclusive bound, which stays a
    /// four-digit year even when `end` is 10000-01-01.
    pub fn last_day(&self) -> Option<NaiveDate> {
        if self.end <= self.start {
            None
        } else {
            self.end.pred_opt()
        }
    }
}

/// The period a report covers: a single month, or all twelve months of a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    Month(Month),
    Year(i32),
}

impl Window {
    /// Builds the window for `(year, optional month)` report arguments.
    pub fn new(year: i32, month: Option<u32>) -> LedgerResult<Self> {
        match month {
            Some(m) => Ok(Window::Month(Month::new(year, m)?)),
            None => {
                Month::new(year, 1)?;
                Ok(Window::Year(year))
            }
        }
    }

    pub fn year(&self) -> i32 {
        match self {
            Window::Month(m) => m.year(),
            Window::Year(y) => *y,
        }
    }

    pub fn month_number(&self) -> Option<u32> {
        match self {
            Window::Month(m) => Some(m.number()),
            Window::Year(_) => None,
        }
    }

    /// Months covered by the window, in calendar order.
    pub fn months(&self) -> Vec<Month> {
        match self {
            Window::Month(m) => vec![*m],
            Window::Year(y) => (1..=12).map(|m| Month { year: *y, month: m }).collect(),
        }
    }

    pub fn first_month(&self) -> Month {
        match self {
            Window::Month(m) => *m,
            Window::Year(y) => Month { year: *y, month: 1 },
        }
    }

    pub fn last_month(&self) -> Month {
        match self {
            Window::Month(m) => *m,
            Window::Year(y) => Month {
                year: *y,
                month: 12,
            },
        }
    }

    pub fn date_range(&self) -> DateRange {
        DateRange {
            start: self.first_month().first_day(),
            end: self.last_month().next().first_day(),
        }
    }

    pub fn contains_month(&self, month: Month) -> bool {
        month >= self.first_month() && month <= self.last_month()
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Window::Month(m) => write!(f, "{}", m),
            Window::Year(y) => write!(f, "{:04}", y),
        }
    }
}
