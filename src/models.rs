// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{LedgerError, LedgerResult, RecordKind};
use crate::period::Month;
use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShootType {
    #[serde(rename = "Pre-Wedding")]
    PreWedding,
    Baby,
    #[serde(rename = "Half-Saree")]
    HalfSaree,
    Maternity,
    #[serde(rename = "Post-Wedding")]
    PostWedding,
    Model,
    Family,
}

impl ShootType {
    pub const ALL: [ShootType; 7] = [
        ShootType::PreWedding,
        ShootType::Baby,
        ShootType::HalfSaree,
        ShootType::Maternity,
        ShootType::PostWedding,
        ShootType::Model,
        ShootType::Family,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ShootType::PreWedding => "Pre-Wedding",
            ShootType::Baby => "Baby",
            ShootType::HalfSaree => "Half-Saree",
            ShootType::Maternity => "Maternity",
            ShootType::PostWedding => "Post-Wedding",
            ShootType::Model => "Model",
            ShootType::Family => "Family",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMode {
    Cash,
    #[serde(rename = "UPI")]
    Upi,
    Online,
}

impl PaymentMode {
    pub const ALL: [PaymentMode; 3] = [PaymentMode::Cash, PaymentMode::Upi, PaymentMode::Online];

    pub fn label(self) -> &'static str {
        match self {
            PaymentMode::Cash => "Cash",
            PaymentMode::Upi => "UPI",
            PaymentMode::Online => "Online",
        }
    }
}

// Both enums share label-based text conversions for the CLI and the database.
macro_rules! labelled_enum {
    ($t:ty, $field:literal) => {
        impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $t {
            type Err = LedgerError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                <$t>::ALL
                    .into_iter()
                    .find(|v| v.label().eq_ignore_ascii_case(s))
                    .ok_or_else(|| {
                        let known: Vec<&str> = <$t>::ALL.iter().map(|v| v.label()).collect();
                        LedgerError::validation(
                            $field,
                            format!("'{}' is not one of {}", s, known.join(", ")),
                        )
                    })
            }
        }

        impl ToSql for $t {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.label()))
            }
        }

        impl FromSql for $t {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|e| FromSqlError::Other(Box::new(e)))
            }
        }
    };
}

labelled_enum!(ShootType, "shoot_type");
labelled_enum!(PaymentMode, "payment_mode");

/// Expense categories the studio usually books against. Any other non-empty
/// category is accepted as well.
pub const EXPENSE_CATEGORIES: &[&str] = &[
    "ADVANCE/SALARY",
    "CIVIL ITEMS",
    "CIVIL WORK",
    "CLOTHES",
    "DRY CLEANING",
    "DRINKS",
    "ELECTRIC ITEMS",
    "ELECTRIC WORK",
    "FOOD",
    "FUEL",
    "FURNITURE",
    "GROCERIES",
    "LABOUR",
    "LAND RENT",
    "MILK TEA",
    "OTHER",
    "PAINT",
    "PET FOOD",
    "POWER BILL",
    "PROMOTIONS",
    "PROPS",
    "REPAIR & MAINTENANCE",
    "SANITARY",
    "TRANSPORT",
    "TRAVEL",
    "WI-FI",
    "WOOD",
];

fn non_negative(field: &'static str, value: Decimal) -> LedgerResult<()> {
    if value < Decimal::ZERO {
        return Err(LedgerError::validation(
            field,
            format!("{} must not be negative", value),
        ));
    }
    Ok(())
}

fn required(field: &'static str, value: &str) -> LedgerResult<()> {
    if value.trim().is_empty() {
        return Err(LedgerError::validation(field, "is required"));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleEntry {
    pub date: NaiveDate,
    pub shoot_type: ShootType,
    pub duration_hours: Decimal,
    pub amount: Decimal,
    pub received_by: String,
    pub payment_mode: PaymentMode,
    #[serde(default)]
    pub cameraman: Option<String>,
    #[serde(default)]
    pub cameraman_mobile: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

impl SaleEntry {
    pub fn validate(&self) -> LedgerResult<()> {
        non_negative("duration_hours", self.duration_hours)?;
        non_negative("amount", self.amount)?;
        required("received_by", &self.received_by)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseEntry {
    pub date: NaiveDate,
    pub category: String,
    pub amount: Decimal,
    pub paid_by: String,
    pub payment_mode: PaymentMode,
    #[serde(default)]
    pub description: Option<String>,
}

impl ExpenseEntry {
    pub fn validate(&self) -> LedgerResult<()> {
        required("category", &self.category)?;
        non_negative("amount", self.amount)?;
        required("paid_by", &self.paid_by)
    }
}

/// Capital put in by a partner. `partner` is the partner's exact name; an
/// unknown name creates the partner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentEntry {
    pub date: NaiveDate,
    pub partner: String,
    pub amount: Decimal,
    #[serde(default)]
    pub description: Option<String>,
}

impl InvestmentEntry {
    pub fn validate(&self) -> LedgerResult<()> {
        required("partner", &self.partner)?;
        non_negative("amount", self.amount)
    }
}

/// Money paid back to a partner. `month_year` decides which period the
/// payment counts against, whatever its `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentEntry {
    pub date: NaiveDate,
    pub partner_id: i64,
    pub amount: Decimal,
    pub month_year: Month,
    pub payment_mode: PaymentMode,
    #[serde(default)]
    pub description: Option<String>,
}

impl PaymentEntry {
    pub fn validate(&self) -> LedgerResult<()> {
        non_negative("amount", self.amount)
    }
}

/// A transaction submitted to the ledger store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entry {
    Sale(SaleEntry),
    Expense(ExpenseEntry),
    Investment(InvestmentEntry),
    PartnerPayment(PaymentEntry),
}

impl Entry {
    pub fn kind(&self) -> RecordKind {
        match self {
            Entry::Sale(_) => RecordKind::Sale,
            Entry::Expense(_) => RecordKind::Expense,
            Entry::Investment(_) => RecordKind::Investment,
            Entry::PartnerPayment(_) => RecordKind::PartnerPayment,
        }
    }

    pub fn validate(&self) -> LedgerResult<()> {
        match self {
            Entry::Sale(e) => e.validate(),
            Entry::Expense(e) => e.validate(),
            Entry::Investment(e) => e.validate(),
            Entry::PartnerPayment(e) => e.validate(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: i64,
    pub shoot_id: i64,
    #[serde(flatten)]
    pub entry: SaleEntry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    #[serde(flatten)]
    pub entry: ExpenseEntry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    pub id: i64,
    pub partner_id: i64,
    #[serde(flatten)]
    pub entry: InvestmentEntry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerPayment {
    pub id: i64,
    #[serde(flatten)]
    pub entry: PaymentEntry,
}

/// A stored transaction of any kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    Sale(Sale),
    Expense(Expense),
    Investment(Investment),
    PartnerPayment(PartnerPayment),
}

impl Record {
    pub fn id(&self) -> i64 {
        match self {
            Record::Sale(r) => r.id,
            Record::Expense(r) => r.id,
            Record::Investment(r) => r.id,
            Record::PartnerPayment(r) => r.id,
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            Record::Sale(r) => r.entry.date,
            Record::Expense(r) => r.entry.date,
            Record::Investment(r) => r.entry.date,
            Record::PartnerPayment(r) => r.entry.date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partner {
    pub id: i64,
    pub name: String,
    pub share_percentage: Decimal,
    pub capital_invested: Decimal,
}

/// Operating result of one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthSummary {
    pub month: Month,
    pub revenue: Decimal,
    pub expenses: Decimal,
    pub profit: Decimal,
}

impl MonthSummary {
    pub fn empty(month: Month) -> Self {
        Self {
            month,
            revenue: Decimal::ZERO,
            expenses: Decimal::ZERO,
            profit: Decimal::ZERO,
        }
    }

    /// `expenses / revenue`, or zero when there was no revenue. Saturates at
    /// `Decimal::MAX`.
    pub fn expense_ratio(&self) -> Decimal {
        if self.revenue.is_zero() {
            Decimal::ZERO
        } else {
            self.expenses
                .checked_div(self.revenue)
                .unwrap_or(Decimal::MAX)
        }
    }
}

/// A partner's entitlement against payments attributed to the same window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerDue {
    pub partner_id: i64,
    pub partner_name: String,
    pub total_share: Decimal,
    pub total_paid: Decimal,
    pub total_due: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerDistribution {
    pub partner_id: i64,
    pub name: String,
    pub share_percentage: Decimal,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReport {
    #[serde(flatten)]
    pub summary: MonthSummary,
    pub partner_distribution: Vec<PartnerDistribution>,
    pub sales_count: usize,
    pub expenses_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyReport {
    pub year: i32,
    pub month: Option<u32>,
    pub monthly_data: Vec<MonthSummary>,
    pub partner_summary: Vec<PartnerDue>,
}
