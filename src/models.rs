use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::error::{KasboekError, Result};

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: Option<i64>,
    pub code: String,
    pub date: NaiveDate,
    pub to_account_number: String,
    pub payee: String,
    pub memo: String,
    pub inflow: Option<Decimal>,
    pub outflow: Option<Decimal>,
    pub user_id: Option<i64>,
    pub category_id: Option<i64>,
}

impl Transaction {
    /// Model-level validation, run before every persist.
    pub fn validate(&self) -> Result<()> {
        if self.code.is_empty() {
            return Err(KasboekError::Validation(
                "transaction has no dedup code".to_string(),
            ));
        }
        if self.user_id.is_none() {
            return Err(KasboekError::Validation(
                "transaction has no owning user".to_string(),
            ));
        }
        match (self.inflow, self.outflow) {
            (Some(_), Some(_)) => Err(KasboekError::Validation(
                "both inflow and outflow are set".to_string(),
            )),
            (None, None) => Err(KasboekError::Validation(
                "neither inflow nor outflow is set".to_string(),
            )),
            (Some(amount), None) | (None, Some(amount)) if amount < Decimal::ZERO => Err(
                KasboekError::Validation(format!("negative amount: {amount}")),
            ),
            _ => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Month
// ---------------------------------------------------------------------------

/// A calendar month, parsed from `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Month {
    pub year: i32,
    pub month: u32,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn previous(&self) -> Month {
        if self.month == 1 {
            Month::new(self.year - 1, 12)
        } else {
            Month::new(self.year, self.month - 1)
        }
    }

    pub fn next(&self) -> Month {
        if self.month == 12 {
            Month::new(self.year + 1, 1)
        } else {
            Month::new(self.year, self.month + 1)
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = KasboekError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || KasboekError::Other(format!("invalid month '{s}', expected YYYY-MM"));
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        Ok(Month { year, month })
    }
}

// ---------------------------------------------------------------------------
// Monthly expense summary
// ---------------------------------------------------------------------------

/// Per-category reporting record for one month. Sums cover the target month,
/// totals and the date range cover all time for the owning user.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct MonthlyExpenseSummary {
    pub category_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub month: Month,
    pub sum_outflow: Decimal,
    pub sum_inflow: Decimal,
    pub total_outflow: Decimal,
    pub total_inflow: Decimal,
    pub min_transaction_date: Option<NaiveDate>,
    pub max_transaction_date: Option<NaiveDate>,
}

impl MonthlyExpenseSummary {
    pub fn balance_of_month(&self) -> Decimal {
        self.sum_inflow - self.sum_outflow
    }

    pub fn average_monthly_outflow(&self) -> Decimal {
        match self.months_spanned() {
            Some(months) => self.total_outflow / Decimal::from(months),
            None => Decimal::ZERO,
        }
    }

    pub fn average_monthly_inflow(&self) -> Decimal {
        match self.months_spanned() {
            Some(months) => self.total_inflow / Decimal::from(months),
            None => Decimal::ZERO,
        }
    }

    pub fn average_monthly_balance(&self) -> Decimal {
        self.average_monthly_inflow() - self.average_monthly_outflow()
    }

    /// Whole calendar months spanned from the earliest to the latest transaction,
    /// both endpoint months included. None when the category has no transactions.
    fn months_spanned(&self) -> Option<i64> {
        let min = self.min_transaction_date?;
        let max = self.max_transaction_date?;
        Some(
            i64::from(max.year() - min.year()) * 12
                + i64::from(max.month() as i32 - min.month() as i32)
                + 1,
        )
    }
}

// ---------------------------------------------------------------------------
// Import tally
// ---------------------------------------------------------------------------

/// Outcome counters for one import run.
#[derive(Debug, Default)]
pub struct FileParseResult {
    pub successful: usize,
    pub duplicate: usize,
    pub faulty: usize,
}
