// 🧾 Sales Records - core domain types
// Region, SalesRecord and the in-memory SalesList for one session

use crate::error::ValidationError;
use crate::validate;
use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// REGION
// ============================================================================

/// Region - closed set of sales regions, stored by one-letter code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "w")]
    West,
    #[serde(rename = "m")]
    Mountain,
    #[serde(rename = "c")]
    Central,
    #[serde(rename = "e")]
    East,
}

impl Region {
    /// All regions in display order
    pub const ALL: [Region; 4] = [Region::West, Region::Mountain, Region::Central, Region::East];

    /// Human-readable name for display
    pub fn name(&self) -> &'static str {
        match self {
            Region::West => "West",
            Region::Mountain => "Mountain",
            Region::Central => "Central",
            Region::East => "East",
        }
    }

    /// One-letter code used in files and prompts
    pub fn code(&self) -> &'static str {
        match self {
            Region::West => "w",
            Region::Mountain => "m",
            Region::Central => "c",
            Region::East => "e",
        }
    }

    pub fn from_code(code: &str) -> Option<Region> {
        let code = code.trim();
        Region::ALL.iter().copied().find(|r| r.code() == code)
    }

    /// `('w', 'm', 'c', 'e')`, the way prompts list the valid codes
    pub fn code_list() -> String {
        let codes: Vec<String> = Region::ALL
            .iter()
            .map(|r| format!("'{}'", r.code()))
            .collect();
        format!("({})", codes.join(", "))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// SALES RECORD
// ============================================================================

/// One sale: a positive amount on a date in one region.
///
/// Fields are private so every record in a `SalesList` has passed
/// validation: amount > 0, year in [2000, 2999], known region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesRecord {
    amount: Decimal,
    #[serde(rename = "sales_date")]
    date: NaiveDate,
    region: Region,
}

impl SalesRecord {
    pub fn new(amount: Decimal, date: NaiveDate, region: Region) -> Result<Self, ValidationError> {
        if amount <= Decimal::ZERO {
            return Err(ValidationError::AmountNotPositive);
        }
        validate::check_year(date.year())?;
        Ok(SalesRecord { amount, date, region })
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn quarter(&self) -> u32 {
        validate::quarter_of(self.date.month())
    }

    /// Amount rounded half-up to cents, as shown in reports
    pub fn rounded_amount(&self) -> Decimal {
        round_cents(self.amount)
    }

    /// `[amount, sales_date, region]` as written to CSV
    pub fn to_row(&self) -> [String; 3] {
        [
            self.amount.to_string(),
            self.date.format(validate::DATE_FORMAT).to_string(),
            self.region.code().to_string(),
        ]
    }
}

pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

// ============================================================================
// SALES LIST
// ============================================================================

/// Ordered session list; insertion order is entry order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SalesList {
    records: Vec<SalesRecord>,
}

impl SalesList {
    pub fn new() -> Self {
        SalesList { records: Vec::new() }
    }

    pub fn push(&mut self, record: SalesRecord) {
        self.records.push(record);
    }

    pub fn extend<I: IntoIterator<Item = SalesRecord>>(&mut self, records: I) {
        self.records.extend(records);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SalesRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    /// Sum of amounts, each rounded to cents first
    pub fn total(&self) -> Decimal {
        self.records.iter().map(SalesRecord::rounded_amount).sum()
    }
}

impl From<Vec<SalesRecord>> for SalesList {
    fn from(records: Vec<SalesRecord>) -> Self {
        SalesList { records }
    }
}

impl<'a> IntoIterator for &'a SalesList {
    type Item = &'a SalesRecord;
    type IntoIter = std::slice::Iter<'a, SalesRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
