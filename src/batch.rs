// 📦 Batch Files - importable `sales_qn_yyyy_r.csv` files
// File name parsing plus a row reader that keeps bad fields visible

use crate::error::{FileNameError, Result};
use crate::records::{Region, SalesRecord};
use crate::validate;
use chrono::NaiveDate;
use csv::ReaderBuilder;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

/// Naming convention as shown to users
pub const NAMING_CONVENTION: &str = "sales_qn_yyyy_r.csv";

fn file_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^sales_q([1-4])_(\d{4})_([a-z])\.csv$").expect("Invalid batch file name regex")
    })
}

// ============================================================================
// FILE NAME
// ============================================================================

/// A file name that follows the naming convention, with its parts decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFileName {
    name: String,
    quarter: u32,
    year: i32,
    region: Region,
}

impl BatchFileName {
    /// Parse `sales_q<1-4>_<yyyy>_<w|m|c|e>.csv`.
    ///
    /// Shape errors and unknown region letters are reported separately so
    /// the user is told which part of the name is wrong.
    pub fn parse(name: &str) -> std::result::Result<Self, FileNameError> {
        let name = name.trim();
        let bad_format = || FileNameError::BadFormat {
            name: name.to_string(),
            convention: NAMING_CONVENTION,
        };

        let caps = file_name_pattern().captures(name).ok_or_else(bad_format)?;

        let quarter: u32 = caps[1].parse().map_err(|_| bad_format())?;
        let year: i32 = caps[2].parse().map_err(|_| bad_format())?;
        if validate::check_year(year).is_err() {
            return Err(bad_format());
        }

        let region = Region::from_code(&caps[3]).ok_or_else(|| FileNameError::UnknownRegion {
            name: name.to_string(),
            expected: format!(
                "[{}]",
                Region::ALL
                    .iter()
                    .map(|r| format!("'{}'", r.code()))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        })?;

        Ok(BatchFileName {
            name: name.to_string(),
            quarter,
            year,
            region,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    pub fn quarter(&self) -> u32 {
        self.quarter
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn region(&self) -> Region {
        self.region
    }
}

impl fmt::Display for BatchFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// ============================================================================
// ROWS
// ============================================================================

/// One row of a batch file. `None` fields failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchRow {
    pub line_number: usize,
    pub raw_amount: String,
    pub raw_date: String,
    pub amount: Option<Decimal>,
    pub date: Option<NaiveDate>,
    pub region: Option<Region>,
}

impl BatchRow {
    pub fn has_bad_data(&self) -> bool {
        self.to_record().is_none()
    }

    pub fn to_record(&self) -> Option<SalesRecord> {
        SalesRecord::new(self.amount?, self.date?, self.region?).ok()
    }

    fn malformed(line_number: usize, raw_amount: &str, raw_date: &str) -> Self {
        BatchRow {
            line_number,
            raw_amount: raw_amount.to_string(),
            raw_date: raw_date.to_string(),
            amount: None,
            date: None,
            region: None,
        }
    }
}

/// Read every row of a batch file.
///
/// Rows are `amount,date` (region from the file name) or
/// `amount,date,region`. A leading `amount,...` header row is skipped.
pub fn read_batch(path: &Path, file_name: &BatchFileName, delimiter: u8) -> Result<Vec<BatchRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_path(path)?;

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        let line_number = record.position().map(|p| p.line() as usize).unwrap_or(idx + 1);

        if idx == 0 && record.get(0).map(|f| f.trim().eq_ignore_ascii_case("amount")).unwrap_or(false) {
            continue;
        }
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let raw_amount = record.get(0).unwrap_or("");
        let raw_date = record.get(1).unwrap_or("");

        let region = match record.len() {
            2 => Some(file_name.region()),
            3 => validate::parse_region(&record[2].to_lowercase()).ok(),
            n => {
                debug!(line_number, fields = n, "wrong number of fields");
                rows.push(BatchRow::malformed(line_number, raw_amount, raw_date));
                continue;
            }
        };

        rows.push(BatchRow {
            line_number,
            raw_amount: raw_amount.to_string(),
            raw_date: raw_date.to_string(),
            amount: validate::parse_amount(raw_amount).ok(),
            date: validate::parse_iso_date(raw_date).ok(),
            region,
        });
    }

    debug!(file = %file_name, rows = rows.len(), "read batch file");
    Ok(rows)
}
