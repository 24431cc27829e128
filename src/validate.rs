// ✅ Validation - range and set-membership checks for sales input
// Shared by the console prompts, the batch reader and the master file loader

use crate::error::ValidationError;
use crate::records::Region;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

pub const MIN_YEAR: i32 = 2000;
pub const MAX_YEAR: i32 = 2999;
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// CALENDAR HELPERS
// ============================================================================

pub fn is_leap_year(year: i32) -> bool {
    (year % 400 == 0) || (year % 4 == 0 && year % 100 != 0)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Quarter 1-4 for a month 1-12, 0 for anything else
pub fn quarter_of(month: u32) -> u32 {
    match month {
        1..=12 => (month - 1) / 3 + 1,
        _ => 0,
    }
}

// ============================================================================
// FIELD CHECKS
// ============================================================================

pub fn check_year(year: i32) -> Result<(), ValidationError> {
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        Ok(())
    } else {
        Err(ValidationError::YearOutOfRange {
            min: MIN_YEAR,
            max: MAX_YEAR,
        })
    }
}

/// Inclusive range check used by the integer prompts
pub fn check_range(item: &str, value: i64, low: i64, high: i64) -> Result<i64, ValidationError> {
    if (low..=high).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::OutOfRange {
            item: capitalize(item),
            low,
            high,
        })
    }
}

pub fn parse_int(item: &str, entry: &str) -> Result<i64, ValidationError> {
    entry
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::NotAnInteger(item.to_lowercase()))
}

pub fn parse_amount(entry: &str) -> Result<Decimal, ValidationError> {
    let entry = entry.trim();
    let amount = Decimal::from_str(entry)
        .or_else(|_| Decimal::from_scientific(entry))
        .map_err(|_| ValidationError::NotANumber(entry.to_string()))?;

    if amount <= Decimal::ZERO {
        return Err(ValidationError::AmountNotPositive);
    }
    Ok(amount)
}

/// Parse a strict `yyyy-mm-dd` entry.
///
/// The shape is checked before the calendar so `2024-2-3` or `24-02-03`
/// are format errors, not range errors.
pub fn parse_iso_date(entry: &str) -> Result<NaiveDate, ValidationError> {
    let entry = entry.trim();
    let bad_format = || ValidationError::BadDateFormat(entry.to_string());

    let bytes = entry.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shape_ok {
        return Err(bad_format());
    }

    let year: i32 = entry[..4].parse().map_err(|_| bad_format())?;
    let month: u32 = entry[5..7].parse().map_err(|_| bad_format())?;
    let day: u32 = entry[8..].parse().map_err(|_| bad_format())?;

    if !(1..=12).contains(&month) || !(1..=days_in_month(year, month)).contains(&day) {
        return Err(bad_format());
    }
    check_year(year)?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(bad_format)
}

pub fn parse_region(entry: &str) -> Result<Region, ValidationError> {
    Region::from_code(entry).ok_or_else(|| ValidationError::UnknownRegion {
        code: entry.trim().to_string(),
        expected: Region::code_list(),
    })
}

pub(crate) fn capitalize(item: &str) -> String {
    let mut chars = item.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leap_years() {
        assert!(is_leap_year(2000));
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(2100));
        assert!(!is_leap_year(2023));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2023, 4), 30);
        assert_eq!(days_in_month(2023, 12), 31);
    }

    #[test]
    fn test_quarter_boundaries() {
        assert_eq!(quarter_of(1), 1);
        assert_eq!(quarter_of(3), 1);
        assert_eq!(quarter_of(4), 2);
        assert_eq!(quarter_of(9), 3);
        assert_eq!(quarter_of(12), 4);
        assert_eq!(quarter_of(0), 0);
        assert_eq!(quarter_of(13), 0);
    }

    #[test]
    fn test_parse_amount_must_be_positive_number() {
        assert_eq!(parse_amount(" 12.50 ").unwrap(), Decimal::new(1250, 2));
        assert_eq!(parse_amount("0"), Err(ValidationError::AmountNotPositive));
        assert_eq!(parse_amount("-3"), Err(ValidationError::AmountNotPositive));
        assert!(matches!(parse_amount("abc"), Err(ValidationError::NotANumber(_))));
        assert!(matches!(parse_amount(""), Err(ValidationError::NotANumber(_))));
    }

    #[test]
    fn test_parse_iso_date_accepts_valid_dates() {
        let d = parse_iso_date("2024-02-29").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert!(parse_iso_date("2000-01-01").is_ok());
        assert!(parse_iso_date("2999-12-31").is_ok());
    }

    #[test]
    fn test_parse_iso_date_rejects_bad_shape_and_calendar() {
        for entry in ["2024-2-03", "24-02-03", "2024/02/03", "2024-02-3x", "2023-02-29", "2024-13-01", "2024-00-10"] {
            assert!(
                matches!(parse_iso_date(entry), Err(ValidationError::BadDateFormat(_))),
                "{} should be a format error",
                entry
            );
        }
    }

    #[test]
    fn test_parse_iso_date_rejects_year_out_of_range() {
        assert!(matches!(
            parse_iso_date("1999-12-31"),
            Err(ValidationError::YearOutOfRange { .. })
        ));
        assert!(matches!(
            parse_iso_date("3000-01-01"),
            Err(ValidationError::YearOutOfRange { .. })
        ));
    }

    #[test]
    fn test_parse_region() {
        assert_eq!(parse_region("c").unwrap(), Region::Central);
        let err = parse_region("x").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Region must be one of the following: ('w', 'm', 'c', 'e')."
        );
    }

    #[test]
    fn test_integer_range_checks() {
        assert_eq!(check_range("month", 12, 1, 12).unwrap(), 12);
        let err = check_range("month", 13, 1, 12).unwrap_err();
        assert_eq!(err.to_string(), "Month must be between 1 and 12.");
        assert!(matches!(parse_int("day", "x"), Err(ValidationError::NotAnInteger(_))));
        assert_eq!(parse_int("day", " 7 ").unwrap(), 7);
    }
}
