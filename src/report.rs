// 📊 Sales Report - numbered table with quarter, region and total
// Built from the session list or from a batch preview; bad rows are flagged

use crate::batch::BatchRow;
use crate::records::{round_cents, SalesRecord};
use crate::validate;
use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;

const INDEX_W: usize = 5;
const DATE_W: usize = 12;
const QUARTER_W: usize = 9;
const REGION_W: usize = 12;
const AMOUNT_W: usize = 17;
const LINE_W: usize = INDEX_W + DATE_W + QUARTER_W + REGION_W + AMOUNT_W;

/// Placeholder for a field that failed validation
pub const BAD_FIELD: &str = "?";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportLine {
    pub index: usize,
    pub date: Option<String>,
    pub quarter: Option<u32>,
    pub region: Option<String>,
    pub amount: Option<Decimal>,
    pub bad: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesReport {
    pub lines: Vec<ReportLine>,
    /// Sum of the good amounts, each rounded to cents
    pub total: Decimal,
    pub has_bad_data: bool,
}

impl SalesReport {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a SalesRecord>,
    {
        let lines = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| ReportLine {
                index: i + 1,
                date: Some(record.date().format(validate::DATE_FORMAT).to_string()),
                quarter: Some(record.quarter()),
                region: Some(record.region().name().to_string()),
                amount: Some(record.rounded_amount()),
                bad: false,
            })
            .collect();
        Self::from_lines(lines)
    }

    pub fn from_batch(rows: &[BatchRow]) -> Self {
        let lines = rows
            .iter()
            .enumerate()
            .map(|(i, row)| ReportLine {
                index: i + 1,
                date: row.date.map(|d| d.format(validate::DATE_FORMAT).to_string()),
                quarter: row.date.map(|d| validate::quarter_of(d.month())),
                region: row.region.map(|r| r.name().to_string()),
                amount: row.amount.map(round_cents),
                bad: row.has_bad_data(),
            })
            .collect();
        Self::from_lines(lines)
    }

    fn from_lines(lines: Vec<ReportLine>) -> Self {
        let total = lines.iter().filter_map(|line| line.amount).sum();
        let has_bad_data = lines.iter().any(|line| line.bad);
        SalesReport {
            lines,
            total,
            has_bad_data,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Fixed-width table for the console
    pub fn render(&self) -> String {
        if self.is_empty() {
            return "No sales to view.\n".to_string();
        }

        let rule = "-".repeat(LINE_W);
        let mut out = String::new();
        out.push_str(&format!(
            "{:<INDEX_W$}{:<DATE_W$}{:<QUARTER_W$}{:<REGION_W$}{:>AMOUNT_W$}\n",
            "", "Date", "Quarter", "Region", "Amount"
        ));
        out.push_str(&rule);
        out.push('\n');

        for line in &self.lines {
            let num = if line.bad {
                format!("{}.*", line.index)
            } else {
                format!("{}.", line.index)
            };
            let quarter = line
                .quarter
                .map(|q| q.to_string())
                .unwrap_or_else(|| BAD_FIELD.to_string());
            let amount = line
                .amount
                .map(format_amount)
                .unwrap_or_else(|| BAD_FIELD.to_string());
            out.push_str(&format!(
                "{:<INDEX_W$}{:<DATE_W$}{:<QUARTER_W$}{:<REGION_W$}{:>AMOUNT_W$}\n",
                num,
                line.date.as_deref().unwrap_or(BAD_FIELD),
                quarter,
                line.region.as_deref().unwrap_or(BAD_FIELD),
                amount,
            ));
        }

        out.push_str(&rule);
        out.push('\n');
        out.push_str(&format!(
            "{:<width$}{:>AMOUNT_W$}\n",
            "TOTAL",
            format_amount(self.total),
            width = LINE_W - AMOUNT_W
        ));
        out
    }
}

/// `1234567.5` -> `1,234,567.50`
pub fn format_amount(amount: Decimal) -> String {
    let fixed = format!("{:.2}", round_cents(amount));
    let (sign, digits) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}{}.{}", sign, grouped, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Region, SalesList};
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn record(amount: &str, y: i32, m: u32, d: u32, region: Region) -> SalesRecord {
        SalesRecord::new(dec(amount), NaiveDate::from_ymd_opt(y, m, d).unwrap(), region).unwrap()
    }

    #[test]
    fn test_format_amount_grouping() {
        assert_eq!(format_amount(dec("0")), "0.00");
        assert_eq!(format_amount(dec("999.999")), "1,000.00");
        assert_eq!(format_amount(dec("1234567.5")), "1,234,567.50");
        assert_eq!(format_amount(dec("-1234.5")), "-1,234.50");
        assert_eq!(format_amount(dec("100")), "100.00");
    }

    #[test]
    fn test_empty_report() {
        let report = SalesReport::from_records(&SalesList::new());
        assert!(report.is_empty());
        assert_eq!(report.render(), "No sales to view.\n");
    }

    #[test]
    fn test_report_lines_and_total() {
        let mut sales = SalesList::new();
        sales.push(record("1234.565", 2024, 2, 1, Region::West));
        sales.push(record("10", 2024, 11, 30, Region::East));

        let report = SalesReport::from_records(&sales);
        assert_eq!(report.lines.len(), 2);
        assert_eq!(report.lines[0].quarter, Some(1));
        assert_eq!(report.lines[1].quarter, Some(4));
        assert_eq!(report.total, dec("1244.57"));
        assert!(!report.has_bad_data);

        let text = report.render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].contains("Date") && lines[0].ends_with("Amount"));
        assert_eq!(lines[1], "-".repeat(LINE_W));
        assert!(lines[2].starts_with("1.   2024-02-01  1        West"));
        assert!(lines[2].ends_with("1,234.57"));
        assert!(lines[5].starts_with("TOTAL"));
        assert!(lines[5].ends_with("1,244.57"));
        assert_eq!(lines[5].len(), LINE_W);
    }

    #[test]
    fn test_batch_report_flags_bad_rows() {
        let rows = vec![
            BatchRow {
                line_number: 1,
                raw_amount: "5".to_string(),
                raw_date: "2024-01-01".to_string(),
                amount: Some(dec("5")),
                date: NaiveDate::from_ymd_opt(2024, 1, 1),
                region: Some(Region::Central),
            },
            BatchRow {
                line_number: 2,
                raw_amount: "x".to_string(),
                raw_date: "2024-01-02".to_string(),
                amount: None,
                date: NaiveDate::from_ymd_opt(2024, 1, 2),
                region: Some(Region::Central),
            },
        ];

        let report = SalesReport::from_batch(&rows);
        assert!(report.has_bad_data);
        assert_eq!(report.total, dec("5"));

        let text = report.render();
        assert!(text.contains("2.*  2024-01-02"));
        assert!(text.lines().nth(3).unwrap().ends_with('?'));
    }

    #[test]
    fn test_report_serializes_to_json() {
        let mut sales = SalesList::new();
        sales.push(record("12.5", 2024, 5, 5, Region::Mountain));

        let json = serde_json::to_value(SalesReport::from_records(&sales)).unwrap();
        assert_eq!(json["lines"][0]["region"], "Mountain");
        assert_eq!(json["lines"][0]["date"], "2024-05-05");
        assert_eq!(json["has_bad_data"], false);
    }
}
