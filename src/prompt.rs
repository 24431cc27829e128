// ⌨️ Prompts - re-ask until the entry is valid
// Generic over BufRead/Write so the console can be driven from tests

use crate::error::{Result, SalesError, ValidationError};
use crate::records::{Region, SalesRecord};
use crate::validate::{self, MAX_YEAR, MIN_YEAR};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::io::{BufRead, Write};

/// Labels are padded to this width so entries line up
const LABEL_W: usize = 20;

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Print `prompt` and read one line without its line ending.
    /// `None` at end of input.
    pub fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    pub fn say(&mut self, message: impl AsRef<str>) -> Result<()> {
        writeln!(self.output, "{}", message.as_ref())?;
        Ok(())
    }

    /// Loop until `parse` accepts the entry, printing each rejection
    fn ask<T>(
        &mut self,
        label: &str,
        what: &str,
        mut parse: impl FnMut(&str) -> std::result::Result<T, ValidationError>,
    ) -> Result<T> {
        let prompt = format!("{:<LABEL_W$}", label);
        loop {
            let entry = self
                .read_line(&prompt)?
                .ok_or_else(|| SalesError::InputClosed(what.to_string()))?;
            match parse(&entry) {
                Ok(value) => return Ok(value),
                Err(e) => self.say(e.to_string())?,
            }
        }
    }

    pub fn input_amount(&mut self) -> Result<Decimal> {
        self.ask("Amount:", "amount", validate::parse_amount)
    }

    pub fn input_int(&mut self, item: &str, low: i64, high: i64) -> Result<i64> {
        let label = format!("{} ({}-{}):", validate::capitalize(item), low, high);
        self.ask(&label, item, |entry| {
            let value = validate::parse_int(item, entry)?;
            validate::check_range(item, value, low, high)
        })
    }

    pub fn input_year(&mut self) -> Result<i32> {
        let year = self.input_int("year", MIN_YEAR as i64, MAX_YEAR as i64)?;
        Ok(year as i32)
    }

    pub fn input_month(&mut self) -> Result<u32> {
        Ok(self.input_int("month", 1, 12)? as u32)
    }

    pub fn input_day(&mut self, year: i32, month: u32) -> Result<u32> {
        let max_day = validate::days_in_month(year, month);
        Ok(self.input_int("day", 1, max_day as i64)? as u32)
    }

    pub fn input_date(&mut self) -> Result<NaiveDate> {
        self.ask("Date (yyyy-mm-dd):", "date", validate::parse_iso_date)
    }

    pub fn input_region(&mut self) -> Result<Region> {
        let label = format!("Region {}:", Region::code_list());
        self.ask(&label, "region", |entry| validate::parse_region(&entry.to_lowercase()))
    }

    /// Amount, then year, month and day separately, then region
    pub fn from_input1(&mut self) -> Result<SalesRecord> {
        let amount = self.input_amount()?;
        let year = self.input_year()?;
        let month = self.input_month()?;
        let day = self.input_day(year, month)?;
        let region = self.input_region()?;

        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| ValidationError::BadDateFormat(format!("{:04}-{:02}-{:02}", year, month, day)))?;
        Ok(SalesRecord::new(amount, date, region)?)
    }

    /// Amount, then an ISO date, then region
    pub fn from_input2(&mut self) -> Result<SalesRecord> {
        let amount = self.input_amount()?;
        let date = self.input_date()?;
        let region = self.input_region()?;
        Ok(SalesRecord::new(amount, date, region)?)
    }
}
