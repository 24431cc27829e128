// 🗄️ Master Sales File - CSV round-trip for the session's sales list
// Load on start, rewrite on exit, optional restore from a pristine copy

use crate::error::Result;
use crate::records::{SalesList, SalesRecord};
use crate::validate;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const HEADER: [&str; 3] = ["amount", "sales_date", "region"];

/// Result of loading the master file
#[derive(Debug, Default)]
pub struct LoadedSales {
    pub sales: SalesList,
    /// Rows that failed validation and were left out
    pub skipped: usize,
}

/// The master sales CSV (`all_sales.csv` by default)
#[derive(Debug, Clone)]
pub struct SalesFile {
    path: PathBuf,
    delimiter: u8,
    write_header: bool,
}

impl SalesFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SalesFile {
            path: path.into(),
            delimiter: b',',
            write_header: true,
        }
    }

    /// Builder pattern: field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Builder pattern: write a header row on save
    pub fn with_header(mut self, write_header: bool) -> Self {
        self.write_header = write_header;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every valid row. A missing file is an empty list.
    pub fn load(&self) -> Result<LoadedSales> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "sales file missing, starting empty");
            return Ok(LoadedSales::default());
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_path(&self.path)?;

        let mut loaded = LoadedSales::default();
        for (idx, result) in reader.records().enumerate() {
            let row = match result {
                Ok(row) => row,
                Err(e) if e.is_io_error() => return Err(e.into()),
                // Undecodable row: skip it like any other bad row
                Err(e) => {
                    warn!(error = %e, path = %self.path.display(), "skipping unreadable sales row");
                    loaded.skipped += 1;
                    continue;
                }
            };
            let line = row.position().map(|p| p.line()).unwrap_or(idx as u64 + 1);

            if idx == 0 && is_header(&row) {
                continue;
            }
            if row.iter().all(|field| field.trim().is_empty()) {
                continue;
            }

            match parse_row(&row) {
                Some(record) => loaded.sales.push(record),
                None => {
                    warn!(line, path = %self.path.display(), "skipping invalid sales row");
                    loaded.skipped += 1;
                }
            }
        }

        info!(
            count = loaded.sales.len(),
            skipped = loaded.skipped,
            "loaded sales from {}",
            self.path.display()
        );
        Ok(loaded)
    }

    /// Truncate and rewrite the whole file
    pub fn save(&self, sales: &SalesList) -> Result<()> {
        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_path(&self.path)?;

        if self.write_header {
            writer.write_record(HEADER)?;
        }
        for record in sales {
            writer.write_record(record.to_row())?;
        }
        writer.flush()?;

        info!(count = sales.len(), "saved sales to {}", self.path.display());
        Ok(())
    }

    /// Create the file (header only) if it does not exist yet
    pub fn initialize(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }
        debug!(path = %self.path.display(), "initializing empty sales file");
        self.save(&SalesList::new())
    }

    /// Replace the file with the content of `backup`. A missing backup is ignored.
    pub fn restore_from(&self, backup: &Path) -> Result<bool> {
        if !backup.exists() {
            debug!(backup = %backup.display(), "no backup to restore from");
            return Ok(false);
        }
        fs::copy(backup, &self.path)?;
        info!("restored {} from {}", self.path.display(), backup.display());
        Ok(true)
    }
}

fn is_header(row: &StringRecord) -> bool {
    row.get(0)
        .map(|field| field.trim().eq_ignore_ascii_case(HEADER[0]))
        .unwrap_or(false)
}

fn parse_row(row: &StringRecord) -> Option<SalesRecord> {
    if row.len() != 3 {
        return None;
    }
    let amount = validate::parse_amount(&row[0]).ok()?;
    let date = validate::parse_iso_date(&row[1]).ok()?;
    let region = validate::parse_region(&row[2]).ok()?;
    SalesRecord::new(amount, date, region).ok()
}
