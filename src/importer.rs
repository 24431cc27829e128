// 📥 Import Pipeline - name check → region → already imported → read → commit
// A batch is all-or-nothing: one bad row rejects the whole file

use crate::batch::{read_batch, BatchFileName};
use crate::error::{FileNameError, Result};
use crate::import_log::ImportLog;
use crate::records::SalesList;
use crate::report::SalesReport;
use std::path::PathBuf;
use tracing::{info, warn};

/// What happened to one `import` request
#[derive(Debug, Clone, PartialEq)]
pub enum ImportOutcome {
    Imported { file_name: String, count: usize, preview: SalesReport },
    BadFileName(FileNameError),
    UnknownRegion(FileNameError),
    AlreadyImported(String),
    NotFound(PathBuf),
    BadData { file_name: String, preview: SalesReport },
    Empty(String),
}

impl ImportOutcome {
    /// Console message for this outcome
    pub fn message(&self) -> String {
        match self {
            ImportOutcome::Imported { .. } => "Imported sales added to list.".to_string(),
            ImportOutcome::BadFileName(e) | ImportOutcome::UnknownRegion(e) => e.to_string(),
            ImportOutcome::AlreadyImported(name) => {
                format!("File '{}' has already been imported.", name)
            }
            ImportOutcome::NotFound(path) => format!("File {} not found.", path.display()),
            ImportOutcome::BadData { file_name, .. } => format!(
                "File '{}' contains bad data.\nPlease correct the data in the file and try again.",
                file_name
            ),
            ImportOutcome::Empty(_) => "No valid sales to import.".to_string(),
        }
    }

    /// Batch preview worth showing before the message
    pub fn preview(&self) -> Option<&SalesReport> {
        match self {
            ImportOutcome::Imported { preview, .. } | ImportOutcome::BadData { preview, .. } => {
                Some(preview)
            }
            _ => None,
        }
    }

    pub fn is_imported(&self) -> bool {
        matches!(self, ImportOutcome::Imported { .. })
    }
}

pub struct Importer {
    import_dir: PathBuf,
    log: ImportLog,
    delimiter: u8,
}

impl Importer {
    pub fn new(import_dir: impl Into<PathBuf>, log: ImportLog) -> Self {
        Importer {
            import_dir: import_dir.into(),
            log,
            delimiter: b',',
        }
    }

    /// Builder pattern: field delimiter of batch files
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn log(&self) -> &ImportLog {
        &self.log
    }

    /// Import `file_name` from the import directory into `sales`.
    ///
    /// User-input problems come back as an `ImportOutcome`; only I/O and
    /// CSV failures are errors, and `sales` is untouched when they happen.
    pub fn import(&self, file_name: &str, sales: &mut SalesList) -> Result<ImportOutcome> {
        let file_name = file_name.trim();

        let batch_name = match BatchFileName::parse(file_name) {
            Ok(name) => name,
            Err(e @ FileNameError::BadFormat { .. }) => return Ok(ImportOutcome::BadFileName(e)),
            Err(e @ FileNameError::UnknownRegion { .. }) => {
                return Ok(ImportOutcome::UnknownRegion(e))
            }
        };

        if self.log.contains(batch_name.as_str())? {
            info!(file = %batch_name, "batch already imported");
            return Ok(ImportOutcome::AlreadyImported(batch_name.to_string()));
        }

        let path = self.import_dir.join(batch_name.as_str());
        if !path.is_file() {
            warn!(path = %path.display(), "batch file not found");
            return Ok(ImportOutcome::NotFound(path));
        }

        let rows = read_batch(&path, &batch_name, self.delimiter)?;
        let preview = SalesReport::from_batch(&rows);

        if preview.has_bad_data {
            let bad = rows.iter().filter(|r| r.has_bad_data()).count();
            warn!(file = %batch_name, bad_rows = bad, "rejecting batch with bad data");
            return Ok(ImportOutcome::BadData {
                file_name: batch_name.to_string(),
                preview,
            });
        }

        let records: Vec<_> = rows.iter().filter_map(|r| r.to_record()).collect();
        if records.is_empty() {
            return Ok(ImportOutcome::Empty(batch_name.to_string()));
        }

        // Log first: a failed log write must not leave the rows half-committed
        self.log.record(batch_name.as_str())?;
        let count = records.len();
        sales.extend(records);

        info!(file = %batch_name, count, "imported batch");
        Ok(ImportOutcome::Imported {
            file_name: batch_name.to_string(),
            count,
            preview,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Importer) {
        let dir = tempfile::tempdir().unwrap();
        let log = ImportLog::new(dir.path().join("imported_files.txt"));
        let importer = Importer::new(dir.path(), log);
        (dir, importer)
    }

    #[test]
    fn test_import_good_batch_then_refuse_second_time() {
        let (dir, importer) = setup();
        fs::write(dir.path().join("sales_q1_2024_w.csv"), "100,2024-01-10\n250.5,2024-03-31\n").unwrap();
        let mut sales = SalesList::new();

        let first = importer.import("sales_q1_2024_w.csv", &mut sales).unwrap();
        assert!(first.is_imported());
        assert_eq!(first.message(), "Imported sales added to list.");
        assert_eq!(sales.len(), 2);
        assert!(importer.log().contains("sales_q1_2024_w.csv").unwrap());

        let second = importer.import("sales_q1_2024_w.csv", &mut sales).unwrap();
        assert_eq!(second, ImportOutcome::AlreadyImported("sales_q1_2024_w.csv".to_string()));
        assert_eq!(sales.len(), 2, "second import must not add rows");
    }

    #[test]
    fn test_bad_file_name_and_region_have_distinct_outcomes() {
        let (_dir, importer) = setup();
        let mut sales = SalesList::new();

        let outcome = importer.import("sales.csv", &mut sales).unwrap();
        assert!(matches!(outcome, ImportOutcome::BadFileName(_)));
        assert_eq!(
            outcome.message(),
            "Filename 'sales.csv' doesn't follow the expected format of sales_qn_yyyy_r.csv."
        );

        let outcome = importer.import("sales_q1_2024_z.csv", &mut sales).unwrap();
        assert!(matches!(outcome, ImportOutcome::UnknownRegion(_)));
    }

    #[test]
    fn test_missing_batch_file() {
        let (dir, importer) = setup();
        let mut sales = SalesList::new();

        let outcome = importer.import("sales_q2_2024_c.csv", &mut sales).unwrap();
        assert_eq!(outcome, ImportOutcome::NotFound(dir.path().join("sales_q2_2024_c.csv")));
        assert!(!importer.log().contains("sales_q2_2024_c.csv").unwrap());
    }

    #[test]
    fn test_bad_row_rejects_whole_file() {
        let (dir, importer) = setup();
        fs::write(dir.path().join("sales_q3_2024_e.csv"), "10,2024-07-01\nabc,2024-07-02\n").unwrap();
        let mut sales = SalesList::new();

        let outcome = importer.import("sales_q3_2024_e.csv", &mut sales).unwrap();
        match &outcome {
            ImportOutcome::BadData { preview, .. } => {
                assert_eq!(preview.lines.len(), 2);
                assert!(preview.lines[1].bad);
            }
            other => panic!("expected BadData, got {:?}", other),
        }
        assert!(outcome.preview().is_some());
        assert!(sales.is_empty());
        assert!(!importer.log().contains("sales_q3_2024_e.csv").unwrap());
    }

    #[test]
    fn test_empty_batch_is_not_logged() {
        let (dir, importer) = setup();
        fs::write(dir.path().join("sales_q4_2024_m.csv"), "amount,sales_date\n").unwrap();
        let mut sales = SalesList::new();

        let outcome = importer.import("sales_q4_2024_m.csv", &mut sales).unwrap();
        assert_eq!(outcome.message(), "No valid sales to import.");
        assert!(!importer.log().contains("sales_q4_2024_m.csv").unwrap());
    }

    #[test]
    fn test_semicolon_batches() {
        let (dir, importer) = setup();
        let importer = importer.with_delimiter(b';');
        fs::write(dir.path().join("sales_q1_2025_c.csv"), "5;2025-01-01;c\n").unwrap();
        let mut sales = SalesList::new();

        assert!(importer.import("sales_q1_2025_c.csv", &mut sales).unwrap().is_imported());
        assert_eq!(sales.len(), 1);
    }
}
