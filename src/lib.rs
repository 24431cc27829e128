// Sales Data Importer - Core Library
// Exposes all modules for use in the CLI and tests

pub mod error;
pub mod validate;
pub mod records;
pub mod store;
pub mod import_log;
pub mod batch;
pub mod importer;
pub mod report;
pub mod prompt;
pub mod console;
pub mod config;

// Re-export commonly used types
pub use error::{FileNameError, Result, SalesError, ValidationError};
pub use records::{Region, SalesList, SalesRecord};
pub use store::{LoadedSales, SalesFile};
pub use import_log::ImportLog;
pub use batch::{read_batch, BatchFileName, BatchRow, NAMING_CONVENTION};
pub use importer::{ImportOutcome, Importer};
pub use report::{format_amount, SalesReport};
pub use prompt::Prompter;
pub use console::{Command, Session};
pub use config::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
