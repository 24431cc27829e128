// ⚠️ Error types for the sales importer
// User-input failures (ValidationError, FileNameError) are kept apart from
// I/O failures so callers can re-prompt on the former and abort on the latter.

use thiserror::Error;

/// A single field failed its range or set-membership check.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid number. Please try again.")]
    NotANumber(String),

    #[error("Amount must be greater than zero.")]
    AmountNotPositive,

    #[error("{0} is not in a valid date format.")]
    BadDateFormat(String),

    #[error("Year of the date must be between {min} and {max}.")]
    YearOutOfRange { min: i32, max: i32 },

    #[error("Region must be one of the following: {expected}.")]
    UnknownRegion { code: String, expected: String },

    #[error("{item} must be between {low} and {high}.")]
    OutOfRange { item: String, low: i64, high: i64 },

    #[error("Invalid {0}. Please enter an integer.")]
    NotAnInteger(String),
}

/// A batch file name does not follow `sales_qn_yyyy_r.csv`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FileNameError {
    #[error("Filename '{name}' doesn't follow the expected format of {convention}.")]
    BadFormat { name: String, convention: &'static str },

    #[error("Filename '{name}' doesn't include one of the following region codes: {expected}.")]
    UnknownRegion { name: String, expected: String },
}

#[derive(Error, Debug)]
pub enum SalesError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("CSV error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    FileName(#[from] FileNameError),

    /// Standard input reached end of file while a value was expected.
    #[error("Input closed while waiting for {0}")]
    InputClosed(String),
}

impl From<toml::de::Error> for SalesError {
    fn from(err: toml::de::Error) -> Self {
        SalesError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SalesError>;
