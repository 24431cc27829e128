// ⚙️ Configuration - where files live and how they are written
// TOML file (optional) → command-line overrides → built-in defaults

use crate::error::{Result, SalesError};
use crate::import_log::ImportLog;
use crate::importer::Importer;
use crate::store::SalesFile;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "sales-importer.toml";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding the master file, its backup and the import log
    pub data_dir: PathBuf,

    /// Directory batch files are imported from (defaults to `data_dir`)
    pub import_dir: Option<PathBuf>,

    pub sales_file: String,
    pub sales_backup: String,
    pub imported_log: String,

    /// Single ASCII character
    pub delimiter: String,

    /// Write `amount,sales_date,region` as the first row on save
    pub write_header: bool,

    /// Default tracing filter when RUST_LOG is unset
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from("."),
            import_dir: None,
            sales_file: "all_sales.csv".to_string(),
            sales_backup: "all_sales_copy.csv".to_string(),
            imported_log: "imported_files.txt".to_string(),
            delimiter: ",".to_string(),
            write_header: true,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load `path` if given (must exist), else `sales-importer.toml` if present,
    /// else defaults.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::from_file(fallback)
                } else {
                    debug!("no config file, using defaults");
                    Ok(Config::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Config> {
        let text = fs::read_to_string(path).map_err(|e| {
            SalesError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml(&text)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Config> {
        let config: Config = toml::from_str(text)?;
        config.delimiter_byte()?;
        Ok(config)
    }

    pub fn delimiter_byte(&self) -> Result<u8> {
        match self.delimiter.as_bytes() {
            [b] if b.is_ascii() && *b != b'"' && *b != b'\n' => Ok(*b),
            _ => Err(SalesError::Config(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            ))),
        }
    }

    pub fn sales_path(&self) -> PathBuf {
        self.data_dir.join(&self.sales_file)
    }

    pub fn backup_path(&self) -> PathBuf {
        self.data_dir.join(&self.sales_backup)
    }

    pub fn imported_log_path(&self) -> PathBuf {
        self.data_dir.join(&self.imported_log)
    }

    pub fn import_dir(&self) -> &Path {
        self.import_dir.as_deref().unwrap_or(&self.data_dir)
    }

    pub fn sales_file_handle(&self) -> Result<SalesFile> {
        Ok(SalesFile::new(self.sales_path())
            .with_delimiter(self.delimiter_byte()?)
            .with_header(self.write_header))
    }

    pub fn import_log(&self) -> ImportLog {
        ImportLog::new(self.imported_log_path())
    }

    pub fn importer(&self) -> Result<Importer> {
        Ok(Importer::new(self.import_dir(), self.import_log()).with_delimiter(self.delimiter_byte()?))
    }

    /// Restore the master file from its backup and clear the import log.
    /// Returns whether a backup was found.
    pub fn reset(&self) -> Result<bool> {
        let restored = self.sales_file_handle()?.restore_from(&self.backup_path())?;
        self.import_log().clear()?;
        info!(restored, "reset sales file and import log");
        Ok(restored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.sales_path(), PathBuf::from("./all_sales.csv"));
        assert_eq!(config.import_dir(), Path::new("."));
        assert_eq!(config.delimiter_byte().unwrap(), b',');
        assert!(config.write_header);
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config = Config::from_toml(
            r#"
data_dir = "/srv/sales"
import_dir = "/srv/incoming"
delimiter = ";"
"#,
        )
        .unwrap();

        assert_eq!(config.sales_path(), PathBuf::from("/srv/sales/all_sales.csv"));
        assert_eq!(config.imported_log_path(), PathBuf::from("/srv/sales/imported_files.txt"));
        assert_eq!(config.import_dir(), Path::new("/srv/incoming"));
        assert_eq!(config.delimiter_byte().unwrap(), b';');
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_rejects_bad_delimiter_and_unknown_keys() {
        assert!(matches!(
            Config::from_toml("delimiter = \"::\""),
            Err(SalesError::Config(_))
        ));
        assert!(matches!(
            Config::from_toml("colour = \"blue\""),
            Err(SalesError::Config(_))
        ));
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(Some(&dir.path().join("missing.toml")));
        assert!(matches!(result, Err(SalesError::Config(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales-importer.toml");
        fs::write(&path, "write_header = false\nsales_file = \"sales.csv\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert!(!config.write_header);
        assert_eq!(config.sales_file, "sales.csv");
    }
}
