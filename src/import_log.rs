// 📒 Import Log - batch files already imported, one name per line
// Keeps `import` idempotent across sessions

use crate::error::Result;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ImportLog {
    path: PathBuf,
}

impl ImportLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ImportLog { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All recorded names, trimmed, in the order they were imported
    pub fn entries(&self) -> Result<Vec<String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Whether `file_name` was already imported. A missing log means no.
    pub fn contains(&self, file_name: &str) -> Result<bool> {
        let name = file_name.trim();
        Ok(self.entries()?.iter().any(|entry| entry == name))
    }

    pub fn record(&self, file_name: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", file_name.trim())?;
        debug!(file_name, log = %self.path.display(), "recorded import");
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        fs::write(&self.path, "")?;
        debug!(log = %self.path.display(), "cleared import log");
        Ok(())
    }
}
