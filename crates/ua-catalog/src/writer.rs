//! Flushes accumulated records to a JSON-lines file.

use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::WriteMode;
use crate::pipeline::Accumulator;
use crate::types::{CatalogError, CatalogResult};

/// Writes one JSON object per line, newline-joined without a trailing newline.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    path: PathBuf,
    mode: WriteMode,
    unique: bool,
}

impl OutputWriter {
    /// Target `folder/name`. The folder must already exist and be a directory.
    pub fn new(folder: impl AsRef<Path>, name: &str) -> CatalogResult<Self> {
        let folder = folder.as_ref();
        if !folder.exists() {
            return Err(CatalogError::Configuration(format!(
                "output folder does not exist: {}",
                folder.display()
            )));
        }
        if !folder.is_dir() {
            return Err(CatalogError::Configuration(format!(
                "output path is not a folder: {}",
                folder.display()
            )));
        }
        if name.trim().is_empty() {
            return Err(CatalogError::Configuration(
                "output file name is empty".to_string(),
            ));
        }

        Ok(Self {
            path: folder.join(name),
            mode: WriteMode::Overwrite,
            unique: false,
        })
    }

    pub fn with_mode(mut self, mode: WriteMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write every accumulated record and return the number of lines written.
    ///
    /// Nothing is written, and an existing file is left untouched, when there
    /// are no records.
    pub fn write(&self, accumulator: &Accumulator) -> CatalogResult<usize> {
        let mut seen = HashSet::new();
        let mut lines = Vec::with_capacity(accumulator.len());
        for record in accumulator.records() {
            if self.unique && !seen.insert(record.useragent.as_str()) {
                continue;
            }
            lines.push(record.to_json_line()?);
        }

        if lines.is_empty() {
            tracing::info!("no user agents to write, leaving {} untouched", self.path.display());
            return Ok(0);
        }

        let payload = lines.join("\n");
        match self.mode {
            WriteMode::Overwrite => std::fs::write(&self.path, payload)?,
            WriteMode::Append => {
                let needs_separator = std::fs::metadata(&self.path)
                    .map(|m| m.len() > 0)
                    .unwrap_or(false);
                let mut file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&self.path)?;
                if needs_separator {
                    file.write_all(b"\n")?;
                }
                file.write_all(payload.as_bytes())?;
            }
        }

        tracing::info!("wrote {} user agents to {}", lines.len(), self.path.display());
        Ok(lines.len())
    }
}
