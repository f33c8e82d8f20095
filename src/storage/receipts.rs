use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::receipt::FILE_STAMP_FORMAT;

/// Writes receipt documents into a single output directory.
#[derive(Debug, Clone)]
pub struct ReceiptStore {
    output_dir: PathBuf,
    extension: String,
}

impl ReceiptStore {
    /// Open the store, creating the output directory if it does not exist yet.
    pub fn open(output_dir: impl Into<PathBuf>, extension: impl Into<String>) -> io::Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        Ok(Self {
            output_dir,
            extension: extension.into(),
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// File name for a receipt generated at the given moment.
    /// Example: `Bill_20240309_140507.txt`
    pub fn file_name(&self, generated_at: NaiveDateTime) -> String {
        format!(
            "Bill_{}.{}",
            generated_at.format(FILE_STAMP_FORMAT),
            self.extension
        )
    }

    pub fn path_for(&self, generated_at: NaiveDateTime) -> PathBuf {
        self.output_dir.join(self.file_name(generated_at))
    }

    /// Write a receipt. Existing files are never replaced: a name collision
    /// fails with `ErrorKind::AlreadyExists`.
    pub fn write(&self, content: &str, generated_at: NaiveDateTime) -> io::Result<PathBuf> {
        let path = self.path_for(generated_at);
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)?;
        file.write_all(content.as_bytes())?;
        file.flush()?;
        Ok(path)
    }
}
