use std::path::PathBuf;

use thiserror::Error;

use crate::domain::ItemError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ItemError),

    #[error("No items added yet, nothing to save")]
    EmptyLedger,

    #[error("Could not write receipt {}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not prepare output directory {}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Input errors leave the session untouched; the user can simply retry.
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}
