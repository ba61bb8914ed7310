//! Persistence error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or writing persisted JSON files.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The file or its directory could not be read or written.
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        /// File being accessed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file contents were not valid JSON for the expected shape.
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        /// File being parsed
        path: PathBuf,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// No data directory could be determined for this platform.
    #[error("no data directory available; pass --data-dir")]
    NoDataDir,
}

impl StoreError {
    /// Returns true if the file exists but holds unusable data.
    #[must_use]
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}
