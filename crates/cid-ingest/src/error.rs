//! Error types for CID-10 table ingestion.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::tables::TableKind;

/// Errors that abort loading. Malformed rows are not errors; they are
/// skipped and counted in [`crate::TableStats`].
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Directory not found or not readable.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Discovery Errors ===
    /// No CSV file name contains the expected fragment.
    #[error("no CSV file containing '{fragment}' in {dir}")]
    SourceNotFound { fragment: String, dir: PathBuf },

    /// More than one CSV file name matches the fragment.
    #[error("several CSV files match '{fragment}': {}", join_paths(.candidates))]
    AmbiguousSource {
        fragment: String,
        candidates: Vec<PathBuf>,
    },

    // === Table Errors ===
    /// Failed to read the header row.
    #[error("failed to parse CSV header in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Required column not found in the header row.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },

    /// Every row was empty or malformed.
    #[error("no valid rows parsed from {table} table {path}")]
    NoRows { table: TableKind, path: PathBuf },
}

impl IngestError {
    pub(crate) fn file_read(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::FileRead {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    /// Whether the error means an expected input is missing.
    pub fn is_source_not_found(&self) -> bool {
        matches!(
            self,
            Self::DirectoryNotFound { .. }
                | Self::FileNotFound { .. }
                | Self::SourceNotFound { .. }
                | Self::AmbiguousSource { .. }
        )
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
