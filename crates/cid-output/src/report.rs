//! JSON run report.

use std::io::Write;
use std::path::Path;

use cid_core::{Consolidation, CoverageReport, DataQuality};
use cid_ingest::TableStats;
use serde::Serialize;
use tracing::info;

use crate::atomic::write_atomically;
use crate::error::{OutputError, Result};

/// Machine-readable summary of one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport<'a> {
    pub mode: &'a str,
    pub as_of: String,
    /// `None` for dry runs.
    pub output: Option<&'a Path>,
    pub tables: &'a [TableStats],
    pub coverage: &'a CoverageReport,
    pub data_quality: &'a DataQuality,
    pub duplicate_leaves: usize,
}

impl<'a> RunReport<'a> {
    pub fn new(
        mode: &'a str,
        as_of: impl Into<String>,
        tables: &'a [TableStats],
        consolidation: &'a Consolidation,
    ) -> Self {
        Self {
            mode,
            as_of: as_of.into(),
            output: None,
            tables,
            coverage: &consolidation.coverage,
            data_quality: &consolidation.quality,
            duplicate_leaves: consolidation.duplicate_leaves,
        }
    }

    pub fn with_output(mut self, output: &'a Path) -> Self {
        self.output = Some(output);
        self
    }
}

/// Writes `report` as pretty-printed JSON.
pub fn write_report(path: &Path, report: &RunReport<'_>) -> Result<()> {
    write_atomically(path, |writer| {
        serde_json::to_writer_pretty(&mut *writer, report).map_err(|source| OutputError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        writer
            .write_all(b"\n")
            .map_err(|e| OutputError::io("write", path, e))
    })?;
    info!(path = %path.display(), "wrote run report");
    Ok(())
}
