use std::path::PathBuf;

use cid_core::{CoverageReport, DataQuality};
use cid_ingest::TableStats;

/// What a finished run produced, for the summary.
#[derive(Debug)]
pub struct RunOutcome {
    pub mode: &'static str,
    pub as_of: String,
    /// `None` for dry runs.
    pub output: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub tables: Vec<TableStats>,
    pub coverage: CoverageReport,
    pub quality: DataQuality,
    pub duplicate_leaves: usize,
}

impl RunOutcome {
    pub fn skipped_rows(&self) -> usize {
        self.tables.iter().map(TableStats::skipped).sum()
    }
}
