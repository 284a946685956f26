//! Hierarchy coverage counts.

use std::collections::BTreeMap;

use cid_model::{OutputRow, SourceTag};

/// Row counts of a consolidated output.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct CoverageReport {
    pub total: usize,
    /// Rows missing a block or a chapter.
    pub unresolved: usize,
    pub missing_block: usize,
    pub missing_chapter: usize,
    pub by_source: BTreeMap<SourceTag, usize>,
}

impl CoverageReport {
    pub fn from_rows(rows: &[OutputRow]) -> Self {
        let mut report = Self {
            total: rows.len(),
            ..Self::default()
        };
        for row in rows {
            if !row.has_block() {
                report.missing_block += 1;
            }
            if !row.has_chapter() {
                report.missing_chapter += 1;
            }
            if row.is_unresolved() {
                report.unresolved += 1;
            }
            *report.by_source.entry(row.fonte).or_default() += 1;
        }
        report
    }

    pub fn resolved(&self) -> usize {
        self.total - self.unresolved
    }

    pub fn count_for(&self, source: SourceTag) -> usize {
        self.by_source.get(&source).copied().unwrap_or(0)
    }
}
