//! Typed table loaders.
//!
//! Each loader turns a [`CsvTable`](crate::CsvTable) into model entries. Rows
//! that cannot be parsed are skipped and recorded; a table that yields no
//! entries at all is a fatal [`IngestError::NoRows`].

mod official;
mod structured;

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::csv::CsvTable;
use crate::error::{IngestError, Result};

pub use official::{
    parse_official_blocks, parse_official_categories, parse_official_chapters,
    parse_official_subcategories,
};
pub use structured::{
    parse_datasus_codes, parse_structured_blocks, parse_structured_categories,
    parse_structured_chapters, parse_structured_subcategories,
};

/// The tables a run can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    Chapters,
    Blocks,
    Categories,
    Subcategories,
    Datasus,
}

impl TableKind {
    pub const OFFICIAL: [TableKind; 4] = [
        TableKind::Chapters,
        TableKind::Blocks,
        TableKind::Categories,
        TableKind::Subcategories,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TableKind::Chapters => "chapters",
            TableKind::Blocks => "blocks",
            TableKind::Categories => "categories",
            TableKind::Subcategories => "subcategories",
            TableKind::Datasus => "datasus",
        }
    }

    /// Filename fragment of the official DataSUS export.
    pub fn fragment(&self) -> &'static str {
        match self {
            TableKind::Chapters => "CAPITULOS",
            TableKind::Blocks => "GRUPOS",
            TableKind::Categories => "CATEGORIAS",
            TableKind::Subcategories => "SUBCATEGORIAS",
            TableKind::Datasus => "CID10",
        }
    }

    /// Official fragments that contain this one (`SUBCATEGORIAS` for
    /// `CATEGORIAS`).
    pub fn shadowing_fragments(&self) -> Vec<&'static str> {
        let own = self.fragment();
        Self::OFFICIAL
            .iter()
            .map(TableKind::fragment)
            .filter(|other| *other != own && other.contains(own))
            .collect()
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row dropped while loading.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SkippedRow {
    /// 1-based line in the source file (0 when unknown).
    pub line: u64,
    pub reason: String,
}

impl SkippedRow {
    pub fn new(line: u64, reason: impl Into<String>) -> Self {
        Self {
            line,
            reason: reason.into(),
        }
    }
}

/// Per-table load outcome.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TableStats {
    pub table: TableKind,
    pub path: PathBuf,
    pub encoding: &'static str,
    pub delimiter: char,
    pub parsed: usize,
    pub skipped_rows: Vec<SkippedRow>,
}

impl TableStats {
    pub fn skipped(&self) -> usize {
        self.skipped_rows.len()
    }
}

/// Entries of one table plus its stats.
#[derive(Debug, Clone)]
pub struct LoadedTable<T> {
    pub entries: Vec<T>,
    pub stats: TableStats,
}

/// Collects parsed entries and skipped rows for one table.
pub(crate) struct TableBuilder<T> {
    kind: TableKind,
    path: PathBuf,
    encoding: &'static str,
    delimiter: char,
    entries: Vec<T>,
    skipped: Vec<SkippedRow>,
}

impl<T> TableBuilder<T> {
    pub(crate) fn new(kind: TableKind, table: &CsvTable) -> Self {
        Self {
            kind,
            path: table.path.clone(),
            encoding: table.encoding,
            delimiter: table.delimiter,
            entries: Vec::with_capacity(table.records.len()),
            skipped: table.unreadable.clone(),
        }
    }

    pub(crate) fn push(&mut self, entry: T) {
        self.entries.push(entry);
    }

    pub(crate) fn skip(&mut self, line: u64, reason: impl fmt::Display) {
        debug!(table = %self.kind, line, %reason, "skipping row");
        self.skipped.push(SkippedRow::new(line, reason.to_string()));
    }

    /// Finishes the table; fails when nothing was parsed.
    pub(crate) fn finish(self) -> Result<LoadedTable<T>> {
        if self.entries.is_empty() {
            return Err(IngestError::NoRows {
                table: self.kind,
                path: self.path,
            });
        }
        if let Some(first) = self.skipped.first() {
            warn!(
                table = %self.kind,
                path = %self.path.display(),
                skipped = self.skipped.len(),
                first_line = first.line,
                first_reason = %first.reason,
                "skipped malformed rows"
            );
        }
        info!(
            table = %self.kind,
            path = %display_name(&self.path),
            parsed = self.entries.len(),
            skipped = self.skipped.len(),
            "loaded table"
        );
        Ok(LoadedTable {
            stats: TableStats {
                table: self.kind,
                path: self.path,
                encoding: self.encoding,
                delimiter: self.delimiter,
                parsed: self.entries.len(),
                skipped_rows: self.skipped,
            },
            entries: self.entries,
        })
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string()
}

/// First non-empty value among `cells`.
pub(crate) fn first_non_empty<'a>(cells: &[&'a str]) -> &'a str {
    cells.iter().copied().find(|c| !c.is_empty()).unwrap_or("")
}
