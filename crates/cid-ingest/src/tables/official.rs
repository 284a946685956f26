//! Parsers for the official DataSUS tables.
//!
//! Column layout of the export:
//!
//! | Table           | Code columns        | Text columns              |
//! |-----------------|---------------------|---------------------------|
//! | `CAPITULOS`     | `CATINIC`, `CATFIM` | `DESCRICAO`, `DESCRABREV` |
//! | `GRUPOS`        | `CATINIC`, `CATFIM` | `DESCRICAO`, `DESCRABREV` |
//! | `CATEGORIAS`    | `CAT`               | `DESCRICAO`, `DESCRABREV` |
//! | `SUBCATEGORIAS` | `SUBCAT`            | `DESCRICAO`, `DESCRABREV` |
//!
//! Subcategory codes come without the dot (`A009`). A `SUBCAT` whose fourth
//! position is blank (`A01 `) collapses to the category form and is kept.
//! The short `DESCRABREV` is used as title when present, the full
//! `DESCRICAO` as description.

use cid_model::{BlockEntry, CategoryEntry, ChapterEntry, CidCode, CodeRange, SubcategoryEntry};

use tracing::debug;

use crate::csv::{CsvRecord, CsvTable};
use crate::error::Result;

use super::{LoadedTable, TableBuilder, TableKind, first_non_empty};

const RANGE_START: &[&str] = &["CATINIC"];
const RANGE_END: &[&str] = &["CATFIM"];
const DESCRIPTION: &[&str] = &["DESCRICAO"];
const SHORT_DESCRIPTION: &[&str] = &["DESCRABREV"];

/// Title and description columns of one table.
struct TextColumns {
    description: Option<usize>,
    short: Option<usize>,
}

impl TextColumns {
    fn locate(table: &CsvTable) -> Result<Self> {
        let description = table.column_index(DESCRIPTION);
        let short = table.column_index(SHORT_DESCRIPTION);
        if description.is_none() && short.is_none() {
            // Report the canonical column name.
            table.require_column(DESCRIPTION)?;
        }
        Ok(Self { description, short })
    }

    /// `(title, description)`; each falls back to the other.
    fn read<'a>(&self, record: &'a CsvRecord) -> (&'a str, &'a str) {
        let description = self.description.map_or("", |i| record.get(i));
        let short = self.short.map_or("", |i| record.get(i));
        (
            first_non_empty(&[short, description]),
            first_non_empty(&[description, short]),
        )
    }
}

fn parse_ranges<T>(
    table: &CsvTable,
    kind: TableKind,
    build: impl Fn(CodeRange, &str) -> T,
) -> Result<LoadedTable<T>> {
    let start = table.require_column(RANGE_START)?;
    let end = table.require_column(RANGE_END)?;
    let text = TextColumns::locate(table)?;
    let mut builder = TableBuilder::new(kind, table);

    for record in &table.records {
        match CodeRange::from_bounds(record.get(start), record.get(end)) {
            Ok(range) => {
                let (title, description) = text.read(record);
                builder.push(build(range, first_non_empty(&[description, title])));
            }
            Err(error) => builder.skip(record.line, error),
        }
    }
    builder.finish()
}

/// Parses `CID-10-CAPITULOS`.
pub fn parse_official_chapters(table: &CsvTable) -> Result<LoadedTable<ChapterEntry>> {
    parse_ranges(table, TableKind::Chapters, |range, title| {
        ChapterEntry::new(range, title)
    })
}

/// Parses `CID-10-GRUPOS`.
pub fn parse_official_blocks(table: &CsvTable) -> Result<LoadedTable<BlockEntry>> {
    parse_ranges(table, TableKind::Blocks, |range, title| {
        BlockEntry::new(range, title)
    })
}

/// Parses `CID-10-CATEGORIAS`.
pub fn parse_official_categories(table: &CsvTable) -> Result<LoadedTable<CategoryEntry>> {
    let code_col = table.require_column(&["CAT"])?;
    let text = TextColumns::locate(table)?;
    let mut builder = TableBuilder::new(TableKind::Categories, table);

    for record in &table.records {
        let entry = CidCode::parse(record.get(code_col)).and_then(|code| {
            let (title, description) = text.read(record);
            CategoryEntry::new(code, title, description)
        });
        match entry {
            Ok(entry) => builder.push(entry),
            Err(error) => builder.skip(record.line, error),
        }
    }
    builder.finish()
}

/// Parses `CID-10-SUBCATEGORIAS`.
pub fn parse_official_subcategories(table: &CsvTable) -> Result<LoadedTable<SubcategoryEntry>> {
    let code_col = table.require_column(&["SUBCAT"])?;
    let text = TextColumns::locate(table)?;
    let mut builder = TableBuilder::new(TableKind::Subcategories, table);

    for record in &table.records {
        match CidCode::parse(record.get(code_col)) {
            Ok(code) => {
                if !code.is_subcategory() {
                    debug!(line = record.line, %code, "subcategory row in category form");
                }
                let (title, description) = text.read(record);
                builder.push(SubcategoryEntry::new(code, title, description));
            }
            Err(error) => builder.skip(record.line, error),
        }
    }
    builder.finish()
}
