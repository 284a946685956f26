//! Input-mode resolution and table loading.

use std::path::{Path, PathBuf};

use cid_model::{DatasusEntry, HierarchyTables};
use tracing::{info, info_span};

use crate::csv::{CsvTable, Delimiter, TableFormat, TextEncoding, read_delimited};
use crate::discovery::discover_official_sources;
use crate::error::Result;
use crate::tables::{
    LoadedTable, TableStats, parse_datasus_codes, parse_official_blocks,
    parse_official_categories, parse_official_chapters, parse_official_subcategories,
    parse_structured_blocks, parse_structured_categories, parse_structured_chapters,
    parse_structured_subcategories,
};

/// Explicit paths for combined mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedSources {
    pub datasus: PathBuf,
    pub chapters: PathBuf,
    pub blocks: PathBuf,
    pub categories: PathBuf,
    pub subcategories: PathBuf,
}

/// Where the input tables come from. Selected once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    /// Official DataSUS export folder.
    RawSource { dir: PathBuf },
    /// Flat DATASUS table plus structured reference tables.
    Combined(CombinedSources),
}

impl InputMode {
    pub fn label(&self) -> &'static str {
        match self {
            InputMode::RawSource { .. } => "raw-source",
            InputMode::Combined(_) => "combined",
        }
    }
}

/// Overrides applied to every input file. `None` keeps the per-table
/// default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub encoding: Option<TextEncoding>,
    pub delimiter: Option<Delimiter>,
}

impl LoadOptions {
    fn format(&self, default_delimiter: Delimiter) -> TableFormat {
        TableFormat {
            encoding: self.encoding.unwrap_or_default(),
            delimiter: self.delimiter.unwrap_or(default_delimiter),
        }
    }
}

/// Everything the core needs from the inputs.
#[derive(Debug, Clone, Default)]
pub struct LoadedInputs {
    pub tables: HierarchyTables,
    /// Flat DATASUS leaves; `None` in raw-source mode.
    pub datasus: Option<Vec<DatasusEntry>>,
    /// Per-table stats in load order.
    pub stats: Vec<TableStats>,
}

impl LoadedInputs {
    /// Total rows skipped across all tables.
    pub fn skipped_rows(&self) -> usize {
        self.stats.iter().map(TableStats::skipped).sum()
    }
}

/// Loads every table required by `mode`.
///
/// Missing or ambiguous files, unreadable headers, missing columns and tables
/// without a single valid row are fatal. Malformed rows are skipped and
/// counted in [`LoadedInputs::stats`].
pub fn load_inputs(mode: &InputMode, options: &LoadOptions) -> Result<LoadedInputs> {
    let _span = info_span!("load_inputs", mode = mode.label()).entered();
    let loaded = match mode {
        InputMode::RawSource { dir } => load_raw_source(dir, options)?,
        InputMode::Combined(sources) => load_combined(sources, options)?,
    };
    info!(
        chapters = loaded.tables.chapters.len(),
        blocks = loaded.tables.blocks.len(),
        categories = loaded.tables.categories.len(),
        subcategories = loaded.tables.subcategories.len(),
        datasus = loaded.datasus.as_ref().map_or(0, Vec::len),
        skipped = loaded.skipped_rows(),
        "inputs loaded"
    );
    Ok(loaded)
}

fn load_raw_source(dir: &Path, options: &LoadOptions) -> Result<LoadedInputs> {
    let sources = discover_official_sources(dir)?;
    let format = options.format(Delimiter::Semicolon);
    let mut stats = Vec::with_capacity(4);

    let chapters = load_table(&sources.chapters, format, parse_official_chapters, &mut stats)?;
    let blocks = load_table(&sources.blocks, format, parse_official_blocks, &mut stats)?;
    let categories = load_table(
        &sources.categories,
        format,
        parse_official_categories,
        &mut stats,
    )?;
    let subcategories = load_table(
        &sources.subcategories,
        format,
        parse_official_subcategories,
        &mut stats,
    )?;

    Ok(LoadedInputs {
        tables: HierarchyTables {
            chapters,
            blocks,
            categories,
            subcategories,
        },
        datasus: None,
        stats,
    })
}

fn load_combined(sources: &CombinedSources, options: &LoadOptions) -> Result<LoadedInputs> {
    let structured = options.format(Delimiter::Comma);
    let mut stats = Vec::with_capacity(5);

    let datasus = load_table(
        &sources.datasus,
        options.format(Delimiter::Auto),
        parse_datasus_codes,
        &mut stats,
    )?;
    let chapters = load_table(
        &sources.chapters,
        structured,
        parse_structured_chapters,
        &mut stats,
    )?;
    let blocks = load_table(&sources.blocks, structured, parse_structured_blocks, &mut stats)?;
    let categories = load_table(
        &sources.categories,
        structured,
        parse_structured_categories,
        &mut stats,
    )?;
    let subcategories = load_table(
        &sources.subcategories,
        structured,
        parse_structured_subcategories,
        &mut stats,
    )?;

    Ok(LoadedInputs {
        tables: HierarchyTables {
            chapters,
            blocks,
            categories,
            subcategories,
        },
        datasus: Some(datasus),
        stats,
    })
}

fn load_table<T>(
    path: &Path,
    format: TableFormat,
    parse: fn(&CsvTable) -> Result<LoadedTable<T>>,
    stats: &mut Vec<TableStats>,
) -> Result<Vec<T>> {
    let table = read_delimited(path, format)?;
    let loaded = parse(&table)?;
    stats.push(loaded.stats);
    Ok(loaded.entries)
}

