//! CID-10 table ingestion.
//!
//! Finds the input tables, decodes them and parses them into the typed
//! tables of [`cid_model`].
//!
//! # Features
//!
//! - **Discovery**: locate the official `CAPITULOS`, `GRUPOS`, `CATEGORIAS`
//!   and `SUBCATEGORIAS` exports in a folder by filename fragment
//! - **Decoding**: UTF-8 or Latin-1 input, `;` or `,` separators, detected or
//!   forced
//! - **Table loading**: official and structured schemas plus the flat
//!   DATASUS table, with per-table parsed/skipped counts
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use cid_ingest::{InputMode, LoadOptions, load_inputs};
//!
//! let mode = InputMode::RawSource { dir: PathBuf::from("data/datasus") };
//! let inputs = load_inputs(&mode, &LoadOptions::default())?;
//! println!("{} categories", inputs.tables.categories.len());
//! ```

mod csv;
mod discovery;
mod error;
mod loader;
mod tables;

// === Error Types ===
pub use error::{IngestError, Result};

// === Decoding ===
pub use csv::{
    CsvRecord, CsvTable, DecodedText, Delimiter, TableFormat, TextEncoding, decode_bytes,
    read_delimited, sniff_delimiter,
};

// === File Discovery ===
pub use discovery::{
    FragmentMatch, OfficialSources, discover_official_sources, find_file_by_fragment,
    list_csv_files,
};

// === Table Loading ===
pub use loader::{CombinedSources, InputMode, LoadOptions, LoadedInputs, load_inputs};
pub use tables::{
    LoadedTable, SkippedRow, TableKind, TableStats, parse_datasus_codes, parse_official_blocks,
    parse_official_categories, parse_official_chapters, parse_official_subcategories,
    parse_structured_blocks, parse_structured_categories, parse_structured_chapters,
    parse_structured_subcategories,
};
