//! CID-10 data model.
//!
//! Codes and ranges ([`CidCode`], [`CodeRange`]), the four hierarchy tables
//! ([`HierarchyTables`]), leaf codes and the flat [`OutputRow`] written to the
//! consolidated CSV. Everything here is immutable once built.

pub mod code;
pub mod error;
pub mod hierarchy;
pub mod row;

pub use code::{CidCode, CodeRange};
pub use error::{ModelError, Result};
pub use hierarchy::{
    BlockEntry, CategoryEntry, ChapterEntry, DatasusEntry, HierarchyTables, RangeEntry,
    SubcategoryEntry,
};
pub use row::{LeafCode, OUTPUT_COLUMNS, OutputRow, SourceTag};
