//! Hierarchy table entries as loaded from the input tables.

use crate::code::{CidCode, CodeRange};
use crate::error::{ModelError, Result};

/// Entries addressable by a closed code range.
pub trait RangeEntry {
    fn range(&self) -> &CodeRange;
    fn title(&self) -> &str;
}

/// Top-level grouping, e.g. `A00-B99`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ChapterEntry {
    pub range: CodeRange,
    pub title: String,
}

impl ChapterEntry {
    pub fn new(range: CodeRange, title: impl Into<String>) -> Self {
        Self {
            range,
            title: title.into(),
        }
    }
}

impl RangeEntry for ChapterEntry {
    fn range(&self) -> &CodeRange {
        &self.range
    }

    fn title(&self) -> &str {
        &self.title
    }
}

/// Grouping within a chapter, e.g. `T51-T65`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct BlockEntry {
    pub range: CodeRange,
    pub title: String,
}

impl BlockEntry {
    pub fn new(range: CodeRange, title: impl Into<String>) -> Self {
        Self {
            range,
            title: title.into(),
        }
    }
}

impl RangeEntry for BlockEntry {
    fn range(&self) -> &CodeRange {
        &self.range
    }

    fn title(&self) -> &str {
        &self.title
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CategoryEntry {
    pub code: CidCode,
    pub title: String,
    pub description: String,
}

impl CategoryEntry {
    /// Rejects codes carrying a subcategory digit.
    pub fn new(
        code: CidCode,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self> {
        if code.is_subcategory() {
            return Err(ModelError::NotACategory(code.to_string()));
        }
        Ok(Self {
            code,
            title: title.into(),
            description: description.into(),
        })
    }
}

/// Row of a subcategory table. The code may be in category form when the
/// source left the subcategory digit blank.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SubcategoryEntry {
    pub code: CidCode,
    pub title: String,
    pub description: String,
}

impl SubcategoryEntry {
    pub fn new(code: CidCode, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Parent category: the code prefix before the dot.
    pub fn category(&self) -> CidCode {
        self.code.category()
    }
}

/// One row of the flat DATASUS `codigo;descricao` table.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DatasusEntry {
    pub code: CidCode,
    /// Separate short title, when the table has one.
    pub title: Option<String>,
    pub description: String,
}

/// The four hierarchy tables of a run, in source order.
#[derive(Debug, Clone, Default)]
pub struct HierarchyTables {
    pub chapters: Vec<ChapterEntry>,
    pub blocks: Vec<BlockEntry>,
    pub categories: Vec<CategoryEntry>,
    pub subcategories: Vec<SubcategoryEntry>,
}
