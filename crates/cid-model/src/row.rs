//! Leaf codes and the flat output row shape.

use std::fmt;

use chrono::NaiveDate;

use crate::code::CidCode;

/// Where a leaf code came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub enum SourceTag {
    Structured,
    #[serde(rename = "DATASUS")]
    Datasus,
}

impl SourceTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTag::Structured => "Structured",
            SourceTag::Datasus => "DATASUS",
        }
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A category, subcategory or DATASUS code that becomes one output row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafCode {
    pub code: CidCode,
    pub title: String,
    pub description: String,
    pub source: SourceTag,
    pub update_date: NaiveDate,
}

/// Output column order.
pub const OUTPUT_COLUMNS: [&str; 11] = [
    "cid_codigo",
    "cid_categoria",
    "cid_subcategoria",
    "titulo",
    "descricao",
    "capitulo_codigo",
    "capitulo_titulo",
    "bloco_codigo",
    "bloco_titulo",
    "fonte",
    "dt_atualizacao",
];

/// One denormalized row. Field order matches [`OUTPUT_COLUMNS`]; unresolved
/// hierarchy fields are empty strings.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct OutputRow {
    pub cid_codigo: String,
    pub cid_categoria: String,
    pub cid_subcategoria: Option<String>,
    pub titulo: String,
    pub descricao: String,
    pub capitulo_codigo: String,
    pub capitulo_titulo: String,
    pub bloco_codigo: String,
    pub bloco_titulo: String,
    pub fonte: SourceTag,
    pub dt_atualizacao: String,
}

impl OutputRow {
    pub fn has_block(&self) -> bool {
        !self.bloco_codigo.is_empty()
    }

    pub fn has_chapter(&self) -> bool {
        !self.capitulo_codigo.is_empty()
    }

    /// Whether block or chapter is missing.
    pub fn is_unresolved(&self) -> bool {
        !self.has_block() || !self.has_chapter()
    }
}
