//! Flat row construction.

use cid_ingest::LoadedInputs;
use cid_model::{LeafCode, OutputRow};
use tracing::{info, info_span};

use crate::coverage::CoverageReport;
use crate::hierarchy::{DataQuality, HierarchyIndex};
use crate::leaves::{ConsolidateOptions, collect_leaves};

/// Date format of `dt_atualizacao`.
pub const UPDATE_DATE_FORMAT: &str = "%Y-%m-%d";

/// One output row per leaf, in leaf order.
pub fn consolidate(leaves: &[LeafCode], index: &HierarchyIndex) -> Vec<OutputRow> {
    leaves.iter().map(|leaf| build_row(leaf, index)).collect()
}

fn build_row(leaf: &LeafCode, index: &HierarchyIndex) -> OutputRow {
    let resolution = index.resolve(&leaf.code);
    let (bloco_codigo, bloco_titulo) = resolution
        .block
        .map(|block| (block.range.to_string(), block.title.clone()))
        .unwrap_or_default();
    let (capitulo_codigo, capitulo_titulo) = resolution
        .chapter
        .map(|chapter| (chapter.range.to_string(), chapter.title.clone()))
        .unwrap_or_default();

    OutputRow {
        cid_codigo: leaf.code.to_string(),
        cid_categoria: leaf.code.category().to_string(),
        cid_subcategoria: leaf.code.is_subcategory().then(|| leaf.code.to_string()),
        titulo: leaf.title.clone(),
        descricao: leaf.description.clone(),
        capitulo_codigo,
        capitulo_titulo,
        bloco_codigo,
        bloco_titulo,
        fonte: leaf.source,
        dt_atualizacao: leaf.update_date.format(UPDATE_DATE_FORMAT).to_string(),
    }
}

/// Result of a full consolidation run.
#[derive(Debug, Clone)]
pub struct Consolidation {
    pub rows: Vec<OutputRow>,
    pub coverage: CoverageReport,
    pub quality: DataQuality,
    /// Leaf codes dropped because an earlier leaf had the same code.
    pub duplicate_leaves: usize,
}

/// Resolves the hierarchy and builds the rows for loaded inputs.
pub fn consolidate_inputs(inputs: &LoadedInputs, options: &ConsolidateOptions) -> Consolidation {
    let _span = info_span!("consolidate").entered();

    let index = HierarchyIndex::build(&inputs.tables);
    let leaf_set = collect_leaves(inputs, options);
    let rows = consolidate(&leaf_set.leaves, &index);
    let coverage = CoverageReport::from_rows(&rows);

    info!(
        leaves = leaf_set.leaves.len(),
        duplicates = leaf_set.duplicates,
        rows = rows.len(),
        unresolved = coverage.unresolved,
        "rows consolidated"
    );

    Consolidation {
        rows,
        coverage,
        quality: index.quality().clone(),
        duplicate_leaves: leaf_set.duplicates,
    }
}
