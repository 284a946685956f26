//! Hierarchy resolution: category to block, block to chapter.
//!
//! Blocks are placed in a chapter once, using their start code. Categories
//! are placed in a block by range and take the block's chapter, so a code
//! never ends up with a chapter that disagrees with its block. Subcategories
//! always resolve through their category.

use std::collections::HashMap;

use cid_model::{BlockEntry, ChapterEntry, CidCode, CodeRange, HierarchyTables, RangeEntry};
use tracing::{debug, info, warn};

use crate::range::{RangeMatch, find_range_index};

/// Block and chapter resolved for one code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'a> {
    pub block: Option<&'a BlockEntry>,
    pub chapter: Option<&'a ChapterEntry>,
}

impl Resolution<'_> {
    pub fn is_complete(&self) -> bool {
        self.block.is_some() && self.chapter.is_some()
    }
}

/// A code or block that fell in more than one range.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct AmbiguousPlacement {
    /// The code (`A09`) or block range (`A00-A09`) being placed.
    pub subject: String,
    /// The range that was kept.
    pub chosen: CodeRange,
    pub candidates: usize,
}

/// A block whose end lies outside the chapter of its start.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StraddlingBlock {
    pub block: CodeRange,
    pub chapter: CodeRange,
    /// Chapter of the block's end code, when there is one.
    pub end_chapter: Option<CodeRange>,
}

/// Findings about the hierarchy tables themselves. None of them is fatal.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct DataQuality {
    pub ambiguous_categories: Vec<AmbiguousPlacement>,
    pub ambiguous_blocks: Vec<AmbiguousPlacement>,
    pub straddling_blocks: Vec<StraddlingBlock>,
    /// Blocks outside every chapter.
    pub unplaced_blocks: Vec<CodeRange>,
}

impl DataQuality {
    pub fn finding_count(&self) -> usize {
        self.ambiguous_categories.len()
            + self.ambiguous_blocks.len()
            + self.straddling_blocks.len()
            + self.unplaced_blocks.len()
    }

    pub fn is_clean(&self) -> bool {
        self.finding_count() == 0
    }
}

/// Indices into the block and chapter tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Placement {
    block: Option<usize>,
    chapter: Option<usize>,
}

/// Resolved hierarchy for one run.
///
/// Built once from the loaded tables; lookups never mutate it.
#[derive(Debug, Clone)]
pub struct HierarchyIndex {
    chapters: Vec<ChapterEntry>,
    blocks: Vec<BlockEntry>,
    block_chapters: Vec<Option<usize>>,
    placements: HashMap<CidCode, Placement>,
    quality: DataQuality,
}

impl HierarchyIndex {
    /// Resolves every block, category and subcategory of `tables`.
    pub fn build(tables: &HierarchyTables) -> Self {
        let mut quality = DataQuality::default();
        log_cross_letter_ranges("chapter", &tables.chapters);
        log_cross_letter_ranges("block", &tables.blocks);

        let block_chapters: Vec<Option<usize>> = tables
            .blocks
            .iter()
            .map(|block| place_block(block, &tables.chapters, &mut quality))
            .collect();

        let mut index = Self {
            chapters: tables.chapters.clone(),
            blocks: tables.blocks.clone(),
            block_chapters,
            placements: HashMap::with_capacity(tables.categories.len()),
            quality,
        };

        let category_codes = tables.categories.iter().map(|entry| entry.code);
        let orphan_codes = tables.subcategories.iter().map(|entry| entry.category());
        for code in category_codes.chain(orphan_codes) {
            if index.placements.contains_key(&code) {
                continue;
            }
            let found = find_range_index(&code, &index.blocks);
            if let RangeMatch::Ambiguous { first, candidates } = found {
                warn!(
                    code = %code,
                    chosen = %index.blocks[first].range,
                    candidates,
                    "category falls in several blocks"
                );
                index.quality.ambiguous_categories.push(AmbiguousPlacement {
                    subject: code.to_string(),
                    chosen: index.blocks[first].range,
                    candidates,
                });
            }
            let placement = index.placement_for(found.selected());
            index.placements.insert(code, placement);
        }

        info!(
            chapters = index.chapters.len(),
            blocks = index.blocks.len(),
            categories = index.placements.len(),
            findings = index.quality.finding_count(),
            "hierarchy index built"
        );
        index
    }

    fn placement_for(&self, block: Option<usize>) -> Placement {
        Placement {
            block,
            chapter: block.and_then(|b| self.block_chapters[b]),
        }
    }

    /// Block and chapter of `code`. Subcategories resolve through their
    /// category; codes absent from the tables are placed on demand by the
    /// same rules.
    pub fn resolve(&self, code: &CidCode) -> Resolution<'_> {
        let category = code.category();
        let placement = match self.placements.get(&category) {
            Some(placement) => *placement,
            None => {
                let placement =
                    self.placement_for(find_range_index(&category, &self.blocks).selected());
                debug!(code = %category, placed = placement.block.is_some(), "resolved on demand");
                placement
            }
        };
        Resolution {
            block: placement.block.map(|b| &self.blocks[b]),
            chapter: placement.chapter.map(|c| &self.chapters[c]),
        }
    }

    pub fn quality(&self) -> &DataQuality {
        &self.quality
    }
}

/// Ranges like `S00-T98` are valid; they compare on `(letter, number)`.
fn log_cross_letter_ranges<T: RangeEntry>(kind: &str, entries: &[T]) {
    for entry in entries.iter().filter(|entry| entry.range().spans_letters()) {
        debug!(kind, range = %entry.range(), "range spans several letters");
    }
}

fn place_block(
    block: &BlockEntry,
    chapters: &[ChapterEntry],
    quality: &mut DataQuality,
) -> Option<usize> {
    let range = *block.range();
    let found = find_range_index(&range.start(), chapters);
    if let RangeMatch::Ambiguous { first, candidates } = found {
        warn!(
            block = %range,
            chosen = %chapters[first].range,
            candidates,
            "block falls in several chapters"
        );
        quality.ambiguous_blocks.push(AmbiguousPlacement {
            subject: range.to_string(),
            chosen: chapters[first].range,
            candidates,
        });
    }

    let Some(chapter) = found.selected() else {
        warn!(block = %range, "block lies outside every chapter");
        quality.unplaced_blocks.push(range);
        return None;
    };

    let chapter_range = chapters[chapter].range;
    if !chapter_range.contains(&range.end()) {
        let end_chapter = find_range_index(&range.end(), chapters)
            .selected()
            .map(|c| chapters[c].range);
        warn!(
            block = %range,
            chapter = %chapter_range,
            "block extends past the end of its chapter"
        );
        quality.straddling_blocks.push(StraddlingBlock {
            block: range,
            chapter: chapter_range,
            end_chapter,
        });
    }
    Some(chapter)
}
