//! Leaf code selection for each input mode.

use std::collections::HashSet;

use chrono::NaiveDate;
use cid_ingest::LoadedInputs;
use cid_model::{CidCode, DatasusEntry, HierarchyTables, LeafCode, SourceTag};
use tracing::debug;

/// Run-level settings for consolidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsolidateOptions {
    /// Value written to `dt_atualizacao`.
    pub as_of: NaiveDate,
    /// In combined mode, emit the structured categories and subcategories
    /// ahead of the DATASUS codes.
    pub merge_structured: bool,
}

impl ConsolidateOptions {
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            as_of,
            merge_structured: false,
        }
    }

    pub fn with_merge_structured(mut self, merge: bool) -> Self {
        self.merge_structured = merge;
        self
    }
}

/// Leaf codes in output order plus how many duplicates were dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeafSet {
    pub leaves: Vec<LeafCode>,
    pub duplicates: usize,
}

impl LeafSet {
    fn push(&mut self, seen: &mut HashSet<CidCode>, leaf: LeafCode) {
        if seen.insert(leaf.code) {
            self.leaves.push(leaf);
        } else {
            debug!(code = %leaf.code, source = %leaf.source, "dropping duplicate leaf");
            self.duplicates += 1;
        }
    }
}

/// Categories in table order, then subcategories in table order, tagged
/// `Structured`.
pub fn structured_leaves(tables: &HierarchyTables, as_of: NaiveDate) -> Vec<LeafCode> {
    let categories = tables.categories.iter().map(|entry| LeafCode {
        code: entry.code,
        title: entry.title.clone(),
        description: entry.description.clone(),
        source: SourceTag::Structured,
        update_date: as_of,
    });
    let subcategories = tables.subcategories.iter().map(|entry| LeafCode {
        code: entry.code,
        title: entry.title.clone(),
        description: entry.description.clone(),
        source: SourceTag::Structured,
        update_date: as_of,
    });
    categories.chain(subcategories).collect()
}

/// Flat-table codes tagged `DATASUS`. The title falls back to the
/// description.
pub fn datasus_leaves(entries: &[DatasusEntry], as_of: NaiveDate) -> Vec<LeafCode> {
    entries
        .iter()
        .map(|entry| LeafCode {
            code: entry.code,
            title: entry
                .title
                .clone()
                .unwrap_or_else(|| entry.description.clone()),
            description: entry.description.clone(),
            source: SourceTag::Datasus,
            update_date: as_of,
        })
        .collect()
}

/// Picks the leaf codes for a run. A code is emitted once; the first
/// occurrence wins, so structured entries shadow DATASUS ones when merged.
pub fn collect_leaves(inputs: &LoadedInputs, options: &ConsolidateOptions) -> LeafSet {
    let mut candidates = Vec::new();
    match &inputs.datasus {
        None => candidates.extend(structured_leaves(&inputs.tables, options.as_of)),
        Some(entries) => {
            if options.merge_structured {
                candidates.extend(structured_leaves(&inputs.tables, options.as_of));
            }
            candidates.extend(datasus_leaves(entries, options.as_of));
        }
    }

    let mut seen = HashSet::with_capacity(candidates.len());
    let mut set = LeafSet::default();
    for leaf in candidates {
        set.push(&mut seen, leaf);
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use cid_model::{CategoryEntry, SubcategoryEntry};

    fn code(raw: &str) -> CidCode {
        CidCode::parse(raw).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn inputs(datasus: Option<Vec<DatasusEntry>>) -> LoadedInputs {
        LoadedInputs {
            tables: HierarchyTables {
                categories: vec![
                    CategoryEntry::new(code("A00"), "A00 Cólera", "Cólera").unwrap(),
                    CategoryEntry::new(code("A01"), "A01 Febres", "Febres").unwrap(),
                    CategoryEntry::new(code("A00"), "dup", "dup").unwrap(),
                ],
                subcategories: vec![SubcategoryEntry::new(code("A00.0"), "A00.0", "Cólera clássica")],
                ..HierarchyTables::default()
            },
            datasus,
            stats: Vec::new(),
        }
    }

    fn datasus(raw: &str, description: &str) -> DatasusEntry {
        DatasusEntry {
            code: code(raw),
            title: None,
            description: description.to_string(),
        }
    }

    #[test]
    fn test_raw_source_order_and_dedupe() {
        let set = collect_leaves(&inputs(None), &ConsolidateOptions::new(date()));
        let codes: Vec<String> = set.leaves.iter().map(|l| l.code.to_string()).collect();

        assert_eq!(codes, vec!["A00", "A01", "A00.0"]);
        assert_eq!(set.duplicates, 1);
        assert_eq!(set.leaves[0].title, "A00 Cólera");
        assert!(set.leaves.iter().all(|l| l.source == SourceTag::Structured));
    }

    #[test]
    fn test_combined_uses_datasus_only_by_default() {
        let set = collect_leaves(
            &inputs(Some(vec![datasus("B20", "Doença pelo HIV")])),
            &ConsolidateOptions::new(date()),
        );

        assert_eq!(set.leaves.len(), 1);
        assert_eq!(set.leaves[0].source, SourceTag::Datasus);
        assert_eq!(set.leaves[0].title, "Doença pelo HIV");
        assert_eq!(set.leaves[0].update_date, date());
    }

    #[test]
    fn test_merge_prefers_structured() {
        let options = ConsolidateOptions::new(date()).with_merge_structured(true);
        let set = collect_leaves(
            &inputs(Some(vec![datasus("A00", "Cólera"), datasus("B20", "HIV")])),
            &options,
        );
        let tagged: Vec<(String, SourceTag)> = set
            .leaves
            .iter()
            .map(|l| (l.code.to_string(), l.source))
            .collect();

        assert_eq!(
            tagged,
            vec![
                ("A00".to_string(), SourceTag::Structured),
                ("A01".to_string(), SourceTag::Structured),
                ("A00.0".to_string(), SourceTag::Structured),
                ("B20".to_string(), SourceTag::Datasus),
            ]
        );
        assert_eq!(set.duplicates, 2);
    }

    #[test]
    fn test_category_form_subcategory_is_shadowed_by_category() {
        let mut inputs = inputs(None);
        inputs.tables.subcategories.push(SubcategoryEntry::new(code("A01 "), "A01", "Febres"));
        inputs.tables.subcategories.push(SubcategoryEntry::new(code("A02"), "A02", "Salmonela"));

        let set = collect_leaves(&inputs, &ConsolidateOptions::new(date()));
        let codes: Vec<String> = set.leaves.iter().map(|l| l.code.to_string()).collect();

        assert_eq!(codes, vec!["A00", "A01", "A00.0", "A02"]);
        assert_eq!(set.duplicates, 2);
        assert_eq!(set.leaves[1].title, "A01 Febres");
    }
}
