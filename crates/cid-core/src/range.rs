//! Range matching over closed code ranges.

use cid_model::{CidCode, RangeEntry};
use tracing::trace;

/// Outcome of looking a code up in an ordered list of ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeMatch<T> {
    /// No range contains the code.
    Unmatched,
    /// Exactly one range contains the code.
    Unique(T),
    /// Several ranges contain the code; `first` is the earliest in table
    /// order and `candidates` counts all of them.
    Ambiguous { first: T, candidates: usize },
}

impl<T> RangeMatch<T> {
    /// The selected entry, if any.
    pub fn selected(self) -> Option<T> {
        match self {
            RangeMatch::Unmatched => None,
            RangeMatch::Unique(entry) | RangeMatch::Ambiguous { first: entry, .. } => Some(entry),
        }
    }

    pub fn is_unmatched(&self) -> bool {
        matches!(self, RangeMatch::Unmatched)
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, RangeMatch::Ambiguous { .. })
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RangeMatch<U> {
        match self {
            RangeMatch::Unmatched => RangeMatch::Unmatched,
            RangeMatch::Unique(entry) => RangeMatch::Unique(f(entry)),
            RangeMatch::Ambiguous { first, candidates } => RangeMatch::Ambiguous {
                first: f(first),
                candidates,
            },
        }
    }
}

/// Position of the range containing `code`.
///
/// The subcategory digit of `code` is ignored. When several ranges match,
/// the first one wins and the result is flagged ambiguous.
pub fn find_range_index<T: RangeEntry>(code: &CidCode, ranges: &[T]) -> RangeMatch<usize> {
    let mut hits = ranges
        .iter()
        .enumerate()
        .filter(|(_, entry)| entry.range().contains(code))
        .map(|(index, _)| index);

    let found = match hits.next() {
        None => RangeMatch::Unmatched,
        Some(first) => match hits.count() {
            0 => RangeMatch::Unique(first),
            others => RangeMatch::Ambiguous {
                first,
                candidates: others + 1,
            },
        },
    };
    trace!(code = %code, ?found, "range lookup");
    found
}

/// The range entry containing `code`. See [`find_range_index`].
pub fn find_range<'a, T: RangeEntry>(code: &CidCode, ranges: &'a [T]) -> RangeMatch<&'a T> {
    find_range_index(code, ranges).map(|index| &ranges[index])
}

#[cfg(test)]
mod tests {
    use super::*;
    use cid_model::{BlockEntry, CodeRange};
    use proptest::prelude::*;

    fn block(raw: &str) -> BlockEntry {
        BlockEntry::new(CodeRange::parse(raw).unwrap(), raw)
    }

    fn code(raw: &str) -> CidCode {
        CidCode::parse(raw).unwrap()
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let blocks = vec![block("A00-A09"), block("A15-A19")];
        assert_eq!(find_range(&code("A00"), &blocks), RangeMatch::Unique(&blocks[0]));
        assert_eq!(find_range(&code("A09"), &blocks), RangeMatch::Unique(&blocks[0]));
        assert_eq!(find_range(&code("A09.9"), &blocks), RangeMatch::Unique(&blocks[0]));
        assert_eq!(find_range(&code("A19"), &blocks), RangeMatch::Unique(&blocks[1]));
    }

    #[test]
    fn test_gap_and_other_letter_are_unmatched() {
        let blocks = vec![block("A00-A09"), block("A15-A19")];
        assert!(find_range(&code("A10"), &blocks).is_unmatched());
        assert!(find_range(&code("B00"), &blocks).is_unmatched());
        assert!(find_range(&code("A00"), &Vec::<BlockEntry>::new()).is_unmatched());
    }

    #[test]
    fn test_cross_letter_range() {
        let chapters = vec![block("A00-B99"), block("S00-T98")];
        assert_eq!(find_range_index(&code("T65.9"), &chapters), RangeMatch::Unique(1));
        assert_eq!(find_range_index(&code("S00"), &chapters), RangeMatch::Unique(1));
        assert!(find_range_index(&code("T99"), &chapters).is_unmatched());
        assert!(find_range_index(&code("U04"), &chapters).is_unmatched());
    }

    #[test]
    fn test_overlap_takes_first_and_flags() {
        let blocks = vec![block("C00-C14"), block("C00-C97"), block("C10-C10")];
        let found = find_range_index(&code("C10"), &blocks);
        assert_eq!(
            found,
            RangeMatch::Ambiguous {
                first: 0,
                candidates: 3
            }
        );
        assert!(found.is_ambiguous());
        assert_eq!(found.selected(), Some(0));
    }

    fn arb_code() -> impl Strategy<Value = CidCode> {
        (b'A'..=b'E', 0u8..100).prop_map(|(letter, number)| {
            code(&format!("{}{number:02}", char::from(letter)))
        })
    }

    fn arb_range() -> impl Strategy<Value = BlockEntry> {
        (arb_code(), arb_code()).prop_map(|(a, b)| {
            let (start, end) = if a <= b { (a, b) } else { (b, a) };
            BlockEntry::new(CodeRange::new(start, end).unwrap(), "")
        })
    }

    proptest! {
        #[test]
        fn unmatched_iff_no_range_contains(
            probe in arb_code(),
            ranges in prop::collection::vec(arb_range(), 0..8),
        ) {
            let found = find_range_index(&probe, &ranges);
            let containing: Vec<usize> = ranges
                .iter()
                .enumerate()
                .filter(|(_, r)| r.range.start() <= probe && probe <= r.range.end())
                .map(|(i, _)| i)
                .collect();

            prop_assert_eq!(found.is_unmatched(), containing.is_empty());
            prop_assert_eq!(found.selected(), containing.first().copied());
            prop_assert_eq!(found.is_ambiguous(), containing.len() > 1);
        }
    }
}
