//! CID-10 consolidation core.
//!
//! Places every leaf code in its block and chapter by range containment and
//! flattens the result into [`cid_model::OutputRow`]s.

pub mod consolidate;
pub mod coverage;
pub mod hierarchy;
pub mod leaves;
pub mod range;

pub use consolidate::{Consolidation, UPDATE_DATE_FORMAT, consolidate, consolidate_inputs};
pub use coverage::CoverageReport;
pub use hierarchy::{AmbiguousPlacement, DataQuality, HierarchyIndex, Resolution, StraddlingBlock};
pub use leaves::{ConsolidateOptions, LeafSet, collect_leaves, datasus_leaves, structured_leaves};
pub use range::{RangeMatch, find_range, find_range_index};
