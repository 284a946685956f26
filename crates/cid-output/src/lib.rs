//! CID-10 output generation.
//!
//! Writes the consolidated `;`-separated CSV and the optional JSON run
//! report. Both are written to a temp file next to the target and moved
//! into place, so a failed run leaves any previous output untouched.

mod atomic;
mod error;
mod export;
mod report;

pub use error::{OutputError, Result};
pub use export::{OUTPUT_DELIMITER, UTF8_BOM, write_csv, write_rows};
pub use report::{RunReport, write_report};
