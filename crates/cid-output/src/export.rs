//! Consolidated CSV export.
//!
//! `;`-separated, every field quoted, UTF-8 with a byte-order mark so
//! spreadsheet tools pick the right encoding.

use std::io::Write;
use std::path::Path;

use cid_model::{OUTPUT_COLUMNS, OutputRow};
use csv::{QuoteStyle, WriterBuilder};
use tracing::info;

use crate::atomic::write_atomically;
use crate::error::{OutputError, Result};

pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
pub const OUTPUT_DELIMITER: u8 = b';';

/// Serializes rows (with header) into `writer`.
pub fn write_rows<W: Write>(writer: W, rows: &[OutputRow], path: &Path) -> Result<()> {
    let csv_error = |source: csv::Error| OutputError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = writer;
    writer
        .write_all(UTF8_BOM)
        .map_err(|e| OutputError::io("write", path, e))?;

    let mut csv = WriterBuilder::new()
        .delimiter(OUTPUT_DELIMITER)
        .quote_style(QuoteStyle::Always)
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(OUTPUT_COLUMNS).map_err(csv_error)?;
    for row in rows {
        csv.serialize(row).map_err(csv_error)?;
    }
    csv.flush().map_err(|e| OutputError::io("write", path, e))?;
    Ok(())
}

/// Writes the consolidated CSV to `path`, replacing any existing file only
/// once every row was written.
pub fn write_csv(path: &Path, rows: &[OutputRow]) -> Result<()> {
    write_atomically(path, |writer| write_rows(writer, rows, path))?;
    info!(path = %path.display(), rows = rows.len(), "wrote consolidated CSV");
    Ok(())
}
