//! Delimited table reading.

use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use tracing::{debug, warn};

use crate::error::{IngestError, Result};
use crate::tables::SkippedRow;

use super::decode::{Delimiter, TextEncoding, decode_bytes, sniff_delimiter};

/// Encoding and delimiter to use for one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableFormat {
    pub encoding: TextEncoding,
    pub delimiter: Delimiter,
}

/// A data row with its 1-based line number in the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRecord {
    pub line: u64,
    pub cells: Vec<String>,
}

impl CsvRecord {
    /// Trimmed cell value; empty when the row is short.
    pub fn get(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }
}

/// A decoded delimited file.
#[derive(Debug, Clone)]
pub struct CsvTable {
    pub path: PathBuf,
    pub headers: Vec<String>,
    pub records: Vec<CsvRecord>,
    /// Rows the CSV parser could not read.
    pub unreadable: Vec<SkippedRow>,
    pub encoding: &'static str,
    pub delimiter: char,
}

impl CsvTable {
    /// Index of the first header matching one of `names` (case-insensitive).
    pub fn column_index(&self, names: &[&str]) -> Option<usize> {
        names.iter().find_map(|name| {
            self.headers
                .iter()
                .position(|header| header.eq_ignore_ascii_case(name))
        })
    }

    /// Like [`CsvTable::column_index`] but fails with the first name.
    pub fn require_column(&self, names: &[&str]) -> Result<usize> {
        self.column_index(names)
            .ok_or_else(|| IngestError::MissingColumn {
                column: names.first().copied().unwrap_or_default().to_string(),
                path: self.path.clone(),
            })
    }
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Reads and decodes a delimited file.
///
/// The first row is the header. Blank rows are dropped; rows the parser
/// rejects are recorded in [`CsvTable::unreadable`] instead of failing the
/// whole file.
pub fn read_delimited(path: &Path, format: TableFormat) -> Result<CsvTable> {
    let bytes = std::fs::read(path).map_err(|e| IngestError::file_read(path, e))?;
    let decoded = decode_bytes(&bytes, format.encoding);
    if decoded.had_errors {
        warn!(
            path = %path.display(),
            encoding = decoded.encoding,
            "input contains malformed byte sequences; they were replaced"
        );
    }
    let delimiter = sniff_delimiter(&decoded.text, format.delimiter);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(decoded.text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| IngestError::Csv {
            path: path.to_path_buf(),
            source: e,
        })?
        .iter()
        .map(normalize_cell)
        .collect();

    let mut records = Vec::new();
    let mut unreadable = Vec::new();
    for result in reader.records() {
        match result {
            Ok(record) => {
                let line = record.position().map_or(0, csv::Position::line);
                let cells: Vec<String> = record.iter().map(normalize_cell).collect();
                if cells.iter().all(String::is_empty) {
                    continue;
                }
                records.push(CsvRecord { line, cells });
            }
            Err(error) => {
                let line = error.position().map_or(0, csv::Position::line);
                unreadable.push(SkippedRow::new(line, error.to_string()));
            }
        }
    }

    debug!(
        path = %path.display(),
        encoding = decoded.encoding,
        delimiter = %char::from(delimiter),
        columns = headers.len(),
        rows = records.len(),
        "read delimited file"
    );

    Ok(CsvTable {
        path: path.to_path_buf(),
        headers,
        records,
        unreadable,
        encoding: decoded.encoding,
        delimiter: char::from(delimiter),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn test_reads_latin1_semicolon_table() {
        let file = create_temp_csv(
            b"CAT;DESCRICAO\nA00;C\xf3lera\n\n;\nA01;Febres tif\xf3ide e paratif\xf3ide\n",
        );
        let table = read_delimited(file.path(), TableFormat::default()).unwrap();

        assert_eq!(table.headers, vec!["CAT", "DESCRICAO"]);
        assert_eq!(table.encoding, "windows-1252");
        assert_eq!(table.delimiter, ';');
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[0].cells, vec!["A00", "Cólera"]);
        assert_eq!(table.records[0].line, 2);
        assert_eq!(table.records[1].get(1), "Febres tifóide e paratifóide");
        assert_eq!(table.records[1].get(5), "");
    }

    #[test]
    fn test_reads_utf8_with_bom_and_quotes() {
        let file = create_temp_csv(
            "\u{feff}codigo,descricao\n\"B20\",\"Doença pelo HIV, resultando em doenças infecciosas\"\n"
                .as_bytes(),
        );
        let table = read_delimited(file.path(), TableFormat::default()).unwrap();

        assert_eq!(table.headers, vec!["codigo", "descricao"]);
        assert_eq!(table.delimiter, ',');
        assert_eq!(
            table.records[0].get(1),
            "Doença pelo HIV, resultando em doenças infecciosas"
        );
    }

    #[test]
    fn test_column_lookup_is_case_insensitive() {
        let file = create_temp_csv(b"Codigo;Descricao\nA00;x\n");
        let table = read_delimited(file.path(), TableFormat::default()).unwrap();

        assert_eq!(table.column_index(&["cid_codigo", "codigo"]), Some(0));
        assert!(matches!(
            table.require_column(&["titulo"]),
            Err(IngestError::MissingColumn { column, .. }) if column == "titulo"
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = read_delimited(
            Path::new("/nonexistent/CID-10-GRUPOS.CSV"),
            TableFormat::default(),
        );
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }
}
