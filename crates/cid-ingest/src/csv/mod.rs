//! CSV reading utilities.

mod decode;
mod reader;

pub use decode::{DecodedText, Delimiter, TextEncoding, decode_bytes, sniff_delimiter};
pub use reader::{CsvRecord, CsvTable, TableFormat, read_delimited};
