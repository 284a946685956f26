//! CLI argument definitions for the CID-10 consolidator.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

/// Default output file name.
pub const DEFAULT_OUTPUT: &str = "cid10_consolidado.csv";

#[derive(Parser)]
#[command(
    name = "cid10-consolidator",
    version,
    about = "CID-10 consolidator - flatten the DataSUS tables into one CSV",
    long_about = "Consolidate the Brazilian CID-10 tables into a single denormalized CSV.\n\n\
                  Either point --datasus_dir at the official DataSUS export (CAPITULOS, GRUPOS,\n\
                  CATEGORIAS, SUBCATEGORIAS), or pass a flat --datasus table together with the\n\
                  structured --chapters, --blocks, --categories and --subcategories tables."
)]
pub struct Cli {
    /// Folder with the official DataSUS CSV export.
    #[arg(long = "datasus_dir", alias = "datasus-dir", value_name = "DIR")]
    pub datasus_dir: Option<PathBuf>,

    /// Flat DATASUS table (codigo;descricao).
    #[arg(long = "datasus", value_name = "PATH")]
    pub datasus: Option<PathBuf>,

    /// Structured chapters table (chapter_code, chapter_title).
    #[arg(long = "chapters", value_name = "PATH")]
    pub chapters: Option<PathBuf>,

    /// Structured blocks table (block_id, block_title).
    #[arg(long = "blocks", value_name = "PATH")]
    pub blocks: Option<PathBuf>,

    /// Structured categories table (category_code, category_title).
    #[arg(long = "categories", value_name = "PATH")]
    pub categories: Option<PathBuf>,

    /// Structured subcategories table (subcategory_code, subcategory_title).
    #[arg(long = "subcategories", value_name = "PATH")]
    pub subcategories: Option<PathBuf>,

    /// Consolidated CSV to write.
    #[arg(long = "out", value_name = "PATH", default_value = DEFAULT_OUTPUT)]
    pub out: PathBuf,

    /// Value for dt_atualizacao (YYYY-MM-DD, default: today).
    #[arg(long = "as-of", value_name = "DATE")]
    pub as_of: Option<NaiveDate>,

    /// Run the whole pipeline and print the summary without writing the CSV.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Also write a JSON run report.
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Input text encoding for every table.
    #[arg(long = "encoding", value_enum)]
    pub encoding: Option<EncodingArg>,

    /// Field separator for every table.
    #[arg(long = "delimiter", value_enum)]
    pub delimiter: Option<DelimiterArg>,

    /// In combined mode, also emit the structured categories and
    /// subcategories; they win over DATASUS rows with the same code.
    #[arg(long = "merge-structured")]
    pub merge_structured: bool,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// CLI encoding choices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum EncodingArg {
    Auto,
    Utf8,
    Latin1,
}

/// CLI delimiter choices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DelimiterArg {
    Auto,
    Semicolon,
    Comma,
}

/// CLI log level choices.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
