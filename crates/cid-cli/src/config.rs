//! Run configuration derived from CLI flags.
//!
//! Everything here is validated before any file is touched.

use std::path::{Component, Path, PathBuf};

use chrono::NaiveDate;
use cid_core::ConsolidateOptions;
use cid_ingest::{CombinedSources, Delimiter, InputMode, LoadOptions, TextEncoding};
use thiserror::Error;

use crate::cli::{Cli, DelimiterArg, EncodingArg};

/// Incompatible or incomplete flags.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("no input given: pass --datasus_dir, or --datasus with --chapters, --blocks, --categories and --subcategories")]
    NoInput,

    #[error("--datasus_dir cannot be combined with {}", .flags.join(", "))]
    MixedModes { flags: Vec<&'static str> },

    #[error("combined mode is missing {}", .missing.join(", "))]
    IncompleteCombined { missing: Vec<&'static str> },

    #[error("--report must not point at the output CSV ({})", .path.display())]
    ReportOverwritesOutput { path: PathBuf },
}

/// Everything a run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub mode: InputMode,
    pub load: LoadOptions,
    pub consolidate: ConsolidateOptions,
    pub out: PathBuf,
    pub report: Option<PathBuf>,
    pub dry_run: bool,
}

impl RunConfig {
    /// Builds the run configuration; `today` is used when `--as-of` is not
    /// given.
    pub fn from_cli(cli: &Cli, today: NaiveDate) -> Result<Self, ConfigError> {
        let mode = input_mode(cli)?;
        if cli
            .report
            .as_deref()
            .is_some_and(|report| same_path(report, &cli.out))
        {
            return Err(ConfigError::ReportOverwritesOutput {
                path: cli.out.clone(),
            });
        }
        let consolidate = ConsolidateOptions::new(cli.as_of.unwrap_or(today))
            .with_merge_structured(cli.merge_structured);

        Ok(Self {
            mode,
            load: LoadOptions {
                encoding: cli.encoding.map(text_encoding),
                delimiter: cli.delimiter.map(delimiter),
            },
            consolidate,
            out: cli.out.clone(),
            report: cli.report.clone(),
            dry_run: cli.dry_run,
        })
    }
}

/// Selects the input mode. Exactly one mode's flags must be complete.
pub fn input_mode(cli: &Cli) -> Result<InputMode, ConfigError> {
    let combined = [
        ("--datasus", &cli.datasus),
        ("--chapters", &cli.chapters),
        ("--blocks", &cli.blocks),
        ("--categories", &cli.categories),
        ("--subcategories", &cli.subcategories),
    ];
    let given: Vec<&'static str> = combined
        .iter()
        .filter(|(_, value)| value.is_some())
        .map(|(flag, _)| *flag)
        .collect();

    if let Some(dir) = &cli.datasus_dir {
        if !given.is_empty() {
            return Err(ConfigError::MixedModes { flags: given });
        }
        return Ok(InputMode::RawSource { dir: dir.clone() });
    }

    if given.is_empty() {
        return Err(ConfigError::NoInput);
    }

    match (
        &cli.datasus,
        &cli.chapters,
        &cli.blocks,
        &cli.categories,
        &cli.subcategories,
    ) {
        (
            Some(datasus),
            Some(chapters),
            Some(blocks),
            Some(categories),
            Some(subcategories),
        ) => Ok(InputMode::Combined(CombinedSources {
            datasus: datasus.clone(),
            chapters: chapters.clone(),
            blocks: blocks.clone(),
            categories: categories.clone(),
            subcategories: subcategories.clone(),
        })),
        _ => Err(ConfigError::IncompleteCombined {
            missing: combined
                .iter()
                .filter(|(_, value)| value.is_none())
                .map(|(flag, _)| *flag)
                .collect(),
        }),
    }
}

/// Compares two paths after making them absolute and folding `.` and `..`.
/// Neither path has to exist yet.
fn same_path(a: &Path, b: &Path) -> bool {
    normalize(a) == normalize(b)
}

fn normalize(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

fn text_encoding(arg: EncodingArg) -> TextEncoding {
    match arg {
        EncodingArg::Auto => TextEncoding::Auto,
        EncodingArg::Utf8 => TextEncoding::Utf8,
        EncodingArg::Latin1 => TextEncoding::Latin1,
    }
}

fn delimiter(arg: DelimiterArg) -> Delimiter {
    match arg {
        DelimiterArg::Auto => Delimiter::Auto,
        DelimiterArg::Semicolon => Delimiter::Semicolon,
        DelimiterArg::Comma => Delimiter::Comma,
    }
}
