use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use cid_core::{UPDATE_DATE_FORMAT, consolidate_inputs};
use cid_ingest::load_inputs;
use cid_output::{RunReport, write_csv, write_report};

use crate::config::RunConfig;
use crate::types::RunOutcome;

/// Runs the whole pipeline: load, consolidate, write the CSV and the
/// optional report.
pub fn run(config: &RunConfig) -> Result<RunOutcome> {
    let mode = config.mode.label();
    let as_of = config
        .consolidate
        .as_of
        .format(UPDATE_DATE_FORMAT)
        .to_string();
    let run_span = info_span!("run", mode, as_of = %as_of, dry_run = config.dry_run);
    let _run_guard = run_span.enter();

    // Stage 1: load every input table.
    let load_start = Instant::now();
    let inputs = load_inputs(&config.mode, &config.load).context("load input tables")?;
    info!(
        tables = inputs.stats.len(),
        skipped_rows = inputs.skipped_rows(),
        duration_ms = load_start.elapsed().as_millis(),
        "load complete"
    );

    // Stage 2: place every leaf in its block and chapter.
    let consolidate_start = Instant::now();
    let consolidation = consolidate_inputs(&inputs, &config.consolidate);
    info!(
        rows = consolidation.rows.len(),
        unresolved = consolidation.coverage.unresolved,
        findings = consolidation.quality.finding_count(),
        duration_ms = consolidate_start.elapsed().as_millis(),
        "consolidation complete"
    );

    // Stage 3: optional JSON report. Must precede the CSV write.
    if let Some(path) = &config.report {
        let mut report = RunReport::new(mode, as_of.clone(), &inputs.stats, &consolidation);
        if !config.dry_run {
            report = report.with_output(&config.out);
        }
        write_report(path, &report).with_context(|| format!("write report {}", path.display()))?;
    }

    // Stage 4: write the CSV.
    let output = if config.dry_run {
        info!(path = %config.out.display(), "dry run, output not written");
        None
    } else {
        let write_span = info_span!("write", path = %config.out.display());
        let write_start = Instant::now();
        let written = write_span.in_scope(|| write_csv(&config.out, &consolidation.rows));
        if let Err(error) = written {
            if let Some(path) = &config.report {
                discard_report(path);
            }
            return Err(error).with_context(|| format!("write {}", config.out.display()));
        }
        info!(
            rows = consolidation.rows.len(),
            duration_ms = write_start.elapsed().as_millis(),
            "output written"
        );
        Some(config.out.clone())
    };

    Ok(RunOutcome {
        mode,
        as_of,
        output,
        report: config.report.clone(),
        tables: inputs.stats,
        coverage: consolidation.coverage,
        quality: consolidation.quality,
        duplicate_leaves: consolidation.duplicate_leaves,
    })
}

/// Removes a report describing an output that was never written.
fn discard_report(path: &Path) {
    if let Err(error) = fs::remove_file(path) {
        warn!(path = %path.display(), %error, "could not remove stale report");
    }
}
