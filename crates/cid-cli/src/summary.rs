use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use cid_model::SourceTag;

use crate::types::RunOutcome;

/// Findings listed per category before the rest is folded into a count.
const MAX_LISTED_FINDINGS: usize = 10;

pub fn print_summary(outcome: &RunOutcome) {
    for line in totals_lines(outcome) {
        println!("{line}");
    }
    println!("{}", tables_table(outcome));
    println!("{}", coverage_table(outcome));
    let findings = quality_lines(outcome);
    if !findings.is_empty() {
        println!();
        println!("Data quality:");
        for line in findings {
            println!("- {line}");
        }
    }
}

/// Plain-text header of the summary.
pub fn totals_lines(outcome: &RunOutcome) -> Vec<String> {
    let mut lines = vec![format!("Mode: {}", outcome.mode)];
    match &outcome.output {
        Some(path) => lines.push(format!("Output: {}", path.display())),
        None => lines.push("Output: (dry run, nothing written)".to_string()),
    }
    if let Some(path) = &outcome.report {
        lines.push(format!("Report: {}", path.display()));
    }
    lines.push(format!("Update date: {}", outcome.as_of));
    lines.push(format!("Total codes: {}", outcome.coverage.total));
    lines.push(format!(
        "Without block/chapter: {}",
        outcome.coverage.unresolved
    ));
    lines
}

fn tables_table(outcome: &RunOutcome) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("File"),
        header_cell("Encoding"),
        header_cell("Sep"),
        header_cell("Parsed"),
        header_cell("Skipped"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Center);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);
    for stats in &outcome.tables {
        let file = stats
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| stats.path.display().to_string());
        table.add_row(vec![
            Cell::new(stats.table.as_str()).add_attribute(Attribute::Bold),
            Cell::new(file),
            dim_cell(stats.encoding),
            Cell::new(stats.delimiter),
            Cell::new(stats.parsed),
            count_cell(stats.skipped(), Color::Yellow),
        ]);
    }
    table
}

fn coverage_table(outcome: &RunOutcome) -> Table {
    let coverage = &outcome.coverage;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Coverage"), header_cell("Codes")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Resolved"), Cell::new(coverage.resolved())]);
    table.add_row(vec![
        Cell::new("Without block/chapter"),
        count_cell(coverage.unresolved, Color::Red),
    ]);
    table.add_row(vec![
        Cell::new("Block without chapter"),
        count_cell(
            coverage.missing_chapter.saturating_sub(coverage.missing_block),
            Color::Yellow,
        ),
    ]);
    for source in [SourceTag::Structured, SourceTag::Datasus] {
        table.add_row(vec![
            dim_cell(format!("Source {source}")),
            Cell::new(coverage.count_for(source)),
        ]);
    }
    table.add_row(vec![
        dim_cell("Duplicate codes dropped"),
        count_cell(outcome.duplicate_leaves, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(coverage.total).add_attribute(Attribute::Bold),
    ]);
    table
}

/// One line per data-quality finding, capped per category.
pub fn quality_lines(outcome: &RunOutcome) -> Vec<String> {
    let quality = &outcome.quality;
    let mut lines = Vec::new();
    push_capped(
        &mut lines,
        quality.ambiguous_categories.iter().map(|finding| {
            format!(
                "{} matches {} blocks, using {}",
                finding.subject, finding.candidates, finding.chosen
            )
        }),
    );
    push_capped(
        &mut lines,
        quality.ambiguous_blocks.iter().map(|finding| {
            format!(
                "block {} matches {} chapters, using {}",
                finding.subject, finding.candidates, finding.chosen
            )
        }),
    );
    push_capped(
        &mut lines,
        quality.straddling_blocks.iter().map(|straddle| {
            match &straddle.end_chapter {
                Some(end) => format!(
                    "block {} starts in chapter {} but ends in {}",
                    straddle.block, straddle.chapter, end
                ),
                None => format!(
                    "block {} starts in chapter {} but ends outside every chapter",
                    straddle.block, straddle.chapter
                ),
            }
        }),
    );
    push_capped(
        &mut lines,
        quality
            .unplaced_blocks
            .iter()
            .map(|block| format!("block {block} is outside every chapter")),
    );
    lines
}

fn push_capped(lines: &mut Vec<String>, findings: impl ExactSizeIterator<Item = String>) {
    let total = findings.len();
    lines.extend(findings.take(MAX_LISTED_FINDINGS));
    if total > MAX_LISTED_FINDINGS {
        lines.push(format!("... and {} more", total - MAX_LISTED_FINDINGS));
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).fg(Color::DarkGrey)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use cid_core::{AmbiguousPlacement, CoverageReport, DataQuality};
    use cid_model::CodeRange;

    use super::*;

    fn outcome() -> RunOutcome {
        RunOutcome {
            mode: "raw-source",
            as_of: "2024-03-01".to_string(),
            output: Some(PathBuf::from("cid10_consolidado.csv")),
            report: None,
            tables: Vec::new(),
            coverage: CoverageReport {
                total: 12,
                unresolved: 2,
                missing_block: 2,
                missing_chapter: 3,
                ..CoverageReport::default()
            },
            quality: DataQuality::default(),
            duplicate_leaves: 0,
        }
    }

    #[test]
    fn test_totals_lines() {
        insta::assert_snapshot!(totals_lines(&outcome()).join("\n"), @r"
        Mode: raw-source
        Output: cid10_consolidado.csv
        Update date: 2024-03-01
        Total codes: 12
        Without block/chapter: 2
        ");
    }

    #[test]
    fn test_dry_run_line() {
        let mut outcome = outcome();
        outcome.output = None;
        outcome.report = Some(PathBuf::from("report.json"));
        let lines = totals_lines(&outcome);
        assert_eq!(lines[1], "Output: (dry run, nothing written)");
        assert_eq!(lines[2], "Report: report.json");
    }

    #[test]
    fn test_quality_lines_are_capped() {
        let mut outcome = outcome();
        let chosen = CodeRange::parse("A00-A09").unwrap();
        outcome.quality.ambiguous_categories = (0..13)
            .map(|i| AmbiguousPlacement {
                subject: format!("A0{}", i % 10),
                chosen,
                candidates: 2,
            })
            .collect();

        let lines = quality_lines(&outcome);
        assert_eq!(lines.len(), MAX_LISTED_FINDINGS + 1);
        assert_eq!(lines[0], "A00 matches 2 blocks, using A00-A09");
        assert_eq!(lines[MAX_LISTED_FINDINGS], "... and 3 more");
    }

    #[test]
    fn test_clean_run_has_no_findings() {
        assert!(quality_lines(&outcome()).is_empty());
    }
}
