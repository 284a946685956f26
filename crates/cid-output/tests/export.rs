//! Tests for the consolidated CSV and the run report on disk.

use std::fs;

use chrono::NaiveDate;
use cid_core::{ConsolidateOptions, consolidate_inputs};
use cid_ingest::LoadedInputs;
use cid_model::{
    BlockEntry, CategoryEntry, ChapterEntry, CidCode, CodeRange, HierarchyTables,
    SubcategoryEntry,
};
use cid_output::{RunReport, UTF8_BOM, write_csv, write_report};
use tempfile::TempDir;

fn code(raw: &str) -> CidCode {
    CidCode::parse(raw).expect("valid code")
}

fn inputs() -> LoadedInputs {
    LoadedInputs {
        tables: HierarchyTables {
            chapters: vec![ChapterEntry::new(
                CodeRange::parse("A00-B99").expect("range"),
                "Algumas doenças infecciosas",
            )],
            blocks: vec![BlockEntry::new(
                CodeRange::parse("A00-A09").expect("range"),
                "Doenças infecciosas intestinais",
            )],
            categories: vec![
                CategoryEntry::new(code("A00"), "A00 Cólera", "Cólera").expect("category"),
                CategoryEntry::new(code("V01"), "V01 Pedestre", "Pedestre").expect("category"),
            ],
            subcategories: vec![SubcategoryEntry::new(
                code("A00.0"),
                "A00.0 Cólera clássica",
                "Cólera clássica",
            )],
        },
        datasus: None,
        stats: Vec::new(),
    }
}

fn options() -> ConsolidateOptions {
    ConsolidateOptions::new(NaiveDate::from_ymd_opt(2024, 3, 1).expect("date"))
}

#[test]
fn consolidated_csv_layout() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("cid10_consolidado.csv");
    let result = consolidate_inputs(&inputs(), &options());

    write_csv(&path, &result.rows).expect("write csv");

    let bytes = fs::read(&path).expect("read output");
    assert!(bytes.starts_with(UTF8_BOM));
    let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).expect("utf-8");
    insta::assert_snapshot!(text, @r#"
    "cid_codigo";"cid_categoria";"cid_subcategoria";"titulo";"descricao";"capitulo_codigo";"capitulo_titulo";"bloco_codigo";"bloco_titulo";"fonte";"dt_atualizacao"
    "A00";"A00";"";"A00 Cólera";"Cólera";"A00-B99";"Algumas doenças infecciosas";"A00-A09";"Doenças infecciosas intestinais";"Structured";"2024-03-01"
    "V01";"V01";"";"V01 Pedestre";"Pedestre";"";"";"";"";"Structured";"2024-03-01"
    "A00.0";"A00";"A00.0";"A00.0 Cólera clássica";"Cólera clássica";"A00-B99";"Algumas doenças infecciosas";"A00-A09";"Doenças infecciosas intestinais";"Structured";"2024-03-01"
    "#);
}

#[test]
fn identical_inputs_give_identical_bytes() {
    let dir = TempDir::new().expect("temp dir");
    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");

    write_csv(&first, &consolidate_inputs(&inputs(), &options()).rows).expect("first run");
    write_csv(&second, &consolidate_inputs(&inputs(), &options()).rows).expect("second run");

    assert_eq!(
        fs::read(&first).expect("read first"),
        fs::read(&second).expect("read second")
    );
}

#[test]
fn run_report_contents() {
    let dir = TempDir::new().expect("temp dir");
    let csv_path = dir.path().join("out.csv");
    let report_path = dir.path().join("report.json");
    let inputs = inputs();
    let result = consolidate_inputs(&inputs, &options());

    let report = RunReport::new("raw-source", "2024-03-01", &inputs.stats, &result)
        .with_output(&csv_path);
    write_report(&report_path, &report).expect("write report");

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).expect("read report"))
            .expect("valid json");
    assert_eq!(json["mode"], "raw-source");
    assert_eq!(json["coverage"]["total"], 3);
    assert_eq!(json["coverage"]["unresolved"], 1);
    assert_eq!(json["coverage"]["by_source"]["Structured"], 3);
    assert_eq!(json["data_quality"]["unplaced_blocks"].as_array().map(Vec::len), Some(0));
    assert_eq!(json["duplicate_leaves"], 0);
}
