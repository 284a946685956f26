//! Tests for loading both input modes from disk.

use std::fs;
use std::path::{Path, PathBuf};

use cid_ingest::{
    CombinedSources, Delimiter, IngestError, InputMode, LoadOptions, TableKind, TextEncoding,
    load_inputs,
};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("write fixture");
    path
}

/// Official export in Latin-1 with `;` separators.
fn write_official(dir: &Path) {
    write(
        dir,
        "CID-10-CAPITULOS.CSV",
        b"NUMCAP;CATINIC;CATFIM;DESCRICAO;DESCRABREV\n\
          1;A00;B99;Cap\xedtulo I - Algumas doen\xe7as infecciosas e parasit\xe1rias;I. Algumas doen\xe7as infecciosas\n\
          19;S00;T98;Cap\xedtulo XIX - Les\xf5es, envenenamento;XIX. Les\xf5es\n",
    );
    write(
        dir,
        "CID-10-GRUPOS.CSV",
        b"CATINIC;CATFIM;DESCRICAO;DESCRABREV\n\
          A00;A09;Doen\xe7as infecciosas intestinais;Doen\xe7as infecciosas intestinais\n\
          T51;T65;Efeitos t\xf3xicos de subst\xe2ncias;Efeitos t\xf3xicos\n",
    );
    write(
        dir,
        "CID-10-CATEGORIAS.CSV",
        b"CAT;CLASSIF;DESCRICAO;DESCRABREV;REFER;EXCLUIDOS\n\
          A00;;C\xf3lera;A00 C\xf3lera;;\n\
          A09;;Diarr\xe9ia e gastroenterite;A09 Diarr\xe9ia;;\n\
          T65;;Efeito t\xf3xico de outras subst\xe2ncias;T65 Efeito t\xf3xico;;\n\
          ???;;lixo;;;\n",
    );
    write(
        dir,
        "CID-10-SUBCATEGORIAS.CSV",
        b"SUBCAT;CLASSIF;RESTRSEXO;CAUSAOBITO;DESCRICAO;DESCRABREV\n\
          A000;;;;C\xf3lera devida a Vibrio cholerae 01, bi\xf3tipo cholerae;A00.0 C\xf3lera cl\xe1ssica\n\
          T659;;;;Efeito t\xf3xico de subst\xe2ncia n\xe3o especificada;T65.9 Efeito t\xf3xico NE\n",
    );
}

#[test]
fn loads_official_folder() {
    let dir = TempDir::new().expect("temp dir");
    write_official(dir.path());
    write(dir.path(), "LEIAME.txt", b"ignored");

    let mode = InputMode::RawSource {
        dir: dir.path().to_path_buf(),
    };
    let inputs = load_inputs(&mode, &LoadOptions::default()).expect("load inputs");

    assert_eq!(inputs.tables.chapters.len(), 2);
    assert_eq!(inputs.tables.blocks.len(), 2);
    assert_eq!(inputs.tables.categories.len(), 3);
    assert_eq!(inputs.tables.subcategories.len(), 2);
    assert!(inputs.datasus.is_none());

    assert_eq!(inputs.tables.chapters[1].range.to_string(), "S00-T98");
    assert_eq!(inputs.tables.categories[0].title, "A00 Cólera");
    assert_eq!(inputs.tables.subcategories[1].code.to_string(), "T65.9");

    let kinds: Vec<TableKind> = inputs.stats.iter().map(|s| s.table).collect();
    assert_eq!(
        kinds,
        vec![
            TableKind::Chapters,
            TableKind::Blocks,
            TableKind::Categories,
            TableKind::Subcategories
        ]
    );
    assert_eq!(inputs.stats[2].skipped(), 1);
    assert_eq!(inputs.stats[2].encoding, "windows-1252");
    assert_eq!(inputs.skipped_rows(), 1);
}

#[test]
fn missing_official_table_is_fatal() {
    let dir = TempDir::new().expect("temp dir");
    write_official(dir.path());
    fs::remove_file(dir.path().join("CID-10-GRUPOS.CSV")).expect("remove");

    let mode = InputMode::RawSource {
        dir: dir.path().to_path_buf(),
    };
    let err = load_inputs(&mode, &LoadOptions::default()).expect_err("must fail");
    assert!(err.is_source_not_found());
    assert!(matches!(err, IngestError::SourceNotFound { fragment, .. } if fragment == "GRUPOS"));
}

#[test]
fn missing_folder_is_fatal() {
    let mode = InputMode::RawSource {
        dir: PathBuf::from("/nonexistent/datasus"),
    };
    let err = load_inputs(&mode, &LoadOptions::default()).expect_err("must fail");
    assert!(matches!(err, IngestError::DirectoryNotFound { .. }));
}

fn write_combined(dir: &Path) -> CombinedSources {
    CombinedSources {
        datasus: write(
            dir,
            "cid10_datasus.csv",
            "codigo;descricao\nB20;Doença pelo HIV resultando em doenças infecciosas e parasitárias\nT65.9;Efeito tóxico NE\n"
                .as_bytes(),
        ),
        chapters: write(
            dir,
            "chapters.csv",
            b"chapter_code,chapter_title\nA00-B99,Algumas doencas infecciosas\nS00-T98,Lesoes\n",
        ),
        blocks: write(
            dir,
            "blocks.csv",
            b"block_id,block_title\nB20-B24,Doenca pelo HIV\nT51-T65,Efeitos toxicos\n",
        ),
        categories: write(
            dir,
            "categories.csv",
            b"category_code,category_title\nT65,Efeito toxico de outras substancias\n",
        ),
        subcategories: write(
            dir,
            "subcategories.csv",
            b"subcategory_code,subcategory_title\nT65.9,Efeito toxico NE\n",
        ),
    }
}

#[test]
fn loads_combined_sources() {
    let dir = TempDir::new().expect("temp dir");
    let mode = InputMode::Combined(write_combined(dir.path()));

    let inputs = load_inputs(&mode, &LoadOptions::default()).expect("load inputs");
    let datasus = inputs.datasus.as_ref().expect("datasus leaves");

    assert_eq!(datasus.len(), 2);
    assert_eq!(datasus[0].code.to_string(), "B20");
    assert_eq!(inputs.tables.blocks.len(), 2);
    assert_eq!(inputs.stats.len(), 5);
    assert_eq!(inputs.stats[0].table, TableKind::Datasus);
    assert_eq!(inputs.stats[0].delimiter, ';');
    assert_eq!(inputs.stats[1].delimiter, ',');
}

#[test]
fn forced_format_applies_to_every_table() {
    let dir = TempDir::new().expect("temp dir");
    let mode = InputMode::Combined(write_combined(dir.path()));
    let options = LoadOptions {
        encoding: Some(TextEncoding::Utf8),
        delimiter: Some(Delimiter::Semicolon),
    };

    // The structured tables are comma-separated, so their header collapses
    // into a single unknown column.
    let err = load_inputs(&mode, &options).expect_err("must fail");
    assert!(matches!(err, IngestError::MissingColumn { column, .. } if column == "chapter_code"));
}
