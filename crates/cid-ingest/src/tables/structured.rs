//! Parsers for the structured reference tables and the flat DATASUS table
//! used in combined mode.

use cid_model::{
    BlockEntry, CategoryEntry, ChapterEntry, CidCode, CodeRange, DatasusEntry, SubcategoryEntry,
};

use tracing::debug;

use crate::csv::CsvTable;
use crate::error::Result;

use super::{LoadedTable, TableBuilder, TableKind, first_non_empty};

const DATASUS_CODE: &[&str] = &["codigo", "cid_codigo", "code", "cid"];
const DATASUS_DESCRIPTION: &[&str] = &["descricao", "description"];
const DATASUS_TITLE: &[&str] = &["titulo", "title", "descrabrev"];

fn parse_range_table<T>(
    table: &CsvTable,
    kind: TableKind,
    code_column: &str,
    title_column: &str,
    build: impl Fn(CodeRange, &str) -> T,
) -> Result<LoadedTable<T>> {
    let code_col = table.require_column(&[code_column])?;
    let title_col = table.require_column(&[title_column])?;
    let mut builder = TableBuilder::new(kind, table);

    for record in &table.records {
        match CodeRange::parse(record.get(code_col)) {
            Ok(range) => builder.push(build(range, record.get(title_col))),
            Err(error) => builder.skip(record.line, error),
        }
    }
    builder.finish()
}

/// Parses a `chapter_code,chapter_title` table (`S00-T98`).
pub fn parse_structured_chapters(table: &CsvTable) -> Result<LoadedTable<ChapterEntry>> {
    parse_range_table(
        table,
        TableKind::Chapters,
        "chapter_code",
        "chapter_title",
        |range, title| ChapterEntry::new(range, title),
    )
}

/// Parses a `block_id,block_title` table (`T51-T65`).
pub fn parse_structured_blocks(table: &CsvTable) -> Result<LoadedTable<BlockEntry>> {
    parse_range_table(
        table,
        TableKind::Blocks,
        "block_id",
        "block_title",
        |range, title| BlockEntry::new(range, title),
    )
}

/// Parses a `category_code,category_title` table. Any `block_id` or
/// `chapter_code` columns are ignored; membership is always derived from
/// the ranges.
pub fn parse_structured_categories(table: &CsvTable) -> Result<LoadedTable<CategoryEntry>> {
    let code_col = table.require_column(&["category_code"])?;
    let title_col = table.require_column(&["category_title"])?;
    let mut builder = TableBuilder::new(TableKind::Categories, table);

    for record in &table.records {
        let title = record.get(title_col);
        let entry =
            CidCode::parse(record.get(code_col)).and_then(|code| CategoryEntry::new(code, title, title));
        match entry {
            Ok(entry) => builder.push(entry),
            Err(error) => builder.skip(record.line, error),
        }
    }
    builder.finish()
}

/// Parses a `subcategory_code,subcategory_title` table. Codes without a
/// subcategory digit are kept in category form.
pub fn parse_structured_subcategories(
    table: &CsvTable,
) -> Result<LoadedTable<SubcategoryEntry>> {
    let code_col = table.require_column(&["subcategory_code"])?;
    let title_col = table.require_column(&["subcategory_title"])?;
    let mut builder = TableBuilder::new(TableKind::Subcategories, table);

    for record in &table.records {
        match CidCode::parse(record.get(code_col)) {
            Ok(code) => {
                if !code.is_subcategory() {
                    debug!(line = record.line, %code, "subcategory row in category form");
                }
                let title = record.get(title_col);
                builder.push(SubcategoryEntry::new(code, title, title));
            }
            Err(error) => builder.skip(record.line, error),
        }
    }
    builder.finish()
}

/// Parses the flat DATASUS `codigo;descricao` table.
///
/// Without a known code column the first column holds the codes; without a
/// description column descriptions are empty.
pub fn parse_datasus_codes(table: &CsvTable) -> Result<LoadedTable<DatasusEntry>> {
    let code_col = table.column_index(DATASUS_CODE).unwrap_or(0);
    let description_col = table.column_index(DATASUS_DESCRIPTION);
    let title_col = table.column_index(DATASUS_TITLE);
    let mut builder = TableBuilder::new(TableKind::Datasus, table);

    for record in &table.records {
        match CidCode::parse(record.get(code_col)) {
            Ok(code) => {
                let description = description_col.map_or("", |i| record.get(i));
                let title = title_col
                    .map(|i| record.get(i))
                    .filter(|t| !t.is_empty())
                    .map(str::to_string);
                builder.push(DatasusEntry {
                    code,
                    description: first_non_empty(&[description, title.as_deref().unwrap_or("")])
                        .to_string(),
                    title,
                });
            }
            Err(error) => builder.skip(record.line, error),
        }
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IngestError;
    use crate::csv::{Delimiter, TableFormat, TextEncoding, read_delimited};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn table(content: &str) -> (NamedTempFile, CsvTable) {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        let format = TableFormat {
            encoding: TextEncoding::Utf8,
            delimiter: Delimiter::Auto,
        };
        let table = read_delimited(file.path(), format).unwrap();
        (file, table)
    }

    #[test]
    fn test_structured_chapters_and_blocks() {
        let (_c, chapters) = table(
            "chapter_code,chapter_title\n\
             A00-B99,Algumas doenças infecciosas e parasitárias\n\
             S00-T98,\"Lesões, envenenamentos\"\n",
        );
        let (_b, blocks) = table("block_id,block_title,chapter_code\nT51-T65,Efeitos tóxicos,S00-T98\n");

        let chapters = parse_structured_chapters(&chapters).unwrap();
        assert_eq!(chapters.entries[1].title, "Lesões, envenenamentos");
        assert!(chapters.entries[1].range.spans_letters());

        let blocks = parse_structured_blocks(&blocks).unwrap();
        assert_eq!(blocks.entries[0].range.to_string(), "T51-T65");
    }

    #[test]
    fn test_structured_categories_skip_malformed() {
        let (_f, t) = table(
            "category_code,category_title,block_id\n\
             t65,Efeito tóxico de outras substâncias,T51-T65\n\
             65T,lixo,\n",
        );
        let loaded = parse_structured_categories(&t).unwrap();

        assert_eq!(loaded.entries.len(), 1);
        assert_eq!(loaded.entries[0].code.to_string(), "T65");
        assert_eq!(loaded.stats.skipped_rows[0].line, 3);
    }

    #[test]
    fn test_structured_subcategories() {
        let (_f, t) = table(
            "subcategory_code,subcategory_title,category_code\n\
             T65.9,Efeito tóxico de substância não especificada,T65\n",
        );
        let loaded = parse_structured_subcategories(&t).unwrap();
        assert_eq!(loaded.entries[0].category().to_string(), "T65");
    }

    #[test]
    fn test_structured_subcategory_in_category_form_is_kept() {
        let (_f, t) = table("subcategory_code,subcategory_title
A01 ,Febres tifóide e paratifóide
");
        let loaded = parse_structured_subcategories(&t).unwrap();

        assert_eq!(loaded.entries[0].code.to_string(), "A01");
        assert_eq!(loaded.stats.skipped(), 0);
    }

    #[test]
    fn test_datasus_named_columns() {
        let (_f, t) = table("codigo;descricao\nB20;Doença pelo HIV\nB20.0;Doença pelo HIV com micobactérias\n");
        let loaded = parse_datasus_codes(&t).unwrap();

        assert_eq!(loaded.entries.len(), 2);
        assert_eq!(loaded.entries[0].description, "Doença pelo HIV");
        assert_eq!(loaded.entries[0].title, None);
        assert_eq!(loaded.stats.delimiter, ';');
    }

    #[test]
    fn test_datasus_falls_back_to_first_column() {
        let (_f, t) = table("cd;texto\nA00;Cólera\n");
        let loaded = parse_datasus_codes(&t).unwrap();

        assert_eq!(loaded.entries[0].code.to_string(), "A00");
        assert_eq!(loaded.entries[0].description, "");
    }

    #[test]
    fn test_datasus_title_column() {
        let (_f, t) = table("codigo;descricao;titulo\nA00;Cólera;A00 Cólera\n");
        let loaded = parse_datasus_codes(&t).unwrap();
        assert_eq!(loaded.entries[0].title.as_deref(), Some("A00 Cólera"));
    }

    #[test]
    fn test_structured_missing_column() {
        let (_f, t) = table("code,title\nA00-B99,x\n");
        let err = parse_structured_chapters(&t).unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn { column, .. } if column == "chapter_code"));
    }
}
