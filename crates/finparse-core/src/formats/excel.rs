use calamine::{open_workbook_auto, Data, Reader};

use crate::error::DocparseError;
use crate::formats::or_failed;
use crate::labels;
use crate::model::{DocType, Locator, Metadata, ParsedDocument, Structure};
use crate::parsing::table::build_table;
use std::path::Path;

/// A worksheet with its cells stringified, all-empty rows removed.
#[derive(Debug, Clone, PartialEq)]
struct SheetGrid {
    name: String,
    rows: Vec<Vec<String>>,
}

/// Parse an Excel workbook (.xlsx or .xls).
pub fn parse_excel(path: &Path, doc_id: &str) -> ParsedDocument {
    or_failed(extract_excel(path, doc_id), doc_id, DocType::Excel, path)
}

fn extract_excel(path: &Path, doc_id: &str) -> Result<ParsedDocument, DocparseError> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| DocparseError::Extraction(format!("failed to open workbook: {e}")))?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| DocparseError::Extraction(format!("failed to read sheet '{name}': {e}")))?;
        let rows = range
            .rows()
            .map(|row| row.iter().map(cell_as_string).collect::<Vec<_>>())
            .filter(|row| row.iter().any(|c| !c.is_empty()))
            .collect();
        sheets.push(SheetGrid { name, rows });
    }

    Ok(build_record(path, doc_id, sheets))
}

/// One marker line per sheet, a summary line for sheets with data rows, and
/// one table per non-empty sheet.
fn build_record(path: &Path, doc_id: &str, sheets: Vec<SheetGrid>) -> ParsedDocument {
    let mut content_parts = Vec::new();
    let mut tables = Vec::new();
    let sheet_names: Vec<String> = sheets.iter().map(|s| s.name.clone()).collect();

    for (index, sheet) in sheets.into_iter().enumerate() {
        content_parts.push(labels::sheet_marker(&sheet.name));

        if let Some(header) = sheet.rows.first() {
            if sheet.rows.len() > 1 {
                content_parts.push(labels::sheet_summary(&sheet.name, sheet.rows.len() - 1, header));
            }
        }

        let locator = Locator::Sheet {
            sheet_name: sheet.name,
        };
        if let Some(table) = build_table(locator, index, sheet.rows) {
            tables.push(table);
        }
    }

    let mut metadata = Metadata::for_file(path);
    metadata.insert("sheet_count", sheet_names.len());
    metadata.insert("table_count", tables.len());

    let mut doc = ParsedDocument::new(doc_id, DocType::Excel, path, content_parts.join("\n"));
    doc.metadata = metadata;
    doc.tables = tables;
    doc.structure = Structure {
        sheets: Some(sheet_names),
        ..Default::default()
    };
    doc
}

fn cell_as_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        _ => format!("{cell}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MetaValue;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_build_record() {
        let sheets = vec![
            SheetGrid {
                name: "资产负债表".into(),
                rows: vec![row(&["项目", "期末余额"]), row(&["现金", "100"]), row(&["存款", ""])],
            },
            SheetGrid {
                name: "空表".into(),
                rows: vec![],
            },
            SheetGrid {
                name: "说明".into(),
                rows: vec![row(&["仅表头"])],
            },
        ];

        let doc = build_record(Path::new("report.xlsx"), "DOC_002", sheets);
        assert_eq!(
            doc.content,
            "=== 工作表: 资产负债表 ===\n\
             工作表'资产负债表'包含2行数据，列标题: 项目, 期末余额\n\
             === 工作表: 空表 ===\n\
             === 工作表: 说明 ==="
        );

        assert_eq!(doc.tables.len(), 2);
        assert_eq!(
            doc.tables[0].locator,
            Locator::Sheet {
                sheet_name: "资产负债表".into()
            }
        );
        assert_eq!(doc.tables[0].rows[1], row(&["存款", ""]));
        assert_eq!(doc.tables[1].table_index, 2);
        assert!(doc.tables[1].rows.is_empty());

        assert_eq!(doc.metadata.get("sheet_count"), Some(&MetaValue::Int(3)));
        assert_eq!(doc.metadata.get("table_count"), Some(&MetaValue::Int(2)));
        assert_eq!(doc.structure.sheets.as_ref().map(Vec::len), Some(3));
    }

    #[test]
    fn test_cell_as_string() {
        assert_eq!(cell_as_string(&Data::Empty), "");
        assert_eq!(cell_as_string(&Data::Int(42)), "42");
        assert_eq!(cell_as_string(&Data::Float(0.25)), "0.25");
        assert_eq!(cell_as_string(&Data::String("现金".into())), "现金");
        assert_eq!(cell_as_string(&Data::Bool(true)), "true");
    }
}
