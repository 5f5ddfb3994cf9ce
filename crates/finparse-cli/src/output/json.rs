use finparse_core::error::DocparseError;
use finparse_core::model::ParsedDocument;
use serde_json::json;

pub fn print(documents: &[ParsedDocument]) -> Result<(), DocparseError> {
    let summary: Vec<serde_json::Value> = documents
        .iter()
        .map(|doc| {
            json!({
                "doc_id": doc.doc_id,
                "doc_type": doc.doc_type.as_str(),
                "source_path": doc.source_path,
                "chars": doc.content.chars().count(),
                "tables": doc.tables.len(),
                "images": doc.images.len(),
                "error": doc.metadata.error.map(|kind| kind.as_str()),
            })
        })
        .collect();
    let json = serde_json::to_string_pretty(&summary)?;
    println!("{json}");
    Ok(())
}
