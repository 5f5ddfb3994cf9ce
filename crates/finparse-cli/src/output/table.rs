use finparse_core::model::ParsedDocument;

pub fn print(documents: &[ParsedDocument]) {
    print!("{}", format_summary(documents));
}

/// One line per document: id, type, characters, tables, images and status.
pub fn format_summary(documents: &[ParsedDocument]) -> String {
    if documents.is_empty() {
        return "No supported documents found.\n".to_string();
    }

    let max_name = documents
        .iter()
        .map(|d| file_label(d).chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut out = String::new();
    out.push_str(&format!(
        "{:<8}  {:<width$}  {:<11}  {:>8}  {:>6}  {:>6}  {}\n",
        "ID",
        "File",
        "Type",
        "Chars",
        "Tables",
        "Images",
        "Status",
        width = max_name
    ));

    for doc in documents {
        let status = doc
            .metadata
            .error
            .map(|kind| kind.as_str())
            .unwrap_or("ok");
        let name = file_label(doc);
        // pad by characters, CJK file names are common
        let padding = max_name.saturating_sub(name.chars().count());
        out.push_str(&format!(
            "{:<8}  {}{}  {:<11}  {:>8}  {:>6}  {:>6}  {}\n",
            doc.doc_id,
            name,
            " ".repeat(padding),
            doc.doc_type.as_str(),
            doc.content.chars().count(),
            doc.tables.len(),
            doc.images.len(),
            status,
        ));
    }

    out
}

fn file_label(doc: &ParsedDocument) -> &str {
    doc.metadata
        .filename
        .as_deref()
        .unwrap_or(doc.source_path.as_str())
}
