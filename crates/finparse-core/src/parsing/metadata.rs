use crate::extraction::PdfInfo;
use crate::model::Metadata;

/// Copy the document information entries that are present and non-blank.
pub fn apply_pdf_info(metadata: &mut Metadata, info: &PdfInfo) {
    let fields = [
        ("title", &info.title),
        ("author", &info.author),
        ("subject", &info.subject),
        ("creator", &info.creator),
        ("producer", &info.producer),
        ("creation_date", &info.creation_date),
        ("modification_date", &info.modification_date),
    ];

    for (key, value) in fields {
        if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            metadata.insert(key, v);
        }
    }
}

/// First `max_chars` characters of `text`.
pub fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MetaValue;

    #[test]
    fn test_apply_pdf_info_skips_blank() {
        let info = PdfInfo {
            title: Some("资本管理办法".into()),
            author: Some("  ".into()),
            producer: Some("pdfTeX".into()),
            ..Default::default()
        };
        let mut meta = Metadata::default();
        apply_pdf_info(&mut meta, &info);

        assert_eq!(meta.get("title"), Some(&MetaValue::Text("资本管理办法".into())));
        assert_eq!(meta.get("author"), None);
        assert_eq!(meta.additional.len(), 2);
    }

    #[test]
    fn test_preview_counts_chars() {
        assert_eq!(preview("一二三四五", 3), "一二三");
        assert_eq!(preview("ab", 10), "ab");
    }
}
