use crate::error::ErrorKind;
use crate::labels;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    Pdf,
    Word,
    Excel,
    Ppt,
    Image,
    Txt,
    Unknown,
    Unsupported,
}

impl DocType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocType::Pdf => "pdf",
            DocType::Word => "word",
            DocType::Excel => "excel",
            DocType::Ppt => "ppt",
            DocType::Image => "image",
            DocType::Txt => "txt",
            DocType::Unknown => "unknown",
            DocType::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar value of an extractor-specific metadata key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl From<bool> for MetaValue {
    fn from(v: bool) -> Self {
        MetaValue::Bool(v)
    }
}

impl From<usize> for MetaValue {
    fn from(v: usize) -> Self {
        MetaValue::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<String> for MetaValue {
    fn from(v: String) -> Self {
        MetaValue::Text(v)
    }
}

impl From<&str> for MetaValue {
    fn from(v: &str) -> Self {
        MetaValue::Text(v.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,
    /// Extractor-specific keys (page_count, title, encoding, ...).
    #[serde(flatten)]
    pub additional: BTreeMap<String, MetaValue>,
}

impl Metadata {
    /// Filename and size of the file at `path`. The size is left out when
    /// the file cannot be stat'ed.
    pub fn for_file(path: &Path) -> Self {
        Metadata {
            filename: path.file_name().map(|n| n.to_string_lossy().into_owned()),
            file_size: std::fs::metadata(path).map(|m| m.len()).ok(),
            ..Default::default()
        }
    }

    pub fn insert(&mut self, key: &str, value: impl Into<MetaValue>) {
        self.additional.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.additional.get(key)
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Where a table or image came from inside its document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Locator {
    Page { page: usize },
    Sheet { sheet_name: String },
    Slide { slide: usize },
    Document {},
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRecord {
    #[serde(flatten)]
    pub locator: Locator,
    pub table_index: usize,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageKind {
    PageImage,
    Original,
    Chart,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    #[serde(rename = "type")]
    pub kind: ImageKind,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
    #[serde(flatten)]
    pub locator: Locator,
}

/// A pattern-detected section start in flat text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub start: usize,
    /// Coarse lookahead end; a retrieval hint, not a verified boundary.
    pub end: usize,
}

/// A heading taken from a paragraph style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub title: String,
    pub style: String,
    pub level: u32,
    pub position: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<Section>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headings: Option<Vec<Heading>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheets: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slides: Option<usize>,
}

/// The normalized form of one source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub doc_id: String,
    pub doc_type: DocType,
    pub source_path: String,
    pub content: String,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub tables: Vec<TableRecord>,
    #[serde(default)]
    pub images: Vec<ImageRecord>,
    #[serde(default)]
    pub structure: Structure,
}

impl ParsedDocument {
    pub fn new(doc_id: &str, doc_type: DocType, path: &Path, content: String) -> Self {
        ParsedDocument {
            doc_id: doc_id.to_string(),
            doc_type,
            source_path: path.display().to_string(),
            content,
            metadata: Metadata::default(),
            tables: Vec::new(),
            images: Vec::new(),
            structure: Structure::default(),
        }
    }

    /// Degraded record for a file whose extraction failed as a whole.
    pub fn failed(doc_id: &str, doc_type: DocType, path: &Path, kind: ErrorKind) -> Self {
        let source = path.display().to_string();
        let mut doc = Self::new(doc_id, doc_type, path, labels::extraction_failed(&source));
        doc.metadata = Metadata {
            filename: path.file_name().map(|n| n.to_string_lossy().into_owned()),
            error: Some(kind),
            ..Default::default()
        };
        doc
    }

    pub fn not_found(doc_id: &str, path: &Path) -> Self {
        let source = path.display().to_string();
        let mut doc = Self::new(doc_id, DocType::Unknown, path, labels::file_not_found(&source));
        doc.metadata.error = Some(ErrorKind::FileNotFound);
        doc
    }

    /// `ext` is kept exactly as it appeared in the file name.
    pub fn unsupported(doc_id: &str, path: &Path, ext: &str) -> Self {
        let mut doc = Self::new(
            doc_id,
            DocType::Unsupported,
            path,
            labels::unsupported_format(ext),
        );
        doc.metadata.error = Some(ErrorKind::UnsupportedFormat);
        doc
    }

    pub fn is_error(&self) -> bool {
        self.metadata.is_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn table_locator_is_flattened() {
        let table = TableRecord {
            locator: Locator::Page { page: 3 },
            table_index: 0,
            header: vec!["项目".into(), "金额".into()],
            rows: vec![vec!["资本".into(), "100".into()]],
        };
        let value = serde_json::to_value(&table).unwrap();
        assert_eq!(
            value,
            json!({"page": 3, "table_index": 0, "header": ["项目", "金额"], "rows": [["资本", "100"]]})
        );

        let sheet: TableRecord = serde_json::from_value(json!({
            "sheet_name": "Sheet1", "table_index": 1, "header": ["a"], "rows": []
        }))
        .unwrap();
        assert_eq!(
            sheet.locator,
            Locator::Sheet {
                sheet_name: "Sheet1".into()
            }
        );
    }

    #[test]
    fn metadata_extras_sit_beside_required_keys() {
        let mut meta = Metadata {
            filename: Some("a.pdf".into()),
            file_size: Some(1024),
            ..Default::default()
        };
        meta.insert("page_count", 3usize);
        meta.insert("title", "年度报告");
        meta.insert("ocr_fallback", true);

        let value = serde_json::to_value(&meta).unwrap();
        assert_eq!(
            value,
            json!({
                "filename": "a.pdf",
                "file_size": 1024,
                "page_count": 3,
                "title": "年度报告",
                "ocr_fallback": true
            })
        );
        let back: Metadata = serde_json::from_value(value).unwrap();
        assert_eq!(back, meta);
    }

    #[test]
    fn not_found_record_shape() {
        let doc = ParsedDocument::not_found("DOC_001", Path::new("/missing/a.pdf"));
        assert_eq!(doc.doc_type, DocType::Unknown);
        assert_eq!(doc.metadata.error, Some(ErrorKind::FileNotFound));
        assert!(doc.content.contains("/missing/a.pdf"));
        assert!(doc.tables.is_empty());

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["metadata"], json!({"error": "file_not_found"}));
        assert_eq!(value["tables"], json!([]));
        assert_eq!(value["images"], json!([]));
    }

    #[test]
    fn image_record_uses_type_key() {
        let image = ImageRecord {
            kind: ImageKind::Chart,
            description: "图表: 营收".into(),
            extracted_text: None,
            locator: Locator::Slide { slide: 2 },
        };
        let value = serde_json::to_value(&image).unwrap();
        assert_eq!(
            value,
            json!({"type": "chart", "description": "图表: 营收", "slide": 2})
        );
    }
}
