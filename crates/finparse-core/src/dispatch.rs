//! Routing of a file to the extractor for its format.

use crate::formats::{excel, image, pdf, powerpoint, text, word};
use crate::model::ParsedDocument;
use crate::DocumentParser;
use std::path::Path;

/// Extensions the batch walker picks up, lower-case, without the dot.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "png", "jpg", "jpeg", "txt", "md",
];

/// Source format of a file, decided by its extension alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceFormat {
    Pdf,
    Word,
    Excel,
    PowerPoint,
    Image,
    Text,
    /// Holds the extension as written in the file name, dot included
    /// (empty when the name has no extension).
    Unsupported(String),
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();

        match ext.to_lowercase().as_str() {
            "pdf" => SourceFormat::Pdf,
            "doc" | "docx" => SourceFormat::Word,
            "xls" | "xlsx" => SourceFormat::Excel,
            "ppt" | "pptx" => SourceFormat::PowerPoint,
            "png" | "jpg" | "jpeg" => SourceFormat::Image,
            "txt" | "md" => SourceFormat::Text,
            _ if ext.is_empty() => SourceFormat::Unsupported(String::new()),
            _ => SourceFormat::Unsupported(format!(".{ext}")),
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, SourceFormat::Unsupported(_))
    }
}

/// Case-insensitive check of the file name against `SUPPORTED_EXTENSIONS`.
pub fn is_supported_file(path: &Path) -> bool {
    SourceFormat::from_path(path).is_supported()
}

impl DocumentParser {
    /// Parse one file into a record. Never fails: missing files, unknown
    /// formats and extractor errors all come back as degraded records.
    pub fn parse_document(&self, path: &Path, doc_id: &str) -> ParsedDocument {
        if !path.exists() {
            log::warn!("file not found: {}", path.display());
            return ParsedDocument::not_found(doc_id, path);
        }

        let ctx = self.context();
        match SourceFormat::from_path(path) {
            SourceFormat::Pdf => pdf::parse_pdf(path, doc_id, &ctx),
            SourceFormat::Word => word::parse_word(path, doc_id),
            SourceFormat::Excel => excel::parse_excel(path, doc_id),
            SourceFormat::PowerPoint => powerpoint::parse_powerpoint(path, doc_id),
            SourceFormat::Image => image::parse_image(path, doc_id, &ctx),
            SourceFormat::Text => text::parse_text(path, doc_id, &ctx),
            SourceFormat::Unsupported(ext) => {
                log::warn!("unsupported file format '{ext}': {}", path.display());
                ParsedDocument::unsupported(doc_id, path, &ext)
            }
        }
    }
}
