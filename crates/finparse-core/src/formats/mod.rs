//! One extractor per source format. Each takes a path and a document id and
//! returns a fully populated record; failures come back as degraded records.

pub mod excel;
pub mod image;
pub mod pdf;
pub mod powerpoint;
pub mod text;
pub mod word;

use crate::config::ParseOptions;
use crate::error::DocparseError;
use crate::extraction::{OcrEngine, PdfReader};
use crate::model::{DocType, ParsedDocument};
use crate::parsing::structure::SectionRules;
use std::path::Path;

/// Backends and options an extractor may use.
#[derive(Clone, Copy)]
pub struct ExtractionContext<'a> {
    pub pdf_reader: &'a dyn PdfReader,
    pub ocr: &'a dyn OcrEngine,
    pub options: &'a ParseOptions,
}

impl ExtractionContext<'_> {
    pub fn section_rules(&self) -> SectionRules {
        SectionRules {
            window: self.options.section_window,
            short_line_max_chars: self.options.short_heading_max_chars,
        }
    }
}

/// Collapse an extraction result into a record, logging the failure.
pub(crate) fn or_failed(
    result: Result<ParsedDocument, DocparseError>,
    doc_id: &str,
    doc_type: DocType,
    path: &Path,
) -> ParsedDocument {
    result.unwrap_or_else(|e| {
        log::warn!("{} extraction failed for {}: {e}", doc_type, path.display());
        ParsedDocument::failed(doc_id, doc_type, path, e.kind())
    })
}
