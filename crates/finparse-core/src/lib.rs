pub mod batch;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod extraction;
pub mod formats;
pub mod labels;
pub mod model;
pub mod parsing;

use config::ParseOptions;
use extraction::pdftotext::PopplerReader;
use extraction::tesseract::TesseractEngine;
use extraction::{OcrEngine, PdfReader};
use formats::ExtractionContext;

/// Main API entry point: turns office and financial documents into
/// `model::ParsedDocument` records.
///
/// Single files go through `parse_document`, whole directory trees through
/// `batch_parse`. PDF reading and OCR are pluggable backends.
pub struct DocumentParser {
    options: ParseOptions,
    pdf_reader: Box<dyn PdfReader>,
    ocr: Box<dyn OcrEngine>,
}

impl DocumentParser {
    /// Parser backed by poppler-utils and tesseract from `PATH`.
    pub fn new(options: ParseOptions) -> Self {
        if !PopplerReader::is_available() {
            log::warn!("pdftotext not found on PATH, PDF files will fail to parse");
        }
        if options.enable_ocr && !TesseractEngine::is_available() {
            log::warn!("tesseract not found on PATH, OCR will fail");
        }
        Self::with_backends(
            options,
            Box::new(PopplerReader::new()),
            Box::new(TesseractEngine::new()),
        )
    }

    pub fn with_backends(
        options: ParseOptions,
        pdf_reader: Box<dyn PdfReader>,
        ocr: Box<dyn OcrEngine>,
    ) -> Self {
        log::debug!(
            "document parser using {} and {} (OCR {})",
            pdf_reader.backend_name(),
            ocr.engine_name(),
            if options.enable_ocr { "enabled" } else { "disabled" }
        );
        DocumentParser {
            options,
            pdf_reader,
            ocr,
        }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    fn context(&self) -> ExtractionContext<'_> {
        ExtractionContext {
            pdf_reader: self.pdf_reader.as_ref(),
            ocr: self.ocr.as_ref(),
            options: &self.options,
        }
    }
}
