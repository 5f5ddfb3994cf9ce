pub mod ooxml;
pub mod pdftotext;
pub mod table;
pub mod tesseract;

use crate::error::DocparseError;
use std::path::Path;

/// A table as the reader found it: rows of loosely-typed cells.
pub type RawTable = Vec<Vec<Option<String>>>;

/// Content extracted from a single page of a PDF.
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    pub page_number: usize,
    pub lines: Vec<String>,
    pub tables: Vec<RawTable>,
}

impl PageContent {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Text layer of an opened PDF. A page that could not be read is kept as an
/// error so the caller can skip it without losing page numbering.
#[derive(Debug, Default)]
pub struct PdfDocument {
    pub pages: Vec<Result<PageContent, DocparseError>>,
}

impl PdfDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Document information dictionary entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub modification_date: Option<String>,
}

/// Trait for PDF reading backends.
pub trait PdfReader: Send + Sync {
    /// Load the text layer of every page.
    fn load(&self, path: &Path) -> Result<PdfDocument, DocparseError>;

    fn info(&self, path: &Path) -> Result<PdfInfo, DocparseError>;

    /// Page count as seen by the rasterizer.
    fn page_count(&self, path: &Path) -> Result<usize, DocparseError>;

    /// Render one page (1-based) to PNG bytes.
    fn render_page(&self, path: &Path, page: usize, dpi: u32) -> Result<Vec<u8>, DocparseError>;

    /// Name of this backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Trait for OCR engines: raster image bytes in, plain text out.
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image: &[u8], languages: &[String]) -> Result<String, DocparseError>;

    fn engine_name(&self) -> &str;
}
