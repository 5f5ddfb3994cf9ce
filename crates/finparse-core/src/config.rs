use crate::error::DocparseError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Trimmed digital text shorter than this marks a PDF as probably scanned.
pub const DEFAULT_SCAN_TEXT_THRESHOLD: usize = 100;
/// Lines covered by a detected section after its title line.
pub const DEFAULT_SECTION_WINDOW: usize = 10;
/// Keyword headings are only recognized on lines shorter than this.
pub const DEFAULT_SHORT_HEADING_MAX_CHARS: usize = 50;
/// Cap on the OCR text preview stored in a page image record.
pub const DEFAULT_OCR_PREVIEW_CHARS: usize = 500;
pub const DEFAULT_RENDER_DPI: u32 = 200;
pub const DEFAULT_OCR_LANGUAGES: &[&str] = &["chi_sim", "eng"];

/// Tunables for a parsing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    pub enable_ocr: bool,
    /// Tesseract language codes, tried together.
    pub ocr_languages: Vec<String>,
    pub scan_text_threshold: usize,
    pub section_window: usize,
    pub short_heading_max_chars: usize,
    pub ocr_preview_chars: usize,
    pub render_dpi: u32,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            enable_ocr: true,
            ocr_languages: DEFAULT_OCR_LANGUAGES.iter().map(|s| s.to_string()).collect(),
            scan_text_threshold: DEFAULT_SCAN_TEXT_THRESHOLD,
            section_window: DEFAULT_SECTION_WINDOW,
            short_heading_max_chars: DEFAULT_SHORT_HEADING_MAX_CHARS,
            ocr_preview_chars: DEFAULT_OCR_PREVIEW_CHARS,
            render_dpi: DEFAULT_RENDER_DPI,
        }
    }
}

impl ParseOptions {
    /// Parse a `chi_sim+eng` style language list.
    pub fn set_languages(&mut self, langs: &str) {
        self.ocr_languages = langs
            .split('+')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
    }
}

/// Load option overrides from a JSON file. Missing keys keep their defaults.
pub fn load_options(path: &Path) -> Result<ParseOptions, DocparseError> {
    let content = std::fs::read_to_string(path).map_err(|e| DocparseError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| DocparseError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
