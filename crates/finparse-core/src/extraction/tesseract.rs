use crate::error::DocparseError;
use crate::extraction::OcrEngine;
use std::io::Write;
use std::process::Command;

/// OCR engine that shells out to the `tesseract` CLI.
pub struct TesseractEngine;

impl TesseractEngine {
    pub fn new() -> Self {
        TesseractEngine
    }

    /// Check if tesseract is available on the system.
    pub fn is_available() -> bool {
        Command::new("tesseract")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, image: &[u8], languages: &[String]) -> Result<String, DocparseError> {
        let mut tmpfile = tempfile::NamedTempFile::new()
            .map_err(|e| DocparseError::Ocr(format!("failed to create temp image: {e}")))?;
        tmpfile
            .write_all(image)
            .map_err(|e| DocparseError::Ocr(format!("failed to write temp image: {e}")))?;

        let mut command = Command::new("tesseract");
        command.arg(tmpfile.path()).arg("stdout");
        if let Some(lang) = language_arg(languages) {
            command.arg("-l").arg(lang);
        }

        let output = command.output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DocparseError::ToolNotFound { tool: "tesseract" }
            } else {
                DocparseError::Ocr(format!("tesseract failed: {e}"))
            }
        })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DocparseError::Ocr(format!(
                "tesseract exited with code {code}: {}",
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).replace('\x0c', ""))
    }

    fn engine_name(&self) -> &str {
        "tesseract"
    }
}

/// Tesseract takes several languages joined with '+'.
fn language_arg(languages: &[String]) -> Option<String> {
    if languages.is_empty() {
        None
    } else {
        Some(languages.join("+"))
    }
}
