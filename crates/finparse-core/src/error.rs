use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DocparseError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("unsupported file format: '{0}'")]
    UnsupportedFormat(String),

    #[error("extraction failed: {0}")]
    Extraction(String),

    #[error("{tool} not found. Install poppler-utils and tesseract-ocr (apt install poppler-utils tesseract-ocr tesseract-ocr-chi-sim)")]
    ToolNotFound { tool: &'static str },

    #[error("{tool} failed with exit code {code}: {stderr}")]
    ToolFailed {
        tool: &'static str,
        code: i32,
        stderr: String,
    },

    #[error("OCR failed: {0}")]
    Ocr(String),

    #[error("could not decode {} as UTF-8 or GBK", .0.display())]
    Encoding(PathBuf),

    #[error("failed to save results to {path}: {reason}")]
    Persistence { path: PathBuf, reason: String },

    #[error("failed to load options from {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DocparseError {
    /// Where this error falls in the failure taxonomy carried by degraded records.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DocparseError::FileNotFound(_) => ErrorKind::FileNotFound,
            DocparseError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            DocparseError::Ocr(_) => ErrorKind::OcrFailure,
            DocparseError::Encoding(_) => ErrorKind::EncodingFailure,
            DocparseError::Persistence { .. } => ErrorKind::PersistenceFailure,
            DocparseError::Extraction(_)
            | DocparseError::ToolNotFound { .. }
            | DocparseError::ToolFailed { .. }
            | DocparseError::Config { .. }
            | DocparseError::Io(_)
            | DocparseError::Json(_) => ErrorKind::ExtractionFailure,
        }
    }
}

/// Error marker stored in `metadata.error` of a degraded record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    FileNotFound,
    UnsupportedFormat,
    ExtractionFailure,
    OcrFailure,
    EncodingFailure,
    PersistenceFailure,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::FileNotFound => "file_not_found",
            ErrorKind::UnsupportedFormat => "unsupported_format",
            ErrorKind::ExtractionFailure => "extraction_failure",
            ErrorKind::OcrFailure => "ocr_failure",
            ErrorKind::EncodingFailure => "encoding_failure",
            ErrorKind::PersistenceFailure => "persistence_failure",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_errors_are_extraction_failures() {
        let err = DocparseError::ToolFailed {
            tool: "pdftotext",
            code: 1,
            stderr: "Syntax Error".into(),
        };
        assert_eq!(err.kind(), ErrorKind::ExtractionFailure);
        assert!(err.to_string().contains("exit code 1"));
    }

    #[test]
    fn error_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::FileNotFound).unwrap();
        assert_eq!(json, "\"file_not_found\"");
        assert_eq!(json.trim_matches('"'), ErrorKind::FileNotFound.as_str());
    }
}
