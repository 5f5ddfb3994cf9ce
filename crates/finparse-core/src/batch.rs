//! Directory-level runs: walk, number, parse, persist.

use crate::dispatch::is_supported_file;
use crate::error::DocparseError;
use crate::model::ParsedDocument;
use crate::DocumentParser;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of a batch run. The documents are kept even when saving failed.
#[derive(Debug)]
pub struct BatchOutcome {
    pub documents: Vec<ParsedDocument>,
    pub output: PathBuf,
    pub save_error: Option<DocparseError>,
}

impl BatchOutcome {
    pub fn error_count(&self) -> usize {
        self.documents.iter().filter(|d| d.is_error()).count()
    }
}

/// Id of the `n`th document of a batch, counting from 1.
pub fn doc_id(n: usize) -> String {
    format!("DOC_{n:03}")
}

/// Supported files under `dir`, recursively, sorted by path.
///
/// Directories that cannot be listed are skipped with a warning. Symbolic
/// links to directories are not followed; links to files are kept.
pub fn collect_files(dir: &Path) -> Result<Vec<PathBuf>, DocparseError> {
    if !dir.is_dir() {
        return Err(DocparseError::FileNotFound(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        let entries = match fs::read_dir(&current) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("skipping unreadable directory {}: {e}", current.display());
                continue;
            }
        };
        for entry in entries.flatten() {
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            let path = entry.path();
            if file_type.is_dir() {
                pending.push(path);
            } else if file_type.is_symlink() && path.is_dir() {
                log::debug!("not following directory link {}", path.display());
            } else if is_supported_file(&path) {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Write records as a pretty-printed JSON array.
pub fn save_results(documents: &[ParsedDocument], output: &Path) -> Result<(), DocparseError> {
    let persistence = |reason: String| DocparseError::Persistence {
        path: output.to_path_buf(),
        reason,
    };
    let json = serde_json::to_string_pretty(documents).map_err(|e| persistence(e.to_string()))?;
    fs::write(output, json).map_err(|e| persistence(e.to_string()))
}

/// Read records back from a file written by `save_results`.
pub fn load_results(path: &Path) -> Result<Vec<ParsedDocument>, DocparseError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

impl DocumentParser {
    /// Parse every supported file under `input_dir` and save the records to
    /// `output`.
    ///
    /// Ids are `DOC_001`, `DOC_002`, ... in path order. Only a missing input
    /// directory is an error; a failed save is reported in the outcome.
    pub fn batch_parse(&self, input_dir: &Path, output: &Path) -> Result<BatchOutcome, DocparseError> {
        let files = collect_files(input_dir)?;
        log::info!("found {} supported files under {}", files.len(), input_dir.display());

        let documents: Vec<ParsedDocument> = files
            .iter()
            .enumerate()
            .map(|(i, path)| {
                let id = doc_id(i + 1);
                log::info!("parsing {id}: {}", path.display());
                self.parse_document(path, &id)
            })
            .collect();

        let save_error = match save_results(&documents, output) {
            Ok(()) => {
                log::info!(
                    "parsed {} documents, results saved to {}",
                    documents.len(),
                    output.display()
                );
                None
            }
            Err(e) => {
                log::error!("failed to save results: {e}");
                Some(e)
            }
        };

        Ok(BatchOutcome {
            documents,
            output: output.to_path_buf(),
            save_error,
        })
    }
}
