use crate::error::DocparseError;
use crate::extraction::table::find_layout_tables;
use crate::extraction::{PageContent, PdfDocument, PdfInfo, PdfReader};
use std::path::Path;
use std::process::{Command, Output};

/// PDF backend using poppler-utils (pdftotext, pdfinfo, pdftoppm).
///
/// Uses `pdftotext -layout` to preserve whitespace alignment of tables.
pub struct PopplerReader;

impl PopplerReader {
    pub fn new() -> Self {
        PopplerReader
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available() -> bool {
        Command::new("pdftotext")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl Default for PopplerReader {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfReader for PopplerReader {
    fn load(&self, path: &Path) -> Result<PdfDocument, DocparseError> {
        let output = run_tool(
            "pdftotext",
            Command::new("pdftotext")
                .arg("-layout")
                .arg("-enc")
                .arg("UTF-8")
                .arg(path)
                .arg("-"), // output to stdout
        )?;

        let text = String::from_utf8_lossy(&output.stdout);
        Ok(PdfDocument {
            pages: split_pages(&text).into_iter().map(Ok).collect(),
        })
    }

    fn info(&self, path: &Path) -> Result<PdfInfo, DocparseError> {
        let output = run_tool(
            "pdfinfo",
            Command::new("pdfinfo").arg("-enc").arg("UTF-8").arg(path),
        )?;
        Ok(parse_pdfinfo(&String::from_utf8_lossy(&output.stdout)))
    }

    fn page_count(&self, path: &Path) -> Result<usize, DocparseError> {
        let output = run_tool("pdfinfo", Command::new("pdfinfo").arg(path))?;
        parse_page_count(&String::from_utf8_lossy(&output.stdout)).ok_or_else(|| {
            DocparseError::Extraction(format!("pdfinfo reported no page count for {}", path.display()))
        })
    }

    fn render_page(&self, path: &Path, page: usize, dpi: u32) -> Result<Vec<u8>, DocparseError> {
        let dir = tempfile::tempdir()?;
        let prefix = dir.path().join("page");
        let page_arg = page.to_string();

        run_tool(
            "pdftoppm",
            Command::new("pdftoppm")
                .arg("-png")
                .arg("-r")
                .arg(dpi.to_string())
                .arg("-f")
                .arg(&page_arg)
                .arg("-l")
                .arg(&page_arg)
                .arg("-singlefile")
                .arg(path)
                .arg(&prefix),
        )?;

        // -singlefile writes <prefix>.png without a page suffix
        let png = std::fs::read(prefix.with_extension("png"))?;
        Ok(png)
    }

    fn backend_name(&self) -> &str {
        "poppler"
    }
}

/// Run a poppler tool, mapping a missing binary and a non-zero exit onto
/// their own error variants.
fn run_tool(tool: &'static str, command: &mut Command) -> Result<Output, DocparseError> {
    let output = command.output().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DocparseError::ToolNotFound { tool }
        } else {
            DocparseError::Extraction(format!("{tool} failed: {e}"))
        }
    })?;

    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(DocparseError::ToolFailed { tool, code, stderr });
    }

    Ok(output)
}

/// Split pdftotext output into pages (form feed \x0c separates pages).
fn split_pages(text: &str) -> Vec<PageContent> {
    let mut raw_pages: Vec<&str> = text.split('\x0c').collect();
    // pdftotext terminates the last page with a form feed too
    if raw_pages.len() > 1 && raw_pages.last().is_some_and(|p| p.trim().is_empty()) {
        raw_pages.pop();
    }

    raw_pages
        .into_iter()
        .enumerate()
        .map(|(i, page_text)| {
            let lines: Vec<String> = page_text.lines().map(|l| l.trim_end().to_string()).collect();
            let tables = find_layout_tables(&lines);
            PageContent {
                page_number: i + 1,
                lines,
                tables,
            }
        })
        .collect()
}

fn parse_pdfinfo(output: &str) -> PdfInfo {
    let mut info = PdfInfo::default();

    for line in output.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        let slot = match key.trim() {
            "Title" => &mut info.title,
            "Author" => &mut info.author,
            "Subject" => &mut info.subject,
            "Creator" => &mut info.creator,
            "Producer" => &mut info.producer,
            "CreationDate" => &mut info.creation_date,
            "ModDate" => &mut info.modification_date,
            _ => continue,
        };
        *slot = Some(value.to_string());
    }

    info
}

fn parse_page_count(output: &str) -> Option<usize> {
    output.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        if key.trim() == "Pages" {
            value.trim().parse().ok()
        } else {
            None
        }
    })
}
