use crate::error::{DocparseError, ErrorKind};
use crate::extraction::PdfDocument;
use crate::formats::ExtractionContext;
use crate::labels;
use crate::model::{
    DocType, ImageKind, ImageRecord, Locator, Metadata, ParsedDocument, Structure, TableRecord,
};
use crate::parsing::metadata::{apply_pdf_info, preview};
use crate::parsing::structure::detect_sections;
use crate::parsing::table::{build_table, clean_rows};
use std::path::Path;

/// Text, tables and metadata from the PDF's own text layer.
struct DigitalText {
    content: String,
    tables: Vec<TableRecord>,
    metadata: Metadata,
}

/// Text and page image records recovered by OCR.
#[derive(Debug, Default)]
pub struct OcrOutput {
    pub content: String,
    pub images: Vec<ImageRecord>,
}

/// Parse a PDF.
///
/// The text layer is tried first. If its trimmed text is shorter than the
/// scan threshold the document is treated as scanned and OCR text is appended
/// to it. If the text layer cannot be read at all, OCR alone rebuilds the
/// content. Without OCR, or when OCR recovers nothing, that is an error
/// record.
pub fn parse_pdf(path: &Path, doc_id: &str, ctx: &ExtractionContext<'_>) -> ParsedDocument {
    let opts = ctx.options;

    let (content, tables, images, metadata) = match extract_digital(path, ctx) {
        Ok(digital) => {
            let mut content = digital.content;
            let mut images = Vec::new();
            if opts.enable_ocr && content.trim().chars().count() < opts.scan_text_threshold {
                log::info!(
                    "{} looks scanned ({} chars of text), running OCR",
                    path.display(),
                    content.trim().chars().count()
                );
                let ocr = ocr_pages(path, ctx);
                content.push('\n');
                content.push_str(&ocr.content);
                images.extend(ocr.images);
            }
            (content, digital.tables, images, digital.metadata)
        }
        Err(e) if opts.enable_ocr => {
            log::warn!("PDF text extraction failed for {}: {e}; falling back to OCR", path.display());
            let ocr = ocr_pages(path, ctx);
            if ocr.content.trim().is_empty() && ocr.images.is_empty() {
                log::warn!("OCR recovered no text from {}", path.display());
                let mut doc =
                    ParsedDocument::failed(doc_id, DocType::Pdf, path, ErrorKind::ExtractionFailure);
                doc.metadata.insert("ocr_fallback", true);
                return doc;
            }
            let mut metadata = Metadata::for_file(path);
            metadata.insert("ocr_fallback", true);
            (ocr.content, Vec::new(), ocr.images, metadata)
        }
        Err(e) => {
            log::warn!("PDF text extraction failed for {}: {e}", path.display());
            return ParsedDocument::failed(doc_id, DocType::Pdf, path, ErrorKind::ExtractionFailure);
        }
    };

    let structure = Structure {
        sections: Some(detect_sections(&content, ctx.section_rules())),
        ..Default::default()
    };

    let mut doc = ParsedDocument::new(doc_id, DocType::Pdf, path, content);
    doc.metadata = metadata;
    doc.tables = tables;
    doc.images = images;
    doc.structure = structure;
    doc
}

fn extract_digital(path: &Path, ctx: &ExtractionContext<'_>) -> Result<DigitalText, DocparseError> {
    let document = ctx.pdf_reader.load(path)?;

    let mut metadata = Metadata::for_file(path);
    metadata.insert("page_count", document.page_count());
    match ctx.pdf_reader.info(path) {
        Ok(info) => apply_pdf_info(&mut metadata, &info),
        Err(e) => log::warn!("metadata extraction failed for {}: {e}", path.display()),
    }

    Ok(DigitalText {
        content: page_text(&document),
        tables: page_tables(&document),
        metadata,
    })
}

/// Join non-blank pages, each under its page marker.
fn page_text(document: &PdfDocument) -> String {
    let mut parts = Vec::new();
    for (i, page) in document.pages.iter().enumerate() {
        match page {
            Ok(page) => {
                let text = page.text();
                if !text.trim().is_empty() {
                    parts.push(format!("{}\n{}", labels::page_marker(page.page_number), text));
                }
            }
            Err(e) => log::warn!("text extraction failed on page {}: {e}", i + 1),
        }
    }
    parts.join("\n\n")
}

fn page_tables(document: &PdfDocument) -> Vec<TableRecord> {
    let mut tables = Vec::new();
    for page in document.pages.iter().flatten() {
        for (table_index, raw) in page.tables.iter().enumerate() {
            let locator = Locator::Page {
                page: page.page_number,
            };
            if let Some(table) = build_table(locator, table_index, clean_rows(raw)) {
                tables.push(table);
            }
        }
    }
    tables
}

/// Rasterize every page and OCR it. A page that fails to render or to OCR is
/// skipped; the rest of the document still goes through.
pub fn ocr_pages(path: &Path, ctx: &ExtractionContext<'_>) -> OcrOutput {
    let opts = ctx.options;
    let page_count = match ctx.pdf_reader.page_count(path) {
        Ok(n) => n,
        Err(e) => {
            log::warn!("OCR failed for {}: {e}", path.display());
            return OcrOutput::default();
        }
    };

    let mut parts = Vec::new();
    let mut images = Vec::new();
    for page in 1..=page_count {
        let text = match ctx
            .pdf_reader
            .render_page(path, page, opts.render_dpi)
            .and_then(|png| ctx.ocr.recognize(&png, &opts.ocr_languages))
        {
            Ok(text) => text,
            Err(e) => {
                log::warn!("OCR failed on page {page} of {}: {e}", path.display());
                continue;
            }
        };

        if text.trim().is_empty() {
            continue;
        }
        parts.push(format!("{}\n{}", labels::ocr_page_marker(page), text));
        images.push(ImageRecord {
            kind: ImageKind::PageImage,
            description: labels::scanned_page_description(page),
            extracted_text: Some(preview(&text, opts.ocr_preview_chars)),
            locator: Locator::Page { page },
        });
    }

    OcrOutput {
        content: parts.join("\n\n"),
        images,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::PageContent;

    fn page(number: usize, lines: &[&str]) -> Result<PageContent, DocparseError> {
        Ok(PageContent {
            page_number: number,
            lines: lines.iter().map(|s| s.to_string()).collect(),
            tables: vec![],
        })
    }

    #[test]
    fn test_page_text_skips_blank_and_failed_pages() {
        let document = PdfDocument {
            pages: vec![
                page(1, &["第一章 总则"]),
                page(2, &["   "]),
                Err(DocparseError::Extraction("bad page".into())),
                page(4, &["第四页"]),
            ],
        };
        assert_eq!(
            page_text(&document),
            "=== 第1页 ===\n第一章 总则\n\n=== 第4页 ===\n第四页"
        );
    }

    #[test]
    fn test_page_tables_keep_page_and_index() {
        let mut second = PageContent {
            page_number: 2,
            ..Default::default()
        };
        second.tables = vec![
            vec![vec![None, None]],
            vec![
                vec![Some("项目".into()), Some("金额".into())],
                vec![None, None],
                vec![Some("资本".into()), Some("100".into())],
            ],
        ];
        let document = PdfDocument {
            pages: vec![Ok(second)],
        };

        let tables = page_tables(&document);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].locator, Locator::Page { page: 2 });
        assert_eq!(tables[0].table_index, 1);
        assert_eq!(tables[0].rows, vec![vec!["资本".to_string(), "100".to_string()]]);
    }
}
