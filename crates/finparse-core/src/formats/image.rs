use crate::error::DocparseError;
use crate::formats::{or_failed, ExtractionContext};
use crate::labels;
use crate::model::{DocType, ImageKind, ImageRecord, Locator, Metadata, ParsedDocument};
use std::path::Path;

/// OCR a raster image (.png, .jpg, .jpeg) as a whole.
pub fn parse_image(path: &Path, doc_id: &str, ctx: &ExtractionContext<'_>) -> ParsedDocument {
    if !ctx.options.enable_ocr {
        log::info!("OCR disabled, keeping {} without text", path.display());
        let mut doc = ParsedDocument::new(doc_id, DocType::Image, path, String::new());
        doc.metadata = Metadata::for_file(path);
        doc.metadata.insert("ocr_skipped", true);
        return doc;
    }

    or_failed(recognize_image(path, doc_id, ctx), doc_id, DocType::Image, path)
}

fn recognize_image(
    path: &Path,
    doc_id: &str,
    ctx: &ExtractionContext<'_>,
) -> Result<ParsedDocument, DocparseError> {
    let bytes = std::fs::read(path)?;
    let text = ctx.ocr.recognize(&bytes, &ctx.options.ocr_languages)?;

    let mut doc = ParsedDocument::new(doc_id, DocType::Image, path, text.clone());
    doc.metadata = Metadata::for_file(path);
    doc.images.push(ImageRecord {
        kind: ImageKind::Original,
        description: labels::ORIGINAL_IMAGE_DESCRIPTION.to_string(),
        extracted_text: Some(text),
        locator: Locator::Document {},
    });
    Ok(doc)
}
