use crate::error::DocparseError;
use crate::formats::{or_failed, ExtractionContext};
use crate::model::{DocType, Metadata, ParsedDocument, Structure};
use crate::parsing::structure::detect_sections;
use std::path::Path;

/// Encodings a text file may be stored in, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextEncoding {
    Utf8,
    Gbk,
}

/// Parse a plain text or Markdown file.
pub fn parse_text(path: &Path, doc_id: &str, ctx: &ExtractionContext<'_>) -> ParsedDocument {
    or_failed(read_text(path, doc_id, ctx), doc_id, DocType::Txt, path)
}

fn read_text(
    path: &Path,
    doc_id: &str,
    ctx: &ExtractionContext<'_>,
) -> Result<ParsedDocument, DocparseError> {
    let bytes = std::fs::read(path)?;
    let (content, encoding) =
        decode(&bytes).ok_or_else(|| DocparseError::Encoding(path.to_path_buf()))?;

    let mut metadata = Metadata::for_file(path);
    if encoding == TextEncoding::Gbk {
        log::info!("{} is not UTF-8, decoded as GBK", path.display());
        metadata.insert("encoding", "gbk");
    }

    let sections = detect_sections(&content, ctx.section_rules());
    let mut doc = ParsedDocument::new(doc_id, DocType::Txt, path, content);
    doc.metadata = metadata;
    doc.structure = Structure {
        sections: Some(sections),
        ..Default::default()
    };
    Ok(doc)
}

/// Strict UTF-8, then strict GBK. `None` when the bytes are valid in neither.
///
/// The GBK decoder also accepts the four-byte sequences of GB18030. Those are
/// not GBK, so input containing one is rejected.
fn decode(bytes: &[u8]) -> Option<(String, TextEncoding)> {
    if let Ok(text) = std::str::from_utf8(bytes) {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        return Some((text.to_string(), TextEncoding::Utf8));
    }
    let text = encoding_rs::GBK.decode_without_bom_handling_and_without_replacement(bytes)?;
    if has_four_byte_sequence(bytes) {
        return None;
    }
    Some((text.into_owned(), TextEncoding::Gbk))
}

/// Whether already-valid GB18030 bytes use any four-byte sequence, i.e. a lead
/// byte followed by an ASCII digit.
fn has_four_byte_sequence(bytes: &[u8]) -> bool {
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            0x81..=0xFE => match bytes.get(i + 1) {
                Some(0x30..=0x39) => return true,
                _ => i += 2,
            },
            _ => i += 1,
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf8() {
        let (text, encoding) = decode("第一章 总则".as_bytes()).unwrap();
        assert_eq!(text, "第一章 总则");
        assert_eq!(encoding, TextEncoding::Utf8);
    }

    #[test]
    fn test_decode_strips_utf8_bom() {
        let (text, _) = decode(b"\xEF\xBB\xBFabc").unwrap();
        assert_eq!(text, "abc");
    }

    #[test]
    fn test_decode_gbk_fallback() {
        let (text, encoding) = decode(&[0xD6, 0xD0, 0xCE, 0xC4]).unwrap();
        assert_eq!(text, "中文");
        assert_eq!(encoding, TextEncoding::Gbk);
    }

    #[test]
    fn test_decode_rejects_gb18030_four_byte_sequences() {
        // U+0080 alone, then 中 followed by a four-byte character
        assert!(decode(&[0x81, 0x30, 0x81, 0x30]).is_none());
        assert!(decode(&[0xD6, 0xD0, 0x81, 0x30, 0x84, 0x36]).is_none());
    }

    #[test]
    fn test_four_byte_scan_skips_two_byte_trail() {
        // second byte of 丂 (0x81 0x40) is not a lead byte
        assert!(!has_four_byte_sequence(&[0x81, 0x40, 0x31]));
        assert!(!has_four_byte_sequence(b"2023\xD6\xD0"));
    }

    #[test]
    fn test_decode_rejects_invalid_bytes() {
        assert!(decode(&[0xFF, 0xFE, 0xFD]).is_none());
    }
}
