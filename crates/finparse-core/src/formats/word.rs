use crate::error::DocparseError;
use crate::extraction::ooxml::{attr_value, open_package, read_part, xml_error};
use crate::extraction::RawTable;
use crate::formats::or_failed;
use crate::model::{DocType, Heading, Locator, Metadata, ParsedDocument, Structure};
use crate::parsing::structure::heading_level;
use crate::parsing::table::{build_table, compact_rows};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::path::Path;

const DOCUMENT_PART: &str = "word/document.xml";
const STYLES_PART: &str = "word/styles.xml";

/// A top-level paragraph of the document body.
#[derive(Debug, Clone, Default, PartialEq)]
struct WordParagraph {
    text: String,
    style_id: Option<String>,
}

#[derive(Debug, Default)]
struct WordBody {
    paragraphs: Vec<WordParagraph>,
    tables: Vec<RawTable>,
}

/// Parse a Word (.docx) document.
pub fn parse_word(path: &Path, doc_id: &str) -> ParsedDocument {
    or_failed(extract_word(path, doc_id), doc_id, DocType::Word, path)
}

fn extract_word(path: &Path, doc_id: &str) -> Result<ParsedDocument, DocparseError> {
    let mut package = open_package(path)?;
    let document_xml = read_part(&mut package, DOCUMENT_PART)?
        .ok_or_else(|| DocparseError::Extraction(format!("package has no {DOCUMENT_PART}")))?;
    let style_names = match read_part(&mut package, STYLES_PART)? {
        Some(xml) => parse_style_names(&xml)?,
        None => HashMap::new(),
    };

    let body = parse_document_xml(&document_xml)?;
    Ok(build_record(path, doc_id, body, &style_names))
}

fn build_record(
    path: &Path,
    doc_id: &str,
    body: WordBody,
    style_names: &HashMap<String, String>,
) -> ParsedDocument {
    let texts: Vec<&str> = body
        .paragraphs
        .iter()
        .map(|p| p.text.as_str())
        .filter(|t| !t.trim().is_empty())
        .collect();

    let tables: Vec<_> = body
        .tables
        .iter()
        .enumerate()
        .filter_map(|(i, raw)| build_table(Locator::Document {}, i, compact_rows(raw)))
        .collect();

    let headings: Vec<Heading> = body
        .paragraphs
        .iter()
        .enumerate()
        .filter_map(|(position, p)| {
            let id = p.style_id.as_deref()?;
            let style = style_names.get(id).map(String::as_str).unwrap_or(id);
            if !style.starts_with("Heading") {
                return None;
            }
            Some(Heading {
                title: p.text.clone(),
                style: style.to_string(),
                level: heading_level(style),
                position,
            })
        })
        .collect();

    let mut metadata = Metadata::for_file(path);
    metadata.insert("paragraph_count", texts.len());
    metadata.insert("table_count", tables.len());

    let mut doc = ParsedDocument::new(doc_id, DocType::Word, path, texts.join("\n"));
    doc.metadata = metadata;
    doc.tables = tables;
    doc.structure = Structure {
        headings: Some(headings),
        ..Default::default()
    };
    doc
}

/// Map style ids to style names. Built-in names are stored lower-case
/// ("heading 1") and shown capitalized ("Heading 1").
fn parse_style_names(xml: &str) -> Result<HashMap<String, String>, DocparseError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut names = HashMap::new();
    let mut current_id: Option<String> = None;

    loop {
        match reader
            .read_event_into(&mut buf)
            .map_err(|e| xml_error(STYLES_PART, e))?
        {
            Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                b"style" => current_id = attr_value(&e, b"styleId"),
                b"name" => {
                    if let (Some(id), Some(name)) = (current_id.as_ref(), attr_value(&e, b"val")) {
                        names.insert(id.clone(), display_style_name(&name));
                    }
                }
                _ => {}
            },
            Event::End(e) if e.local_name().as_ref() == b"style" => current_id = None,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(names)
}

fn display_style_name(name: &str) -> String {
    match name.strip_prefix("heading") {
        Some(rest) => format!("Heading{rest}"),
        None => name.to_string(),
    }
}

/// Walk the body: top-level paragraphs in order, and the cell text of each
/// top-level table. Paragraphs inside tables are cell content, not body
/// paragraphs. Text box content is anchored inside a run of its host
/// paragraph and is skipped entirely.
fn parse_document_xml(xml: &str) -> Result<WordBody, DocparseError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut body = WordBody::default();

    let mut table_depth = 0usize;
    let mut text_box_depth = 0usize;
    let mut in_run = false;
    let mut in_text = false;
    let mut paragraph = WordParagraph::default();
    let mut cell_paragraphs: Vec<String> = Vec::new();
    let mut row: Vec<Option<String>> = Vec::new();
    let mut table: RawTable = Vec::new();

    loop {
        match reader
            .read_event_into(&mut buf)
            .map_err(|e| xml_error(DOCUMENT_PART, e))?
        {
            Event::Start(e) if e.local_name().as_ref() == b"txbxContent" => text_box_depth += 1,
            Event::End(e) if e.local_name().as_ref() == b"txbxContent" => {
                text_box_depth = text_box_depth.saturating_sub(1)
            }
            _ if text_box_depth > 0 => {}
            Event::Start(e) => match e.local_name().as_ref() {
                b"tbl" => table_depth += 1,
                b"tr" if table_depth == 1 => row.clear(),
                b"tc" if table_depth == 1 => cell_paragraphs.clear(),
                b"p" => paragraph = WordParagraph::default(),
                b"r" => in_run = true,
                b"t" => in_text = true,
                b"pStyle" => paragraph.style_id = attr_value(&e, b"val"),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"pStyle" => paragraph.style_id = attr_value(&e, b"val"),
                b"tab" if in_run => paragraph.text.push('\t'),
                b"br" | b"cr" if in_run => paragraph.text.push('\n'),
                b"p" => finish_paragraph(
                    WordParagraph::default(),
                    table_depth,
                    &mut body,
                    &mut cell_paragraphs,
                ),
                _ => {}
            },
            Event::Text(t) if in_text => {
                let text = t.unescape().map_err(|e| xml_error(DOCUMENT_PART, e))?;
                paragraph.text.push_str(&text);
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"r" => in_run = false,
                b"p" => {
                    let done = std::mem::take(&mut paragraph);
                    finish_paragraph(done, table_depth, &mut body, &mut cell_paragraphs);
                }
                b"tc" if table_depth == 1 => row.push(Some(cell_paragraphs.join("\n"))),
                b"tr" if table_depth == 1 => table.push(std::mem::take(&mut row)),
                b"tbl" => {
                    if table_depth == 1 {
                        body.tables.push(std::mem::take(&mut table));
                    }
                    table_depth = table_depth.saturating_sub(1);
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(body)
}

fn finish_paragraph(
    paragraph: WordParagraph,
    table_depth: usize,
    body: &mut WordBody,
    cell_paragraphs: &mut Vec<String>,
) {
    if table_depth == 0 {
        body.paragraphs.push(paragraph);
    } else {
        cell_paragraphs.push(paragraph.text);
    }
}
