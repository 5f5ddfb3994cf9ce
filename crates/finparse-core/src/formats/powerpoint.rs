use crate::error::DocparseError;
use crate::extraction::ooxml::{attr_value, open_package, part_names, read_part, xml_error, Package};
use crate::formats::or_failed;
use crate::labels;
use crate::model::{DocType, ImageKind, ImageRecord, Locator, Metadata, ParsedDocument, Structure};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::path::Path;

const SLIDE_PREFIX: &str = "ppt/slides/slide";
const PRESENTATION_PART: &str = "ppt/presentation.xml";
const PRESENTATION_RELS_PART: &str = "ppt/_rels/presentation.xml.rels";
const CHART_URI_SUFFIX: &str = "/chart";

/// A top-level shape on a slide, in drawing order.
#[derive(Debug, Clone, PartialEq)]
enum SlideShape {
    Text(String),
    Chart { name: String },
}

/// State of the graphic frame currently being read.
#[derive(Debug, Default)]
struct Frame {
    name: String,
    is_chart: bool,
}

/// Parse a PowerPoint (.pptx) presentation.
pub fn parse_powerpoint(path: &Path, doc_id: &str) -> ParsedDocument {
    or_failed(extract_powerpoint(path, doc_id), doc_id, DocType::Ppt, path)
}

fn extract_powerpoint(path: &Path, doc_id: &str) -> Result<ParsedDocument, DocparseError> {
    let mut package = open_package(path)?;
    let mut slides = Vec::new();
    for part in slide_order(&mut package)? {
        let xml = read_part(&mut package, &part)?
            .ok_or_else(|| DocparseError::Extraction(format!("package has no {part}")))?;
        slides.push(parse_slide_xml(&xml, &part)?);
    }
    Ok(build_record(path, doc_id, slides))
}

/// Slide parts in the order the presentation shows them.
///
/// The order comes from the slide id list in `ppt/presentation.xml`, resolved
/// through its relationships part. When either part is missing, unreadable,
/// or names no slide in the package, slides are ordered by part number.
fn slide_order(package: &mut Package) -> Result<Vec<String>, DocparseError> {
    let numbered = numbered_slide_parts(package);
    let presentation = read_part(package, PRESENTATION_PART)?;
    let rels = read_part(package, PRESENTATION_RELS_PART)?;
    let (Some(presentation), Some(rels)) = (presentation, rels) else {
        return Ok(numbered);
    };

    match resolve_slide_order(&presentation, &rels, &numbered) {
        Ok(ordered) if !ordered.is_empty() => Ok(ordered),
        Ok(_) => {
            log::debug!("slide id list names no slide parts, using part numbers");
            Ok(numbered)
        }
        Err(e) => {
            log::warn!("ignoring slide id list: {e}");
            Ok(numbered)
        }
    }
}

/// Slide parts ordered by their number (`slide2.xml` before `slide10.xml`).
fn numbered_slide_parts(package: &Package) -> Vec<String> {
    let mut parts: Vec<(usize, String)> = part_names(package)
        .into_iter()
        .filter_map(|name| {
            let number = name
                .strip_prefix(SLIDE_PREFIX)?
                .strip_suffix(".xml")?
                .parse::<usize>()
                .ok()?;
            Some((number, name))
        })
        .collect();
    parts.sort_by_key(|(number, _)| *number);
    parts.into_iter().map(|(_, name)| name).collect()
}

/// Map the slide id list onto part names. Ids without a relationship, and
/// relationships pointing at parts not in `available`, are dropped.
fn resolve_slide_order(
    presentation: &str,
    rels: &str,
    available: &[String],
) -> Result<Vec<String>, DocparseError> {
    let targets = relationship_targets(rels)?;
    let mut ordered: Vec<String> = Vec::new();
    for id in slide_relationship_ids(presentation)? {
        let Some(part) = targets.get(&id) else {
            continue;
        };
        if available.contains(part) && !ordered.contains(part) {
            ordered.push(part.clone());
        }
    }
    Ok(ordered)
}

/// `r:id` of every `p:sldId`, in list order.
fn slide_relationship_ids(xml: &str) -> Result<Vec<String>, DocparseError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut ids = Vec::new();
    loop {
        match reader
            .read_event_into(&mut buf)
            .map_err(|e| xml_error(PRESENTATION_PART, e))?
        {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sldId" => {
                // `id` and `r:id` share a local name; only the prefixed one is the relationship
                let rel_id = e
                    .attributes()
                    .flatten()
                    .find(|attr| attr.key.prefix().is_some() && attr.key.local_name().as_ref() == b"id")
                    .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()));
                if let Some(rel_id) = rel_id {
                    ids.push(rel_id);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(ids)
}

/// Relationship id to package part name, for internal targets.
fn relationship_targets(xml: &str) -> Result<HashMap<String, String>, DocparseError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut targets = HashMap::new();
    loop {
        match reader
            .read_event_into(&mut buf)
            .map_err(|e| xml_error(PRESENTATION_RELS_PART, e))?
        {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                let external = attr_value(&e, b"TargetMode").as_deref() == Some("External");
                if let (false, Some(id), Some(target)) =
                    (external, attr_value(&e, b"Id"), attr_value(&e, b"Target"))
                {
                    targets.insert(id, package_part_name(&target));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(targets)
}

/// Targets are relative to `ppt/` unless they start at the package root.
fn package_part_name(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("ppt/{}", target.trim_start_matches("./")),
    }
}

fn build_record(path: &Path, doc_id: &str, slides: Vec<Vec<SlideShape>>) -> ParsedDocument {
    let mut content_parts = Vec::new();
    let mut images = Vec::new();

    for (i, shapes) in slides.iter().enumerate() {
        let slide = i + 1;
        let mut slide_content = Vec::new();
        for shape in shapes {
            match shape {
                SlideShape::Text(text) if !text.trim().is_empty() => slide_content.push(text.clone()),
                SlideShape::Text(_) => {}
                SlideShape::Chart { name } => {
                    let label = labels::chart_label(name);
                    slide_content.push(label.clone());
                    images.push(ImageRecord {
                        kind: ImageKind::Chart,
                        description: label,
                        extracted_text: None,
                        locator: Locator::Slide { slide },
                    });
                }
            }
        }

        if !slide_content.is_empty() {
            content_parts.push(labels::slide_marker(slide));
            content_parts.extend(slide_content);
        }
    }

    let mut metadata = Metadata::for_file(path);
    metadata.insert("slide_count", slides.len());

    let mut doc = ParsedDocument::new(doc_id, DocType::Ppt, path, content_parts.join("\n"));
    doc.metadata = metadata;
    doc.images = images;
    doc.structure = Structure {
        slides: Some(slides.len()),
        ..Default::default()
    };
    doc
}

/// Top-level shapes of one slide. Shapes nested inside group shapes are not
/// visited, and only text shapes and chart frames are kept.
fn parse_slide_xml(xml: &str, part: &str) -> Result<Vec<SlideShape>, DocparseError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut shapes = Vec::new();

    let mut group_depth = 0usize;
    let mut shape_paragraphs: Option<Vec<String>> = None;
    let mut paragraph = String::new();
    let mut in_text = false;
    let mut frame: Option<Frame> = None;

    loop {
        match reader
            .read_event_into(&mut buf)
            .map_err(|e| xml_error(part, e))?
        {
            Event::Start(e) => match e.local_name().as_ref() {
                b"grpSp" => group_depth += 1,
                b"sp" if group_depth == 0 => shape_paragraphs = Some(Vec::new()),
                b"graphicFrame" if group_depth == 0 => frame = Some(Frame::default()),
                b"p" if shape_paragraphs.is_some() => paragraph.clear(),
                b"t" if shape_paragraphs.is_some() => in_text = true,
                _ => inspect_frame(&e, frame.as_mut()),
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"br" if shape_paragraphs.is_some() => paragraph.push('\n'),
                b"p" => {
                    if let Some(paragraphs) = shape_paragraphs.as_mut() {
                        paragraphs.push(String::new());
                    }
                }
                _ => inspect_frame(&e, frame.as_mut()),
            },
            Event::Text(t) if in_text => {
                let text = t.unescape().map_err(|e| xml_error(part, e))?;
                paragraph.push_str(&text);
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"grpSp" => group_depth = group_depth.saturating_sub(1),
                b"t" => in_text = false,
                b"p" => {
                    if let Some(paragraphs) = shape_paragraphs.as_mut() {
                        paragraphs.push(std::mem::take(&mut paragraph));
                    }
                }
                b"sp" if group_depth == 0 => {
                    if let Some(paragraphs) = shape_paragraphs.take() {
                        shapes.push(SlideShape::Text(paragraphs.join("\n")));
                    }
                }
                b"graphicFrame" if group_depth == 0 => {
                    if let Some(done) = frame.take().filter(|f| f.is_chart) {
                        shapes.push(SlideShape::Chart { name: done.name });
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(shapes)
}

fn inspect_frame(element: &BytesStart<'_>, frame: Option<&mut Frame>) {
    let Some(frame) = frame else {
        return;
    };
    match element.local_name().as_ref() {
        b"cNvPr" => frame.name = attr_value(element, b"name").unwrap_or_default(),
        b"graphicData" => {
            frame.is_chart = attr_value(element, b"uri")
                .map(|uri| uri.ends_with(CHART_URI_SUFFIX))
                .unwrap_or(false);
        }
        _ => {}
    }
}
