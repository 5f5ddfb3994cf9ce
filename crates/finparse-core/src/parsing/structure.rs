use crate::model::Section;
use regex::Regex;
use std::sync::LazyLock;

/// "第三章" style chapter titles.
static CHAPTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^第[一二三四五六七八九十]+章").expect("valid chapter regex"));

/// "3." / "3.2" clause numbering.
static DECIMAL_CLAUSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.[0-9]*").expect("valid clause regex"));

/// "一、" style enumerators.
static CJK_ENUMERATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[一二三四五六七八九十]+、").expect("valid enumerator regex"));

/// Words that mark a short line as a heading in regulatory documents:
/// general provisions, definitions, clause, regulation, provision, notice,
/// measures, chapter, table of contents.
const HEADING_KEYWORDS: &[&str] = &[
    "总则", "定义", "条款", "条例", "规定", "通知", "办法", "章节", "目录",
];

/// Limits for the section heuristic.
#[derive(Debug, Clone, Copy)]
pub struct SectionRules {
    pub window: usize,
    pub short_line_max_chars: usize,
}

/// Detect section starts line by line.
///
/// `start` is the index of the line in `content.split('\n')`, and `end` is a
/// fixed lookahead from it, clamped to the last line.
pub fn detect_sections(content: &str, rules: SectionRules) -> Vec<Section> {
    let lines: Vec<&str> = content.split('\n').collect();
    let last = lines.len().saturating_sub(1);

    lines
        .iter()
        .enumerate()
        .filter_map(|(i, raw)| {
            let line = raw.trim();
            if !is_section_title(line, rules.short_line_max_chars) {
                return None;
            }
            Some(Section {
                title: line.to_string(),
                start: i,
                end: (i + rules.window).min(last),
            })
        })
        .collect()
}

pub fn is_section_title(line: &str, short_line_max_chars: usize) -> bool {
    if line.is_empty() {
        return false;
    }
    CHAPTER.is_match(line)
        || DECIMAL_CLAUSE.is_match(line)
        || CJK_ENUMERATOR.is_match(line)
        || (line.chars().count() < short_line_max_chars
            && HEADING_KEYWORDS.iter().any(|kw| line.contains(kw)))
}

/// Heading level from a style name's trailing digits ("Heading 2" -> 2).
/// Names without trailing digits are level 1.
pub fn heading_level(style: &str) -> u32 {
    let digits: String = style
        .trim_end()
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    digits.parse().unwrap_or(1)
}
