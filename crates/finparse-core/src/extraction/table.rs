use crate::extraction::RawTable;

/// Reconstruct table grids from pdftotext -layout output.
///
/// pdftotext -layout keeps column alignment with runs of spaces, so a table
/// shows up as consecutive lines that each split into several columns on
/// wide whitespace gaps. A run of at least `MIN_TABLE_ROWS` such lines is
/// one table.
pub const MIN_TABLE_ROWS: usize = 2;
pub const MIN_TABLE_COLUMNS: usize = 2;

pub fn find_layout_tables(lines: &[String]) -> Vec<RawTable> {
    let mut tables = Vec::new();
    let mut current: RawTable = Vec::new();

    for line in lines {
        let segments = split_by_whitespace_gaps(line);
        if segments.len() >= MIN_TABLE_COLUMNS {
            current.push(segments.into_iter().map(|s| Some(s.to_string())).collect());
            continue;
        }

        // Blank or single-column line ends the run
        flush(&mut current, &mut tables);
    }
    flush(&mut current, &mut tables);

    tables
}

fn flush(current: &mut RawTable, tables: &mut Vec<RawTable>) {
    if current.len() >= MIN_TABLE_ROWS {
        tables.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

/// Split a line by gaps of 2+ whitespace characters.
pub fn split_by_whitespace_gaps(line: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = None;
    let mut end = 0;
    let mut space_count = 0;

    for (i, c) in line.char_indices() {
        if c.is_whitespace() {
            space_count += 1;
            if space_count == 2 {
                if let Some(s) = start.take() {
                    segments.push(&line[s..end]);
                }
            }
        } else {
            if start.is_none() {
                start = Some(i);
            }
            space_count = 0;
            end = i + c.len_utf8();
        }
    }

    if let Some(s) = start {
        segments.push(&line[s..end]);
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_split_by_whitespace_gaps() {
        let segments = split_by_whitespace_gaps("  核心一级资本     1,200     亿元");
        assert_eq!(segments, vec!["核心一级资本", "1,200", "亿元"]);
    }

    #[test]
    fn single_spaces_stay_inside_a_segment() {
        let segments = split_by_whitespace_gaps("Tier 1 capital   12.5 %");
        assert_eq!(segments, vec!["Tier 1 capital", "12.5 %"]);
    }

    #[test]
    fn ideographic_space_gap_does_not_split_a_char() {
        let segments = split_by_whitespace_gaps("项目\u{3000}\u{3000}金额");
        assert_eq!(segments, vec!["项目", "金额"]);
    }

    #[test]
    fn test_find_layout_tables() {
        let page = lines(&[
            "第一章 总则",
            "",
            "  指标            本期        上期",
            "  资本充足率      13.2%       12.8%",
            "  拨备覆盖率      210%        205%",
            "",
            "以上数据未经审计。",
        ]);

        let tables = find_layout_tables(&page);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].len(), 3);
        assert_eq!(tables[0][0][0].as_deref(), Some("指标"));
        assert_eq!(tables[0][2][2].as_deref(), Some("205%"));
    }

    #[test]
    fn lone_multi_column_line_is_not_a_table() {
        let page = lines(&["编号：2024-01      日期：2024年1月", "正文第一段。"]);
        assert!(find_layout_tables(&page).is_empty());
    }
}
