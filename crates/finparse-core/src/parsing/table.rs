use crate::extraction::RawTable;
use crate::model::{Locator, TableRecord};

/// Clean a reader-supplied grid: cells are stringified and trimmed, missing
/// cells become "", and rows with no content are dropped. Column positions
/// are kept.
pub fn clean_rows(raw: &RawTable) -> Vec<Vec<String>> {
    raw.iter()
        .map(|row| {
            row.iter()
                .map(|cell| cell.as_deref().map(str::trim).unwrap_or("").to_string())
                .collect::<Vec<_>>()
        })
        .filter(|row| row.iter().any(|c| !c.is_empty()))
        .collect()
}

/// Like `clean_rows`, but empty cells are removed from each row as well, so
/// rows may come out with different lengths.
pub fn compact_rows(raw: &RawTable) -> Vec<Vec<String>> {
    raw.iter()
        .map(|row| {
            row.iter()
                .filter_map(|cell| cell.as_deref().map(str::trim))
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .filter(|row| !row.is_empty())
        .collect()
}

/// Build a table record from already cleaned rows: the first row becomes the
/// header and the rest the data rows.
///
/// Returns `None` when nothing is left, or when the header has no content and
/// there are no data rows to go with it.
pub fn build_table(
    locator: Locator,
    table_index: usize,
    mut rows: Vec<Vec<String>>,
) -> Option<TableRecord> {
    if rows.is_empty() {
        return None;
    }
    let header = rows.remove(0);
    if rows.is_empty() && header.iter().all(|c| c.is_empty()) {
        return None;
    }
    Some(TableRecord {
        locator,
        table_index,
        header,
        rows,
    })
}
