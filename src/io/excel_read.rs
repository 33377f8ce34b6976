use std::collections::{HashMap, HashSet};
use std::path::Path;

use calamine::{DataType, Range, Reader, Xlsx, open_workbook};
use tracing::{debug, warn};

use crate::error::{Result, ToolError};
use crate::model::{CellValue, RawTable};

/// Zero-based physical row holding the column headers. The row above it is a
/// title banner and is ignored.
pub const HEADER_ROW: u32 = 1;

/// Reads the first worksheet of `path` into a [`RawTable`].
///
/// Any failure is logged and reported as `None` so that one unreadable file
/// does not stop the rest of the batch.
pub fn read_table(path: &Path) -> Option<RawTable> {
    debug!(path = %path.display(), "reading file");
    match load_table(path) {
        Ok(table) => {
            debug!(
                path = %path.display(),
                columns = table.columns.len(),
                rows = table.rows.len(),
                "file read"
            );
            Some(table)
        }
        Err(error) => {
            warn!(path = %path.display(), %error, "error reading file");
            None
        }
    }
}

/// Fallible variant of [`read_table`].
pub fn load_table(path: &Path) -> Result<RawTable> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ToolError::EmptyWorkbook(path.to_path_buf()))?;
    let range_result = workbook
        .worksheet_range(&sheet_name)
        .ok_or_else(|| ToolError::EmptyWorkbook(path.to_path_buf()))?;
    let range = range_result.map_err(ToolError::from)?;

    Ok(table_from_range(&range))
}

/// Builds a table from a worksheet range using absolute sheet coordinates, so
/// leading blank columns are kept in place like any other cell. Rows with no
/// populated cell are dropped.
pub fn table_from_range(range: &Range<DataType>) -> RawTable {
    let Some((last_row, last_col)) = range.end() else {
        return RawTable::default();
    };
    if last_row < HEADER_ROW {
        return RawTable::default();
    }

    let width = last_col + 1;
    let headers = (0..width)
        .map(|col| range.get_value((HEADER_ROW, col)))
        .enumerate()
        .map(|(index, cell)| header_name(index, cell))
        .collect();
    let mut table = RawTable::new(dedupe_headers(headers));

    for row in (HEADER_ROW + 1)..=last_row {
        let cells: Vec<CellValue> = (0..width)
            .map(|col| cell_value(range.get_value((row, col))))
            .collect();
        if cells.iter().all(CellValue::is_missing) {
            continue;
        }
        table.push_row(cells);
    }

    table
}

fn header_name(index: usize, cell: Option<&DataType>) -> String {
    let name = cell_to_string(cell);
    if name.is_empty() {
        format!("Unnamed: {index}")
    } else {
        name
    }
}

/// Suffixes repeated headers with `.1`, `.2`, ... so every column is a
/// distinct course key.
fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut taken: HashSet<String> = HashSet::new();
    let mut unique = Vec::with_capacity(headers.len());

    for header in headers {
        let count = counts.entry(header.clone()).or_insert(0);
        let mut candidate = header.clone();
        while !taken.insert(candidate.clone()) {
            *count += 1;
            candidate = format!("{header}.{count}");
        }
        unique.push(candidate);
    }

    unique
}

fn cell_value(cell: Option<&DataType>) -> CellValue {
    match cell {
        Some(DataType::Int(value)) => CellValue::Number(*value as f64),
        Some(DataType::Float(value)) => CellValue::Number(*value),
        Some(DataType::Bool(value)) => CellValue::Bool(*value),
        Some(DataType::String(value)) => CellValue::Text(value.clone()),
        Some(DataType::Empty) | None => CellValue::Missing,
        Some(other) => CellValue::Text(other.to_string()),
    }
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
