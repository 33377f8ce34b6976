use std::collections::BTreeMap;

use serde::Serialize;

/// Header of the key column that carries the course name in every table.
pub const KEY_COLUMN: &str = "Courses";
/// Header of the row-wise sum column appended by the aggregator.
pub const TOTAL_COLUMN: &str = "Total";

/// A single cell extracted from an input worksheet.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Integer or floating point cell.
    Number(f64),
    /// Boolean cell. Counted as `1`/`0` when summing.
    Bool(bool),
    /// Any other populated cell: strings, dates, error markers.
    Text(String),
    /// Blank cell.
    Missing,
}

impl CellValue {
    /// Returns the numeric contribution of the cell, or `None` when the cell
    /// is not numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(value) => Some(*value),
            CellValue::Bool(value) => Some(if *value { 1.0 } else { 0.0 }),
            CellValue::Text(_) | CellValue::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }
}

/// Rows × named columns extracted from one workbook. Every row has exactly
/// `columns.len()` cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Appends a row, padding or truncating it to the table width.
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.columns.len(), CellValue::Missing);
        self.rows.push(row);
    }

    /// Removes every column whose header is listed in `names`. Names that are
    /// not present are ignored.
    pub fn drop_columns(&mut self, names: &[&str]) {
        let keep: Vec<bool> = self
            .columns
            .iter()
            .map(|column| !names.contains(&column.as_str()))
            .collect();

        self.columns = retain_flagged(std::mem::take(&mut self.columns), &keep);
        for row in &mut self.rows {
            *row = retain_flagged(std::mem::take(row), &keep);
        }
    }

    /// Replaces every blank cell with `value`.
    pub fn fill_missing(&mut self, value: CellValue) {
        for cell in self.rows.iter_mut().flatten() {
            if cell.is_missing() {
                *cell = value.clone();
            }
        }
    }

    /// Iterates over the cells of the column at `index`.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &CellValue> {
        self.rows.iter().filter_map(move |row| row.get(index))
    }
}

fn retain_flagged<T>(items: Vec<T>, keep: &[bool]) -> Vec<T> {
    items
        .into_iter()
        .zip(keep)
        .filter_map(|(item, keep)| keep.then_some(item))
        .collect()
}

/// Per-course totals of one workbook, labelled with the workbook's base name.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSummary {
    /// Base name of the source file, used as the column header.
    pub source: String,
    /// Course name → total, in the workbook's column order.
    pub totals: Vec<(String, f64)>,
}

impl FileSummary {
    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

/// Outer union of file summaries keyed by raw course name. `None` marks a
/// course the file did not mention.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MergedTable {
    /// One header per merged file, in merge order.
    pub columns: Vec<String>,
    pub rows: BTreeMap<String, Vec<Option<f64>>>,
}

/// One course of the final summary. `None` cells render as blanks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedRow {
    pub course: String,
    pub values: Vec<Option<f64>>,
    pub total: Option<f64>,
}

/// Merged table after name normalization, re-summation and totalling.
/// Course names are unique and rows are ordered by course name.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AggregatedTable {
    /// Per-file column headers, excluding the key and total columns.
    pub columns: Vec<String>,
    pub rows: Vec<AggregatedRow>,
}

impl AggregatedTable {
    /// Full header row: key column, one column per file, then the total.
    pub fn header(&self) -> Vec<String> {
        std::iter::once(KEY_COLUMN.to_string())
            .chain(self.columns.iter().cloned())
            .chain(std::iter::once(TOTAL_COLUMN.to_string()))
            .collect()
    }

    pub fn row(&self, course: &str) -> Option<&AggregatedRow> {
        self.rows.iter().find(|row| row.course == course)
    }

    pub fn courses(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.course.as_str())
    }
}
