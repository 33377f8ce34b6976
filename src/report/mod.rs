use std::path::{Path, PathBuf};

use crate::model::{AggregatedRow, AggregatedTable};

/// Marker identifying General Education courses.
pub const GE_MARKER: &str = "-GE";
/// Course kept out of the Major & Elective sheet although it carries no GE
/// marker.
pub const GE_ONLY_EXCEPTION: &str = "ENGL 101 (ENR)-Enrichment";

/// Sheet listing every course.
pub const COMBINED_SHEET: &str = "GE + Other";
/// Sheet listing General Education courses.
pub const GENERAL_EDUCATION_SHEET: &str = "General Education";
/// Sheet listing Major and Elective courses.
pub const MAJOR_ELECTIVE_SHEET: &str = "Major & Elective";

/// Directory used when no output location is given.
pub const DEFAULT_OUTPUT_DIR: &str = "output";
/// File name used when the output location is a directory.
pub const DEFAULT_OUTPUT_FILE: &str = "result.xlsx";
/// Characters added to the widest value of a column.
pub const COLUMN_PADDING: usize = 4;

/// The two category subsets of an aggregated table.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition<'a> {
    pub general_education: Vec<&'a AggregatedRow>,
    pub major_elective: Vec<&'a AggregatedRow>,
}

pub fn is_general_education(course: &str) -> bool {
    course.contains(GE_MARKER)
}

pub fn is_major_elective(course: &str) -> bool {
    !is_general_education(course) && course != GE_ONLY_EXCEPTION
}

/// Splits the rows into General Education and Major & Elective subsets. The
/// GE-only exception lands in neither.
pub fn partition(table: &AggregatedTable) -> Partition<'_> {
    let general_education = table
        .rows
        .iter()
        .filter(|row| is_general_education(&row.course))
        .collect();
    let major_elective = table
        .rows
        .iter()
        .filter(|row| is_major_elective(&row.course))
        .collect();

    Partition {
        general_education,
        major_elective,
    }
}

/// A cell of a report sheet.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportCell {
    Text(String),
    Number(f64),
    Blank,
}

impl ReportCell {
    /// Text used for column sizing. Numbers keep their decimal point, so
    /// `3.0` measures three characters.
    pub fn display(&self) -> String {
        match self {
            ReportCell::Text(value) => value.clone(),
            ReportCell::Number(value) => format_number(*value),
            ReportCell::Blank => String::new(),
        }
    }
}

fn format_number(value: f64) -> String {
    format!("{value:?}")
}

/// One named sheet of the report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSheet {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<ReportCell>>,
}

impl ReportSheet {
    fn from_rows<'a>(
        name: &str,
        columns: Vec<String>,
        rows: impl IntoIterator<Item = &'a AggregatedRow>,
    ) -> Self {
        Self {
            name: name.to_string(),
            columns,
            rows: rows.into_iter().map(report_row).collect(),
        }
    }

    /// Display width of every column: the longest value, header included,
    /// plus [`COLUMN_PADDING`].
    pub fn column_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(index, header)| {
                let longest = self
                    .rows
                    .iter()
                    .filter_map(|row| row.get(index))
                    .map(|cell| cell.display().chars().count())
                    .fold(header.chars().count(), usize::max);
                longest + COLUMN_PADDING
            })
            .collect()
    }
}

fn report_row(row: &AggregatedRow) -> Vec<ReportCell> {
    std::iter::once(ReportCell::Text(row.course.clone()))
        .chain(row.values.iter().copied().map(number_cell))
        .chain(std::iter::once(number_cell(row.total)))
        .collect()
}

fn number_cell(value: Option<f64>) -> ReportCell {
    value.map_or(ReportCell::Blank, ReportCell::Number)
}

/// The complete report, sheets in output order.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportData {
    pub sheets: Vec<ReportSheet>,
}

/// Lays out the combined table and its two category subsets as report sheets.
pub fn build_report(table: &AggregatedTable) -> ReportData {
    let header = table.header();
    let Partition {
        general_education,
        major_elective,
    } = partition(table);

    ReportData {
        sheets: vec![
            ReportSheet::from_rows(COMBINED_SHEET, header.clone(), &table.rows),
            ReportSheet::from_rows(GENERAL_EDUCATION_SHEET, header.clone(), general_education),
            ReportSheet::from_rows(MAJOR_ELECTIVE_SHEET, header, major_elective),
        ],
    }
}

/// Resolves where the report is saved: a path ending in `.xlsx` is used as
/// given, any other path is treated as a directory holding
/// [`DEFAULT_OUTPUT_FILE`], and no path means [`DEFAULT_OUTPUT_DIR`].
pub fn resolve_destination(selected: Option<&Path>) -> PathBuf {
    match selected {
        None => Path::new(DEFAULT_OUTPUT_DIR).join(DEFAULT_OUTPUT_FILE),
        Some(path) if path.to_string_lossy().ends_with(".xlsx") => path.to_path_buf(),
        Some(directory) => directory.join(DEFAULT_OUTPUT_FILE),
    }
}
