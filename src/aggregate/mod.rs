//! Reduces extracted worksheets to per-course totals and folds them into the
//! summary table.
//!
//! The stages run in a fixed order: [`summarize_table`] for every readable
//! workbook, [`merge_summaries`] across the batch, then [`normalize_courses`]
//! to collapse qualified course names and compute the totals.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use tracing::debug;

use crate::error::{Result, ToolError};
use crate::model::{AggregatedRow, AggregatedTable, CellValue, FileSummary, MergedTable, RawTable};

/// Identifier columns that never carry course data.
pub const IDENTIFIER_COLUMNS: [&str; 2] = ["Srl No", "Name"];
/// Value assumed for a blank cell: an unmarked enrollment still counts once.
pub const MISSING_CELL_DEFAULT: f64 = 1.0;
/// Qualifier stripped from course names before aggregation.
pub const QUALIFIER_SUFFIX: &str = " (Required)";

/// Reduces one extracted table to a course → total summary labelled with the
/// base name of `source`.
pub fn summarize_table(mut table: RawTable, source: &Path) -> FileSummary {
    table.drop_columns(&IDENTIFIER_COLUMNS);
    table.fill_missing(CellValue::Number(MISSING_CELL_DEFAULT));

    let totals = table
        .columns
        .iter()
        .enumerate()
        .map(|(index, course)| (course.clone(), sum_numeric(table.column(index))))
        .collect();

    FileSummary {
        source: file_base_name(source),
        totals,
    }
}

/// Sums the numeric cells, silently skipping anything else.
pub fn sum_numeric<'a>(cells: impl IntoIterator<Item = &'a CellValue>) -> f64 {
    cells.into_iter().filter_map(CellValue::as_number).sum()
}

/// File name without directory and extension.
pub fn file_base_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Outer union of the summaries keyed on course name. Each summary becomes one
/// column, in input order; a course a file never mentions stays `None` for
/// that column.
///
/// Fails with [`ToolError::EmptyBatch`] when there is nothing to merge.
pub fn merge_summaries(summaries: &[FileSummary]) -> Result<MergedTable> {
    if summaries.is_empty() {
        return Err(ToolError::EmptyBatch);
    }

    let columns = unique_column_names(summaries.iter().map(|summary| summary.source.as_str()));
    let width = columns.len();
    let mut rows: BTreeMap<String, Vec<Option<f64>>> = BTreeMap::new();

    for (index, summary) in summaries.iter().enumerate() {
        for (course, total) in &summary.totals {
            let row = rows
                .entry(course.clone())
                .or_insert_with(|| vec![None; width]);
            row[index] = Some(*total);
        }
    }

    debug!(files = width, courses = rows.len(), "summaries merged");
    Ok(MergedTable { columns, rows })
}

fn unique_column_names<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut taken: HashSet<String> = HashSet::new();
    let mut columns = Vec::new();

    for name in names {
        let count = counts.entry(name).or_insert(0);
        let mut candidate = name.to_string();
        while !taken.insert(candidate.clone()) {
            *count += 1;
            candidate = format!("{name}.{count}");
        }
        columns.push(candidate);
    }

    columns
}

/// Removes the `" (Required)"` qualifier. Names without it are returned as-is.
pub fn normalize_course_name(course: &str) -> String {
    course.replace(QUALIFIER_SUFFIX, "")
}

/// Collapses rows whose names coincide once the qualifier is removed, appends
/// the row total and blanks every zero.
///
/// Absent cells only count as zero while summing here; the final table shows
/// both "no data" and a computed zero as a blank.
pub fn normalize_courses(merged: MergedTable) -> AggregatedTable {
    let width = merged.columns.len();
    let mut grouped: BTreeMap<String, Vec<f64>> = BTreeMap::new();

    for (course, values) in merged.rows {
        let sums = grouped
            .entry(normalize_course_name(&course))
            .or_insert_with(|| vec![0.0; width]);
        for (sum, value) in sums.iter_mut().zip(values) {
            *sum += value.unwrap_or(0.0);
        }
    }

    let rows = grouped
        .into_iter()
        .map(|(course, sums)| {
            let total: f64 = sums.iter().sum();
            AggregatedRow {
                course,
                values: sums.into_iter().map(blank_zero).collect(),
                total: blank_zero(total),
            }
        })
        .collect::<Vec<_>>();

    debug!(courses = rows.len(), "course names normalized");
    AggregatedTable {
        columns: merged.columns,
        rows,
    }
}

fn blank_zero(value: f64) -> Option<f64> {
    if value == 0.0 { None } else { Some(value) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(source: &str, totals: &[(&str, f64)]) -> FileSummary {
        FileSummary {
            source: source.to_string(),
            totals: totals
                .iter()
                .map(|(course, total)| (course.to_string(), *total))
                .collect(),
        }
    }

    #[test]
    fn summarize_drops_identifiers_and_fills_blanks_with_one() {
        let mut table = RawTable::new(vec![
            "Srl No".into(),
            "Name".into(),
            "CHEM 120".into(),
            "HIST 201-GE".into(),
        ]);
        table.push_row(vec![
            CellValue::Number(1.0),
            CellValue::Text("Ada".into()),
            CellValue::Number(3.0),
            CellValue::Missing,
        ]);
        table.push_row(vec![
            CellValue::Number(2.0),
            CellValue::Text("Lin".into()),
            CellValue::Missing,
            CellValue::Missing,
        ]);

        let summary = summarize_table(table, Path::new("data/Fall 2024.xlsx"));

        assert_eq!(summary.source, "Fall 2024");
        assert_eq!(
            summary.totals,
            vec![("CHEM 120".to_string(), 4.0), ("HIST 201-GE".to_string(), 2.0)]
        );
    }

    #[test]
    fn summarize_without_identifier_columns_keeps_everything() {
        let mut table = RawTable::new(vec!["PHYS 150".into()]);
        table.push_row(vec![CellValue::Number(2.0)]);

        let summary = summarize_table(table, Path::new("spring.xlsx"));

        assert_eq!(summary.totals, vec![("PHYS 150".to_string(), 2.0)]);
    }

    #[test]
    fn summarize_only_identifier_columns_is_empty() {
        let mut table = RawTable::new(vec!["Srl No".into(), "Name".into()]);
        table.push_row(vec![CellValue::Number(1.0), CellValue::Text("Ada".into())]);

        let summary = summarize_table(table, Path::new("ids.xlsx"));

        assert!(summary.is_empty());
    }

    #[test]
    fn non_numeric_cells_do_not_contribute_after_fill() {
        let mut table = RawTable::new(vec!["ART 100".into()]);
        for cell in [
            CellValue::Number(1.0),
            CellValue::Number(1.0),
            CellValue::Text("x".into()),
            CellValue::Missing,
        ] {
            table.push_row(vec![cell]);
        }

        let summary = summarize_table(table, Path::new("art.xlsx"));

        assert_eq!(summary.totals, vec![("ART 100".to_string(), 3.0)]);
    }

    #[test]
    fn booleans_count_as_numbers() {
        let cells = [
            CellValue::Bool(true),
            CellValue::Bool(false),
            CellValue::Number(2.5),
        ];

        assert_eq!(sum_numeric(&cells), 3.5);
    }

    #[test]
    fn merge_keeps_absent_cells_empty() {
        let merged = merge_summaries(&[
            summary("A", &[("MATH 101 (Required)", 3.0)]),
            summary("B", &[("MATH 101", 2.0), ("ENGL 101 (ENR)-Enrichment", 1.0)]),
        ])
        .expect("merge succeeds");

        assert_eq!(merged.columns, vec!["A", "B"]);
        assert_eq!(merged.rows["MATH 101 (Required)"], vec![Some(3.0), None]);
        assert_eq!(merged.rows["MATH 101"], vec![None, Some(2.0)]);
        assert_eq!(
            merged.rows["ENGL 101 (ENR)-Enrichment"],
            vec![None, Some(1.0)]
        );
    }

    #[test]
    fn merge_tolerates_empty_summaries() {
        let merged = merge_summaries(&[summary("A", &[]), summary("B", &[("BIO 110", 1.0)])])
            .expect("merge succeeds");

        assert_eq!(merged.columns, vec!["A", "B"]);
        assert_eq!(merged.rows["BIO 110"], vec![None, Some(1.0)]);
    }

    #[test]
    fn merge_of_nothing_is_an_empty_batch() {
        assert!(matches!(merge_summaries(&[]), Err(ToolError::EmptyBatch)));
    }

    #[test]
    fn repeated_file_names_get_distinct_columns() {
        let merged = merge_summaries(&[
            summary("roster", &[("BIO 110", 1.0)]),
            summary("roster", &[("BIO 110", 2.0)]),
        ])
        .expect("merge succeeds");

        assert_eq!(merged.columns, vec!["roster", "roster.1"]);
        assert_eq!(merged.rows["BIO 110"], vec![Some(1.0), Some(2.0)]);
    }

    #[test]
    fn normalizing_a_plain_name_is_a_no_op() {
        assert_eq!(normalize_course_name("MATH 101"), "MATH 101");
        assert_eq!(normalize_course_name("MATH 101 (Required)"), "MATH 101");
        assert_eq!(normalize_course_name("MATH 101 (required)"), "MATH 101 (required)");
    }

    #[test]
    fn normalize_sums_collisions_and_totals_rows() {
        let merged = merge_summaries(&[
            summary("A", &[("MATH 101 (Required)", 3.0)]),
            summary("B", &[("MATH 101", 2.0), ("ENGL 101 (ENR)-Enrichment", 1.0)]),
        ])
        .expect("merge succeeds");

        let table = normalize_courses(merged);

        assert_eq!(
            table.rows,
            vec![
                AggregatedRow {
                    course: "ENGL 101 (ENR)-Enrichment".into(),
                    values: vec![None, Some(1.0)],
                    total: Some(1.0),
                },
                AggregatedRow {
                    course: "MATH 101".into(),
                    values: vec![Some(3.0), Some(2.0)],
                    total: Some(5.0),
                },
            ]
        );
    }

    #[test]
    fn computed_zero_is_blanked() {
        let merged = merge_summaries(&[summary("A", &[("SOC 210", 0.0)])])
            .expect("merge succeeds");

        let table = normalize_courses(merged);

        assert_eq!(table.rows[0].values, vec![None]);
        assert_eq!(table.rows[0].total, None);
    }
}
