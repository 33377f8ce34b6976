use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};

use crate::error::Result;
use crate::report::{ReportCell, ReportData};

/// Writes the report sheets to the given path, sizing each column to its
/// widest value.
pub fn write_workbook(path: &Path, report: &ReportData) -> Result<()> {
    let mut workbook_writer = Workbook::new();
    let header_format = Format::new().set_bold();

    for sheet in &report.sheets {
        let worksheet = workbook_writer.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        for (col_idx, header) in sheet.columns.iter().enumerate() {
            worksheet.write_string_with_format(0, col_idx as u16, header, &header_format)?;
        }

        for (row_idx, row) in sheet.rows.iter().enumerate() {
            let row_num = (row_idx + 1) as u32;
            for (col_idx, cell) in row.iter().enumerate() {
                match cell {
                    ReportCell::Text(value) => {
                        worksheet.write_string(row_num, col_idx as u16, value)?;
                    }
                    ReportCell::Number(value) => {
                        worksheet.write_number(row_num, col_idx as u16, *value)?;
                    }
                    ReportCell::Blank => {}
                }
            }
        }

        for (col_idx, width) in sheet.column_widths().into_iter().enumerate() {
            worksheet.set_column_width(col_idx as u16, width as f64)?;
        }
    }

    workbook_writer.save(path)?;
    Ok(())
}
