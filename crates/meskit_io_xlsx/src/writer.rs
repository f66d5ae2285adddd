//! Serialize a [`SpecWorkbook`] with `rust_xlsxwriter` and persist it.

use std::path::Path;

use meskit_io_fs::write_file_atomic;
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::spec::{EnumCellValue, SpecSheet, SpecWorkbook, XlsxEditError};
use crate::util::{cast_col_num, cast_row_num, validate_sheet_name};

/// Render the whole workbook to `.xlsx` bytes.
///
/// Empty cells are skipped; an empty string is stored as an empty cell.
pub fn derive_workbook_bytes(book: &SpecWorkbook) -> Result<Vec<u8>, XlsxEditError> {
    let mut workbook = Workbook::new();
    for sheet in &book.sheets {
        validate_sheet_name(&sheet.name)?;
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;
        write_sheet_cells(worksheet, sheet)?;
    }
    Ok(workbook.save_to_buffer()?)
}

/// Rewrite `path_file` with the whole workbook (temp file + rename).
pub fn save_workbook(book: &SpecWorkbook, path_file: &Path) -> Result<(), XlsxEditError> {
    let v_bytes = derive_workbook_bytes(book)?;
    write_file_atomic(path_file, &v_bytes).map_err(|e| XlsxEditError::Io {
        path: path_file.to_path_buf(),
        source: e,
    })?;
    log::debug!(
        "Workbook saved: {} ({} sheets)",
        path_file.display(),
        book.sheets.len()
    );
    Ok(())
}

fn write_sheet_cells(worksheet: &mut Worksheet, sheet: &SpecSheet) -> Result<(), XlsxEditError> {
    for (row_idx, row) in sheet.rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            write_cell(worksheet, row_idx, col_idx, value)?;
        }
    }
    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    row_idx: usize,
    col_idx: usize,
    value: &EnumCellValue,
) -> Result<(), XlsxEditError> {
    match value {
        EnumCellValue::None => {}
        EnumCellValue::String(val) if val.is_empty() => {}
        EnumCellValue::String(val) => {
            worksheet.write_string(cast_row_num(row_idx)?, cast_col_num(col_idx)?, val)?;
        }
        EnumCellValue::Number(val) => {
            worksheet.write_number(cast_row_num(row_idx)?, cast_col_num(col_idx)?, *val)?;
        }
        EnumCellValue::Boolean(val) => {
            worksheet.write_boolean(cast_row_num(row_idx)?, cast_col_num(col_idx)?, *val)?;
        }
    }
    Ok(())
}
