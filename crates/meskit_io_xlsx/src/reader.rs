//! Load an `.xlsx` file into a [`SpecWorkbook`].

use std::path::Path;

use calamine::{Data, Range, Reader, Xlsx, open_workbook};

use crate::spec::{EnumCellValue, SpecSheet, SpecWorkbook, XlsxEditError};

/// Read every sheet of `path_file` into memory, keeping tab order.
///
/// Only values are kept. Dates become their Excel serial number, error cells
/// become their display text (`#DIV/0!`, ...).
pub fn load_workbook(path_file: &Path) -> Result<SpecWorkbook, XlsxEditError> {
    let mut workbook: Xlsx<_> = open_workbook(path_file)?;

    let l_sheet_names = workbook.sheet_names().to_vec();
    let mut l_sheets = Vec::with_capacity(l_sheet_names.len());
    for sheet_name in l_sheet_names {
        let range = workbook.worksheet_range(&sheet_name)?;
        l_sheets.push(derive_sheet_from_range(&sheet_name, &range));
    }

    Ok(SpecWorkbook { sheets: l_sheets })
}

fn derive_sheet_from_range(sheet_name: &str, range: &Range<Data>) -> SpecSheet {
    let mut sheet = SpecSheet::new(sheet_name);
    let Some((n_row_start, n_col_start)) = range.start() else {
        return sheet;
    };

    for (row_rel, col_rel, data) in range.cells() {
        let value = convert_cell_value(data);
        if value.is_none() {
            continue;
        }
        let row_idx = n_row_start as usize + row_rel;
        let col_idx = n_col_start as usize + col_rel;
        if sheet.rows.len() <= row_idx {
            sheet.rows.resize_with(row_idx + 1, Vec::new);
        }
        let row = &mut sheet.rows[row_idx];
        if row.len() <= col_idx {
            row.resize(col_idx + 1, EnumCellValue::None);
        }
        row[col_idx] = value;
    }
    sheet
}

fn convert_cell_value(data: &Data) -> EnumCellValue {
    match data {
        Data::Empty => EnumCellValue::None,
        Data::String(val) => EnumCellValue::String(val.clone()),
        Data::Float(val) => EnumCellValue::Number(*val),
        Data::Int(val) => EnumCellValue::Number(*val as f64),
        Data::Bool(val) => EnumCellValue::Boolean(*val),
        Data::DateTime(val) => EnumCellValue::Number(val.as_f64()),
        Data::DateTimeIso(val) | Data::DurationIso(val) => EnumCellValue::String(val.clone()),
        Data::Error(err) => EnumCellValue::String(err.to_string()),
    }
}
