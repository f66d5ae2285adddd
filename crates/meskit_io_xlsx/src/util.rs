//! Pure helper functions shared by sheet operations and the writer.

use crate::conf::{
    N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, TUP_EXCEL_ILLEGAL,
};
use crate::spec::{EnumCellValue, XlsxEditError};

////////////////////////////////////////////////////////////////////////////////
// #region Validation

/// Check a sheet name against Excel naming rules.
pub fn validate_sheet_name(name: &str) -> Result<(), XlsxEditError> {
    let derive_err = |reason: &str| XlsxEditError::InvalidSheetName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.trim().is_empty() {
        return Err(derive_err("name must not be blank"));
    }
    if name.chars().count() > N_LEN_EXCEL_SHEET_NAME_MAX {
        return Err(derive_err(&format!(
            "name must be at most {N_LEN_EXCEL_SHEET_NAME_MAX} characters"
        )));
    }
    if let Some(c_illegal) = TUP_EXCEL_ILLEGAL.iter().find(|c| name.contains(**c)) {
        return Err(derive_err(&format!("character `{c_illegal}` is not allowed")));
    }
    if name.starts_with('\'') || name.ends_with('\'') {
        return Err(derive_err("name must not start or end with an apostrophe"));
    }
    Ok(())
}

/// Check a 1-based row index.
pub fn validate_row_index(row_index: usize) -> Result<(), XlsxEditError> {
    if row_index == 0 || row_index > N_NROWS_EXCEL_MAX {
        return Err(XlsxEditError::InvalidRowIndex(row_index));
    }
    Ok(())
}

/// Check a 1-based column index.
pub fn validate_col_index(col_index: usize) -> Result<(), XlsxEditError> {
    if col_index == 0 || col_index > N_NCOLS_EXCEL_MAX {
        return Err(XlsxEditError::InvalidColumnIndex(col_index));
    }
    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CellArithmetic

/// Combine an existing cell value with appended data.
///
/// Text + text concatenates and number + number adds. Every other pairing,
/// including an empty existing cell, is a [`XlsxEditError::TypeMismatch`].
pub fn derive_appended_value(
    existing: &EnumCellValue,
    data: &EnumCellValue,
) -> Result<EnumCellValue, XlsxEditError> {
    match (existing, data) {
        (EnumCellValue::String(lhs), EnumCellValue::String(rhs)) => {
            Ok(EnumCellValue::String(format!("{lhs}{rhs}")))
        }
        (EnumCellValue::Number(lhs), EnumCellValue::Number(rhs)) => {
            Ok(EnumCellValue::Number(lhs + rhs))
        }
        _ => Err(XlsxEditError::TypeMismatch {
            existing: existing.type_name(),
            data: data.type_name(),
        }),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Casts

/// Zero-based row index into the `u32` used by the xlsx writer.
pub(crate) fn cast_row_num(value: usize) -> Result<u32, XlsxEditError> {
    u32::try_from(value).map_err(|_| XlsxEditError::InvalidRowIndex(value.saturating_add(1)))
}

/// Zero-based column index into the `u16` used by the xlsx writer.
pub(crate) fn cast_col_num(value: usize) -> Result<u16, XlsxEditError> {
    u16::try_from(value).map_err(|_| XlsxEditError::InvalidColumnIndex(value.saturating_add(1)))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
