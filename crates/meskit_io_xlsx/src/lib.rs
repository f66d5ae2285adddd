//! `meskit_io_xlsx` v1:
//! Column-indexed editing of `.xlsx` workbooks.
//!
//! Modules:
//! - `conf`   : constants and Excel limits
//! - `spec`   : cell/workbook models, options, errors
//! - `sheet`  : header-addressed record operations on one sheet
//! - `util`   : pure helper functions
//! - `reader` : calamine-based loader
//! - `writer` : rust_xlsxwriter-based serializer
//! - `editor` : file-bound `ExcelEditor`
pub mod conf;
pub mod editor;
pub mod reader;
pub mod sheet;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    C_SHEET_NAME_DEFAULT, N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX,
    TUP_EXCEL_ILLEGAL,
};
pub use editor::ExcelEditor;
pub use reader::load_workbook;
pub use spec::{EnumCellValue, SpecExcelEditorOptions, SpecSheet, SpecWorkbook, XlsxEditError};
pub use util::{derive_appended_value, validate_sheet_name};
pub use writer::{derive_workbook_bytes, save_workbook};
