//! Workbook models, editor options and errors.

use std::fmt;
use std::io;
use std::path::PathBuf;

use meskit_io_fs::BackupError;
use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////
// #region CellValue

/// One cell value as held in memory.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EnumCellValue {
    /// Missing/blank value.
    #[default]
    None,
    /// Text value.
    String(String),
    /// Numeric value. Integers are stored as whole floats, like Excel does.
    Number(f64),
    /// Boolean value.
    Boolean(bool),
}

impl EnumCellValue {
    /// Whether the cell holds no value.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Short type label used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "empty",
            Self::String(_) => "string",
            Self::Number(_) => "number",
            Self::Boolean(_) => "boolean",
        }
    }

    /// Borrow the text of a string cell.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(val) => Some(val),
            _ => None,
        }
    }

    /// Numeric value of a number cell.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(val) => Some(*val),
            _ => None,
        }
    }
}

impl fmt::Display for EnumCellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::String(val) => write!(f, "{val}"),
            Self::Number(val) if val.fract() == 0.0 && val.abs() < 1e15 => {
                write!(f, "{}", *val as i64)
            }
            Self::Number(val) => write!(f, "{val}"),
            Self::Boolean(val) => write!(f, "{}", if *val { "TRUE" } else { "FALSE" }),
        }
    }
}

impl From<&str> for EnumCellValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for EnumCellValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<f64> for EnumCellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for EnumCellValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for EnumCellValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for EnumCellValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl<T> From<Option<T>> for EnumCellValue
where
    T: Into<EnumCellValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::None, Into::into)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WorkbookModel

/// One named grid of cells. Storage is zero-based; the public API is 1-based.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecSheet {
    /// Sheet (tab) name.
    pub name: String,
    /// Row-major cell values. Rows may have different lengths.
    pub rows: Vec<Vec<EnumCellValue>>,
}

/// Whole workbook loaded in memory, sheets in tab order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecWorkbook {
    /// Sheets in tab order.
    pub sheets: Vec<SpecSheet>,
}

impl SpecWorkbook {
    /// Workbook with one empty sheet.
    pub fn with_sheet(name: &str) -> Self {
        Self {
            sheets: vec![SpecSheet::new(name)],
        }
    }

    /// Sheet names in tab order.
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|sheet| sheet.name.clone()).collect()
    }

    /// Position of the sheet called `name`.
    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        self.sheets.iter().position(|sheet| sheet.name == name)
    }

    /// Borrow the sheet called `name`.
    pub fn sheet(&self, name: &str) -> Option<&SpecSheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region EditorOptions

/// Options for [`crate::editor::ExcelEditor::open`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecExcelEditorOptions {
    /// Sheet to edit; created when missing. `None` selects the first sheet.
    pub sheet_name: Option<String>,
    /// Persist the workbook after every mutating call.
    pub if_auto_save: bool,
}

impl Default for SpecExcelEditorOptions {
    fn default() -> Self {
        Self {
            sheet_name: None,
            if_auto_save: true,
        }
    }
}

impl SpecExcelEditorOptions {
    /// Default options editing `sheet_name`.
    pub fn with_sheet_name(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: Some(sheet_name.into()),
            ..Self::default()
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Workbook editing failures.
#[derive(Debug, Error)]
pub enum XlsxEditError {
    /// No header cell in row 1 equals the requested title.
    #[error("Title '{0}' not found in the first row.")]
    TitleNotFound(String),
    /// Referenced sheet does not exist.
    #[error("Sheet '{0}' not found.")]
    SheetNotFound(String),
    /// Rename target is already used by another sheet.
    #[error("Sheet '{0}' already exists.")]
    SheetExists(String),
    /// Name violates Excel sheet naming rules.
    #[error("Invalid sheet name '{name}': {reason}")]
    InvalidSheetName {
        /// Rejected name.
        name: String,
        /// Violated rule.
        reason: String,
    },
    /// Row index outside `1..=1_048_576`.
    #[error("Row index {0} is out of range (rows are 1-based, max 1048576).")]
    InvalidRowIndex(usize),
    /// More values than Excel columns.
    #[error("Column index {0} is out of range (max 16384).")]
    InvalidColumnIndex(usize),
    /// Append on values that cannot be concatenated or added.
    #[error("Cannot append {data} to {existing} cell.")]
    TypeMismatch {
        /// Type of the value already in the cell.
        existing: &'static str,
        /// Type of the appended value.
        data: &'static str,
    },
    /// Workbook could not be parsed.
    #[error("xlsx read error: {0}")]
    Read(#[from] calamine::XlsxError),
    /// Workbook could not be serialized.
    #[error("xlsx write error: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),
    /// Filesystem failure while saving.
    #[error("I/O failure at {}: {source}", path.display())]
    Io {
        /// Path being written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// Backup copy or pruning failed.
    #[error(transparent)]
    Backup(#[from] BackupError),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
