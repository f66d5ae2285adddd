//! Column-indexed record operations on one in-memory sheet.
//!
//! Row 1 is the header: its cells name the columns. All indices taken and
//! returned here are 1-based, like Excel row/column numbers.

use crate::conf::N_ROW_HEADER;
use crate::spec::{EnumCellValue, SpecSheet, XlsxEditError};
use crate::util::{derive_appended_value, validate_col_index, validate_row_index};

impl SpecSheet {
    /// Empty sheet called `name`.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rows: Vec::new(),
        }
    }

    /// Last used row, never less than 1 (an empty sheet reports 1).
    pub fn max_row(&self) -> usize {
        self.rows.len().max(1)
    }

    /// Widest used row, never less than 1.
    pub fn max_column(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0).max(1)
    }

    /// Value at (`row_index`, `col_index`); out-of-range cells read as empty.
    pub fn cell(&self, row_index: usize, col_index: usize) -> &EnumCellValue {
        static CELL_EMPTY: EnumCellValue = EnumCellValue::None;
        if row_index == 0 || col_index == 0 {
            return &CELL_EMPTY;
        }
        self.rows
            .get(row_index - 1)
            .and_then(|row| row.get(col_index - 1))
            .unwrap_or(&CELL_EMPTY)
    }

    /// Write one cell, growing the grid as needed.
    pub fn set_cell(
        &mut self,
        row_index: usize,
        col_index: usize,
        value: EnumCellValue,
    ) -> Result<(), XlsxEditError> {
        validate_row_index(row_index)?;
        validate_col_index(col_index)?;

        if self.rows.len() < row_index {
            self.rows.resize_with(row_index, Vec::new);
        }
        let row = &mut self.rows[row_index - 1];
        if row.len() < col_index {
            row.resize(col_index, EnumCellValue::None);
        }
        row[col_index - 1] = value;
        Ok(())
    }

    /// Row values padded with empty cells to [`Self::max_column`].
    pub fn row_values(&self, row_index: usize) -> Vec<EnumCellValue> {
        let n_width = self.max_column();
        let mut l_values = match row_index.checked_sub(1).and_then(|idx| self.rows.get(idx)) {
            Some(row) => row.clone(),
            None => Vec::new(),
        };
        l_values.resize(n_width, EnumCellValue::None);
        l_values
    }

    /// Header titles (row 1), padded to [`Self::max_column`].
    pub fn header(&self) -> Vec<EnumCellValue> {
        self.row_values(N_ROW_HEADER)
    }

    /// Overwrite row 1 from column 1 onward. Cells right of `values` are kept.
    pub fn fill_first_row(&mut self, values: Vec<EnumCellValue>) -> Result<(), XlsxEditError> {
        self.write_row(N_ROW_HEADER, values)
    }

    /// Append `values` as a new row after [`Self::max_row`]; returns its index.
    ///
    /// On an empty sheet the first appended row is row 2, leaving row 1 for
    /// the header.
    pub fn add_new_row(&mut self, values: Vec<EnumCellValue>) -> Result<usize, XlsxEditError> {
        let row_index = self.max_row() + 1;
        self.write_row(row_index, values)?;
        Ok(row_index)
    }

    fn write_row(
        &mut self,
        row_index: usize,
        values: Vec<EnumCellValue>,
    ) -> Result<(), XlsxEditError> {
        validate_row_index(row_index)?;
        validate_col_index(values.len().max(1))?;
        for (idx, value) in values.into_iter().enumerate() {
            self.set_cell(row_index, idx + 1, value)?;
        }
        Ok(())
    }

    /// Column of the first header cell equal to `title`, scanning left to right.
    ///
    /// The header is padded to [`Self::max_column`], so an empty title matches
    /// a blank header cell within the sheet width.
    pub fn resolve_column_index(&self, title: &EnumCellValue) -> Option<usize> {
        self.header()
            .iter()
            .position(|cell| cell == title)
            .map(|idx| idx + 1)
    }

    fn resolve_column_index_required(&self, title: &EnumCellValue) -> Result<usize, XlsxEditError> {
        self.resolve_column_index(title)
            .ok_or_else(|| XlsxEditError::TitleNotFound(title.to_string()))
    }

    /// Overwrite the cell at (`row_index`, column titled `title`).
    pub fn fill_block(
        &mut self,
        row_index: usize,
        title: &EnumCellValue,
        data: EnumCellValue,
    ) -> Result<(), XlsxEditError> {
        let col_index = self.resolve_column_index_required(title)?;
        self.set_cell(row_index, col_index, data)
    }

    /// Append `data` to the cell at (`row_index`, column titled `title`).
    ///
    /// The cell is left untouched when the values cannot be combined.
    pub fn append_block(
        &mut self,
        row_index: usize,
        title: &EnumCellValue,
        data: EnumCellValue,
    ) -> Result<(), XlsxEditError> {
        let col_index = self.resolve_column_index_required(title)?;
        validate_row_index(row_index)?;
        let value = derive_appended_value(self.cell(row_index, col_index), &data)?;
        self.set_cell(row_index, col_index, value)
    }

    /// Value at (`row_index`, column titled `title`).
    pub fn read_block(
        &self,
        row_index: usize,
        title: &EnumCellValue,
    ) -> Result<EnumCellValue, XlsxEditError> {
        let col_index = self.resolve_column_index_required(title)?;
        validate_row_index(row_index)?;
        Ok(self.cell(row_index, col_index).clone())
    }

    /// First record row (2 onward) containing every value in `values`.
    ///
    /// Membership is set-like: order and duplicates in `values` do not matter,
    /// and an empty query value matches any blank cell within the sheet width.
    pub fn find_row_index(&self, values: &[EnumCellValue]) -> Option<usize> {
        ((N_ROW_HEADER + 1)..=self.max_row()).find(|&row_index| {
            let l_row_values = self.row_values(row_index);
            values.iter().all(|value| l_row_values.contains(value))
        })
    }
}
