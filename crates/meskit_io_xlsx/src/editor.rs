//! Stateful workbook editor bound to one `.xlsx` file.

use std::path::{Path, PathBuf};

use meskit_io_fs::{ReportBackup, SpecBackupOptions, backup_file};

use crate::conf::C_SHEET_NAME_DEFAULT;
use crate::reader::load_workbook;
use crate::spec::{EnumCellValue, SpecExcelEditorOptions, SpecSheet, SpecWorkbook, XlsxEditError};
use crate::util::validate_sheet_name;
use crate::writer::save_workbook;

/// Workbook editor with auto-create and (by default) save-on-every-mutation.
///
/// The whole workbook is held in memory. With `if_auto_save = false` changes
/// stay in memory until [`Self::save`] is called.
#[derive(Debug)]
pub struct ExcelEditor {
    path_file: PathBuf,
    workbook: SpecWorkbook,
    idx_sheet_active: usize,
    if_auto_save: bool,
    if_dirty: bool,
}

impl ExcelEditor {
    /// Open `path_file`, creating it first when absent.
    ///
    /// A new file gets one sheet named `options.sheet_name` (or `Sheet1`).
    /// A requested sheet missing from an existing file is created. Without a
    /// sheet name the first sheet is edited.
    pub fn open<P: AsRef<Path>>(
        path_file: P,
        options: SpecExcelEditorOptions,
    ) -> Result<Self, XlsxEditError> {
        let path_file = path_file.as_ref().to_path_buf();
        if let Some(name) = &options.sheet_name {
            validate_sheet_name(name)?;
        }

        if !path_file.exists() {
            let name_sheet = options.sheet_name.as_deref().unwrap_or(C_SHEET_NAME_DEFAULT);
            log::info!("Auto create excel file: {}", path_file.display());
            save_workbook(&SpecWorkbook::with_sheet(name_sheet), &path_file)?;
        }

        let mut workbook = load_workbook(&path_file)?;
        if workbook.sheets.is_empty() {
            workbook
                .sheets
                .push(SpecSheet::new(C_SHEET_NAME_DEFAULT));
        }

        let mut editor = Self {
            path_file,
            workbook,
            idx_sheet_active: 0,
            if_auto_save: options.if_auto_save,
            if_dirty: false,
        };

        if let Some(name) = &options.sheet_name {
            if editor.workbook.sheet_index(name).is_none() {
                editor.create_new_sheet(name)?;
            }
            editor.select_sheet(name)?;
        }
        Ok(editor)
    }

    /// Open with default options, editing `sheet_name` or the first sheet.
    pub fn open_sheet<P: AsRef<Path>>(
        path_file: P,
        sheet_name: Option<&str>,
    ) -> Result<Self, XlsxEditError> {
        let options = SpecExcelEditorOptions {
            sheet_name: sheet_name.map(ToString::to_string),
            ..SpecExcelEditorOptions::default()
        };
        Self::open(path_file, options)
    }

    /// Bound file path.
    pub fn file_path(&self) -> &Path {
        &self.path_file
    }

    /// Whether in-memory changes have not been written yet.
    pub fn is_dirty(&self) -> bool {
        self.if_dirty
    }

    /// The in-memory workbook.
    pub fn workbook(&self) -> &SpecWorkbook {
        &self.workbook
    }

    /// The sheet being edited.
    pub fn sheet(&self) -> &SpecSheet {
        &self.workbook.sheets[self.idx_sheet_active]
    }

    fn sheet_mut(&mut self) -> &mut SpecSheet {
        &mut self.workbook.sheets[self.idx_sheet_active]
    }

    /// Name of the sheet being edited.
    pub fn sheet_name(&self) -> &str {
        &self.sheet().name
    }

    /// All sheet names in tab order.
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    /// Last used row of the active sheet (at least 1).
    pub fn max_row(&self) -> usize {
        self.sheet().max_row()
    }

    /// Widest used row of the active sheet (at least 1).
    pub fn max_column(&self) -> usize {
        self.sheet().max_column()
    }

    ////////////////////////////////////////////////////////////////////////////
    // #region Records

    /// Overwrite the header row with `values`, leftmost first.
    pub fn fill_first_row<I, V>(&mut self, values: I) -> Result<(), XlsxEditError>
    where
        I: IntoIterator<Item = V>,
        V: Into<EnumCellValue>,
    {
        let l_values = values.into_iter().map(Into::into).collect();
        self.sheet_mut().fill_first_row(l_values)?;
        self.commit()
    }

    /// Append `values` after the last used row; returns the new row index.
    pub fn add_new_row<I, V>(&mut self, values: I) -> Result<usize, XlsxEditError>
    where
        I: IntoIterator<Item = V>,
        V: Into<EnumCellValue>,
    {
        let l_values = values.into_iter().map(Into::into).collect();
        let row_index = self.sheet_mut().add_new_row(l_values)?;
        self.commit()?;
        Ok(row_index)
    }

    /// Overwrite the cell at (`row_index`, column titled `title`).
    pub fn fill_block<T, V>(
        &mut self,
        row_index: usize,
        title: T,
        data: V,
    ) -> Result<(), XlsxEditError>
    where
        T: Into<EnumCellValue>,
        V: Into<EnumCellValue>,
    {
        self.sheet_mut()
            .fill_block(row_index, &title.into(), data.into())?;
        self.commit()
    }

    /// Append `data` to the cell at (`row_index`, column titled `title`).
    ///
    /// Text concatenates and numbers add; other pairings fail with
    /// [`XlsxEditError::TypeMismatch`] and leave the cell unchanged.
    pub fn append_block<T, V>(
        &mut self,
        row_index: usize,
        title: T,
        data: V,
    ) -> Result<(), XlsxEditError>
    where
        T: Into<EnumCellValue>,
        V: Into<EnumCellValue>,
    {
        self.sheet_mut()
            .append_block(row_index, &title.into(), data.into())?;
        self.commit()
    }

    /// Value at (`row_index`, column titled `title`).
    pub fn read_block<T>(&self, row_index: usize, title: T) -> Result<EnumCellValue, XlsxEditError>
    where
        T: Into<EnumCellValue>,
    {
        self.sheet().read_block(row_index, &title.into())
    }

    /// Row values padded to the sheet width.
    pub fn read_row(&self, row_index: usize) -> Vec<EnumCellValue> {
        self.sheet().row_values(row_index)
    }

    /// First record row containing all of `values`, or `None`.
    pub fn find_row_index(&self, values: &[EnumCellValue]) -> Option<usize> {
        self.sheet().find_row_index(values)
    }

    // #endregion
    ////////////////////////////////////////////////////////////////////////////
    // #region Sheets

    /// Add an empty sheet at the end. Returns `false` (and logs a warning)
    /// when the name is already taken.
    pub fn create_new_sheet(&mut self, sheet_name: &str) -> Result<bool, XlsxEditError> {
        validate_sheet_name(sheet_name)?;
        if self.workbook.sheet_index(sheet_name).is_some() {
            log::warn!("Sheet '{sheet_name}' already exists; create skipped.");
            return Ok(false);
        }
        self.workbook.sheets.push(SpecSheet::new(sheet_name));
        self.commit()?;
        Ok(true)
    }

    /// Make `sheet_name` the sheet being edited.
    pub fn select_sheet(&mut self, sheet_name: &str) -> Result<(), XlsxEditError> {
        self.idx_sheet_active = self
            .workbook
            .sheet_index(sheet_name)
            .ok_or_else(|| XlsxEditError::SheetNotFound(sheet_name.to_string()))?;
        Ok(())
    }

    /// Rename the sheet being edited.
    pub fn rename_sheet(&mut self, new_name: &str) -> Result<(), XlsxEditError> {
        validate_sheet_name(new_name)?;
        match self.workbook.sheet_index(new_name) {
            Some(idx) if idx == self.idx_sheet_active => return Ok(()),
            Some(_) => return Err(XlsxEditError::SheetExists(new_name.to_string())),
            None => {}
        }
        self.sheet_mut().name = new_name.to_string();
        self.commit()
    }

    /// Remove `sheet_name`. Returns `false` (and logs a warning) when it does
    /// not exist or is the only sheet left.
    ///
    /// Removing the active sheet makes the first remaining sheet active.
    pub fn delete_sheet(&mut self, sheet_name: &str) -> Result<bool, XlsxEditError> {
        let Some(idx) = self.workbook.sheet_index(sheet_name) else {
            log::warn!("Sheet '{sheet_name}' not found; delete skipped.");
            return Ok(false);
        };
        if self.workbook.sheets.len() == 1 {
            log::warn!("Sheet '{sheet_name}' is the only sheet; delete skipped.");
            return Ok(false);
        }

        self.workbook.sheets.remove(idx);
        if idx == self.idx_sheet_active {
            self.idx_sheet_active = 0;
        } else if idx < self.idx_sheet_active {
            self.idx_sheet_active -= 1;
        }
        self.commit()?;
        Ok(true)
    }

    // #endregion
    ////////////////////////////////////////////////////////////////////////////
    // #region Persistence

    /// Write the whole workbook to disk.
    pub fn save(&mut self) -> Result<(), XlsxEditError> {
        save_workbook(&self.workbook, &self.path_file)?;
        self.if_dirty = false;
        Ok(())
    }

    /// Copy the file into `dir_backup` and prune old copies.
    ///
    /// Pending in-memory changes are saved first so the copy matches them.
    pub fn backup<P: AsRef<Path>>(
        &mut self,
        dir_backup: P,
        options: &SpecBackupOptions,
    ) -> Result<ReportBackup, XlsxEditError> {
        if self.if_dirty {
            self.save()?;
        }
        Ok(backup_file(&self.path_file, dir_backup, options)?)
    }

    fn commit(&mut self) -> Result<(), XlsxEditError> {
        self.if_dirty = true;
        if self.if_auto_save {
            self.save()?;
        }
        Ok(())
    }

    // #endregion
    ////////////////////////////////////////////////////////////////////////////
}
