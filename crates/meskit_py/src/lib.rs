use meskit_io_fs::{BackupError, ReportBackup, SpecBackupOptions, N_BACKUPS_MAX_DEFAULT};
use meskit_io_json::{
    JsonEditError, JsonEditor as RsJsonEditor, JsonFile as RsJsonFile, SpecJsonEditorOptions,
};
use meskit_io_xlsx::{
    EnumCellValue, ExcelEditor as RsExcelEditor, SpecExcelEditorOptions, XlsxEditError,
};
use pyo3::IntoPyObjectExt;
use pyo3::exceptions::{
    PyFileExistsError, PyFileNotFoundError, PyKeyError, PyOSError, PyRuntimeError, PyTypeError,
    PyValueError,
};
use pyo3::prelude::*;
use pyo3::types::{PyAny, PyBool, PyFloat, PyInt, PyString, PyTuple};
use serde_json::Value;

const N_BRIDGE_ABI_VERSION: u64 = 1;
const C_BRIDGE_CONTRACT_VERSION: &str = "meskit.editors.v1";
const C_BRIDGE_TRANSPORT: &str = "rust_native";

////////////////////////////////////////////////////////////////////////////////
// #region ErrorMapping

fn map_backup_error(exception: BackupError) -> PyErr {
    match exception {
        BackupError::SourceNotFile(_) => PyFileNotFoundError::new_err(exception.to_string()),
        BackupError::Io { .. } => PyOSError::new_err(exception.to_string()),
        BackupError::InvalidRetention(_)
        | BackupError::SourceNameInvalid(_)
        | BackupError::InvalidPattern(_) => PyValueError::new_err(exception.to_string()),
    }
}

fn map_xlsx_edit_error(exception: XlsxEditError) -> PyErr {
    match exception {
        XlsxEditError::SheetNotFound(_) => PyKeyError::new_err(exception.to_string()),
        XlsxEditError::TypeMismatch { .. } => PyTypeError::new_err(exception.to_string()),
        XlsxEditError::Io { .. } => PyOSError::new_err(exception.to_string()),
        XlsxEditError::Read(_) | XlsxEditError::Write(_) => {
            PyRuntimeError::new_err(exception.to_string())
        }
        XlsxEditError::Backup(err) => map_backup_error(err),
        XlsxEditError::SheetExists(_) => PyFileExistsError::new_err(exception.to_string()),
        XlsxEditError::TitleNotFound(_)
        | XlsxEditError::InvalidSheetName { .. }
        | XlsxEditError::InvalidRowIndex(_)
        | XlsxEditError::InvalidColumnIndex(_) => PyValueError::new_err(exception.to_string()),
    }
}

fn map_json_edit_error(exception: JsonEditError) -> PyErr {
    match exception {
        JsonEditError::KeyNotFound(key) => PyKeyError::new_err(key),
        JsonEditError::TypeMismatch { .. } => PyTypeError::new_err(exception.to_string()),
        JsonEditError::Io { .. } => PyOSError::new_err(exception.to_string()),
        JsonEditError::Backup(err) => map_backup_error(err),
        JsonEditError::NotAnObject { .. }
        | JsonEditError::Parse { .. }
        | JsonEditError::Serialize(_) => PyValueError::new_err(exception.to_string()),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ValueConversion

fn parse_cell_value(value: &Bound<'_, PyAny>) -> PyResult<EnumCellValue> {
    if value.is_none() {
        return Ok(EnumCellValue::None);
    }
    if let Ok(val) = value.downcast::<PyBool>() {
        return Ok(EnumCellValue::Boolean(val.is_true()));
    }
    if let Ok(val) = value.downcast::<PyInt>() {
        return Ok(EnumCellValue::from(val.extract::<i64>()?));
    }
    if let Ok(val) = value.downcast::<PyFloat>() {
        return Ok(EnumCellValue::Number(val.value()));
    }
    if value.is_instance_of::<PyString>() {
        return Ok(EnumCellValue::String(value.extract::<String>()?));
    }
    Err(PyTypeError::new_err(format!(
        "Unsupported cell value type: `{}`. Expected None, bool, int, float or str.",
        value.get_type().name()?
    )))
}

fn parse_cell_values(values: &[Bound<'_, PyAny>]) -> PyResult<Vec<EnumCellValue>> {
    values.iter().map(parse_cell_value).collect()
}

fn derive_py_cell_value(py: Python<'_>, value: &EnumCellValue) -> PyResult<PyObject> {
    match value {
        EnumCellValue::None => Ok(py.None()),
        EnumCellValue::String(val) => val.into_py_any(py),
        EnumCellValue::Number(val) if val.fract() == 0.0 && val.abs() < 9.0e15 => {
            (*val as i64).into_py_any(py)
        }
        EnumCellValue::Number(val) => (*val).into_py_any(py),
        EnumCellValue::Boolean(val) => (*val).into_py_any(py),
    }
}

fn parse_json_value(py: Python<'_>, value: &Bound<'_, PyAny>) -> PyResult<Value> {
    let txt: String = py
        .import("json")?
        .call_method1("dumps", (value,))?
        .extract()?;
    serde_json::from_str(&txt)
        .map_err(|e| PyValueError::new_err(format!("Value is not JSON-compatible: {e}")))
}

/// Optional JSON argument that keeps an explicit `None` apart from omission.
enum EnumJsonArg {
    Omitted,
    Given(Value),
}

impl<'py> FromPyObject<'py> for EnumJsonArg {
    fn extract_bound(ob: &Bound<'py, PyAny>) -> PyResult<Self> {
        Ok(Self::Given(parse_json_value(ob.py(), ob)?))
    }
}

fn derive_py_json_value(py: Python<'_>, value: &Value) -> PyResult<PyObject> {
    let txt = serde_json::to_string(value)
        .map_err(|e| PyValueError::new_err(format!("JSON write error: {e}")))?;
    Ok(py.import("json")?.call_method1("loads", (txt,))?.unbind())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Backup

#[pyclass(name = "ReportBackup")]
#[derive(Debug, Clone)]
struct PyReportBackup {
    #[pyo3(get)]
    path_backup: String,
    #[pyo3(get)]
    paths_pruned: Vec<String>,
    #[pyo3(get)]
    cnt_retained: usize,
}

impl From<ReportBackup> for PyReportBackup {
    fn from(report: ReportBackup) -> Self {
        Self {
            path_backup: report.path_backup.to_string_lossy().to_string(),
            paths_pruned: report
                .paths_pruned
                .iter()
                .map(|path| path.to_string_lossy().to_string())
                .collect(),
            cnt_retained: report.cnt_retained,
        }
    }
}

#[pymethods]
impl PyReportBackup {
    #[getter]
    fn pruned_count(&self) -> usize {
        self.paths_pruned.len()
    }

    #[pyo3(signature = (prefix = "[BACKUP]"))]
    fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} created={} pruned={} retained={}",
            self.path_backup,
            self.pruned_count(),
            self.cnt_retained
        )
    }

    fn __str__(&self) -> String {
        self.format("[BACKUP]")
    }
}

#[pyfunction(name = "backup_file")]
#[pyo3(signature = (source_path, backup_folder, max_backups = N_BACKUPS_MAX_DEFAULT))]
fn backup_file_py(
    py: Python<'_>,
    source_path: String,
    backup_folder: String,
    max_backups: usize,
) -> PyResult<PyReportBackup> {
    let options = SpecBackupOptions::with_max_backups(max_backups);
    let report =
        py.allow_threads(|| meskit_io_fs::backup_file(source_path, backup_folder, &options));
    Ok(PyReportBackup::from(report.map_err(map_backup_error)?))
}

#[pyfunction(name = "list_backups")]
fn list_backups_py(source_path: String, backup_folder: String) -> PyResult<Vec<String>> {
    let l_paths =
        meskit_io_fs::list_backups(source_path, backup_folder).map_err(map_backup_error)?;
    Ok(l_paths
        .iter()
        .map(|path| path.to_string_lossy().to_string())
        .collect())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ExcelEditor

#[pyclass(name = "ExcelEditor")]
struct PyExcelEditor {
    inner: RsExcelEditor,
}

#[pymethods]
impl PyExcelEditor {
    #[new]
    #[pyo3(signature = (filename, sheet_name = None, auto_save = true))]
    fn new(filename: String, sheet_name: Option<String>, auto_save: bool) -> PyResult<Self> {
        let options = SpecExcelEditorOptions {
            sheet_name,
            if_auto_save: auto_save,
        };
        let inner = RsExcelEditor::open(filename, options).map_err(map_xlsx_edit_error)?;
        Ok(Self { inner })
    }

    #[getter]
    fn filename(&self) -> String {
        self.inner.file_path().to_string_lossy().to_string()
    }

    #[getter]
    fn sheet_name(&self) -> String {
        self.inner.sheet_name().to_string()
    }

    #[getter]
    fn sheetnames(&self) -> Vec<String> {
        self.inner.sheet_names()
    }

    #[getter]
    fn max_row(&self) -> usize {
        self.inner.max_row()
    }

    #[getter]
    fn max_column(&self) -> usize {
        self.inner.max_column()
    }

    fn fill_first_row(&mut self, row: Vec<Bound<'_, PyAny>>) -> PyResult<()> {
        let l_values = parse_cell_values(&row)?;
        self.inner
            .fill_first_row(l_values)
            .map_err(map_xlsx_edit_error)
    }

    fn add_new_row(&mut self, row: Vec<Bound<'_, PyAny>>) -> PyResult<usize> {
        let l_values = parse_cell_values(&row)?;
        self.inner.add_new_row(l_values).map_err(map_xlsx_edit_error)
    }

    #[pyo3(signature = (row_index, title, data, cover = true))]
    fn fill_block(
        &mut self,
        row_index: usize,
        title: &Bound<'_, PyAny>,
        data: &Bound<'_, PyAny>,
        cover: bool,
    ) -> PyResult<()> {
        let title = parse_cell_value(title)?;
        let data = parse_cell_value(data)?;
        let res = if cover {
            self.inner.fill_block(row_index, title, data)
        } else {
            self.inner.append_block(row_index, title, data)
        };
        res.map_err(map_xlsx_edit_error)
    }

    fn read_block(
        &self,
        py: Python<'_>,
        row_index: usize,
        title: &Bound<'_, PyAny>,
    ) -> PyResult<PyObject> {
        let value = self
            .inner
            .read_block(row_index, parse_cell_value(title)?)
            .map_err(map_xlsx_edit_error)?;
        derive_py_cell_value(py, &value)
    }

    fn read_row(&self, py: Python<'_>, row_index: usize) -> PyResult<Vec<PyObject>> {
        self.inner
            .read_row(row_index)
            .iter()
            .map(|value| derive_py_cell_value(py, value))
            .collect()
    }

    fn find_row_index(&self, values: Vec<Bound<'_, PyAny>>) -> PyResult<Option<usize>> {
        let l_values = parse_cell_values(&values)?;
        Ok(self.inner.find_row_index(&l_values))
    }

    fn create_new_sheet(&mut self, sheet_name: &str) -> PyResult<bool> {
        self.inner
            .create_new_sheet(sheet_name)
            .map_err(map_xlsx_edit_error)
    }

    fn select_sheet(&mut self, sheet_name: &str) -> PyResult<()> {
        self.inner
            .select_sheet(sheet_name)
            .map_err(map_xlsx_edit_error)
    }

    fn rename_sheet(&mut self, new_name: &str) -> PyResult<()> {
        self.inner
            .rename_sheet(new_name)
            .map_err(map_xlsx_edit_error)
    }

    fn delete_sheet(&mut self, sheet_name: &str) -> PyResult<bool> {
        self.inner
            .delete_sheet(sheet_name)
            .map_err(map_xlsx_edit_error)
    }

    fn save(&mut self) -> PyResult<()> {
        self.inner.save().map_err(map_xlsx_edit_error)
    }

    #[pyo3(signature = (backup_folder, max_backups = N_BACKUPS_MAX_DEFAULT))]
    fn backup(&mut self, backup_folder: String, max_backups: usize) -> PyResult<PyReportBackup> {
        let options = SpecBackupOptions::with_max_backups(max_backups);
        let report = self
            .inner
            .backup(backup_folder, &options)
            .map_err(map_xlsx_edit_error)?;
        Ok(PyReportBackup::from(report))
    }

    fn __enter__(slf: PyRefMut<'_, Self>) -> PyRefMut<'_, Self> {
        slf
    }

    #[pyo3(signature = (_exc_type=None, _exc=None, _tb=None))]
    fn __exit__(
        &mut self,
        _exc_type: Option<&Bound<'_, PyAny>>,
        _exc: Option<&Bound<'_, PyAny>>,
        _tb: Option<&Bound<'_, PyAny>>,
    ) -> PyResult<()> {
        if self.inner.is_dirty() {
            self.save()?;
        }
        Ok(())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region JsonEditor

#[pyclass(name = "JsonEditor")]
struct PyJsonEditor {
    inner: RsJsonEditor,
}

#[pymethods]
impl PyJsonEditor {
    #[new]
    #[pyo3(signature = (filename, auto_save = true))]
    fn new(filename: String, auto_save: bool) -> PyResult<Self> {
        let options = SpecJsonEditorOptions {
            if_auto_save: auto_save,
        };
        let inner = RsJsonEditor::open(filename, options).map_err(map_json_edit_error)?;
        Ok(Self { inner })
    }

    #[getter]
    fn filename(&self) -> String {
        self.inner.file_path().to_string_lossy().to_string()
    }

    #[pyo3(signature = (key, value = EnumJsonArg::Omitted))]
    fn add_new_key(&mut self, key: &str, value: EnumJsonArg) -> PyResult<()> {
        let res = match value {
            EnumJsonArg::Given(val) => self.inner.add_new_key(key, val),
            EnumJsonArg::Omitted => self.inner.add_empty_key(key),
        };
        res.map_err(map_json_edit_error)
    }

    #[pyo3(signature = (key, value, cover = true))]
    fn update_key(
        &mut self,
        py: Python<'_>,
        key: &str,
        value: &Bound<'_, PyAny>,
        cover: bool,
    ) -> PyResult<()> {
        let value = parse_json_value(py, value)?;
        let res = if cover {
            self.inner.update_key(key, value)
        } else {
            self.inner.append_key(key, value)
        };
        res.map_err(map_json_edit_error)
    }

    fn remove_key(&mut self, py: Python<'_>, key: &str) -> PyResult<PyObject> {
        match self.inner.remove_key(key).map_err(map_json_edit_error)? {
            Some(value) => derive_py_json_value(py, &value),
            None => Err(PyKeyError::new_err(key.to_string())),
        }
    }

    fn all_keys(&self) -> Vec<String> {
        self.inner.all_keys()
    }

    fn get(&self, py: Python<'_>, key: &str) -> PyResult<PyObject> {
        match self.inner.get(key) {
            Some(value) => derive_py_json_value(py, value),
            None => Err(PyKeyError::new_err(key.to_string())),
        }
    }

    fn read(&self, py: Python<'_>) -> PyResult<PyObject> {
        derive_py_json_value(py, &Value::Object(self.inner.read().clone()))
    }

    fn save(&mut self) -> PyResult<()> {
        self.inner.save().map_err(map_json_edit_error)
    }

    #[pyo3(signature = (backup_folder, max_backups = N_BACKUPS_MAX_DEFAULT))]
    fn backup(&mut self, backup_folder: String, max_backups: usize) -> PyResult<PyReportBackup> {
        let options = SpecBackupOptions::with_max_backups(max_backups);
        let report = self
            .inner
            .backup(backup_folder, &options)
            .map_err(map_json_edit_error)?;
        Ok(PyReportBackup::from(report))
    }

    fn __enter__(slf: PyRefMut<'_, Self>) -> PyRefMut<'_, Self> {
        slf
    }

    #[pyo3(signature = (_exc_type=None, _exc=None, _tb=None))]
    fn __exit__(
        &mut self,
        _exc_type: Option<&Bound<'_, PyAny>>,
        _exc: Option<&Bound<'_, PyAny>>,
        _tb: Option<&Bound<'_, PyAny>>,
    ) -> PyResult<()> {
        if self.inner.is_dirty() {
            self.save()?;
        }
        Ok(())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region JsonFileAndText

#[pyclass(name = "JsonFile")]
struct PyJsonFile {
    inner: RsJsonFile,
}

#[pymethods]
impl PyJsonFile {
    #[new]
    fn new(file_path: String) -> Self {
        Self {
            inner: RsJsonFile::new(file_path),
        }
    }

    #[getter]
    fn file_path(&self) -> String {
        self.inner.file_path().to_string_lossy().to_string()
    }

    #[pyo3(signature = (list_name = None))]
    fn read(&self, py: Python<'_>, list_name: Option<&str>) -> PyResult<PyObject> {
        let value = self.inner.read(list_name).map_err(map_json_edit_error)?;
        derive_py_json_value(py, &value)
    }

    #[pyo3(signature = (data, list_name = None))]
    fn write(
        &self,
        py: Python<'_>,
        data: &Bound<'_, PyAny>,
        list_name: Option<&str>,
    ) -> PyResult<()> {
        let value = parse_json_value(py, data)?;
        self.inner
            .write(value, list_name)
            .map_err(map_json_edit_error)
    }
}

#[pyfunction(name = "allarr")]
fn allarr_py<'py>(py: Python<'py>, string: &str) -> PyResult<Vec<Bound<'py, PyTuple>>> {
    meskit_text::allarr(string)
        .into_iter()
        .map(|l_chars| PyTuple::new(py, l_chars))
        .collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[pymodule]
fn _meskit_rs(module: &Bound<'_, PyModule>) -> PyResult<()> {
    module.add_class::<PyReportBackup>()?;
    module.add_class::<PyExcelEditor>()?;
    module.add_class::<PyJsonEditor>()?;
    module.add_class::<PyJsonFile>()?;
    module.add_function(wrap_pyfunction!(backup_file_py, module)?)?;
    module.add_function(wrap_pyfunction!(list_backups_py, module)?)?;
    module.add_function(wrap_pyfunction!(allarr_py, module)?)?;
    module.add("__bridge_abi__", N_BRIDGE_ABI_VERSION)?;
    module.add("__bridge_contract__", C_BRIDGE_CONTRACT_VERSION)?;
    module.add("__bridge_transport__", C_BRIDGE_TRANSPORT)?;
    Ok(())
}
