//! Minimal read/write helpers for JSON files without an editor session.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::spec::JsonEditError;
use crate::util::{derive_document, derive_json_type_name, load_json_value, save_json_bytes};

/// Handle to a JSON file; every call reads or rewrites the file directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFile {
    path_file: PathBuf,
}

impl JsonFile {
    pub fn new<P: AsRef<Path>>(path_file: P) -> Self {
        Self {
            path_file: path_file.as_ref().to_path_buf(),
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.path_file
    }

    /// Whole document, or only the top-level entry `list_name`.
    pub fn read(&self, list_name: Option<&str>) -> Result<Value, JsonEditError> {
        let value = load_json_value(&self.path_file)?;
        let Some(name) = list_name else {
            return Ok(value);
        };
        let mut map = match value {
            Value::Object(map) => map,
            other => {
                return Err(JsonEditError::NotAnObject {
                    path: self.path_file.clone(),
                    found: derive_json_type_name(&other),
                });
            }
        };
        map.remove(name)
            .ok_or_else(|| JsonEditError::KeyNotFound(name.to_string()))
    }

    /// Replace the whole document, or only the top-level entry `list_name`.
    ///
    /// With `list_name`, a missing file starts from an empty object.
    pub fn write(&self, data: Value, list_name: Option<&str>) -> Result<(), JsonEditError> {
        let value = match list_name {
            None => data,
            Some(name) => {
                let mut map = if self.path_file.exists() {
                    derive_document(load_json_value(&self.path_file)?, &self.path_file)?
                } else {
                    Map::new()
                };
                map.insert(name.to_string(), data);
                Value::Object(map)
            }
        };
        let v_bytes = serde_json::to_vec(&value).map_err(JsonEditError::Serialize)?;
        save_json_bytes(&self.path_file, &v_bytes)
    }
}
