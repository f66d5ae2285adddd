//! Stateful keyed-document editor bound to one JSON file.

use std::path::{Path, PathBuf};

use meskit_io_fs::{ReportBackup, SpecBackupOptions, backup_file};
use serde_json::{Map, Value};

use crate::conf::{C_JSON_EMPTY_DOCUMENT, C_JSON_NEW_KEY_DEFAULT};
use crate::spec::{JsonEditError, SpecJsonEditorOptions};
use crate::util::{
    derive_appended_json_value, derive_document, derive_json_pretty_bytes, load_json_value,
    save_json_bytes,
};

/// Flat key → value document editor with auto-create and (by default)
/// save-on-every-mutation.
#[derive(Debug)]
pub struct JsonEditor {
    path_file: PathBuf,
    data: Map<String, Value>,
    if_auto_save: bool,
    if_dirty: bool,
}

impl JsonEditor {
    /// Open `path_file`, creating it as `{}` when absent.
    pub fn open<P: AsRef<Path>>(
        path_file: P,
        options: SpecJsonEditorOptions,
    ) -> Result<Self, JsonEditError> {
        let path_file = path_file.as_ref().to_path_buf();
        if !path_file.exists() {
            log::info!("Auto create json file: {}", path_file.display());
            save_json_bytes(&path_file, C_JSON_EMPTY_DOCUMENT.as_bytes())?;
        }

        let data = derive_document(load_json_value(&path_file)?, &path_file)?;
        Ok(Self {
            path_file,
            data,
            if_auto_save: options.if_auto_save,
            if_dirty: false,
        })
    }

    /// Open with default options.
    pub fn open_default<P: AsRef<Path>>(path_file: P) -> Result<Self, JsonEditError> {
        Self::open(path_file, SpecJsonEditorOptions::default())
    }

    /// Bound file path.
    pub fn file_path(&self) -> &Path {
        &self.path_file
    }

    /// Whether in-memory changes have not been written yet.
    pub fn is_dirty(&self) -> bool {
        self.if_dirty
    }

    /// Insert `key`, silently replacing any existing value.
    pub fn add_new_key<V: Into<Value>>(
        &mut self,
        key: &str,
        value: V,
    ) -> Result<(), JsonEditError> {
        self.data.insert(key.to_string(), value.into());
        self.commit()
    }

    /// Insert `key` holding the empty string.
    pub fn add_empty_key(&mut self, key: &str) -> Result<(), JsonEditError> {
        self.add_new_key(key, C_JSON_NEW_KEY_DEFAULT)
    }

    /// Set `key` to `value`, adding it when absent.
    pub fn update_key<V: Into<Value>>(&mut self, key: &str, value: V) -> Result<(), JsonEditError> {
        self.add_new_key(key, value)
    }

    /// Append `value` to the value under `key`, adding it when absent.
    ///
    /// Strings concatenate, arrays extend and numbers add; other pairings fail
    /// with [`JsonEditError::TypeMismatch`] and leave the document unchanged.
    pub fn append_key<V: Into<Value>>(&mut self, key: &str, value: V) -> Result<(), JsonEditError> {
        let value = value.into();
        let value = match self.data.get(key) {
            Some(existing) => derive_appended_json_value(existing, &value)?,
            None => value,
        };
        self.add_new_key(key, value)
    }

    /// Remove `key`; returns the old value.
    pub fn remove_key(&mut self, key: &str) -> Result<Option<Value>, JsonEditError> {
        let value = self.data.shift_remove(key);
        if value.is_some() {
            self.commit()?;
        }
        Ok(value)
    }

    /// All keys, in document order.
    pub fn all_keys(&self) -> Vec<String> {
        self.data.keys().cloned().collect()
    }

    /// Value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// The whole in-memory mapping (last loaded or written state).
    pub fn read(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Write the whole document to disk, 4-space indented.
    pub fn save(&mut self) -> Result<(), JsonEditError> {
        let v_bytes = derive_json_pretty_bytes(&self.data)?;
        save_json_bytes(&self.path_file, &v_bytes)?;
        log::debug!(
            "Document saved: {} ({} keys)",
            self.path_file.display(),
            self.data.len()
        );
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
    ) -> Result<ReportBackup, JsonEditError> {
        if self.if_dirty {
            self.save()?;
        }
        Ok(backup_file(&self.path_file, dir_backup, options)?)
    }

    fn commit(&mut self) -> Result<(), JsonEditError> {
        self.if_dirty = true;
        if self.if_auto_save {
            self.save()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use meskit_io_fs::SpecBackupOptions;
    use serde_json::{Value, json};

    use super::JsonEditor;
    use crate::spec::{JsonEditError, SpecJsonEditorOptions};

    #[test]
    fn open_auto_creates_empty_object() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path_file = tmp.path().join("doc.json");

        let editor = JsonEditor::open_default(&path_file).expect("open");
        assert!(editor.read().is_empty());
        let value: Value =
            serde_json::from_str(&fs::read_to_string(&path_file).expect("read")).expect("parse");
        assert_eq!(value, json!({}));
    }

    #[test]
    fn open_reads_legacy_string_document_as_empty() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path_file = tmp.path().join("doc.json");
        fs::write(&path_file, "\"{}\"").expect("write legacy");

        let mut editor = JsonEditor::open_default(&path_file).expect("open");
        assert!(editor.all_keys().is_empty());

        editor.add_new_key("k", "v").expect("add");
        let value: Value =
            serde_json::from_str(&fs::read_to_string(&path_file).expect("read")).expect("parse");
        assert_eq!(value, json!({"k": "v"}));
    }

    #[test]
    fn open_rejects_non_object_document() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path_file = tmp.path().join("doc.json");
        fs::write(&path_file, "[1, 2]").expect("write");

        let err = JsonEditor::open_default(&path_file).expect_err("must fail");
        assert!(matches!(err, JsonEditError::NotAnObject { found: "array", .. }));
    }

    #[test]
    fn update_modes_cover_and_append() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let mut editor = JsonEditor::open_default(tmp.path().join("doc.json")).expect("open");

        editor.update_key("k", "a").expect("set");
        editor.append_key("k", "b").expect("append");
        assert_eq!(editor.get("k"), Some(&json!("ab")));

        editor.update_key("k", "b").expect("cover");
        assert_eq!(editor.get("k"), Some(&json!("b")));

        editor.append_key("fresh", json!([1])).expect("append absent");
        editor.append_key("fresh", json!([2])).expect("append list");
        assert_eq!(editor.get("fresh"), Some(&json!([1, 2])));

        let err = editor.append_key("k", 1).expect_err("mismatch");
        assert!(matches!(err, JsonEditError::TypeMismatch { .. }));
        assert_eq!(editor.get("k"), Some(&json!("b")));
    }

    #[test]
    fn add_new_key_overwrites_and_keeps_order() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let mut editor = JsonEditor::open_default(tmp.path().join("doc.json")).expect("open");

        editor.add_new_key("b", "").expect("add");
        editor.add_new_key("a", json!({"nested": true})).expect("add");
        editor.add_new_key("b", 2).expect("overwrite");

        assert_eq!(editor.all_keys(), vec!["b".to_string(), "a".to_string()]);
        assert_eq!(editor.get("b"), Some(&json!(2)));
    }

    #[test]
    fn add_empty_key_differs_from_explicit_null() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let mut editor = JsonEditor::open_default(tmp.path().join("doc.json")).expect("open");

        editor.add_empty_key("blank").expect("add default");
        editor.add_new_key("nothing", Value::Null).expect("add null");

        assert_eq!(editor.get("blank"), Some(&json!("")));
        assert_eq!(editor.get("nothing"), Some(&Value::Null));
    }

    #[test]
    fn big_integers_survive_unrelated_edits() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path_file = tmp.path().join("doc.json");
        fs::write(&path_file, r#"{"big": 1180591620717411303424}"#).expect("seed");

        let mut editor = JsonEditor::open_default(&path_file).expect("open");
        editor.add_new_key("other", 1).expect("add");

        let txt = fs::read_to_string(&path_file).expect("read");
        assert!(txt.contains("\"big\": 1180591620717411303424"), "{txt}");
        assert!(txt.contains("\"other\": 1"), "{txt}");
    }

    #[test]
    fn reopen_reproduces_in_memory_mapping() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path_file = tmp.path().join("doc.json");

        let mut editor = JsonEditor::open_default(&path_file).expect("open");
        editor.add_new_key("name", "line-3").expect("add");
        editor.add_new_key("count", 7).expect("add");
        editor.append_key("count", 1.5).expect("append");
        editor.add_new_key("tags", json!(["a", null])).expect("add");
        assert_eq!(editor.remove_key("name").expect("remove"), Some(json!("line-3")));
        assert_eq!(editor.remove_key("name").expect("remove again"), None);

        let reopened = JsonEditor::open_default(&path_file).expect("reopen");
        assert_eq!(reopened.read(), editor.read());
        assert!(fs::read_to_string(&path_file).expect("read").contains("\n    \"count\""));
    }

    #[test]
    fn manual_save_and_backup() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path_file = tmp.path().join("doc.json");
        let options = SpecJsonEditorOptions {
            if_auto_save: false,
        };

        let mut editor = JsonEditor::open(&path_file, options).expect("open");
        editor.add_new_key("k", "v").expect("add");
        assert!(editor.is_dirty());
        assert!(JsonEditor::open_default(&path_file).expect("peek").read().is_empty());

        let report = editor
            .backup(tmp.path().join("bak"), &SpecBackupOptions::with_max_backups(1))
            .expect("backup");
        assert!(!editor.is_dirty());
        let value: Value = serde_json::from_str(
            &fs::read_to_string(&report.path_backup).expect("read backup"),
        )
        .expect("parse");
        assert_eq!(value, json!({"k": "v"}));
    }
}
