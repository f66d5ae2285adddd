//! Editor options and errors.

use std::io;
use std::path::PathBuf;

use meskit_io_fs::BackupError;
use thiserror::Error;

/// Options for [`crate::editor::JsonEditor::open`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecJsonEditorOptions {
    /// Persist the document after every mutating call.
    pub if_auto_save: bool,
}

impl Default for SpecJsonEditorOptions {
    fn default() -> Self {
        Self { if_auto_save: true }
    }
}

/// JSON document failures.
#[derive(Debug, Error)]
pub enum JsonEditError {
    /// Requested top-level key is absent.
    #[error("Key '{0}' not found.")]
    KeyNotFound(String),
    /// Top-level value is not an object.
    #[error("Document {} must hold a JSON object, found {found}.", path.display())]
    NotAnObject {
        /// Offending file.
        path: PathBuf,
        /// JSON type found at the top level.
        found: &'static str,
    },
    /// Append on values that cannot be concatenated or added.
    #[error("Cannot append {data} to {existing} value.")]
    TypeMismatch {
        /// Type of the value already stored.
        existing: &'static str,
        /// Type of the appended value.
        data: &'static str,
    },
    /// File content is not valid JSON.
    #[error("Invalid JSON in {}: {source}", path.display())]
    Parse {
        /// Offending file.
        path: PathBuf,
        /// Parser error.
        #[source]
        source: serde_json::Error,
    },
    /// Document could not be serialized.
    #[error("JSON write error: {0}")]
    Serialize(#[source] serde_json::Error),
    /// Filesystem failure on read/write.
    #[error("I/O failure at {}: {source}", path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// Backup copy or pruning failed.
    #[error(transparent)]
    Backup(#[from] BackupError),
}

impl JsonEditError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
