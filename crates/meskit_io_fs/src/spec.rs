//! Backup options and top-level error type.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::conf::N_BACKUPS_MAX_DEFAULT;

////////////////////////////////////////////////////////////////////////////////
// #region Options

/// Input options for `backup_file`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecBackupOptions {
    /// Maximum number of copies kept for one source file. Must be >= 1.
    pub max_backups: usize,
    /// Carry permissions, timestamps and extended attributes over to the copy.
    pub if_preserve_metadata: bool,
}

impl Default for SpecBackupOptions {
    fn default() -> Self {
        Self {
            max_backups: N_BACKUPS_MAX_DEFAULT,
            if_preserve_metadata: true,
        }
    }
}

impl SpecBackupOptions {
    /// Default options with a custom retention count.
    pub fn with_max_backups(max_backups: usize) -> Self {
        Self {
            max_backups,
            ..Self::default()
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Backup call failures. Nothing is retried.
#[derive(Debug, Error)]
pub enum BackupError {
    /// Retention count of zero would delete the copy just made.
    #[error("Arg `max_backups` must be >= 1, got {0}.")]
    InvalidRetention(usize),
    /// Source path missing or not a regular file.
    #[error("Source is not a file: {}", .0.display())]
    SourceNotFile(PathBuf),
    /// Source path has no usable UTF-8 file name.
    #[error("Source file name is not valid UTF-8: {}", .0.display())]
    SourceNameInvalid(PathBuf),
    /// Filesystem failure on mkdir/copy/list/delete.
    #[error("I/O failure at {}: {source}", path.display())]
    Io {
        /// Path the failing operation touched.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// Backup-name matcher could not be compiled.
    #[error("Invalid backup name pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

impl BackupError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
