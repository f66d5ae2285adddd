//! Backup report model.

use std::fmt;
use std::path::PathBuf;

/// Outcome of one `backup_file` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportBackup {
    /// Copy created by this call.
    pub path_backup: PathBuf,
    /// Older copies deleted to honor the retention count, oldest first.
    pub paths_pruned: Vec<PathBuf>,
    /// Copies left in the backup set after pruning.
    pub cnt_retained: usize,
}

impl ReportBackup {
    /// Number of deleted copies.
    pub fn pruned_count(&self) -> usize {
        self.paths_pruned.len()
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} created={} pruned={} retained={}",
            self.path_backup.display(),
            self.pruned_count(),
            self.cnt_retained
        )
    }
}

impl fmt::Display for ReportBackup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[BACKUP]"))
    }
}
