//! `meskit_io_fs` v1:
//! Filesystem helpers shared by the editors.
//!
//! Modules:
//! - `backup` : timestamped backup copies and retention pruning
//! - `conf`   : naming constants and default presets
//! - `spec`   : options/errors
//! - `report` : per-call backup report
//! - `util`   : copy/write helpers

pub mod backup;
pub mod conf;
pub mod report;
pub mod spec;
mod util;

pub use backup::{backup_file, backup_file_with_timestamp, list_backups};
pub use conf::{C_BACKUP_INFIX, C_BACKUP_TIMESTAMP_FORMAT, N_BACKUPS_MAX_DEFAULT};
pub use report::ReportBackup;
pub use spec::{BackupError, SpecBackupOptions};
pub use util::write_file_atomic;
