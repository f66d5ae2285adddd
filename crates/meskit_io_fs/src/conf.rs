//! Backup naming constants.

/// Literal placed between the source stem and the timestamp.
pub const C_BACKUP_INFIX: &str = "_backup_";
/// `chrono` format of the backup timestamp (second precision, sorts lexically).
pub const C_BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
/// Retention count used when the caller does not pass one.
pub const N_BACKUPS_MAX_DEFAULT: usize = 5;
/// Suffix of the sibling file used by atomic writes.
pub const C_TMP_SUFFIX: &str = ".tmp";
