//! Timestamped backup copies with retention pruning.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};

use crate::conf::C_BACKUP_TIMESTAMP_FORMAT;
use crate::report::ReportBackup;
use crate::spec::{BackupError, SpecBackupOptions};
use crate::util::{SpecBackupNamePattern, copy_file_with_metadata, split_file_name};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct SpecBackupEntry {
    timestamp: String,
    n_seq: u64,
    path_file: PathBuf,
}

/// Copy `file_source` into `dir_backup` and prune the oldest copies.
///
/// The copy is named `<stem>_backup_<YYYYMMDD_HHMMSS>.<ext>` using the local
/// clock. A second backup within the same second gets `_1`, `_2`, ... appended
/// to the timestamp instead of overwriting the earlier copy.
///
/// After copying, the backup set of this source (only names matching the
/// convention above, same stem and extension) is ordered oldest first and
/// trimmed until at most `options.max_backups` copies remain.
pub fn backup_file<P, Q>(
    file_source: P,
    dir_backup: Q,
    options: &SpecBackupOptions,
) -> Result<ReportBackup, BackupError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    backup_file_with_timestamp(file_source, dir_backup, options, Local::now().naive_local())
}

/// Same as [`backup_file`] with an explicit clock reading.
pub fn backup_file_with_timestamp<P, Q>(
    file_source: P,
    dir_backup: Q,
    options: &SpecBackupOptions,
    dt_now: NaiveDateTime,
) -> Result<ReportBackup, BackupError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    if options.max_backups == 0 {
        return Err(BackupError::InvalidRetention(options.max_backups));
    }

    let path_file_src = file_source.as_ref();
    let path_dir_bak = dir_backup.as_ref();
    if !path_file_src.is_file() {
        return Err(BackupError::SourceNotFile(path_file_src.to_path_buf()));
    }
    let spec_pattern = derive_name_pattern(path_file_src)?;

    fs::create_dir_all(path_dir_bak).map_err(|e| BackupError::io(path_dir_bak, e))?;

    let c_timestamp = dt_now.format(C_BACKUP_TIMESTAMP_FORMAT).to_string();
    let l_entries = collect_backup_entries(path_dir_bak, &spec_pattern)?;
    let n_seq = l_entries
        .iter()
        .filter(|entry| entry.timestamp == c_timestamp)
        .map(|entry| entry.n_seq + 1)
        .max()
        .unwrap_or(0);

    let path_backup = path_dir_bak.join(spec_pattern.render(&c_timestamp, n_seq));
    copy_file_with_metadata(path_file_src, &path_backup, options.if_preserve_metadata)
        .map_err(|e| BackupError::io(&path_backup, e))?;
    log::info!(
        "Backup created: {} -> {}",
        path_file_src.display(),
        path_backup.display()
    );

    let mut l_entries = collect_backup_entries(path_dir_bak, &spec_pattern)?;
    let mut paths_pruned = Vec::new();
    while l_entries.len() > options.max_backups {
        let entry = l_entries.remove(0);
        fs::remove_file(&entry.path_file).map_err(|e| BackupError::io(&entry.path_file, e))?;
        log::debug!("Backup pruned: {}", entry.path_file.display());
        paths_pruned.push(entry.path_file);
    }

    Ok(ReportBackup {
        path_backup,
        paths_pruned,
        cnt_retained: l_entries.len(),
    })
}

/// List the backup set of `file_source` inside `dir_backup`, oldest first.
///
/// A missing backup folder yields an empty list.
pub fn list_backups<P, Q>(file_source: P, dir_backup: Q) -> Result<Vec<PathBuf>, BackupError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let path_dir_bak = dir_backup.as_ref();
    if !path_dir_bak.is_dir() {
        return Ok(Vec::new());
    }
    let spec_pattern = derive_name_pattern(file_source.as_ref())?;
    let l_entries = collect_backup_entries(path_dir_bak, &spec_pattern)?;
    Ok(l_entries.into_iter().map(|entry| entry.path_file).collect())
}

fn derive_name_pattern(path_file_src: &Path) -> Result<SpecBackupNamePattern, BackupError> {
    let name_file = path_file_src
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| BackupError::SourceNameInvalid(path_file_src.to_path_buf()))?;
    let (stem, ext) = split_file_name(name_file);
    Ok(SpecBackupNamePattern::new(stem, ext)?)
}

fn collect_backup_entries(
    path_dir_bak: &Path,
    spec_pattern: &SpecBackupNamePattern,
) -> Result<Vec<SpecBackupEntry>, BackupError> {
    let iter_dir = fs::read_dir(path_dir_bak).map_err(|e| BackupError::io(path_dir_bak, e))?;

    let mut l_entries = Vec::new();
    for entry in iter_dir {
        let entry = entry.map_err(|e| BackupError::io(path_dir_bak, e))?;
        let Some(name_file) = entry.file_name().to_str().map(ToString::to_string) else {
            continue;
        };
        let Some((timestamp, n_seq)) = spec_pattern.parse(&name_file) else {
            continue;
        };
        if !entry.path().is_file() {
            continue;
        }
        l_entries.push(SpecBackupEntry {
            timestamp,
            n_seq,
            path_file: entry.path(),
        });
    }
    l_entries.sort();
    Ok(l_entries)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use proptest::prelude::*;

    use super::{backup_file, backup_file_with_timestamp, list_backups};
    use crate::spec::{BackupError, SpecBackupOptions};

    fn dt(n_secs: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|d| d.and_hms_opt(9, 0, 0))
            .expect("valid date")
            + Duration::seconds(n_secs)
    }

    fn write_text(path: &Path, txt: &str) {
        fs::write(path, txt).expect("write text");
    }

    fn list_names(dir: &Path) -> Vec<String> {
        let mut l_names: Vec<String> = fs::read_dir(dir)
            .expect("read_dir")
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        l_names.sort();
        l_names
    }

    #[test]
    fn backup_file_creates_folder_and_timestamped_copy() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let src = tmp.path().join("data.xlsx");
        let dir_bak = tmp.path().join("bak").join("nested");
        write_text(&src, "payload");

        let options = SpecBackupOptions::default();
        let report =
            backup_file_with_timestamp(&src, &dir_bak, &options, dt(0)).expect("backup");

        assert_eq!(
            report.path_backup,
            dir_bak.join("data_backup_20240301_090000.xlsx")
        );
        assert_eq!(fs::read_to_string(&report.path_backup).expect("read"), "payload");
        assert!(report.paths_pruned.is_empty());
        assert_eq!(report.cnt_retained, 1);
    }

    #[test]
    fn backup_file_prunes_oldest_beyond_retention() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let src = tmp.path().join("data.xlsx");
        let dir_bak = tmp.path().join("bak");
        write_text(&src, "v");
        let options = SpecBackupOptions::with_max_backups(2);

        for n_secs in 0..4 {
            backup_file_with_timestamp(&src, &dir_bak, &options, dt(n_secs)).expect("backup");
        }

        assert_eq!(
            list_names(&dir_bak),
            vec![
                "data_backup_20240301_090002.xlsx".to_string(),
                "data_backup_20240301_090003.xlsx".to_string(),
            ]
        );
    }

    #[test]
    fn backup_file_same_second_gets_sequence_suffix() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let src = tmp.path().join("data.json");
        let dir_bak = tmp.path().join("bak");
        let options = SpecBackupOptions::with_max_backups(3);

        write_text(&src, "one");
        backup_file_with_timestamp(&src, &dir_bak, &options, dt(0)).expect("backup 1");
        write_text(&src, "two");
        let report = backup_file_with_timestamp(&src, &dir_bak, &options, dt(0)).expect("backup 2");

        assert_eq!(
            report.path_backup,
            dir_bak.join("data_backup_20240301_090000_1.json")
        );
        let l_paths = list_backups(&src, &dir_bak).expect("list");
        assert_eq!(l_paths.len(), 2);
        assert_eq!(fs::read_to_string(&l_paths[0]).expect("read"), "one");
        assert_eq!(fs::read_to_string(&l_paths[1]).expect("read"), "two");
    }

    #[test]
    fn backup_file_orders_sequence_numerically() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let src = tmp.path().join("data.json");
        let dir_bak = tmp.path().join("bak");
        write_text(&src, "v");
        let options = SpecBackupOptions::with_max_backups(3);

        for _ in 0..12 {
            backup_file_with_timestamp(&src, &dir_bak, &options, dt(0)).expect("backup");
        }

        assert_eq!(
            list_names(&dir_bak),
            vec![
                "data_backup_20240301_090000_10.json".to_string(),
                "data_backup_20240301_090000_11.json".to_string(),
                "data_backup_20240301_090000_9.json".to_string(),
            ]
        );
    }

    #[test]
    fn backup_file_leaves_foreign_files_alone() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let src_xlsx = tmp.path().join("data.xlsx");
        let src_json = tmp.path().join("data.json");
        let dir_bak = tmp.path().join("bak");
        fs::create_dir_all(&dir_bak).expect("mkdir");
        write_text(&src_xlsx, "x");
        write_text(&src_json, "j");
        write_text(&dir_bak.join("data_backup_notes.txt"), "keep me");
        let options = SpecBackupOptions::with_max_backups(1);

        backup_file_with_timestamp(&src_json, &dir_bak, &options, dt(0)).expect("json");
        backup_file_with_timestamp(&src_xlsx, &dir_bak, &options, dt(1)).expect("xlsx 1");
        backup_file_with_timestamp(&src_xlsx, &dir_bak, &options, dt(2)).expect("xlsx 2");

        assert_eq!(
            list_names(&dir_bak),
            vec![
                "data_backup_20240301_090000.json".to_string(),
                "data_backup_20240301_090002.xlsx".to_string(),
                "data_backup_notes.txt".to_string(),
            ]
        );
    }

    #[test]
    fn backup_file_rejects_zero_retention() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let src = tmp.path().join("data.xlsx");
        write_text(&src, "v");

        let err = backup_file(&src, tmp.path().join("bak"), &SpecBackupOptions::with_max_backups(0))
            .expect_err("must fail");
        assert!(matches!(err, BackupError::InvalidRetention(0)));
        assert!(!tmp.path().join("bak").exists());
    }

    #[test]
    fn backup_file_missing_source_fails() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let err = backup_file(
            tmp.path().join("absent.xlsx"),
            tmp.path().join("bak"),
            &SpecBackupOptions::default(),
        )
        .expect_err("must fail");
        assert!(matches!(err, BackupError::SourceNotFile(_)));
    }

    #[test]
    fn list_backups_missing_folder_is_empty() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let l_paths = list_backups(tmp.path().join("data.xlsx"), tmp.path().join("nope"))
            .expect("list");
        assert!(l_paths.is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn backup_retention_keeps_most_recent(
            l_offsets in proptest::collection::vec(0i64..3, 1..10),
            max_backups in 1usize..5,
        ) {
            let tmp = tempfile::tempdir().expect("tempdir");
            let src = tmp.path().join("data.xlsx");
            let dir_bak = tmp.path().join("bak");
            let options = SpecBackupOptions::with_max_backups(max_backups);

            let mut n_secs = 0;
            let mut l_created = Vec::new();
            for (idx, n_offset) in l_offsets.iter().enumerate() {
                n_secs += n_offset;
                write_text(&src, &idx.to_string());
                let report = backup_file_with_timestamp(&src, &dir_bak, &options, dt(n_secs))
                    .expect("backup");
                l_created.push(report.path_backup);
            }

            let l_paths = list_backups(&src, &dir_bak).expect("list");
            let n_expected = l_offsets.len().min(max_backups);
            prop_assert_eq!(l_paths.len(), n_expected);
            prop_assert_eq!(&l_paths[..], &l_created[l_created.len() - n_expected..]);
        }
    }
}
