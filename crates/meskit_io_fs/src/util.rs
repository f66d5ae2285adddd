use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::conf::{C_BACKUP_INFIX, C_TMP_SUFFIX};

////////////////////////////////////////////////////////////////////////////////
// #region BackupNaming

/// Split a file name into `(stem, ".ext")`; the extension part is empty when
/// the name has none. Leading-dot names (`.env`) count as a bare stem.
pub(crate) fn split_file_name(name_file: &str) -> (&str, &str) {
    match name_file.rfind('.') {
        Some(idx) if idx > 0 => (&name_file[..idx], &name_file[idx..]),
        _ => (name_file, ""),
    }
}

/// Compiled matcher for `<stem>_backup_<YYYYMMDD_HHMMSS>[_<n>]<.ext>`.
#[derive(Debug, Clone)]
pub(crate) struct SpecBackupNamePattern {
    stem: String,
    ext: String,
    regex: Regex,
}

impl SpecBackupNamePattern {
    pub(crate) fn new(stem: &str, ext: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!(
            r"^{}{}(\d{{8}}_\d{{6}})(?:_(\d+))?{}$",
            regex::escape(stem),
            regex::escape(C_BACKUP_INFIX),
            regex::escape(ext)
        ))?;
        Ok(Self {
            stem: stem.to_string(),
            ext: ext.to_string(),
            regex,
        })
    }

    /// Parse `(timestamp, sequence)` from a backup file name.
    pub(crate) fn parse(&self, name_file: &str) -> Option<(String, u64)> {
        let caps = self.regex.captures(name_file)?;
        let c_timestamp = caps.get(1)?.as_str().to_string();
        let n_seq = match caps.get(2) {
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };
        Some((c_timestamp, n_seq))
    }

    /// Render the file name for `(timestamp, sequence)`.
    pub(crate) fn render(&self, timestamp: &str, n_seq: u64) -> String {
        if n_seq == 0 {
            format!("{}{C_BACKUP_INFIX}{timestamp}{}", self.stem, self.ext)
        } else {
            format!("{}{C_BACKUP_INFIX}{timestamp}_{n_seq}{}", self.stem, self.ext)
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FileOps

pub(crate) fn copy_file_with_metadata(
    path_file_src: &Path,
    path_file_dst: &Path,
    if_preserve_metadata: bool,
) -> Result<(), io::Error> {
    fs::copy(path_file_src, path_file_dst)?;
    if !if_preserve_metadata {
        return Ok(());
    }
    #[cfg(target_os = "linux")]
    {
        apply_metadata_linux(path_file_src, path_file_dst)?;
    }
    Ok(())
}

#[cfg(target_os = "linux")]
fn apply_metadata_linux(path_file_src: &Path, path_file_dst: &Path) -> Result<(), io::Error> {
    use filetime::{FileTime, set_file_times};

    let stat_src = fs::metadata(path_file_src)?;
    let file_time_access = FileTime::from_last_access_time(&stat_src);
    let file_time_modify = FileTime::from_last_modification_time(&stat_src);
    set_file_times(path_file_dst, file_time_access, file_time_modify)?;

    copy_xattrs_linux(path_file_src, path_file_dst);
    Ok(())
}

#[cfg(target_os = "linux")]
fn copy_xattrs_linux(path_file_src: &Path, path_file_dst: &Path) {
    let iter_xattr_names = match xattr::list(path_file_src) {
        Ok(v) => v,
        Err(_) => return,
    };

    for name in iter_xattr_names {
        let Some(raw_value) = xattr::get(path_file_src, &name).ok().flatten() else {
            continue;
        };
        let _ = xattr::set(path_file_dst, &name, &raw_value);
    }
}

/// Replace `path_file` with `content` through a sibling temp file + rename.
///
/// A crash mid-write leaves the previous file intact; the parent directory
/// must already exist. An existing target keeps its permissions.
pub fn write_file_atomic(path_file: &Path, content: &[u8]) -> Result<(), io::Error> {
    let name_file = path_file.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Path has no file name: {}", path_file.display()),
        )
    })?;
    let path_dir = match path_file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let path_tmp = path_dir.join(format!(
        ".{}{C_TMP_SUFFIX}",
        name_file.to_string_lossy()
    ));

    let res_write = (|| -> io::Result<()> {
        let mut file_tmp = fs::File::create(&path_tmp)?;
        file_tmp.write_all(content)?;
        file_tmp.sync_all()?;
        if let Ok(stat_dst) = fs::metadata(path_file) {
            fs::set_permissions(&path_tmp, stat_dst.permissions())?;
        }
        Ok(())
    })();
    if let Err(e) = res_write.and_then(|_| fs::rename(&path_tmp, path_file)) {
        let _ = fs::remove_file(&path_tmp);
        return Err(e);
    }
    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_file_name() {
        assert_eq!(split_file_name("data.xlsx"), ("data", ".xlsx"));
        assert_eq!(split_file_name("archive.tar.gz"), ("archive.tar", ".gz"));
        assert_eq!(split_file_name("Makefile"), ("Makefile", ""));
        assert_eq!(split_file_name(".env"), (".env", ""));
    }

    #[test]
    fn test_backup_name_pattern_parse_and_render() {
        let pat = SpecBackupNamePattern::new("data", ".xlsx").expect("pattern");

        assert_eq!(
            pat.render("20240101_120000", 0),
            "data_backup_20240101_120000.xlsx"
        );
        assert_eq!(
            pat.render("20240101_120000", 3),
            "data_backup_20240101_120000_3.xlsx"
        );
        assert_eq!(
            pat.parse("data_backup_20240101_120000.xlsx"),
            Some(("20240101_120000".to_string(), 0))
        );
        assert_eq!(
            pat.parse("data_backup_20240101_120000_12.xlsx"),
            Some(("20240101_120000".to_string(), 12))
        );
        assert_eq!(pat.parse("data_backup_20240101_120000.json"), None);
        assert_eq!(pat.parse("data_backup_notes.xlsx"), None);
        assert_eq!(pat.parse("mydata_backup_20240101_120000.xlsx"), None);
    }

    #[test]
    fn test_backup_name_pattern_escapes_stem() {
        let pat = SpecBackupNamePattern::new("a+b (1)", "").expect("pattern");
        assert_eq!(
            pat.parse("a+b (1)_backup_20240101_120000"),
            Some(("20240101_120000".to_string(), 0))
        );
        assert_eq!(pat.parse("aab (1)_backup_20240101_120000"), None);
    }

    #[test]
    fn test_write_file_atomic_replaces_content() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path_file = tmp.path().join("doc.json");

        write_file_atomic(&path_file, b"first").expect("write 1");
        write_file_atomic(&path_file, b"second").expect("write 2");

        assert_eq!(fs::read(&path_file).expect("read"), b"second");
        let l_names: Vec<_> = fs::read_dir(tmp.path())
            .expect("read_dir")
            .filter_map(|e| e.ok())
            .map(|e| e.file_name())
            .collect();
        assert_eq!(l_names.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_file_atomic_keeps_target_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().expect("tempdir");
        let path_file = tmp.path().join("book.xlsx");
        write_file_atomic(&path_file, b"first").expect("write 1");
        fs::set_permissions(&path_file, fs::Permissions::from_mode(0o640)).expect("chmod");

        write_file_atomic(&path_file, b"second").expect("write 2");

        let n_mode = fs::metadata(&path_file).expect("stat").permissions().mode();
        assert_eq!(n_mode & 0o777, 0o640);
        assert_eq!(fs::read(&path_file).expect("read"), b"second");
    }

    #[test]
    fn test_write_file_atomic_missing_parent_fails() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path_file = tmp.path().join("missing").join("doc.json");
        assert!(write_file_atomic(&path_file, b"x").is_err());
    }
}
