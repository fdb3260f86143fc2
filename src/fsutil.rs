//! Filesystem primitives the extraction engine needs beyond what
//! `std::fs` gives directly: directory-existence checks phrased the way the
//! engine wants them, path-separator classification, and attribute/mtime
//! restoration.

use std::fs;
use std::path::Path;

use filetime::FileTime;

use crate::error::Error;
use crate::timestamp::Timestamp;

/// `true` if `path` exists and is a directory (mirrors `filesys_dir_exists`:
/// a missing path and an existing-but-not-a-directory path are both `false`,
/// not an error).
pub(crate) fn dir_exists(path: &Path) -> bool {
    path.is_dir()
}

/// Archive-internal paths always use `/`; on Windows, ZIP additionally
/// tolerates a stored `\\` as a separator. TAR and 7z never do.
pub(crate) fn is_archive_dir_sep(ch: char, tolerate_backslash: bool) -> bool {
    ch == '/' || (tolerate_backslash && cfg!(windows) && ch == '\\')
}

/// Apply a Unix permission mode (as stored by TAR) to a file already
/// written to `path`.
#[cfg(unix)]
pub(crate) fn set_unix_mode(path: &Path, mode: u32) -> Result<(), Error> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
        .map_err(|e| Error::from_io(&format!("setting permissions on '{}'", path.display()), &e))
}

#[cfg(not(unix))]
pub(crate) fn set_unix_mode(_path: &Path, _mode: u32) -> Result<(), Error> {
    Ok(())
}

/// Reset a file's read-only attribute so a fresh write-out doesn't fail
/// over a previous extraction's remnants.
pub(crate) fn ensure_writable(path: &Path) -> Result<(), Error> {
    if let Ok(metadata) = fs::metadata(path) {
        let mut perms = metadata.permissions();
        if perms.readonly() {
            perms.set_readonly(false);
            fs::set_permissions(path, perms).map_err(|e| {
                Error::from_io(&format!("clearing read-only bit on '{}'", path.display()), &e)
            })?;
        }
    }
    Ok(())
}

/// Restore a modification timestamp on an already-written path.
pub(crate) fn set_modtime(path: &Path, ts: Timestamp) -> Result<(), Error> {
    let ft = FileTime::from_unix_time(ts.seconds, ts.nanos);
    filetime::set_file_mtime(path, ft)
        .map_err(|e| Error::from_io(&format!("setting mtime on '{}'", path.display()), &e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn dir_exists_false_for_missing_path() {
        let tmp = TempDir::new().unwrap();
        assert!(!dir_exists(&tmp.path().join("nope")));
    }

    #[test]
    fn dir_exists_false_for_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("f.txt");
        std::fs::write(&file, b"x").unwrap();
        assert!(!dir_exists(&file));
    }

    #[test]
    fn dir_exists_true_for_directory() {
        let tmp = TempDir::new().unwrap();
        assert!(dir_exists(tmp.path()));
    }

    #[test]
    fn forward_slash_always_a_separator() {
        assert!(is_archive_dir_sep('/', true));
        assert!(is_archive_dir_sep('/', false));
    }

    #[test]
    fn set_modtime_applies_requested_seconds() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("f.txt");
        std::fs::write(&file, b"x").unwrap();
        set_modtime(&file, Timestamp::from_unix_seconds(1_577_934_245)).unwrap();
        let metadata = std::fs::metadata(&file).unwrap();
        let mtime = FileTime::from_last_modification_time(&metadata);
        assert_eq!(mtime.unix_seconds(), 1_577_934_245);
    }
}
