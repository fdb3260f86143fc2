//! The extraction engine (C5): joins an entry's archive-internal path onto
//! a caller-supplied base directory, creates any missing ancestor
//! directories exactly once each, writes the entry's data, and restores
//! whatever attributes/timestamp the container knows about.

use std::fs::{self, File};
use std::io;
use std::ops::BitOr;
use std::path::{Path, PathBuf};

use crate::container::Handler;
use crate::entry::{Entry, PROP_DIR};
use crate::error::Error;
use crate::fsutil;

/// Extraction flags (the façade's `flags` bitset): only `CALLBACK_DIRS` is
/// defined, gating whether directory creation also invokes the caller's
/// callback (file extraction always does, unconditionally).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtractFlags(u32);

impl ExtractFlags {
    /// Invoke the callback on directory creation in addition to file
    /// creation.
    pub const CALLBACK_DIRS: ExtractFlags = ExtractFlags(0x1);

    pub const fn empty() -> Self {
        ExtractFlags(0)
    }

    pub const fn contains(self, flag: ExtractFlags) -> bool {
        self.0 & flag.0 == flag.0
    }
}

impl BitOr for ExtractFlags {
    type Output = ExtractFlags;
    fn bitor(self, rhs: Self) -> Self::Output {
        ExtractFlags(self.0 | rhs.0)
    }
}

/// Extract the handler's *current* entry under `base_path`. `on_event` fires
/// once for the entry itself if it's a regular file (always, properties
/// `0`), and once per directory actually created (ancestors implied by the
/// path, or the entry's own directory, properties `PROP_DIR`) only when
/// `flags` includes `CALLBACK_DIRS` — never for a directory that already
/// existed, and never twice for one created while satisfying an ancestor
/// chain. Both cases receive the path *relative to `base_path`*, never the
/// full filesystem path, matching `recurse_ensure_dir`'s
/// `full_path + base_len` pointer arithmetic in the original.
pub(crate) fn extract_entry(
    handler: &mut Handler,
    entry: &Entry,
    base_path: &Path,
    flags: ExtractFlags,
    mut on_event: impl FnMut(&Path, u8),
) -> Result<(), Error> {
    if !fsutil::dir_exists(base_path) {
        return Err(Error::NoBasePath {
            path: base_path.display().to_string(),
        });
    }

    let tolerate_backslash = handler.tolerates_backslash_separator();
    let rel_path = normalize_rel_path(&entry.path, tolerate_backslash);
    let full_path = base_path.join(&rel_path);

    let mut on_dir_created = |p: &Path| {
        if flags.contains(ExtractFlags::CALLBACK_DIRS) {
            let rel = p.strip_prefix(base_path).unwrap_or(p);
            on_event(rel, PROP_DIR);
        }
    };

    if entry.is_directory() {
        create_dirs_recursive(&full_path, &mut on_dir_created)?;
        handler.set_props(&full_path, entry)?;
        tracing::debug!(path = %full_path.display(), "created directory entry");
        return Ok(());
    }

    if let Some(parent) = full_path.parent() {
        create_dirs_recursive(parent, &mut on_dir_created)?;
    }

    fsutil::ensure_writable(&full_path)?;
    let mut file = File::create(&full_path)
        .map_err(|e| Error::from_io(&format!("creating '{}'", full_path.display()), &e))?;
    handler.extract(&mut file)?;
    drop(file);

    handler.set_props(&full_path, entry)?;
    drop(on_dir_created);
    on_event(&rel_path, 0);
    tracing::debug!(path = %full_path.display(), "extracted file entry");
    Ok(())
}

/// Translate an archive-internal path (forward-slash separated, possibly
/// with `.`/`..` segments) into a path relative to the extraction root.
/// `..` segments pop a level rather than being preserved literally, so a
/// maliciously crafted entry can't escape `base_path`. `tolerate_backslash`
/// is only ever `true` for ZIP (on Windows); TAR and 7z stored paths are
/// always `'/'`-separated and must not have a literal `\` in a filename
/// split into extra segments.
fn normalize_rel_path(raw: &str, tolerate_backslash: bool) -> PathBuf {
    let mut out = PathBuf::new();
    for segment in raw.split(|ch| fsutil::is_archive_dir_sep(ch, tolerate_backslash)) {
        match segment {
            "" | "." => continue,
            ".." => {
                out.pop();
            }
            _ => out.push(segment),
        }
    }
    out
}

/// Walk up `path` (leftward) to the nearest already-existing ancestor, then
/// create each missing directory back down (rightward) toward `path`,
/// firing `on_created` once per directory actually created.
fn create_dirs_recursive(path: &Path, on_created: &mut dyn FnMut(&Path)) -> Result<(), Error> {
    if path.as_os_str().is_empty() || fsutil::dir_exists(path) {
        return Ok(());
    }
    if path.exists() {
        return Err(Error::DirIsFile {
            path: path.display().to_string(),
        });
    }

    if let Some(parent) = path.parent() {
        create_dirs_recursive(parent, on_created)?;
    }

    match fs::create_dir(path) {
        Ok(()) => {
            on_created(path);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(Error::from_io(&format!("creating directory '{}'", path.display()), &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_rel_path_joins_forward_slashes() {
        assert_eq!(normalize_rel_path("a/b/c.txt", false), PathBuf::from("a/b/c.txt"));
    }

    #[test]
    fn normalize_rel_path_drops_dot_segments() {
        assert_eq!(normalize_rel_path("./a/./b", false), PathBuf::from("a/b"));
    }

    #[test]
    fn normalize_rel_path_parent_traversal_cannot_escape_root() {
        assert_eq!(
            normalize_rel_path("../../etc/passwd", false),
            PathBuf::from("etc/passwd")
        );
    }

    #[test]
    fn normalize_rel_path_ignores_backslash_when_not_tolerated() {
        // TAR/7z: a literal backslash in a filename is just a filename byte,
        // on every platform.
        assert_eq!(
            normalize_rel_path(r"a\b.txt", false),
            PathBuf::from(r"a\b.txt")
        );
    }

    #[test]
    #[cfg(windows)]
    fn normalize_rel_path_splits_backslash_when_tolerated_on_windows() {
        // ZIP on Windows: a stored backslash is a directory separator.
        assert_eq!(normalize_rel_path(r"a\b.txt", true), PathBuf::from("a/b.txt"));
    }

    #[test]
    #[cfg(not(windows))]
    fn normalize_rel_path_backslash_tolerance_is_windows_only() {
        // Even with tolerate_backslash=true, non-Windows never treats `\` as
        // a separator (`fsutil::is_archive_dir_sep` gates on `cfg!(windows)`).
        assert_eq!(
            normalize_rel_path(r"a\b.txt", true),
            PathBuf::from(r"a\b.txt")
        );
    }

    #[test]
    fn create_dirs_recursive_creates_nested_path_once_each() {
        let tmp = tempfile::TempDir::new().unwrap();
        let target = tmp.path().join("a/b/c");
        let mut created = Vec::new();
        create_dirs_recursive(&target, &mut |p| created.push(p.to_path_buf())).unwrap();
        assert!(target.is_dir());
        assert_eq!(created.len(), 3);
        assert_eq!(created[0], tmp.path().join("a"));
        assert_eq!(created[1], tmp.path().join("a/b"));
        assert_eq!(created[2], tmp.path().join("a/b/c"));
    }

    #[test]
    fn create_dirs_recursive_is_noop_for_existing_dir() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut created = Vec::new();
        create_dirs_recursive(tmp.path(), &mut |p| created.push(p.to_path_buf())).unwrap();
        assert!(created.is_empty());
    }

    #[test]
    fn create_dirs_recursive_rejects_file_ancestor() {
        let tmp = tempfile::TempDir::new().unwrap();
        let file = tmp.path().join("blocker");
        fs::write(&file, b"x").unwrap();
        let target = file.join("child");
        let err = create_dirs_recursive(&target, &mut |_| {}).unwrap_err();
        assert!(matches!(err, Error::DirIsFile { .. }));
    }
}
