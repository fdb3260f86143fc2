//! Two compile-time tables: `{archive type -> container}` and, for the
//! subset of types that compose a decompressor under TAR, `{archive type ->
//! decompressor}`. Suffix matching is the ordered, first-match, exact
//! (case-insensitive) scheme described in the spec — no globbing.

use crate::error::Error;

/// The archive-type registry id. `id = 0` in the public API means
/// "auto-detect by suffix"; that's represented here as `Option<ArchiveType>`
/// being `None` rather than a zero variant, which is more idiomatic and
/// cannot be confused with a real type by accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveType {
    Zip,
    SevenZip,
    Tar,
    TarGzip,
    TarBzip2,
    TarLzma,
    TarXz,
}

/// The decompressor an archive type composes under a TAR reader. `Tar`
/// itself has none — it reads the underlying file directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecompressorType {
    Gzip,
    Bzip2,
    Lzma,
    Xz,
}

struct TypeRow {
    ty: ArchiveType,
    suffixes: &'static [&'static str],
    feature_enabled: bool,
    decompressor: Option<DecompressorType>,
}

fn table() -> [TypeRow; 7] {
    [
        TypeRow {
            ty: ArchiveType::Zip,
            suffixes: &[".zip"],
            feature_enabled: cfg!(feature = "zip"),
            decompressor: None,
        },
        TypeRow {
            ty: ArchiveType::SevenZip,
            suffixes: &[".7z"],
            feature_enabled: cfg!(feature = "sevenzip"),
            decompressor: None,
        },
        TypeRow {
            ty: ArchiveType::Tar,
            suffixes: &[".tar"],
            feature_enabled: true,
            decompressor: None,
        },
        TypeRow {
            ty: ArchiveType::TarGzip,
            suffixes: &[".tar.gz", ".tgz"],
            feature_enabled: cfg!(feature = "gzip"),
            decompressor: Some(DecompressorType::Gzip),
        },
        TypeRow {
            ty: ArchiveType::TarBzip2,
            suffixes: &[".tar.bz2", ".tbz2"],
            feature_enabled: cfg!(feature = "bzip2"),
            decompressor: Some(DecompressorType::Bzip2),
        },
        TypeRow {
            ty: ArchiveType::TarLzma,
            suffixes: &[".tar.lzma"],
            feature_enabled: cfg!(feature = "lzma"),
            decompressor: Some(DecompressorType::Lzma),
        },
        TypeRow {
            ty: ArchiveType::TarXz,
            suffixes: &[".tar.xz", ".txz"],
            feature_enabled: cfg!(feature = "xz"),
            decompressor: Some(DecompressorType::Xz),
        },
    ]
}

fn suffix_matches(path: &str, suffix: &str) -> bool {
    let split = match path.len().checked_sub(suffix.len()) {
        Some(split) if path.is_char_boundary(split) => split,
        _ => return false,
    };
    path[split..].eq_ignore_ascii_case(suffix)
}

/// Resolve a path (and optional explicit type) to an `ArchiveType`. Explicit
/// type wins outright; otherwise the table is walked in order and the first
/// row with a matching suffix wins.
pub(crate) fn resolve(path: &str, explicit: Option<ArchiveType>) -> Result<ArchiveType, Error> {
    if let Some(ty) = explicit {
        if table().into_iter().any(|row| row.ty == ty && row.feature_enabled) {
            return Ok(ty);
        }
        return Err(Error::UnrecognizedArchive {
            detail: "requested archive type was not compiled in".to_string(),
        });
    }

    for row in table() {
        if row.feature_enabled && row.suffixes.iter().any(|s| suffix_matches(path, s)) {
            return Ok(row.ty);
        }
    }

    Err(Error::UnrecognizedArchive {
        detail: format!("'{path}' didn't match any registered archive handler"),
    })
}

/// Resolve the decompressor TAR should compose under itself for `ty`.
/// `Tar` resolves to `None` (read the file directly, no codec).
pub(crate) fn resolve_decompressor(
    ty: ArchiveType,
) -> Result<Option<DecompressorType>, Error> {
    let row = table().into_iter().find(|row| row.ty == ty).ok_or_else(|| {
        Error::UnrecognizedCompression {
            detail: "archive type has no registered decompressor mapping".to_string(),
        }
    })?;
    if let Some(decomp) = row.decompressor {
        if !row.feature_enabled {
            return Err(Error::UnrecognizedCompression {
                detail: "matching decompressor was not compiled in".to_string(),
            });
        }
        return Ok(Some(decomp));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_plain_tar_by_suffix() {
        assert_eq!(resolve("archive.tar", None).unwrap(), ArchiveType::Tar);
    }

    #[test]
    fn suffix_match_is_case_insensitive() {
        assert_eq!(resolve("ARCHIVE.TAR.GZ", None).unwrap(), ArchiveType::TarGzip);
    }

    #[test]
    fn tgz_alias_resolves_same_as_tar_gz() {
        assert_eq!(resolve("bundle.tgz", None).unwrap(), ArchiveType::TarGzip);
    }

    #[test]
    fn unmatched_suffix_is_unrecognized() {
        assert!(resolve("notes.txt", None).is_err());
    }

    #[test]
    fn multibyte_filename_near_suffix_length_does_not_panic() {
        // "€.gz" — the 3-byte euro sign sits right where a naive byte-index
        // split for a 4-byte suffix like ".tar" would land mid-character.
        assert!(resolve("€.gz", None).is_err());
    }

    #[test]
    fn explicit_type_bypasses_suffix_check() {
        assert_eq!(
            resolve("weird-name-with-no-suffix", Some(ArchiveType::Zip)).unwrap(),
            ArchiveType::Zip
        );
    }

    #[test]
    fn plain_tar_has_no_decompressor() {
        assert!(resolve_decompressor(ArchiveType::Tar).unwrap().is_none());
    }

    #[test]
    fn tar_gz_resolves_to_gzip_decompressor() {
        assert_eq!(
            resolve_decompressor(ArchiveType::TarGzip).unwrap(),
            Some(DecompressorType::Gzip)
        );
    }
}
