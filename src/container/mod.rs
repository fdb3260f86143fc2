//! The `Handler` capability set (C4 + the polymorphism redesign note): one
//! tagged enum standing in for what the original expressed as a vtable of
//! `{close, next, info, extract, set_props, error_description}` function
//! pointers. Dispatch is a `match` instead of an indirect call, and the
//! compiler checks that every container implements every capability.

#[cfg(feature = "sevenzip")]
pub(crate) mod sevenzip;
pub(crate) mod tar;
#[cfg(feature = "zip")]
pub(crate) mod zip;

use std::io::Write;
use std::path::Path;

use crate::entry::Entry;
use crate::error::Error;
use crate::registry::ArchiveType;

/// One container backend, already positioned on an entry cursor.
///
/// Cursor start position is asymmetric by design (kept, not normalized): ZIP
/// and 7z start *before* entry 0, so the first `next()` call lands on entry
/// 0; TAR reads its first header during `open` itself, so `info()` already
/// works right after `open()` and TAR's first `next()` call is a no-op,
/// only advancing from the second call onward.
pub(crate) enum Handler {
    #[cfg(feature = "zip")]
    Zip(zip::ZipHandler),
    #[cfg(feature = "sevenzip")]
    SevenZip(sevenzip::SevenZipHandler),
    Tar(tar::TarHandler),
}

impl Handler {
    pub(crate) fn open(path: &Path, ty: ArchiveType) -> Result<Self, Error> {
        match ty {
            #[cfg(feature = "zip")]
            ArchiveType::Zip => Ok(Handler::Zip(zip::ZipHandler::open(path)?)),
            #[cfg(not(feature = "zip"))]
            ArchiveType::Zip => Err(Error::UnrecognizedArchive {
                detail: "zip support was not compiled in".to_string(),
            }),
            #[cfg(feature = "sevenzip")]
            ArchiveType::SevenZip => Ok(Handler::SevenZip(sevenzip::SevenZipHandler::open(path)?)),
            #[cfg(not(feature = "sevenzip"))]
            ArchiveType::SevenZip => Err(Error::UnrecognizedArchive {
                detail: "7z support was not compiled in".to_string(),
            }),
            ArchiveType::Tar
            | ArchiveType::TarGzip
            | ArchiveType::TarBzip2
            | ArchiveType::TarLzma
            | ArchiveType::TarXz => {
                let decompressor = crate::registry::resolve_decompressor(ty)?;
                Ok(Handler::Tar(tar::TarHandler::open(path, decompressor)?))
            }
        }
    }

    /// Advance the cursor. Returns `Error::NoMoreItems` once exhausted; that
    /// is a soft terminal, not a hard failure.
    pub(crate) fn next(&mut self) -> Result<(), Error> {
        match self {
            #[cfg(feature = "zip")]
            Handler::Zip(h) => h.next(),
            #[cfg(feature = "sevenzip")]
            Handler::SevenZip(h) => h.next(),
            Handler::Tar(h) => h.next(),
        }
    }

    pub(crate) fn info(&self) -> Result<Entry, Error> {
        match self {
            #[cfg(feature = "zip")]
            Handler::Zip(h) => h.info(),
            #[cfg(feature = "sevenzip")]
            Handler::SevenZip(h) => h.info(),
            Handler::Tar(h) => h.info(),
        }
    }

    /// Stream the current entry's data into `dest`.
    pub(crate) fn extract(&mut self, dest: &mut dyn Write) -> Result<(), Error> {
        match self {
            #[cfg(feature = "zip")]
            Handler::Zip(h) => h.extract(dest),
            #[cfg(feature = "sevenzip")]
            Handler::SevenZip(h) => h.extract(dest),
            Handler::Tar(h) => h.extract(dest),
        }
    }

    /// Apply whatever attribute/mtime metadata the container knows about the
    /// current entry to the file already written at `path`.
    pub(crate) fn set_props(&self, path: &Path, entry: &Entry) -> Result<(), Error> {
        match self {
            #[cfg(feature = "zip")]
            Handler::Zip(h) => h.set_props(path, entry),
            #[cfg(feature = "sevenzip")]
            Handler::SevenZip(h) => h.set_props(path, entry),
            Handler::Tar(h) => h.set_props(path, entry),
        }
    }

    /// Whether this container's stored paths tolerate a stored `'\\'` as a
    /// directory separator (in addition to `'/'`) on Windows. Per spec.md
    /// §4.6, this is a ZIP-only allowance; TAR and 7z stored paths are always
    /// `'/'`-separated.
    pub(crate) fn tolerates_backslash_separator(&self) -> bool {
        match self {
            #[cfg(feature = "zip")]
            Handler::Zip(_) => true,
            #[cfg(feature = "sevenzip")]
            Handler::SevenZip(_) => false,
            Handler::Tar(_) => false,
        }
    }
}
