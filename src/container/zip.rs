//! ZIP container (C4.3). Central-directory access, CRC verification and
//! inflate/deflate are delegated to the `zip` crate; this module owns only
//! the cursor, the CP437/UTF-8 filename decision, and property/timestamp
//! translation into this crate's own types.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use zip::read::ZipArchive;

use crate::charset;
use crate::entry::{Entry, PROP_DIR};
use crate::error::Error;
use crate::fsutil;
use crate::timestamp::Timestamp;

struct ZipEntryMeta {
    path: String,
    is_dir: bool,
    unix_mode: Option<u32>,
    mod_time: Timestamp,
}

pub(crate) struct ZipHandler {
    archive: ZipArchive<File>,
    metas: Vec<ZipEntryMeta>,
    /// `None` means "before entry 0" — the cursor position spec.md describes
    /// ZIP and 7z as starting in, before the first `next()` call.
    cursor: Option<usize>,
}

impl ZipHandler {
    pub(crate) fn open(path: &Path) -> Result<Self, Error> {
        let file = File::open(path)
            .map_err(|e| Error::from_io(&format!("opening '{}' for reading", path.display()), &e))?;
        let mut archive = ZipArchive::new(file).map_err(|e| Error::NotValidArchive {
            detail: format!("'{}': {e}", path.display()),
        })?;

        let mut metas = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let entry = archive.by_index_raw(index).map_err(|e| Error::Module {
                code: -2,
                detail: format!("reading central directory entry {index}: {e}"),
            })?;
            let mod_time = entry
                .last_modified()
                .map(|dt| Timestamp::from_dos(dt.datepart(), dt.timepart()))
                .unwrap_or(Timestamp::EPOCH);
            // `entry.is_dir()` is trailing-slash detection; the DOS/NTFS
            // external-attributes directory bit isn't reachable through this
            // crate's public API (see DESIGN.md), so that's all we have.
            metas.push(ZipEntryMeta {
                path: decode_name(entry.name_raw()),
                is_dir: entry.is_dir(),
                unix_mode: entry.unix_mode(),
                mod_time,
            });
        }

        Ok(ZipHandler {
            archive,
            metas,
            cursor: None,
        })
    }

    pub(crate) fn next(&mut self) -> Result<(), Error> {
        let next_index = self.cursor.map_or(0, |i| i + 1);
        if next_index >= self.metas.len() {
            self.cursor = Some(self.metas.len());
            return Err(Error::NoMoreItems);
        }
        self.cursor = Some(next_index);
        Ok(())
    }

    fn current_index(&self) -> Result<usize, Error> {
        match self.cursor {
            Some(i) if i < self.metas.len() => Ok(i),
            _ => Err(Error::NoMoreItems),
        }
    }

    pub(crate) fn info(&self) -> Result<Entry, Error> {
        let index = self.current_index()?;
        let meta = &self.metas[index];
        let mut properties = 0u8;
        if meta.is_dir {
            properties |= PROP_DIR;
        }
        Ok(Entry {
            path: meta.path.clone(),
            properties,
            mod_time: meta.mod_time,
        })
    }

    pub(crate) fn extract(&mut self, dest: &mut dyn Write) -> Result<(), Error> {
        let index = self.current_index()?;
        let mut file = self.archive.by_index(index).map_err(|e| Error::Module {
            code: -2,
            detail: format!("opening entry {index} for reading: {e}"),
        })?;

        let mut buf = [0u8; 4096];
        loop {
            let n = io::Read::read(&mut file, &mut buf).map_err(|e| Error::Decompress {
                code: 0,
                detail: format!("inflating entry {index}: {e}"),
            })?;
            if n == 0 {
                break;
            }
            dest.write_all(&buf[..n])
                .map_err(|e| Error::from_io("writing extracted data", &e))?;
        }
        Ok(())
    }

    pub(crate) fn set_props(&self, path: &Path, entry: &Entry) -> Result<(), Error> {
        let index = self.current_index()?;
        let meta = &self.metas[index];
        #[cfg(unix)]
        if let Some(mode) = meta.unix_mode {
            fsutil::set_unix_mode(path, mode)?;
        }
        if !entry.is_directory() {
            fsutil::set_modtime(path, entry.mod_time)?;
        }
        Ok(())
    }
}

/// ZIP's general-purpose bit 11 marks a filename as UTF-8; when the crate
/// doesn't surface that bit directly, valid-UTF-8-or-not is a reliable
/// practical stand-in (see DESIGN.md) since CP437 bytes almost never happen
/// to form valid multi-byte UTF-8 sequences.
fn decode_name(raw: &[u8]) -> String {
    match std::str::from_utf8(raw) {
        Ok(s) => s.to_string(),
        Err(_) => charset::from_cp437(raw),
    }
}
