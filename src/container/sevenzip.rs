//! 7z container (C4.4). Parsing and block decoding are delegated to
//! `sevenz-rust2`; because its reader is callback-driven over (possibly
//! solid) compressed blocks rather than freely seekable, entries are decoded
//! once up front at `open` and cached, matching the 7z whole-entry-buffering
//! open question resolution.

use std::io::Write;
use std::path::Path;

use sevenz_rust2::{Password, SevenZReader};

use crate::entry::{Entry, PROP_DIR};
use crate::error::Error;
use crate::fsutil;
use crate::timestamp::Timestamp;

struct SevenZEntry {
    path: String,
    is_dir: bool,
    mod_time: Timestamp,
    data: Vec<u8>,
}

pub(crate) struct SevenZipHandler {
    entries: Vec<SevenZEntry>,
    cursor: Option<usize>,
}

impl SevenZipHandler {
    pub(crate) fn open(path: &Path) -> Result<Self, Error> {
        let mut reader = SevenZReader::open(path, Password::empty()).map_err(|e| {
            Error::NotValidArchive {
                detail: format!("'{}': {e}", path.display()),
            }
        })?;

        let mut entries = Vec::new();
        reader
            .for_each_entries(|entry, data| {
                let mut buf = Vec::with_capacity(entry.size() as usize);
                if !entry.is_directory() {
                    std::io::copy(data, &mut buf)?;
                }
                let mod_time = if entry.has_last_modified_date() {
                    Timestamp::from_windows_filetime_ticks(entry.last_modified_date())
                } else {
                    Timestamp::EPOCH
                };
                entries.push(SevenZEntry {
                    path: entry.name().to_string(),
                    is_dir: entry.is_directory(),
                    mod_time,
                    data: buf,
                });
                Ok(true)
            })
            .map_err(|e| Error::Module {
                code: -2,
                detail: format!("reading 7z entries: {e}"),
            })?;

        Ok(SevenZipHandler {
            entries,
            cursor: None,
        })
    }

    pub(crate) fn next(&mut self) -> Result<(), Error> {
        let next_index = self.cursor.map_or(0, |i| i + 1);
        if next_index >= self.entries.len() {
            self.cursor = Some(self.entries.len());
            return Err(Error::NoMoreItems);
        }
        self.cursor = Some(next_index);
        Ok(())
    }

    fn current(&self) -> Result<&SevenZEntry, Error> {
        match self.cursor {
            Some(i) if i < self.entries.len() => Ok(&self.entries[i]),
            _ => Err(Error::NoMoreItems),
        }
    }

    pub(crate) fn info(&self) -> Result<Entry, Error> {
        let entry = self.current()?;
        let mut properties = 0u8;
        if entry.is_dir {
            properties |= PROP_DIR;
        }
        Ok(Entry {
            path: entry.path.clone(),
            properties,
            mod_time: entry.mod_time,
        })
    }

    pub(crate) fn extract(&mut self, dest: &mut dyn Write) -> Result<(), Error> {
        let entry = self.current()?;
        dest.write_all(&entry.data)
            .map_err(|e| Error::from_io("writing extracted data", &e))
    }

    pub(crate) fn set_props(&self, path: &Path, entry: &Entry) -> Result<(), Error> {
        if !entry.is_directory() {
            fsutil::set_modtime(path, entry.mod_time)?;
        }
        Ok(())
    }
}
