use crate::timestamp::Timestamp;

/// Entry property bit: the entry is a directory rather than a regular file.
pub const PROP_DIR: u8 = 0x1;

/// One entry within an archive: its path in native (UTF-8) encoding, a
/// property bitset, and its modification timestamp.
///
/// Unlike the original C API, the path is returned by value rather than
/// borrowed from the handler — see the "Path ownership" design note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub path: String,
    pub properties: u8,
    pub mod_time: Timestamp,
}

impl Entry {
    pub fn is_directory(&self) -> bool {
        self.properties & PROP_DIR != 0
    }
}
