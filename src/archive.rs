//! The public façade (C7): `Archive` wraps a tagged `Handler` behind the
//! "once failed, read-only until close" contract described for the error
//! object. Errors are cloned into a latch on first failure; every
//! subsequent call returns that same error without touching the handler
//! again, until the archive is closed.

use std::cell::RefCell;
use std::path::Path;

use crate::container::Handler;
use crate::entry::Entry;
use crate::error::Error;
use crate::extract::{self, ExtractFlags};
use crate::registry::{self, ArchiveType};

pub struct Archive {
    handler: Handler,
    last_error: RefCell<Option<Error>>,
}

impl Archive {
    /// Open `path`. `explicit_type` overrides suffix-based auto-detection
    /// when given.
    pub fn open(path: impl AsRef<Path>, explicit_type: Option<ArchiveType>) -> Result<Self, Error> {
        let path = path.as_ref();
        let ty = registry::resolve(&path.to_string_lossy(), explicit_type)?;
        let handler = Handler::open(path, ty)?;
        tracing::debug!(path = %path.display(), "opened archive");
        Ok(Archive {
            handler,
            last_error: RefCell::new(None),
        })
    }

    /// Advance to the next entry. `Err(Error::NoMoreItems)` is the normal
    /// end-of-iteration signal.
    pub fn next(&mut self) -> Result<(), Error> {
        self.check()?;
        self.handler.next().map_err(|e| self.latch(e))
    }

    /// The current entry's metadata. Does not advance the cursor.
    pub fn info(&self) -> Result<Entry, Error> {
        self.check()?;
        self.handler.info().map_err(|e| self.latch(e))
    }

    /// Extract the current entry under `base_path`, creating any missing
    /// ancestor directories. `on_event` always fires once for a regular-file
    /// entry (properties `0`); it additionally fires once per directory
    /// actually created (including ancestors implied by the entry's path,
    /// properties `PROP_DIR`) when `flags` includes
    /// `ExtractFlags::CALLBACK_DIRS`. In both cases the path passed to
    /// `on_event` is relative to `base_path`, never the full filesystem path.
    pub fn extract(
        &mut self,
        base_path: impl AsRef<Path>,
        flags: ExtractFlags,
        on_event: impl FnMut(&Path, u8),
    ) -> Result<(), Error> {
        self.check()?;
        let entry = self.handler.info().map_err(|e| self.latch(e))?;
        extract::extract_entry(&mut self.handler, &entry, base_path.as_ref(), flags, on_event)
            .map_err(|e| self.latch(e))
    }

    /// `true` if no error has been latched yet.
    pub fn ok(&self) -> bool {
        self.last_error.borrow().is_none()
    }

    /// The currently latched error, if any.
    pub fn last_error(&self) -> Option<Error> {
        self.last_error.borrow().clone()
    }

    /// Close the archive, returning whatever error was latched, if any.
    /// Mirrors the original's `xarc_close` returning the handle's final
    /// status; in Rust, `self` being consumed also means no further calls
    /// are possible, so this additionally enforces what the "until close"
    /// half of the latch contract only documented in C.
    pub fn close(self) -> Result<(), Error> {
        match self.last_error.into_inner() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn check(&self) -> Result<(), Error> {
        match self.last_error.borrow().clone() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn latch(&self, err: Error) -> Error {
        *self.last_error.borrow_mut() = Some(err.clone());
        err
    }
}
