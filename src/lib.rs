//! Read-only archive extraction over ZIP, 7z, TAR, and standalone
//! GZIP/BZIP2/LZMA/XZ streams.
//!
//! Compressed TAR variants are handled by composing a decompression stream
//! under the TAR reader; there is no standalone entry point for a bare
//! GZIP/BZIP2/LZMA/XZ stream outside of that composition.
//!
//! ```no_run
//! # fn main() -> Result<(), readex::Error> {
//! use readex::{Archive, ExtractFlags};
//!
//! let mut archive = Archive::open("example.tar.gz", None)?;
//! loop {
//!     match archive.next() {
//!         Ok(()) => {}
//!         Err(e) if e.is_soft_terminal() => break,
//!         Err(e) => return Err(e),
//!     }
//!     let entry = archive.info()?;
//!     archive.extract("/tmp/out", ExtractFlags::empty(), |_rel_path, _properties| {})?;
//!     println!("{}", entry.path);
//! }
//! archive.close()?;
//! # Ok(())
//! # }
//! ```

mod archive;
mod charset;
mod container;
mod decompress;
mod entry;
mod error;
mod extract;
mod fsutil;
mod registry;
mod timestamp;

pub use archive::Archive;
pub use entry::{Entry, PROP_DIR};
pub use error::Error;
pub use extract::ExtractFlags;
pub use registry::ArchiveType;
pub use timestamp::Timestamp;
