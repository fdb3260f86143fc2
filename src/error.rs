use std::fmt;
use std::io;

/// The taxonomy described in the archive error model: every producer writes
/// one of these into the archive's single error slot, and every façade call
/// re-reads it before doing any work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Iteration is exhausted. Soft terminal, not a hard failure.
    NoMoreItems,
    /// A container hit a format problem of its own (not the decompressor's).
    /// `code` is the container's private numeric sub-code.
    Module { code: i32, detail: String },
    /// The decompressor itself reported a hard error (not EOF).
    Decompress { code: i32, detail: String },
    /// A host filesystem or stdio call failed. `code` is the OS errno, or
    /// `0` when the failure didn't originate from an `io::Error` carrying
    /// one.
    Filesystem { code: i32, detail: String },
    /// `resolve` couldn't match any registered container for this path/type.
    UnrecognizedArchive { detail: String },
    /// `resolve_decompressor` couldn't match any registered decompressor.
    UnrecognizedCompression { detail: String },
    /// The container's `open` validated the file and it failed to parse as
    /// that format.
    NotValidArchive { detail: String },
    /// An ancestor of the extraction target already exists as a regular file.
    DirIsFile { path: String },
    /// `extract`'s `base_path` does not exist.
    NoBasePath { path: String },
}

impl Error {
    pub(crate) fn filesystem(detail: impl Into<String>) -> Self {
        Error::Filesystem {
            code: 0,
            detail: detail.into(),
        }
    }

    pub(crate) fn from_io(action: &str, err: &io::Error) -> Self {
        Error::Filesystem {
            code: err.raw_os_error().unwrap_or(0),
            detail: format!("{action}: {err}"),
        }
    }

    /// Soft-terminal kinds end iteration but aren't reported as failures by
    /// callers that just want to know "is there more".
    pub fn is_soft_terminal(&self) -> bool {
        matches!(self, Error::NoMoreItems)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NoMoreItems => write!(f, "no more items in the archive"),
            Error::Module { detail, .. } => write!(f, "archive module error: {detail}"),
            Error::Decompress { detail, .. } => write!(f, "decompression error: {detail}"),
            Error::Filesystem { detail, .. } => write!(f, "filesystem error: {detail}"),
            Error::UnrecognizedArchive { detail } => {
                write!(f, "unrecognized archive type: {detail}")
            }
            Error::UnrecognizedCompression { detail } => {
                write!(f, "unrecognized compression type: {detail}")
            }
            Error::NotValidArchive { detail } => write!(f, "not a valid archive: {detail}"),
            Error::DirIsFile { path } => {
                write!(f, "'{path}' already exists as a file, not a directory")
            }
            Error::NoBasePath { path } => write!(f, "base path '{path}' does not exist"),
        }
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Filesystem {
            code: err.raw_os_error().unwrap_or(0),
            detail: err.to_string(),
        }
    }
}
