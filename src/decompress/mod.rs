//! The decompressor adapter (C2): a uniform streaming-read contract over
//! GZIP, BZIP2, LZMA-alone and XZ, used exclusively by the TAR reader to
//! compose a decompression stream under a container.

#[cfg(feature = "bzip2")]
mod bzip2_adapter;
#[cfg(feature = "gzip")]
mod gzip;
#[cfg(feature = "lzma")]
mod lzma;
#[cfg(any(feature = "lzma", feature = "xz"))]
mod xz_lzma_common;
#[cfg(feature = "xz")]
mod xz;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::Error;
use crate::registry::DecompressorType;

/// Result of one `read` call on a `Decompressor`.
pub(crate) enum ReadOutcome {
    /// The requested length was fully produced; the stream may still have
    /// more data.
    Filled(usize),
    /// Fewer bytes than requested were produced because the stream ended.
    /// The caller must not call `read` again.
    Eof(usize),
}

/// A streaming byte-to-byte codec, standalone or (in this crate, always)
/// composed under TAR. Implementations own a file handle, any codec state,
/// and — for block-oriented codecs — a private input buffer.
pub(crate) trait Decompressor {
    fn read(&mut self, dst: &mut [u8]) -> Result<ReadOutcome, Error>;
}

/// Read directly from the archive file with no codec at all — used for
/// plain (uncompressed) TAR.
pub(crate) struct RawFile(File);

impl Decompressor for RawFile {
    fn read(&mut self, dst: &mut [u8]) -> Result<ReadOutcome, Error> {
        let mut total = 0;
        while total < dst.len() {
            let n = self
                .0
                .read(&mut dst[total..])
                .map_err(|e| Error::from_io("reading TAR data", &e))?;
            if n == 0 {
                return Ok(ReadOutcome::Eof(total));
            }
            total += n;
        }
        Ok(ReadOutcome::Filled(total))
    }
}

/// Open `path` as the given decompressor type, or open it as a raw,
/// uncompressed file if `ty` is `None` (plain TAR).
pub(crate) fn open(
    path: &Path,
    ty: Option<DecompressorType>,
) -> Result<Box<dyn Decompressor>, Error> {
    match ty {
        None => {
            let file = File::open(path).map_err(|e| Error::from_io(
                &format!("opening '{}' for reading", path.display()),
                &e,
            ))?;
            Ok(Box::new(RawFile(file)))
        }
        #[cfg(feature = "gzip")]
        Some(DecompressorType::Gzip) => Ok(Box::new(gzip::GzipDecompressor::open(path)?)),
        #[cfg(feature = "bzip2")]
        Some(DecompressorType::Bzip2) => {
            Ok(Box::new(bzip2_adapter::Bzip2Decompressor::open(path)?))
        }
        #[cfg(feature = "lzma")]
        Some(DecompressorType::Lzma) => Ok(Box::new(lzma::LzmaDecompressor::open(path)?)),
        #[cfg(feature = "xz")]
        Some(DecompressorType::Xz) => Ok(Box::new(xz::XzDecompressor::open(path)?)),
        #[allow(unreachable_patterns)]
        Some(_) => Err(Error::UnrecognizedCompression {
            detail: "decompressor was not compiled into this build".to_string(),
        }),
    }
}
