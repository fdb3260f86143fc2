//! XZ container format. Initialized in concatenated-stream mode so a TAR
//! written as several back-to-back XZ streams (as some archivers produce)
//! decodes transparently as one logical stream, matching the framing note
//! for XZ.

use std::path::Path;

use xz2::stream::{Stream, CONCATENATED};

use super::xz_lzma_common::BufferedStream;
use super::{Decompressor, ReadOutcome};
use crate::error::Error;

pub(crate) struct XzDecompressor(BufferedStream);

impl XzDecompressor {
    pub(crate) fn open(path: &Path) -> Result<Self, Error> {
        let stream =
            Stream::new_stream_decoder(u64::MAX, CONCATENATED).map_err(|e| Error::Decompress {
                code: 0,
                detail: format!("initializing XZ decoder: {e}"),
            })?;
        Ok(XzDecompressor(BufferedStream::new(path, stream, "XZ")?))
    }
}

impl Decompressor for XzDecompressor {
    fn read(&mut self, dst: &mut [u8]) -> Result<ReadOutcome, Error> {
        self.0.read(dst)
    }
}
