//! LZMA "alone" format (the `.lzma` legacy container: a 5-byte properties
//! byte plus a 13-byte header, as opposed to the `.xz` container). liblzma's
//! alone decoder parses that header itself; this adapter's own job is just
//! the `INBUFSIZE`-chunked refill loop described for block-oriented codecs,
//! grounded on `examples/original_source/src/libxarc/decomp_lzma/decomp_lzma.c`'s
//! `d_lzma_read`.

use std::path::Path;

use xz2::stream::Stream;

use super::xz_lzma_common::BufferedStream;
use super::{Decompressor, ReadOutcome};
use crate::error::Error;

pub(crate) struct LzmaDecompressor(BufferedStream);

impl LzmaDecompressor {
    pub(crate) fn open(path: &Path) -> Result<Self, Error> {
        let stream = Stream::new_lzma_decoder(u64::MAX).map_err(|e| Error::Decompress {
            code: 0,
            detail: format!("initializing LZMA decoder: {e}"),
        })?;
        Ok(LzmaDecompressor(BufferedStream::new(path, stream, "LZMA")?))
    }
}

impl Decompressor for LzmaDecompressor {
    fn read(&mut self, dst: &mut [u8]) -> Result<ReadOutcome, Error> {
        self.0.read(dst)
    }
}
