use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;

use super::{Decompressor, ReadOutcome};
use crate::error::Error;

/// GZIP adapter. Buffering is delegated entirely to `flate2`/`miniz_oxide`;
/// this adapter just holds the file and forwards reads, matching the
/// "internal buffering delegated to the codec" contract for GZIP/BZIP2.
pub(crate) struct GzipDecompressor {
    inner: GzDecoder<BufReader<File>>,
}

impl GzipDecompressor {
    pub(crate) fn open(path: &Path) -> Result<Self, Error> {
        let file = File::open(path)
            .map_err(|e| Error::from_io(&format!("opening '{}' for reading", path.display()), &e))?;
        Ok(GzipDecompressor {
            inner: GzDecoder::new(BufReader::new(file)),
        })
    }
}

impl Decompressor for GzipDecompressor {
    fn read(&mut self, dst: &mut [u8]) -> Result<ReadOutcome, Error> {
        let mut total = 0;
        while total < dst.len() {
            let n = self.inner.read(&mut dst[total..]).map_err(|e| Error::Decompress {
                code: e.raw_os_error().unwrap_or(0),
                detail: format!("error while reading GZIP data: {e}"),
            })?;
            if n == 0 {
                return Ok(ReadOutcome::Eof(total));
            }
            total += n;
        }
        Ok(ReadOutcome::Filled(total))
    }
}
