use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use bzip2::read::BzDecoder;

use super::{Decompressor, ReadOutcome};
use crate::error::Error;

/// BZIP2 adapter. Like GZIP, internal buffering is the codec's job; this
/// just owns the file and forwards reads.
pub(crate) struct Bzip2Decompressor {
    inner: BzDecoder<BufReader<File>>,
}

impl Bzip2Decompressor {
    pub(crate) fn open(path: &Path) -> Result<Self, Error> {
        let file = File::open(path)
            .map_err(|e| Error::from_io(&format!("opening '{}' for reading", path.display()), &e))?;
        Ok(Bzip2Decompressor {
            inner: BzDecoder::new(BufReader::new(file)),
        })
    }
}

impl Decompressor for Bzip2Decompressor {
    fn read(&mut self, dst: &mut [u8]) -> Result<ReadOutcome, Error> {
        let mut total = 0;
        while total < dst.len() {
            let n = self.inner.read(&mut dst[total..]).map_err(|e| Error::Decompress {
                code: e.raw_os_error().unwrap_or(0),
                detail: format!("error while reading BZIP2 data: {e}"),
            })?;
            if n == 0 {
                return Ok(ReadOutcome::Eof(total));
            }
            total += n;
        }
        Ok(ReadOutcome::Filled(total))
    }
}
