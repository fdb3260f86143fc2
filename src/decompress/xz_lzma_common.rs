//! Shared buffer-discipline engine for the two block-oriented codecs that
//! need it: LZMA-alone and XZ. Both sit on top of `xz2::stream::Stream`
//! (liblzma bindings) and differ only in how the `Stream` is constructed.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use xz2::stream::{Action, Status, Stream};

use super::{Decompressor, ReadOutcome};
use crate::error::Error;

pub(super) const INBUFSIZE: usize = 4096;

pub(super) struct BufferedStream {
    file: File,
    stream: Stream,
    inbuf: [u8; INBUFSIZE],
    inbuf_at: usize,
    inbuf_filled: usize,
    source_exhausted: bool,
    codec_name: &'static str,
}

impl BufferedStream {
    pub(super) fn new(path: &Path, stream: Stream, codec_name: &'static str) -> Result<Self, Error> {
        let file = File::open(path)
            .map_err(|e| Error::from_io(&format!("opening '{}' for reading", path.display()), &e))?;
        Ok(BufferedStream {
            file,
            stream,
            inbuf: [0u8; INBUFSIZE],
            inbuf_at: 0,
            inbuf_filled: 0,
            source_exhausted: false,
            codec_name,
        })
    }

    fn refill(&mut self) -> Result<(), Error> {
        debug_assert!(self.inbuf_at <= self.inbuf_filled);
        debug_assert!(self.inbuf_filled <= INBUFSIZE);
        let n = self
            .file
            .read(&mut self.inbuf)
            .map_err(|e| Error::from_io(&format!("reading {} data", self.codec_name), &e))?;
        self.inbuf_at = 0;
        self.inbuf_filled = n;
        if n == 0 {
            self.source_exhausted = true;
        }
        Ok(())
    }
}

impl Decompressor for BufferedStream {
    fn read(&mut self, dst: &mut [u8]) -> Result<ReadOutcome, Error> {
        let mut produced = 0;
        while produced < dst.len() {
            if self.inbuf_at >= self.inbuf_filled && !self.source_exhausted {
                self.refill()?;
            }

            let action = if self.source_exhausted {
                Action::Finish
            } else {
                Action::Run
            };

            let total_in_before = self.stream.total_in();
            let total_out_before = self.stream.total_out();

            let status = self
                .stream
                .process(
                    &self.inbuf[self.inbuf_at..self.inbuf_filled],
                    &mut dst[produced..],
                    action,
                )
                .map_err(|e| Error::Decompress {
                    code: 0,
                    detail: format!("error while reading {} data: {e}", self.codec_name),
                })?;

            let consumed = (self.stream.total_in() - total_in_before) as usize;
            let made = (self.stream.total_out() - total_out_before) as usize;
            self.inbuf_at += consumed;
            produced += made;

            debug_assert!(self.inbuf_at <= self.inbuf_filled);
            debug_assert!(self.inbuf_filled <= INBUFSIZE);

            match status {
                Status::StreamEnd => {
                    return Ok(ReadOutcome::Eof(produced));
                }
                Status::Ok => {
                    if self.source_exhausted && self.inbuf_at >= self.inbuf_filled && made == 0
                        && consumed == 0
                    {
                        // No forward progress possible: input exhausted and the
                        // codec produced nothing more from it.
                        return Ok(ReadOutcome::Eof(produced));
                    }
                }
                other => {
                    return Err(Error::Decompress {
                        code: 0,
                        detail: format!("unexpected {} stream status: {other:?}", self.codec_name),
                    });
                }
            }
        }
        Ok(ReadOutcome::Filled(produced))
    }
}
