//! TAR container (C4.5): a hand-rolled 512-byte-block USTAR header state
//! machine composing an optional decompressor underneath. No crate wraps
//! this one — TAR's own framing is simple enough, and the container needs
//! to compose arbitrarily with any of the four decompressor adapters, which
//! rules out a third-party TAR *reader* crate (they all own their own byte
//! source).
//!
//! File sizes and the drain-loop counter are `u64` throughout, not the
//! original's 32-bit `int32_t` — see the TAR file size width open question.

use std::io::Write;
use std::path::Path;

use crate::charset;
use crate::decompress::{self, Decompressor, ReadOutcome};
use crate::entry::{Entry, PROP_DIR};
use crate::error::Error;
use crate::fsutil;
use crate::registry::DecompressorType;
use crate::timestamp::Timestamp;

const BLOCK_SIZE: u64 = 512;

struct CurrentEntry {
    path: String,
    is_dir: bool,
    mode: u32,
    mod_time: Timestamp,
    remaining: u64,
    padding: u64,
}

pub(crate) struct TarHandler {
    source: Box<dyn Decompressor>,
    current: Option<CurrentEntry>,
    /// `false` until the first `next()` call returns — lets that first call
    /// be a no-op, since `open` already loaded entry 0 onto the cursor.
    started: bool,
    /// Latched once `NoMoreItems` is authoritatively determined, so no
    /// further `read()` calls reach `source` after it.
    exhausted: bool,
}

struct ParsedHeader {
    name: String,
    mode: u32,
    size: u64,
    mtime: u64,
    typeflag: u8,
}

impl TarHandler {
    pub(crate) fn open(path: &Path, decompressor: Option<DecompressorType>) -> Result<Self, Error> {
        let source = decompress::open(path, decompressor)?;
        let mut handler = TarHandler {
            source,
            current: None,
            started: false,
            exhausted: false,
        };
        // The state machine runs once during `open` too (C4.5): TAR's cursor
        // starts *on* entry 0, unlike ZIP/7z which start before it.
        match handler.advance() {
            Ok(()) => {}
            Err(Error::NoMoreItems) => handler.exhausted = true,
            Err(e) => return Err(e),
        }
        Ok(handler)
    }

    pub(crate) fn next(&mut self) -> Result<(), Error> {
        if !self.started {
            self.started = true;
            return if self.exhausted { Err(Error::NoMoreItems) } else { Ok(()) };
        }
        if self.exhausted {
            return Err(Error::NoMoreItems);
        }
        if let Some(cur) = self.current.take() {
            self.drain_raw(cur.remaining + cur.padding)?;
        }
        match self.advance() {
            Ok(()) => Ok(()),
            Err(Error::NoMoreItems) => {
                self.exhausted = true;
                Err(Error::NoMoreItems)
            }
            Err(e) => Err(e),
        }
    }

    /// Read and parse header(s) for the next real entry, skipping GNU
    /// long-name/long-link and pax extended headers along the way, and
    /// installing the result as `self.current`. Does not drain the previous
    /// entry's payload — callers do that first.
    fn advance(&mut self) -> Result<(), Error> {
        let mut pending_long_name: Option<String> = None;

        loop {
            let block = match self.read_block()? {
                None => return Err(Error::NoMoreItems),
                Some(b) => b,
            };

            if block[0] == 0 {
                return Err(Error::NoMoreItems);
            }

            let header = parse_header(&block)?;
            let data_blocks = round_up_block(header.size);

            match header.typeflag {
                b'L' | b'K' => {
                    pending_long_name = Some(self.read_gnu_long_name(header.size, data_blocks)?);
                    continue;
                }
                b'x' | b'g' => {
                    tracing::debug!(
                        typeflag = header.typeflag as char,
                        "skipping TAR extended header data"
                    );
                    self.drain_raw(data_blocks)?;
                    continue;
                }
                b'0' | 0 | b'5' => {
                    let path = pending_long_name.take().unwrap_or(header.name);
                    let is_dir = header.typeflag == b'5' || path.ends_with('/');
                    self.current = Some(CurrentEntry {
                        path,
                        is_dir,
                        mode: header.mode,
                        mod_time: Timestamp::from_unix_seconds(header.mtime as i64),
                        remaining: if is_dir { 0 } else { header.size },
                        padding: data_blocks - header.size,
                    });
                    return Ok(());
                }
                other => {
                    tracing::warn!(
                        typeflag = other as char,
                        name = %header.name,
                        "skipping unsupported TAR record type"
                    );
                    self.drain_raw(data_blocks)?;
                    continue;
                }
            }
        }
    }

    fn current(&self) -> Result<&CurrentEntry, Error> {
        self.current.as_ref().ok_or(Error::NoMoreItems)
    }

    pub(crate) fn info(&self) -> Result<Entry, Error> {
        let cur = self.current()?;
        let mut properties = 0u8;
        if cur.is_dir {
            properties |= PROP_DIR;
        }
        Ok(Entry {
            path: cur.path.clone(),
            properties,
            mod_time: cur.mod_time,
        })
    }

    pub(crate) fn extract(&mut self, dest: &mut dyn Write) -> Result<(), Error> {
        let remaining = self.current()?.remaining;
        let mut buf = [0u8; 8192];
        let mut left = remaining;
        while left > 0 {
            let chunk = left.min(buf.len() as u64) as usize;
            match self.source.read(&mut buf[..chunk])? {
                ReadOutcome::Filled(n) => {
                    dest.write_all(&buf[..n])
                        .map_err(|e| Error::from_io("writing extracted data", &e))?;
                    left -= n as u64;
                }
                ReadOutcome::Eof(n) => {
                    dest.write_all(&buf[..n])
                        .map_err(|e| Error::from_io("writing extracted data", &e))?;
                    return Err(Error::Module {
                        code: -1,
                        detail: "truncated TAR: entry data ended before its declared size"
                            .to_string(),
                    });
                }
            }
        }
        if let Some(cur) = self.current.as_mut() {
            cur.remaining = 0;
        }
        Ok(())
    }

    pub(crate) fn set_props(&self, path: &Path, entry: &Entry) -> Result<(), Error> {
        let cur = self.current()?;
        #[cfg(unix)]
        fsutil::set_unix_mode(path, cur.mode & 0o7777)?;
        #[cfg(not(unix))]
        let _ = cur.mode;
        if !entry.is_directory() {
            fsutil::set_modtime(path, entry.mod_time)?;
        }
        Ok(())
    }

    fn read_block(&mut self) -> Result<Option<[u8; BLOCK_SIZE as usize]>, Error> {
        let mut block = [0u8; BLOCK_SIZE as usize];
        match self.source.read(&mut block)? {
            ReadOutcome::Filled(_) => Ok(Some(block)),
            ReadOutcome::Eof(0) => Ok(None),
            ReadOutcome::Eof(n) => Err(Error::Module {
                code: -1,
                detail: format!("truncated TAR: short header block ({n} of 512 bytes)"),
            }),
        }
    }

    fn drain_raw(&mut self, mut n: u64) -> Result<(), Error> {
        let mut buf = [0u8; 8192];
        while n > 0 {
            let chunk = n.min(buf.len() as u64) as usize;
            match self.source.read(&mut buf[..chunk])? {
                ReadOutcome::Filled(read) => n -= read as u64,
                ReadOutcome::Eof(read) if read as u64 == n => n -= read as u64,
                ReadOutcome::Eof(_) => {
                    return Err(Error::Module {
                        code: -1,
                        detail: "truncated TAR: archive ended mid-block".to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn read_gnu_long_name(&mut self, size: u64, data_blocks: u64) -> Result<String, Error> {
        let mut buf = vec![0u8; size as usize];
        let mut filled = 0usize;
        while filled < buf.len() {
            match self.source.read(&mut buf[filled..])? {
                ReadOutcome::Filled(n) => filled += n,
                ReadOutcome::Eof(n) => {
                    filled += n;
                    return Err(Error::Module {
                        code: -1,
                        detail: "truncated TAR: GNU long-name data ended early".to_string(),
                    });
                }
            }
        }
        self.drain_raw(data_blocks - size)?;
        let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
        Ok(charset::from_utf8(&buf[..end]))
    }
}

fn round_up_block(n: u64) -> u64 {
    n.div_ceil(BLOCK_SIZE) * BLOCK_SIZE
}

fn field_str(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    charset::from_utf8(&bytes[..end])
}

/// Parses an octal numeric TAR field, also accepting GNU's base-256 binary
/// extension (signalled by the field's high bit) for values too large for
/// the 11-digit octal encoding to hold.
fn parse_numeric(field: &[u8]) -> Result<u64, Error> {
    if field[0] & 0x80 != 0 {
        let mut value: u64 = (field[0] & 0x7f) as u64;
        for &b in &field[1..] {
            value = (value << 8) | b as u64;
        }
        return Ok(value);
    }

    let text = field_str(field);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    u64::from_str_radix(trimmed, 8).map_err(|_| Error::Module {
        code: -2,
        detail: format!("corrupt TAR numeric field: {trimmed:?}"),
    })
}

/// Parses the fields spec.md §4.5 actually names: `name[100]`, `mode[8]`,
/// `size[12]`, `mtime[12]`, `typeflag[1]`. Deliberately does not read the
/// byte range at offset 345 (USTAR's optional `prefix` field) — GNU's own
/// `oldgnu_header` extension overlays that same range with binary
/// `atime`/`ctime`/`offset`/`sparse`/`realsize` data unrelated to any path,
/// and this reader has no `magic`/`version` check to tell the two apart, so
/// trusting it unconditionally would splice garbage onto GNU-format names.
fn parse_header(block: &[u8; BLOCK_SIZE as usize]) -> Result<ParsedHeader, Error> {
    let name = field_str(&block[0..100]);
    let mode = parse_numeric(&block[100..108])? as u32;
    let size = parse_numeric(&block[124..136])?;
    let mtime = parse_numeric(&block[136..148])?;
    let typeflag = block[156];

    Ok(ParsedHeader {
        name,
        mode,
        size,
        mtime,
        typeflag,
    })
}
