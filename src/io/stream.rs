use std::io::{ErrorKind, Read};

use super::{ByteSource, PEEK_LIMIT};
use crate::error::IoError;

/// Byte source over a non-seekable reader such as a pipe or socket.
///
/// The first [`PEEK_LIMIT`] bytes are kept so the sniffer can look at the
/// prefix and rewind. Once a read goes past the kept prefix, only forward
/// movement is possible.
pub struct StreamSource<R> {
    inner: R,
    prefix: Vec<u8>,
    consumed: u64,
    pos: u64,
    identifier: String,
}

impl<R: Read> StreamSource<R> {
    pub fn new(inner: R) -> Self {
        Self::with_identifier(inner, "<stream>")
    }

    pub fn with_identifier(inner: R, identifier: impl Into<String>) -> Self {
        Self {
            inner,
            prefix: Vec::with_capacity(PEEK_LIMIT),
            consumed: 0,
            pos: 0,
            identifier: identifier.into(),
        }
    }

    /// Whether every byte pulled from the reader is still held in the prefix.
    fn replayable(&self) -> bool {
        self.consumed == self.prefix.len() as u64
    }

    fn pull(&mut self, buf: &mut [u8]) -> Result<usize, IoError> {
        let n = loop {
            match self.inner.read(buf) {
                Ok(n) => break n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        };

        if self.replayable() && self.prefix.len() < PEEK_LIMIT {
            let keep = n.min(PEEK_LIMIT - self.prefix.len());
            self.prefix.extend_from_slice(&buf[..keep]);
        }
        self.consumed += n as u64;
        Ok(n)
    }
}

impl<R: Read> ByteSource for StreamSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, IoError> {
        if self.pos < self.consumed {
            // Only reachable while the prefix is replayable.
            let start = self.pos as usize;
            let n = buf.len().min(self.prefix.len() - start);
            buf[..n].copy_from_slice(&self.prefix[start..start + n]);
            self.pos += n as u64;
            return Ok(n);
        }

        let n = self.pull(buf)?;
        self.pos += n as u64;
        Ok(n)
    }

    fn seek_to(&mut self, offset: u64) -> Result<(), IoError> {
        if offset == self.pos || (self.replayable() && offset <= self.consumed) {
            self.pos = offset;
            return Ok(());
        }
        Err(IoError::NotSeekable {
            from: self.pos,
            to: offset,
        })
    }

    fn skip(&mut self, len: u64) -> Result<(), IoError> {
        let start = self.pos;
        let mut scratch = [0u8; 512];
        let mut remaining = len;
        while remaining > 0 {
            let chunk = remaining.min(scratch.len() as u64) as usize;
            match self.read(&mut scratch[..chunk])? {
                0 => {
                    return Err(IoError::UnexpectedEof {
                        offset: start,
                        requested: len,
                    })
                }
                n => remaining -= n as u64,
            }
        }
        Ok(())
    }

    fn position(&self) -> u64 {
        self.pos
    }

    fn len_hint(&self) -> Option<u64> {
        None
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }
}
