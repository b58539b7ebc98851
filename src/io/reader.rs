use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use super::ByteSource;
use crate::error::IoError;

/// Byte source over a seekable reader (files, cursors, open handles).
///
/// Reads go through a `BufReader` so the byte-at-a-time marker scans stay
/// cheap. Offsets are relative to the reader's position when the source was
/// created, so an image embedded at a handle's current offset is measured
/// from there.
pub struct ReaderSource<R: Read + Seek> {
    inner: BufReader<R>,
    base: u64,
    pos: u64,
    len: Option<u64>,
    identifier: String,
}

impl ReaderSource<File> {
    /// Open a file by path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Self::with_identifier(file, path.display().to_string())
    }
}

impl<R: Read + Seek> ReaderSource<R> {
    pub fn new(inner: R) -> Result<Self, IoError> {
        Self::with_identifier(inner, "<reader>")
    }

    /// Wrap a reader, recording its current position as offset 0.
    ///
    /// Fails if the reader cannot report or change its position.
    pub fn with_identifier(mut inner: R, identifier: impl Into<String>) -> Result<Self, IoError> {
        let base = inner.stream_position()?;
        let end = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(base))?;

        Ok(Self {
            inner: BufReader::new(inner),
            base,
            pos: 0,
            len: Some(end.saturating_sub(base)),
            identifier: identifier.into(),
        })
    }
}

impl<R: Read + Seek> ByteSource for ReaderSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, IoError> {
        loop {
            match self.inner.read(buf) {
                Ok(n) => {
                    self.pos += n as u64;
                    return Ok(n);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn seek_to(&mut self, offset: u64) -> Result<(), IoError> {
        if offset == self.pos {
            return Ok(());
        }

        // Relative seeks within the buffered window keep the buffer.
        let delta = i128::from(offset) - i128::from(self.pos);
        match i64::try_from(delta) {
            Ok(delta) => self.inner.seek_relative(delta)?,
            Err(_) => {
                let absolute = self.base.checked_add(offset).ok_or_else(|| {
                    IoError::Other(format!("seek offset {offset} overflows"))
                })?;
                self.inner.seek(SeekFrom::Start(absolute))?;
            }
        }
        self.pos = offset;
        Ok(())
    }

    fn position(&self) -> u64 {
        self.pos
    }

    fn len_hint(&self) -> Option<u64> {
        self.len
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }
}
