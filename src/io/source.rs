use crate::error::IoError;

/// Number of leading bytes a non-seekable source keeps so they can be re-read.
///
/// This is also the size of the prefix the format sniffer inspects.
pub const PEEK_LIMIT: usize = 32;

/// Bounded, position-aware access to the bytes of one image.
///
/// This abstraction lets the format parsers work on files, open handles,
/// pipes and in-memory buffers alike without loading the whole image. A
/// source is owned by a single detection call and never shared.
///
/// Offsets are absolute from the start of the image.
pub trait ByteSource {
    /// Read up to `buf.len()` bytes at the current position.
    ///
    /// Returns `Ok(0)` only at the end of the data.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, IoError>;

    /// Move to an absolute offset.
    ///
    /// Positioning past the end is allowed; the next read fails.
    fn seek_to(&mut self, offset: u64) -> Result<(), IoError>;

    /// Current absolute offset.
    fn position(&self) -> u64;

    /// Total size of the data, when the backing store knows it.
    fn len_hint(&self) -> Option<u64>;

    /// Identifier for log fields (a path, or a description of the source).
    fn identifier(&self) -> &str;

    /// Read exactly `buf.len()` bytes or fail with `UnexpectedEof`.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), IoError> {
        let offset = self.position();
        let filled = self.read_fill(buf)?;
        if filled < buf.len() {
            return Err(IoError::UnexpectedEof {
                offset,
                requested: buf.len() as u64,
            });
        }
        Ok(())
    }

    /// Read until `buf` is full or the data ends, returning the byte count.
    fn read_fill(&mut self, buf: &mut [u8]) -> Result<usize, IoError> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.read(&mut buf[filled..])? {
                0 => break,
                n => filled += n,
            }
        }
        Ok(filled)
    }

    /// Read exactly `buf.len()` bytes without moving the position.
    fn peek(&mut self, buf: &mut [u8]) -> Result<(), IoError> {
        let start = self.position();
        let result = self.read_exact(buf);
        self.seek_to(start)?;
        result
    }

    /// Move forward by `len` bytes.
    fn skip(&mut self, len: u64) -> Result<(), IoError> {
        let offset = self.position();
        let target = offset
            .checked_add(len)
            .ok_or(IoError::UnexpectedEof {
                offset,
                requested: len,
            })?;
        self.seek_to(target)
    }

    /// Bytes left after the current position, when the total size is known.
    fn remaining_len(&self) -> Option<u64> {
        self.len_hint()
            .map(|len| len.saturating_sub(self.position()))
    }
}

/// Read a fixed-size array from the source.
#[inline]
pub fn read_array<const N: usize>(source: &mut dyn ByteSource) -> Result<[u8; N], IoError> {
    let mut buf = [0u8; N];
    source.read_exact(&mut buf)?;
    Ok(buf)
}

/// Copy the `N`-byte field at `at` out of a header read in one piece.
///
/// Parsers decode integers with `from_le_bytes`/`from_be_bytes` on the
/// result. A header shorter than the field yields `UnexpectedEof`, with the
/// offset relative to `header`.
#[inline]
pub fn field<const N: usize>(header: &[u8], at: usize) -> Result<[u8; N], IoError> {
    header
        .get(at..)
        .and_then(|rest| rest.get(..N))
        .and_then(|bytes| <[u8; N]>::try_from(bytes).ok())
        .ok_or(IoError::UnexpectedEof {
            offset: at as u64,
            requested: N as u64,
        })
}
