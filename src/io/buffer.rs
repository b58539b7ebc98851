use super::ByteSource;
use crate::error::IoError;

/// Byte source over an in-memory buffer.
///
/// Works with anything that derefs to a byte slice: `&[u8]`, `Vec<u8>`,
/// `bytes::Bytes`, memory maps.
#[derive(Debug, Clone)]
pub struct BufferSource<B> {
    data: B,
    pos: u64,
    identifier: String,
}

impl<B: AsRef<[u8]>> BufferSource<B> {
    pub fn new(data: B) -> Self {
        Self::with_identifier(data, "<memory>")
    }

    pub fn with_identifier(data: B, identifier: impl Into<String>) -> Self {
        Self {
            data,
            pos: 0,
            identifier: identifier.into(),
        }
    }

    pub fn into_inner(self) -> B {
        self.data
    }
}

impl<B: AsRef<[u8]>> ByteSource for BufferSource<B> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, IoError> {
        let data = self.data.as_ref();
        let start = match usize::try_from(self.pos) {
            Ok(start) if start < data.len() => start,
            _ => return Ok(0),
        };
        let n = buf.len().min(data.len() - start);
        buf[..n].copy_from_slice(&data[start..start + n]);
        self.pos += n as u64;
        Ok(n)
    }

    fn seek_to(&mut self, offset: u64) -> Result<(), IoError> {
        self.pos = offset;
        Ok(())
    }

    fn position(&self) -> u64 {
        self.pos
    }

    fn len_hint(&self) -> Option<u64> {
        Some(self.data.as_ref().len() as u64)
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }
}
