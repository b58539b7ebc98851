//! GIF logical screen descriptor.

use crate::error::ParseError;
use crate::io::{field, read_array, ByteSource};

use super::Dimensions;

pub(crate) const SIGNATURE_LEN: usize = 6;

pub(crate) fn matches(prefix: &[u8]) -> bool {
    prefix.starts_with(b"GIF87a") || prefix.starts_with(b"GIF89a")
}

/// Width and height are the canvas size at offsets 6 and 8.
pub(crate) fn parse(source: &mut dyn ByteSource) -> Result<Dimensions, ParseError> {
    let header: [u8; 10] = read_array(source)?;
    Ok(Dimensions::new(
        u64::from(u16::from_le_bytes(field(&header, 6)?)),
        u64::from(u16::from_le_bytes(field(&header, 8)?)),
    ))
}
