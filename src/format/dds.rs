//! DirectDraw Surface header.

use crate::error::ParseError;
use crate::io::{field, read_array, ByteSource};

use super::Dimensions;

pub(crate) const SIGNATURE_LEN: usize = 8;

/// `DDS ` followed by the fixed header size of 124.
const SIGNATURE: &[u8; SIGNATURE_LEN] = b"DDS \x7c\x00\x00\x00";

/// DDSD_CAPS | DDSD_HEIGHT | DDSD_WIDTH | DDSD_PIXELFORMAT
const REQUIRED_FLAGS: u32 = 0x1007;

pub(crate) fn matches(prefix: &[u8]) -> bool {
    prefix.starts_with(SIGNATURE)
}

pub(crate) fn parse(source: &mut dyn ByteSource) -> Result<Dimensions, ParseError> {
    let header: [u8; 20] = read_array(source)?;

    let flags = u32::from_le_bytes(field(&header, 8)?);
    if flags & REQUIRED_FLAGS == 0 {
        return Err(ParseError::InvalidField {
            field: "flags",
            message: format!("{flags:#x} has no caps, size or pixel format bits"),
        });
    }

    Ok(Dimensions::new(
        u64::from(u32::from_le_bytes(field(&header, 16)?)),
        u64::from(u32::from_le_bytes(field(&header, 12)?)),
    ))
}
