//! QOI header: 14 bytes, big-endian.

use crate::error::ParseError;
use crate::io::{field, read_array, ByteSource};

use super::Dimensions;

pub(crate) const SIGNATURE_LEN: usize = 4;

pub(crate) fn matches(prefix: &[u8]) -> bool {
    prefix.starts_with(b"qoif")
}

pub(crate) fn parse(source: &mut dyn ByteSource) -> Result<Dimensions, ParseError> {
    let header: [u8; 14] = read_array(source)?;

    let channels = header[12];
    if channels != 3 && channels != 4 {
        return Err(ParseError::InvalidField {
            field: "channels",
            message: format!("expected 3 or 4, got {channels}"),
        });
    }
    let colorspace = header[13];
    if colorspace > 1 {
        return Err(ParseError::InvalidField {
            field: "colorspace",
            message: format!("expected 0 or 1, got {colorspace}"),
        });
    }

    Ok(Dimensions::new(
        u64::from(u32::from_be_bytes(field(&header, 4)?)),
        u64::from(u32::from_be_bytes(field(&header, 8)?)),
    ))
}
