//! Photoshop PSD and PSB file header.

use crate::error::ParseError;
use crate::io::{field, read_array, ByteSource};

use super::Dimensions;

pub(crate) const SIGNATURE_LEN: usize = 6;

const MAX_CHANNELS: u16 = 56;

/// `8BPS` with version 1 (PSD) or 2 (PSB, large document).
pub(crate) fn matches(prefix: &[u8]) -> bool {
    prefix.starts_with(b"8BPS") && matches!(prefix.get(4..6), Some([0, 1 | 2]))
}

pub(crate) fn parse(source: &mut dyn ByteSource) -> Result<Dimensions, ParseError> {
    let header: [u8; 26] = read_array(source)?;

    if header[6..12].iter().any(|&b| b != 0) {
        return Err(ParseError::InvalidField {
            field: "reserved",
            message: "reserved bytes must be zero".to_string(),
        });
    }

    let channels = u16::from_be_bytes(field(&header, 12)?);
    if !(1..=MAX_CHANNELS).contains(&channels) {
        return Err(ParseError::InvalidField {
            field: "channels",
            message: format!("expected 1 to {MAX_CHANNELS}, got {channels}"),
        });
    }

    Ok(Dimensions::new(
        u64::from(u32::from_be_bytes(field(&header, 18)?)),
        u64::from(u32::from_be_bytes(field(&header, 14)?)),
    ))
}
