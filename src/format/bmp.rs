//! Windows and OS/2 bitmap headers.

use crate::error::ParseError;
use crate::io::{field, read_array, ByteSource};

use super::Dimensions;

pub(crate) const SIGNATURE_LEN: usize = 10;

/// BITMAPCOREHEADER, with 16-bit dimensions.
const CORE_HEADER_SIZE: u32 = 12;

/// Smallest header with 32-bit dimensions (OS/2 2.x short form).
const MIN_INFO_HEADER_SIZE: u32 = 16;

/// `BM` followed by the file size and four reserved zero bytes.
pub(crate) fn matches(prefix: &[u8]) -> bool {
    prefix.starts_with(b"BM") && prefix[6..10] == [0, 0, 0, 0]
}

pub(crate) fn parse(source: &mut dyn ByteSource) -> Result<Dimensions, ParseError> {
    let file_header: [u8; 18] = read_array(source)?;
    let header_size = u32::from_le_bytes(field(&file_header, 14)?);

    if header_size == CORE_HEADER_SIZE {
        let size: [u8; 4] = read_array(source)?;
        return Ok(Dimensions::new(
            u64::from(u16::from_le_bytes(field(&size, 0)?)),
            u64::from(u16::from_le_bytes(field(&size, 2)?)),
        ));
    }

    if header_size < MIN_INFO_HEADER_SIZE {
        return Err(ParseError::InvalidField {
            field: "DIB header size",
            message: format!("unknown header size {header_size}"),
        });
    }

    let size: [u8; 8] = read_array(source)?;
    let width = u32::from_le_bytes(field(&size, 0)?) as i32;
    // Negative height marks a top-down bitmap.
    let height = u32::from_le_bytes(field(&size, 4)?) as i32;

    if width < 0 {
        return Err(ParseError::InvalidField {
            field: "width",
            message: format!("negative width {width}"),
        });
    }

    Ok(Dimensions::new(
        u64::from(width.unsigned_abs()),
        u64::from(height.unsigned_abs()),
    ))
}
