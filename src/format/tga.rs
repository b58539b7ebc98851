//! Truevision TGA.
//!
//! TGA has no leading magic number. A file is only accepted when the fixed
//! header looks plausible and the version 2 footer signature closes the file.

use crate::error::{IoError, ParseError};
use crate::io::{field, read_array, ByteSource};

use super::Dimensions;

pub(crate) const HEADER_LEN: usize = 18;

/// Last 18 bytes of a TGA 2.0 file.
pub(crate) const TRAILER: &[u8; 18] = b"TRUEVISION-XFILE.\0";

/// Colour map type 0 or 1 and an image type code below 12.
pub(crate) fn plausible_header(prefix: &[u8]) -> bool {
    prefix.len() >= HEADER_LEN && prefix[1] <= 1 && prefix[2] < 12
}

/// Check the footer signature at the end of the source.
///
/// Sources without a size hint cannot be checked and never match. The
/// source is left at offset 0.
pub(crate) fn has_trailer(source: &mut dyn ByteSource) -> Result<bool, IoError> {
    let trailer_len = TRAILER.len() as u64;
    let len = match source.len_hint() {
        Some(len) if len >= HEADER_LEN as u64 + trailer_len => len,
        _ => return Ok(false),
    };

    source.seek_to(len - trailer_len)?;
    let mut tail = [0u8; 18];
    let filled = source.read_fill(&mut tail)?;
    source.seek_to(0)?;
    Ok(filled == tail.len() && &tail == TRAILER)
}

/// Width and height at offsets 12 and 14 of the fixed header.
pub(crate) fn parse(source: &mut dyn ByteSource) -> Result<Dimensions, ParseError> {
    let header: [u8; HEADER_LEN] = read_array(source)?;
    Ok(Dimensions::new(
        u64::from(u16::from_le_bytes(field(&header, 12)?)),
        u64::from(u16::from_le_bytes(field(&header, 14)?)),
    ))
}
