//! JPEG 2000 (JP2) container.
//!
//! The signature box is followed by `ftyp`, then the `jp2h` header superbox
//! whose image header box `ihdr` starts with height and width.

use crate::error::ParseError;
use crate::io::{field, read_array, ByteSource};

use super::isobmff::{find_box, read_box_header, source_end};
use super::Dimensions;

pub(crate) const SIGNATURE_LEN: usize = 12;

/// The complete 12-byte signature box.
const SIGNATURE: [u8; SIGNATURE_LEN] = [
    0x00, 0x00, 0x00, 0x0C, b'j', b'P', b' ', b' ', 0x0D, 0x0A, 0x87, 0x0A,
];

/// Height, width, component count, bit depth, compression, colourspace
/// flags; only the first two fields are read.
const IHDR_LEN: u64 = 14;

pub(crate) fn matches(prefix: &[u8]) -> bool {
    prefix.starts_with(&SIGNATURE)
}

pub(crate) fn parse(source: &mut dyn ByteSource) -> Result<Dimensions, ParseError> {
    let file_end = source_end(source);
    source.seek_to(SIGNATURE_LEN as u64)?;

    let ftyp = read_box_header(source, file_end)?;
    if &ftyp.kind != b"ftyp" {
        return Err(ParseError::InvalidMagic("JP2 file type box"));
    }

    let jp2h = find_box(source, ftyp.end, file_end, b"jp2h")?;
    let ihdr = find_box(source, jp2h.payload_start(), jp2h.end, b"ihdr")?;
    if ihdr.payload_len() < IHDR_LEN {
        return Err(ParseError::InvalidField {
            field: "ihdr size",
            message: format!("expected {IHDR_LEN} bytes, got {}", ihdr.payload_len()),
        });
    }

    let size: [u8; 8] = read_array(source)?;
    Ok(Dimensions::new(
        u64::from(u32::from_be_bytes(field(&size, 4)?)),
        u64::from(u32::from_be_bytes(field(&size, 0)?)),
    ))
}
