//! Windows icon directory.

use tracing::trace;

use crate::error::ParseError;
use crate::io::{field, read_array, ByteSource};

use super::{ensure_within, Dimensions};

pub(crate) const SIGNATURE_LEN: usize = 4;

const HEADER_LEN: u64 = 6;
const ENTRY_LEN: u64 = 16;

/// Reserved zero word, then resource type 1 (icon).
pub(crate) fn matches(prefix: &[u8]) -> bool {
    prefix.starts_with(&[0, 0, 1, 0])
}

/// A width or height byte of 0 stands for 256.
fn entry_extent(byte: u8) -> u64 {
    if byte == 0 {
        256
    } else {
        u64::from(byte)
    }
}

/// Report the largest image in the directory; the first wins a tie.
pub(crate) fn parse(source: &mut dyn ByteSource) -> Result<Dimensions, ParseError> {
    let header: [u8; 6] = read_array(source)?;
    let count = u16::from_le_bytes(field(&header, 4)?);
    if count == 0 {
        return Err(ParseError::MissingField("icon directory entry"));
    }
    ensure_within(source, "icon directory", HEADER_LEN, u64::from(count) * ENTRY_LEN)?;

    let mut best: Option<Dimensions> = None;
    for index in 0..count {
        let entry: [u8; 16] = read_array(source)?;
        let dims = Dimensions::new(entry_extent(entry[0]), entry_extent(entry[1]));
        trace!(index, width = dims.width, height = dims.height, "Icon entry");

        if best.map_or(true, |current| dims.area() > current.area()) {
            best = Some(dims);
        }
    }

    best.ok_or(ParseError::MissingField("icon directory entry"))
}
