//! TIFF and BigTIFF.
//!
//! # Key Concepts
//!
//! - **Byte order**: TIFF files declare their endianness (II = little-endian, MM = big-endian)
//!   in the header. All multi-byte values must be read respecting this order.
//!
//! - **Classic TIFF vs BigTIFF**: Classic TIFF uses 32-bit offsets and 16-bit entry
//!   counts, BigTIFF uses 64-bit ones. The parser handles both transparently.
//!
//! - **IFD (Image File Directory)**: A counted list of tagged entries. The size of the
//!   first image comes from the ImageWidth and ImageLength entries of the first IFD.
//!
//! - **Inline vs offset values**: Small values are stored inline in the IFD entry,
//!   larger values are stored at an offset pointed to by the entry.

mod parser;
mod tags;
mod values;

pub use parser::{
    is_tiff_header, ByteOrder, IfdEntry, TiffHeader, BIGTIFF_HEADER_SIZE, MAX_IFD_ENTRY_SIZE,
    TIFF_HEADER_SIZE,
};
pub use tags::{FieldType, TiffTag};
pub use values::read_unsigned;

use tracing::trace;

use crate::error::ParseError;
use crate::io::ByteSource;

use super::{advance_to, ensure_within, Dimensions};

pub(crate) const SIGNATURE_LEN: usize = 4;

pub(crate) fn matches(prefix: &[u8]) -> bool {
    is_tiff_header(prefix)
}

/// Read the width and height of the first image.
pub(crate) fn parse(source: &mut dyn ByteSource) -> Result<Dimensions, ParseError> {
    let mut bytes = [0u8; BIGTIFF_HEADER_SIZE];
    source.read_exact(&mut bytes[..TIFF_HEADER_SIZE])?;
    let header_len = if TiffHeader::is_bigtiff_signature(&bytes) {
        source.read_exact(&mut bytes[TIFF_HEADER_SIZE..])?;
        BIGTIFF_HEADER_SIZE
    } else {
        TIFF_HEADER_SIZE
    };
    let header = TiffHeader::parse(&bytes[..header_len], source.len_hint())?;

    let ifd_offset = header.first_ifd_offset;
    advance_to(source, ifd_offset)?;

    let count_size = header.ifd_count_size();
    let mut count_bytes = [0u8; 8];
    source.read_exact(&mut count_bytes[..count_size])?;
    let count = header.read_entry_count(count_bytes);

    let entry_size = header.ifd_entry_size();
    ensure_within(
        source,
        "IFD entries",
        ifd_offset.saturating_add(count_size as u64),
        count.saturating_mul(entry_size as u64),
    )?;
    trace!(offset = ifd_offset, count, "Reading first IFD");

    let mut width = None;
    let mut height = None;
    let mut raw = [0u8; MAX_IFD_ENTRY_SIZE];
    for index in 0..count {
        source.read_exact(&mut raw[..entry_size])?;
        let entry = IfdEntry::parse(&raw[..entry_size], &header)?;

        match TiffTag::from_u16(entry.tag) {
            Some(tag @ TiffTag::ImageWidth) => {
                width = Some(read_unsigned(source, &header, &entry, tag.name())?);
            }
            Some(tag @ TiffTag::ImageLength) => {
                height = Some(read_unsigned(source, &header, &entry, tag.name())?);
            }
            None => trace!(index, tag = entry.tag, "Skipping IFD entry"),
        }

        if let (Some(width), Some(height)) = (width, height) {
            return Ok(Dimensions::new(width, height));
        }
    }

    Err(ParseError::MissingField(if width.is_none() {
        TiffTag::ImageWidth.name()
    } else {
        TiffTag::ImageLength.name()
    }))
}
