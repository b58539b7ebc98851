//! JPEG marker scan up to the first start-of-frame segment.
//!
//! A JPEG stream is a sequence of marker segments, each `FF xx` followed
//! (for most markers) by a big-endian length that includes the two length
//! bytes themselves. The frame header (SOFn) carries the image size:
//!
//! ```text
//! FF Cn | length (2) | precision (1) | height (2) | width (2) | ...
//! ```

use tracing::trace;

use crate::error::ParseError;
use crate::io::{field, read_array, ByteSource};

use super::{ensure_within, Dimensions};

// =============================================================================
// JPEG Markers
// =============================================================================

/// Start Of Image marker
pub const SOI: [u8; 2] = [0xFF, 0xD8];

/// Marker prefix byte; repeated prefixes are fill bytes
const MARKER_PREFIX: u8 = 0xFF;

/// End Of Image marker
const EOI: u8 = 0xD9;

/// Start Of Scan marker; entropy-coded data follows
const SOS: u8 = 0xDA;

/// Temporary marker, no payload
const TEM: u8 = 0x01;

pub(crate) const SIGNATURE_LEN: usize = 2;

pub(crate) fn matches(prefix: &[u8]) -> bool {
    prefix.starts_with(&SOI)
}

/// Start-of-frame markers for every coding process.
///
/// C4 (DHT), C8 (JPG extension) and CC (DAC) share the range but are not
/// frame headers.
pub(crate) const fn is_sof(marker: u8) -> bool {
    matches!(marker, 0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF)
}

/// Markers that stand alone, without a length field: TEM, RST0-RST7 and a
/// repeated SOI.
const fn is_standalone(marker: u8) -> bool {
    matches!(marker, TEM | 0xD0..=0xD8)
}

// =============================================================================
// Marker Scan
// =============================================================================

/// Read up to the next marker code, skipping stray bytes and fill bytes.
fn next_marker(source: &mut dyn ByteSource) -> Result<u8, ParseError> {
    loop {
        let [byte] = read_array::<1>(source)?;
        if byte != MARKER_PREFIX {
            continue;
        }

        let [mut code] = read_array::<1>(source)?;
        while code == MARKER_PREFIX {
            [code] = read_array::<1>(source)?;
        }
        // FF 00 is a stuffed data byte, not a marker.
        if code != 0x00 {
            return Ok(code);
        }
    }
}

pub(crate) fn parse(source: &mut dyn ByteSource) -> Result<Dimensions, ParseError> {
    source.seek_to(SOI.len() as u64)?;

    loop {
        let marker = next_marker(source)?;

        if is_sof(marker) {
            let frame: [u8; 7] = read_array(source)?;
            let length = u16::from_be_bytes(field(&frame, 0)?);
            if length < 8 {
                return Err(ParseError::InvalidField {
                    field: "SOF length",
                    message: format!("{length} is shorter than a frame header"),
                });
            }
            return Ok(Dimensions::new(
                u64::from(u16::from_be_bytes(field(&frame, 5)?)),
                u64::from(u16::from_be_bytes(field(&frame, 3)?)),
            ));
        }

        match marker {
            EOI | SOS => return Err(ParseError::MissingField("SOF")),
            m if is_standalone(m) => continue,
            _ => {}
        }

        let length = u16::from_be_bytes(read_array(source)?);
        if length < 2 {
            return Err(ParseError::InvalidField {
                field: "segment length",
                message: format!("{length} is shorter than the length field"),
            });
        }

        let skip = u64::from(length - 2);
        trace!(
            marker,
            offset = source.position() - 4,
            length,
            "Skipping JPEG segment"
        );
        ensure_within(source, "JPEG segment", source.position(), skip)?;
        source.skip(skip)?;
    }
}
