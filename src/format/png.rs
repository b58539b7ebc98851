//! PNG chunk walk up to `IHDR`.

use tracing::trace;

use crate::error::ParseError;
use crate::io::{field, read_array, ByteSource};

use super::{ensure_within, Dimensions};

pub(crate) const SIGNATURE_LEN: usize = 8;

const SIGNATURE: &[u8; SIGNATURE_LEN] = b"\x89PNG\r\n\x1a\n";

const IHDR: &[u8; 4] = b"IHDR";
const IEND: &[u8; 4] = b"IEND";

/// Minimum IHDR payload: width, height, depth, colour type, compression,
/// filter and interlace.
const IHDR_LEN: u32 = 13;

/// Chunk lengths are limited to 2^31 - 1.
const MAX_CHUNK_LEN: u32 = 0x7FFF_FFFF;

/// Length and type fields of a chunk.
const CHUNK_HEADER_LEN: u64 = 8;
const CRC_LEN: u64 = 4;

pub(crate) fn matches(prefix: &[u8]) -> bool {
    prefix.starts_with(SIGNATURE)
}

/// Walk chunks until `IHDR`.
///
/// Apple's `CgBI` chunk (and anything else in front of `IHDR`) is skipped.
pub(crate) fn parse(source: &mut dyn ByteSource) -> Result<Dimensions, ParseError> {
    source.seek_to(SIGNATURE_LEN as u64)?;

    loop {
        let header: [u8; 8] = read_array(source)?;
        let length = u32::from_be_bytes(field(&header, 0)?);
        let kind = &header[4..8];

        if length > MAX_CHUNK_LEN {
            return Err(ParseError::InvalidField {
                field: "chunk length",
                message: format!("{length} exceeds the PNG limit"),
            });
        }

        if kind == IHDR {
            if length < IHDR_LEN {
                return Err(ParseError::InvalidField {
                    field: "IHDR length",
                    message: format!("expected at least {IHDR_LEN}, got {length}"),
                });
            }
            let size: [u8; 8] = read_array(source)?;
            return Ok(Dimensions::new(
                u64::from(u32::from_be_bytes(field(&size, 0)?)),
                u64::from(u32::from_be_bytes(field(&size, 4)?)),
            ));
        }

        if kind == IEND {
            return Err(ParseError::MissingField("IHDR"));
        }

        let skip = u64::from(length) + CRC_LEN;
        trace!(
            chunk = %String::from_utf8_lossy(kind),
            offset = source.position() - CHUNK_HEADER_LEN,
            length,
            "Skipping PNG chunk"
        );
        ensure_within(source, "PNG chunk", source.position(), skip)?;
        source.skip(skip)?;
    }
}
