//! WebP RIFF container.
//!
//! The image size lives in the first bitstream chunk: `VP8 ` (lossy key
//! frame), `VP8L` (lossless) or `VP8X` (extended canvas). Other chunks in
//! front of it are skipped.

use tracing::trace;

use crate::error::ParseError;
use crate::io::{field, read_array, ByteSource};

use super::{ensure_within, Dimensions};

pub(crate) const SIGNATURE_LEN: usize = 12;

const RIFF_HEADER_LEN: u64 = 12;
const CHUNK_HEADER_LEN: u64 = 8;

/// Start code of a VP8 key frame
const VP8_START_CODE: [u8; 3] = [0x9D, 0x01, 0x2A];

/// First byte of a VP8L bitstream
const VP8L_SIGNATURE: u8 = 0x2F;

const FOURTEEN_BITS: u32 = 0x3FFF;

pub(crate) fn matches(prefix: &[u8]) -> bool {
    prefix.starts_with(b"RIFF") && &prefix[8..12] == b"WEBP"
}

pub(crate) fn parse(source: &mut dyn ByteSource) -> Result<Dimensions, ParseError> {
    let header: [u8; 12] = read_array(source)?;
    // The RIFF size counts everything after the size field.
    let mut riff_end = 8 + u64::from(u32::from_le_bytes(field(&header, 4)?));
    if riff_end < RIFF_HEADER_LEN + CHUNK_HEADER_LEN {
        // Too small to hold a single chunk; walk to the end of the data.
        trace!(riff_end, "Ignoring understated RIFF size");
        riff_end = source.len_hint().unwrap_or(u64::MAX);
    }

    let mut offset = RIFF_HEADER_LEN;
    while offset.saturating_add(CHUNK_HEADER_LEN) <= riff_end {
        let chunk: [u8; 8] = read_array(source)?;
        let size = u64::from(u32::from_le_bytes(field(&chunk, 4)?));

        match &chunk[0..4] {
            b"VP8 " => return parse_vp8(source),
            b"VP8L" => return parse_vp8l(source),
            b"VP8X" => return parse_vp8x(source),
            kind => {
                // Chunk payloads are padded to an even length.
                let padded = size + (size & 1);
                trace!(
                    chunk = %String::from_utf8_lossy(kind),
                    offset,
                    size,
                    "Skipping WebP chunk"
                );
                ensure_within(source, "WebP chunk", offset + CHUNK_HEADER_LEN, padded)?;
                source.skip(padded)?;
                offset += CHUNK_HEADER_LEN + padded;
            }
        }
    }

    Err(ParseError::MissingField("VP8/VP8L/VP8X chunk"))
}

/// Lossy: 3-byte frame tag, start code, then 14-bit width and height.
fn parse_vp8(source: &mut dyn ByteSource) -> Result<Dimensions, ParseError> {
    let frame: [u8; 10] = read_array(source)?;
    if frame[3..6] != VP8_START_CODE {
        return Err(ParseError::InvalidMagic("VP8 key frame"));
    }
    Ok(Dimensions::new(
        u64::from(u32::from(u16::from_le_bytes(field(&frame, 6)?)) & FOURTEEN_BITS),
        u64::from(u32::from(u16::from_le_bytes(field(&frame, 8)?)) & FOURTEEN_BITS),
    ))
}

/// Lossless: signature byte, then width-1 and height-1 packed in 14 bits each.
fn parse_vp8l(source: &mut dyn ByteSource) -> Result<Dimensions, ParseError> {
    let data: [u8; 5] = read_array(source)?;
    if data[0] != VP8L_SIGNATURE {
        return Err(ParseError::InvalidMagic("VP8L"));
    }
    let bits = u32::from_le_bytes(field(&data, 1)?);
    Ok(Dimensions::new(
        u64::from(bits & FOURTEEN_BITS) + 1,
        u64::from((bits >> 14) & FOURTEEN_BITS) + 1,
    ))
}

/// Extended: flags, then 24-bit canvas width-1 and height-1.
fn parse_vp8x(source: &mut dyn ByteSource) -> Result<Dimensions, ParseError> {
    let [_, _, _, _, w0, w1, w2, h0, h1, h2]: [u8; 10] = read_array(source)?;
    Ok(Dimensions::new(
        u64::from(u32::from_le_bytes([w0, w1, w2, 0])) + 1,
        u64::from(u32::from_le_bytes([h0, h1, h2, 0])) + 1,
    ))
}
