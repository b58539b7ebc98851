//! Format detection and header parsers.
//!
//! Detection runs in two steps. [`detect::sniff`] matches the leading bytes
//! against an ordered signature table to pick one [`ImageFormat`], then the
//! matching parser reads only as much of the header as it needs to find the
//! pixel dimensions.
//!
//! Parsers never trust declared sizes: every length, count and offset taken
//! from the file is checked against the source's size hint before the parser
//! loops over it or seeks to it.

pub mod detect;
mod info;

mod bmp;
mod dds;
mod exr;
mod gif;
mod heif;
mod ico;
mod isobmff;
mod jp2;
mod jpeg;
mod pcx;
mod png;
mod psd;
mod qoi;
mod tga;
pub mod tiff;
mod webp;
mod xcf;

pub use detect::{detect, sniff};
pub use info::{DetectionOutcome, Dimensions, ImageFormat, ImageInfo};

use crate::error::{IoError, ParseError};
use crate::io::ByteSource;

/// Signature of a format parser.
///
/// The source is positioned at offset 0 when the parser is called.
pub(crate) type ParseFn = fn(&mut dyn ByteSource) -> Result<Dimensions, ParseError>;

/// Check that `len` bytes starting at `offset` lie inside the source.
///
/// Sources without a size hint only get the overflow check; their reads
/// fail on their own when the data runs out.
pub(crate) fn ensure_within(
    source: &dyn ByteSource,
    what: &'static str,
    offset: u64,
    len: u64,
) -> Result<(), ParseError> {
    let size = source.len_hint();
    match (offset.checked_add(len), size) {
        (Some(end), Some(size)) if end <= size => Ok(()),
        (Some(_), None) => Ok(()),
        _ => Err(ParseError::OutOfBounds {
            what,
            offset,
            len,
            size: size.unwrap_or(u64::MAX),
        }),
    }
}

/// Move to `offset`, skipping forward when possible so streams keep working.
pub(crate) fn advance_to(source: &mut dyn ByteSource, offset: u64) -> Result<(), IoError> {
    let position = source.position();
    if offset >= position {
        source.skip(offset - position)
    } else {
        source.seek_to(offset)
    }
}
