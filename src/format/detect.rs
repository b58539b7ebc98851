//! Format detection from magic bytes.
//!
//! The sniffer reads a single prefix of at most [`PEEK_LIMIT`] bytes and tests
//! it against an ordered signature table. The first matching entry wins, so
//! more specific signatures come before looser ones. TGA carries no leading
//! magic and is only recognised by its file trailer, which is checked last.
//!
//! [`detect`] is the single place where "no signature matched" becomes
//! [`DetectError::UnsupportedFormat`] and where parser failures are tagged
//! with the format that was attempted.

use tracing::{debug, trace};

use crate::error::{DetectError, IoError};
use crate::io::{ByteSource, PEEK_LIMIT};

use super::info::{DetectionOutcome, ImageFormat};
use super::{bmp, dds, exr, gif, heif, ico, jp2, jpeg, pcx, png, psd, qoi, tga, tiff, webp, xcf};
use super::ParseFn;

// =============================================================================
// Signature Table
// =============================================================================

/// One entry of the signature table.
struct Signature {
    /// Prefix length the predicate needs; shorter prefixes never match.
    min_len: usize,
    /// Returns the format when the prefix matches. ISOBMFF files classify
    /// themselves by brand.
    classify: fn(&[u8]) -> Option<ImageFormat>,
}

macro_rules! signature {
    ($format:expr, $module:ident) => {
        Signature {
            min_len: $module::SIGNATURE_LEN,
            classify: |prefix| $module::matches(prefix).then_some($format),
        }
    };
}

/// Signatures in test order.
///
/// BMP precedes JPEG and the ISOBMFF brands precede JPEG 2000 and TIFF, so
/// the longer or stricter checks decide first.
const SIGNATURES: &[Signature] = &[
    signature!(ImageFormat::Gif, gif),
    signature!(ImageFormat::Png, png),
    signature!(ImageFormat::Bmp, bmp),
    signature!(ImageFormat::Jpeg, jpeg),
    signature!(ImageFormat::WebP, webp),
    Signature {
        min_len: heif::SIGNATURE_LEN,
        classify: heif::brand_format,
    },
    signature!(ImageFormat::Jp2k, jp2),
    signature!(ImageFormat::Tiff, tiff),
    signature!(ImageFormat::Qoi, qoi),
    signature!(ImageFormat::Psd, psd),
    signature!(ImageFormat::Xcf, xcf),
    signature!(ImageFormat::Ico, ico),
    signature!(ImageFormat::OpenExr, exr),
    signature!(ImageFormat::Pcx, pcx),
    signature!(ImageFormat::Dds, dds),
];

/// Identify a format from leading bytes alone.
///
/// Only the first [`PEEK_LIMIT`] bytes are considered. TGA is never
/// returned here because it needs the end of the file; use [`detect`] for
/// the complete check.
pub fn sniff(prefix: &[u8]) -> Option<ImageFormat> {
    let prefix = &prefix[..prefix.len().min(PEEK_LIMIT)];
    SIGNATURES.iter().find_map(|signature| {
        if prefix.len() < signature.min_len {
            return None;
        }
        (signature.classify)(prefix)
    })
}

/// Sniff the format of a source, including the TGA trailer check.
///
/// Leaves the source at offset 0.
fn sniff_source(source: &mut dyn ByteSource) -> Result<Option<ImageFormat>, IoError> {
    let mut buf = [0u8; PEEK_LIMIT];
    let filled = source.read_fill(&mut buf)?;
    source.seek_to(0)?;
    let prefix = &buf[..filled];

    if let Some(format) = sniff(prefix) {
        return Ok(Some(format));
    }

    if tga::plausible_header(prefix) && tga::has_trailer(source)? {
        return Ok(Some(ImageFormat::Tga));
    }

    trace!(
        source = source.identifier(),
        prefix_len = filled,
        "No signature matched"
    );
    Ok(None)
}

// =============================================================================
// Dispatch
// =============================================================================

/// Parser for each format.
fn parser_for(format: ImageFormat) -> ParseFn {
    match format {
        ImageFormat::Gif => gif::parse,
        ImageFormat::Png => png::parse,
        ImageFormat::Bmp => bmp::parse,
        ImageFormat::Jpeg => jpeg::parse,
        ImageFormat::WebP => webp::parse,
        ImageFormat::Qoi => qoi::parse,
        ImageFormat::Psd => psd::parse,
        ImageFormat::Xcf => xcf::parse,
        ImageFormat::Ico => ico::parse,
        ImageFormat::Avif | ImageFormat::Heic => heif::parse,
        ImageFormat::Tiff => tiff::parse,
        ImageFormat::OpenExr => exr::parse,
        ImageFormat::Pcx => pcx::parse,
        ImageFormat::Tga => tga::parse,
        ImageFormat::Dds => dds::parse,
        ImageFormat::Jp2k => jp2::parse,
    }
}

/// Detect the format and dimensions of the image in `source`.
///
/// The source must be positioned at the start of the image.
pub fn detect(source: &mut dyn ByteSource) -> DetectionOutcome {
    let format = match sniff_source(source)? {
        Some(format) => format,
        None => {
            debug!(source = source.identifier(), "Unsupported format");
            return Err(DetectError::UnsupportedFormat);
        }
    };
    debug!(source = source.identifier(), format = %format, "Signature matched");

    match parser_for(format)(source) {
        Ok(dimensions) => {
            debug!(
                source = source.identifier(),
                format = %format,
                width = dimensions.width,
                height = dimensions.height,
                "Parsed header"
            );
            Ok(dimensions.with_format(format))
        }
        Err(reason) => {
            debug!(
                source = source.identifier(),
                format = %format,
                error = %reason,
                "Header parse failed"
            );
            Err(DetectError::from_parse(format, reason))
        }
    }
}
