//! Integer status codes for foreign callers.
//!
//! Inside the crate every detection returns a [`DetectionOutcome`]. Bindings
//! to other languages need a fixed record plus a small integer status, so
//! this module flattens an outcome into that shape and maps status codes
//! back into a tagged [`Status`] on the calling side.
//!
//! | Status | Meaning                                             |
//! |--------|-----------------------------------------------------|
//! | `0`    | success, record populated                           |
//! | `> 0`  | I/O failure, the value is the OS error code         |
//! | `-1`   | I/O failure without an OS error code                |
//! | `-2`   | parser failure, record format populated             |
//! | `-3`   | unsupported format, record untouched                |

use std::ffi::{c_int, c_uint, CStr};

use crate::error::DetectError;
use crate::format::{DetectionOutcome, ImageFormat};

// =============================================================================
// Status Codes
// =============================================================================

pub const IMSZ_OK: c_int = 0;
pub const IMSZ_ERR_IO: c_int = -1;
pub const IMSZ_ERR_PARSER: c_int = -2;
pub const IMSZ_ERR_UNSUPPORTED: c_int = -3;

/// Result record shared with foreign callers.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawImageInfo {
    /// Numeric [`ImageFormat`] identifier, 0 when unset
    pub format: c_uint,
    pub width: u64,
    pub height: u64,
}

/// Write `outcome` into `info` and return its status code.
pub fn flatten(outcome: &DetectionOutcome, info: &mut RawImageInfo) -> c_int {
    match outcome {
        Ok(image) => {
            *info = RawImageInfo {
                format: image.format.id(),
                width: image.width,
                height: image.height,
            };
            IMSZ_OK
        }
        Err(DetectError::Io(error)) => match error.raw_os_error() {
            Some(code) if code > 0 => code,
            _ => IMSZ_ERR_IO,
        },
        Err(DetectError::Parse { format, .. }) => {
            info.format = format.id();
            IMSZ_ERR_PARSER
        }
        Err(DetectError::UnsupportedFormat) => IMSZ_ERR_UNSUPPORTED,
    }
}

/// A status code as seen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Io { os_code: Option<i32> },
    Parse,
    Unsupported,
    /// A code this version does not know about
    Unknown(c_int),
}

impl Status {
    pub const fn from_code(code: c_int) -> Self {
        match code {
            IMSZ_OK => Status::Ok,
            IMSZ_ERR_IO => Status::Io { os_code: None },
            IMSZ_ERR_PARSER => Status::Parse,
            IMSZ_ERR_UNSUPPORTED => Status::Unsupported,
            code if code > 0 => Status::Io {
                os_code: Some(code),
            },
            code => Status::Unknown(code),
        }
    }
}

// =============================================================================
// Format Names
// =============================================================================

const fn c_name(format: ImageFormat) -> &'static CStr {
    match format {
        ImageFormat::Gif => c"GIF",
        ImageFormat::Png => c"PNG",
        ImageFormat::Bmp => c"BMP",
        ImageFormat::Jpeg => c"JPEG",
        ImageFormat::WebP => c"WebP",
        ImageFormat::Qoi => c"QOI",
        ImageFormat::Psd => c"PSD",
        ImageFormat::Xcf => c"XCF",
        ImageFormat::Ico => c"ICO",
        ImageFormat::Avif => c"AVIF",
        ImageFormat::Tiff => c"TIFF",
        ImageFormat::OpenExr => c"OpenEXR",
        ImageFormat::Pcx => c"PCX",
        ImageFormat::Tga => c"TGA",
        ImageFormat::Dds => c"DDS",
        ImageFormat::Heic => c"HEIC",
        ImageFormat::Jp2k => c"JPEG 2000",
    }
}

/// Canonical name of a format identifier as a NUL-terminated string.
pub fn format_name(id: c_uint) -> Option<&'static CStr> {
    ImageFormat::from_id(id).map(c_name)
}

/// Canonical name of a format identifier as NUL-terminated UTF-16.
pub fn format_name_wide(id: c_uint) -> Option<Vec<u16>> {
    let format = ImageFormat::from_id(id)?;
    Some(format.name().encode_utf16().chain(Some(0)).collect())
}
