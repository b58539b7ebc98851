//! # imsz
//!
//! Image format and dimension sniffing.
//!
//! Given a file path, an open handle, a reader or a byte buffer, imsz
//! identifies which of 17 raster formats the data is and reports the pixel
//! width and height declared in its header. Only the few bytes needed to
//! find the dimensions are read; pixel data is never decoded.
//!
//! ## Supported formats
//!
//! GIF, PNG, BMP, JPEG, WebP, QOI, PSD/PSB, XCF, ICO/CUR, AVIF, TIFF/BigTIFF,
//! OpenEXR, PCX, TGA, DDS, HEIC/HEIF and JPEG 2000.
//!
//! ## Architecture
//!
//! - [`io`] - The [`ByteSource`] trait and its buffer, reader and stream backings
//! - [`mod@format`] - Format identifiers, the magic sniffer and one parser per format
//! - [`probe`] - Entry points for paths, handles, readers and buffers
//! - [`boundary`] - Integer status codes and a C-layout record for foreign callers
//! - [`config`] - Command-line configuration for the `imsz` binary
//!
//! ## Example
//!
//! ```rust,no_run
//! use imsz::{imsz, ImageFormat};
//!
//! let info = imsz("photo.png").unwrap();
//! assert_eq!(info.format, ImageFormat::Png);
//! println!("{} x {}", info.width, info.height);
//! ```

pub mod boundary;
pub mod config;
pub mod error;
pub mod format;
pub mod io;
pub mod probe;

// Re-export commonly used types
pub use error::{DetectError, IoError, ParseError};
pub use format::{detect, sniff, DetectionOutcome, ImageFormat, ImageInfo};
pub use io::{BufferSource, ByteSource, ReaderSource, StreamSource};
#[cfg(unix)]
pub use probe::detect_fd;
#[cfg(windows)]
pub use probe::detect_handle;
pub use probe::{
    detect_bytes, detect_file, detect_path, detect_reader, detect_source, detect_stream, imsz,
    Probe,
};
