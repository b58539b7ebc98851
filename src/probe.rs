//! Entry points for every kind of input.
//!
//! Each function wraps its input in a [`ByteSource`] and runs
//! [`detect`](crate::format::detect). The caller keeps ownership of any
//! handle it passes in; nothing here closes a caller's file or descriptor.

use std::ffi::OsStr;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::DetectError;
use crate::format::{detect, DetectionOutcome};
use crate::io::{BufferSource, ByteSource, ReaderSource, StreamSource};

// =============================================================================
// Entry Points
// =============================================================================

/// Open the file at `path` and detect its format and dimensions.
pub fn detect_path(path: impl AsRef<Path>) -> DetectionOutcome {
    let mut source = ReaderSource::open(path)?;
    detect(&mut source)
}

/// Detect from an in-memory buffer.
pub fn detect_bytes(data: &[u8]) -> DetectionOutcome {
    detect(&mut BufferSource::new(data))
}

/// Detect from an open file, starting at its current position.
///
/// The file's position is restored afterwards. Handles that cannot seek,
/// such as pipes, are read as a stream.
pub fn detect_file(file: &File) -> DetectionOutcome {
    let mut handle = file;
    let start = match handle.stream_position() {
        Ok(start) => start,
        Err(error) => {
            debug!(error = %error, "Handle is not seekable, reading as a stream");
            return detect_stream(file);
        }
    };

    let outcome = match ReaderSource::with_identifier(file, "<file>") {
        Ok(mut source) => detect(&mut source),
        Err(error) => {
            debug!(error = %error, "Handle is not seekable, reading as a stream");
            return detect_stream(file);
        }
    };

    if let Err(error) = handle.seek(SeekFrom::Start(start)) {
        debug!(error = %error, start, "Could not restore handle position");
    }
    outcome
}

/// Detect from a borrowed file descriptor.
///
/// The descriptor is duplicated; the caller's descriptor stays open.
#[cfg(unix)]
pub fn detect_fd(fd: std::os::fd::BorrowedFd<'_>) -> DetectionOutcome {
    let owned = fd
        .try_clone_to_owned()
        .map_err(|error| DetectError::Io(error.into()))?;
    detect_file(&File::from(owned))
}

/// Detect from a borrowed Windows handle.
///
/// The handle is duplicated; the caller's handle stays open.
#[cfg(windows)]
pub fn detect_handle(handle: std::os::windows::io::BorrowedHandle<'_>) -> DetectionOutcome {
    let owned = handle
        .try_clone_to_owned()
        .map_err(|error| DetectError::Io(error.into()))?;
    detect_file(&File::from(owned))
}

/// Detect from a seekable reader, starting at its current position.
pub fn detect_reader<R: Read + Seek>(reader: R) -> DetectionOutcome {
    let mut source = ReaderSource::new(reader)?;
    detect(&mut source)
}

/// Detect from a forward-only reader.
///
/// Formats whose dimensions sit beyond a backward jump, and TGA, which is
/// only recognised by its trailer, are not detectable this way.
pub fn detect_stream<R: Read>(reader: R) -> DetectionOutcome {
    detect(&mut StreamSource::new(reader))
}

/// Detect from any byte source.
pub fn detect_source(source: &mut dyn ByteSource) -> DetectionOutcome {
    detect(source)
}

// =============================================================================
// Probe
// =============================================================================

/// Inputs accepted by [`imsz`].
pub trait Probe {
    fn probe(self) -> DetectionOutcome;
}

impl Probe for &str {
    fn probe(self) -> DetectionOutcome {
        detect_path(self)
    }
}

impl Probe for String {
    fn probe(self) -> DetectionOutcome {
        detect_path(self)
    }
}

impl Probe for &Path {
    fn probe(self) -> DetectionOutcome {
        detect_path(self)
    }
}

impl Probe for PathBuf {
    fn probe(self) -> DetectionOutcome {
        detect_path(self)
    }
}

impl Probe for &OsStr {
    fn probe(self) -> DetectionOutcome {
        detect_path(self)
    }
}

impl Probe for &[u8] {
    fn probe(self) -> DetectionOutcome {
        detect_bytes(self)
    }
}

impl Probe for Vec<u8> {
    fn probe(self) -> DetectionOutcome {
        detect_bytes(&self)
    }
}

impl Probe for &File {
    fn probe(self) -> DetectionOutcome {
        detect_file(self)
    }
}

/// Detect the format and dimensions of a path, buffer or open file.
///
/// ```rust,no_run
/// let info = imsz::imsz("photo.jpg")?;
/// println!("{}: {} x {}", info.format, info.width, info.height);
/// # Ok::<(), imsz::DetectError>(())
/// ```
pub fn imsz(input: impl Probe) -> DetectionOutcome {
    input.probe()
}
