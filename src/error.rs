use thiserror::Error;

use crate::format::ImageFormat;

/// I/O errors that can occur when reading from a byte source
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IoError {
    /// The source ended before the requested bytes were available
    #[error("Unexpected end of data: requested {requested} bytes at offset {offset}")]
    UnexpectedEof { offset: u64, requested: u64 },

    /// The source cannot move to the requested position
    #[error("Source is not seekable: cannot move from offset {from} to {to}")]
    NotSeekable { from: u64, to: u64 },

    /// Error reported by the operating system
    #[error("OS error {code}: {message}")]
    Os { code: i32, message: String },

    /// Any other I/O failure without an OS error code
    #[error("{0}")]
    Other(String),
}

impl IoError {
    /// The operating system error code, when the failure came from the OS.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            IoError::Os { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<std::io::Error> for IoError {
    fn from(error: std::io::Error) -> Self {
        match error.raw_os_error() {
            Some(code) => IoError::Os {
                code,
                message: error.to_string(),
            },
            None => IoError::Other(error.to_string()),
        }
    }
}

/// Errors raised by a format parser once the format has been identified
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Header ended before a required structure was complete
    #[error("Truncated header: needed {requested} bytes at offset {offset}")]
    Truncated { offset: u64, requested: u64 },

    /// A declared length, count or offset points past the end of the data
    #[error("{what} out of bounds: {len} bytes at offset {offset}, size is {size}")]
    OutOfBounds {
        what: &'static str,
        offset: u64,
        len: u64,
        size: u64,
    },

    /// A secondary signature inside the header does not match
    #[error("Invalid {0} signature")]
    InvalidMagic(&'static str),

    /// Field has a value the format does not allow
    #[error("Invalid value for {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },

    /// The structure walk ended without finding the dimensions
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Failure of the underlying source that is not a short read
    #[error("I/O error: {0}")]
    Io(IoError),
}

impl From<IoError> for ParseError {
    fn from(error: IoError) -> Self {
        match error {
            IoError::UnexpectedEof { offset, requested } => {
                ParseError::Truncated { offset, requested }
            }
            other => ParseError::Io(other),
        }
    }
}

/// Errors returned by image detection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetectError {
    /// The required bytes could not be obtained
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// The format was identified but its header is malformed
    #[error("Error parsing {format} image: {reason}")]
    Parse {
        format: ImageFormat,
        reason: ParseError,
    },

    /// No supported format matched the leading bytes
    #[error("Unsupported format")]
    UnsupportedFormat,
}

impl DetectError {
    /// Attach the attempted format to a parser failure.
    ///
    /// Source failures other than short reads stay I/O errors.
    pub fn from_parse(format: ImageFormat, reason: ParseError) -> Self {
        match reason {
            ParseError::Io(error) => DetectError::Io(error),
            reason => DetectError::Parse { format, reason },
        }
    }

    /// The operating system error code behind an I/O failure, if any.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            DetectError::Io(error) => error.raw_os_error(),
            _ => None,
        }
    }

    /// The format the parser was working on when it failed.
    pub fn attempted_format(&self) -> Option<ImageFormat> {
        match self {
            DetectError::Parse { format, .. } => Some(*format),
            _ => None,
        }
    }

    /// Short machine-readable name of the failure kind.
    pub const fn kind(&self) -> &'static str {
        match self {
            DetectError::Io(_) => "io",
            DetectError::Parse { .. } => "parse",
            DetectError::UnsupportedFormat => "unsupported",
        }
    }
}
