//! Byte sources for header parsing.
//!
//! Every parser reads through the [`ByteSource`] trait. Three backings are
//! provided:
//!
//! - [`BufferSource`] for data already in memory
//! - [`ReaderSource`] for files and other `Read + Seek` values
//! - [`StreamSource`] for pipes, which can only rewind within [`PEEK_LIMIT`]

mod buffer;
mod reader;
mod source;
mod stream;

pub use buffer::BufferSource;
pub use reader::ReaderSource;
pub use source::{field, read_array, ByteSource, PEEK_LIMIT};
pub use stream::StreamSource;
