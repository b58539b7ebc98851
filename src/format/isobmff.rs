//! ISO base media file format box walking.
//!
//! Used by the HEIF family (AVIF, HEIC) and by JPEG 2000. A box is
//!
//! ```text
//! size (u32 BE) | type (4 bytes) | [largesize (u64 BE) if size == 1] | payload
//! ```
//!
//! where size 0 means the box runs to the end of its container. Every box is
//! checked against its parent's end and the source's size hint before it is
//! walked.

use tracing::trace;

use crate::error::ParseError;
use crate::io::{field, read_array, ByteSource};

use super::{advance_to, ensure_within};

pub(crate) type FourCc = [u8; 4];

/// Header of one box, with absolute offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BoxHeader {
    pub kind: FourCc,
    pub offset: u64,
    pub header_len: u64,
    pub end: u64,
}

impl BoxHeader {
    pub fn payload_start(&self) -> u64 {
        self.offset + self.header_len
    }

    pub fn payload_len(&self) -> u64 {
        self.end - self.payload_start()
    }
}

/// End of the top-level container: the size hint, or unbounded for streams.
pub(crate) fn source_end(source: &dyn ByteSource) -> u64 {
    source.len_hint().unwrap_or(u64::MAX)
}

/// Read the box header at the current position.
///
/// `limit` is the end of the enclosing container. On success the source is
/// positioned at the start of the payload.
pub(crate) fn read_box_header(
    source: &mut dyn ByteSource,
    limit: u64,
) -> Result<BoxHeader, ParseError> {
    let offset = source.position();
    let head: [u8; 8] = read_array(source)?;
    let kind = [head[4], head[5], head[6], head[7]];

    let (end, header_len) = match u32::from_be_bytes(field(&head, 0)?) {
        0 => (limit, 8),
        1 => {
            let size = u64::from_be_bytes(read_array(source)?);
            (offset.saturating_add(size), 16)
        }
        size => (offset.saturating_add(u64::from(size)), 8),
    };

    if end < offset + header_len {
        return Err(ParseError::InvalidField {
            field: "box size",
            message: format!(
                "{} box at offset {offset} is smaller than its header",
                String::from_utf8_lossy(&kind)
            ),
        });
    }
    if end > limit {
        return Err(ParseError::OutOfBounds {
            what: "box",
            offset,
            len: end - offset,
            size: limit,
        });
    }
    if end != u64::MAX {
        ensure_within(source, "box", offset, end - offset)?;
    }

    Ok(BoxHeader {
        kind,
        offset,
        header_len,
        end,
    })
}

/// Read the version and flags of a FullBox.
pub(crate) fn read_full_box_header(source: &mut dyn ByteSource) -> Result<(u8, u32), ParseError> {
    let data: [u8; 4] = read_array(source)?;
    Ok((data[0], u32::from_be_bytes([0, data[1], data[2], data[3]])))
}

/// Find the first box of type `kind` among the siblings in `[start, end)`.
///
/// The source is left at the found box's payload.
pub(crate) fn find_box(
    source: &mut dyn ByteSource,
    start: u64,
    end: u64,
    kind: &'static FourCc,
) -> Result<BoxHeader, ParseError> {
    let mut offset = start;
    while offset < end {
        advance_to(source, offset)?;
        let header = read_box_header(source, end)?;
        if &header.kind == kind {
            return Ok(header);
        }
        trace_box(&header);
        offset = header.end;
    }
    Err(ParseError::MissingField(
        std::str::from_utf8(kind).unwrap_or("box"),
    ))
}

/// Call `visit` for every child box in `[start, end)`.
///
/// `visit` receives the source positioned at the child's payload and may
/// read any part of it.
pub(crate) fn for_each_child<F>(
    source: &mut dyn ByteSource,
    start: u64,
    end: u64,
    mut visit: F,
) -> Result<(), ParseError>
where
    F: FnMut(&mut dyn ByteSource, &BoxHeader) -> Result<(), ParseError>,
{
    let mut offset = start;
    while offset < end {
        advance_to(source, offset)?;
        let header = read_box_header(source, end)?;
        trace_box(&header);
        visit(source, &header)?;
        offset = header.end;
    }
    Ok(())
}

/// Fail if a reader went past the end of the box it was parsing.
pub(crate) fn ensure_inside(
    source: &dyn ByteSource,
    header: &BoxHeader,
    field: &'static str,
) -> Result<(), ParseError> {
    if source.position() > header.end {
        return Err(ParseError::InvalidField {
            field,
            message: format!(
                "contents overrun the box ending at offset {}",
                header.end
            ),
        });
    }
    Ok(())
}

fn trace_box(header: &BoxHeader) {
    trace!(
        kind = %String::from_utf8_lossy(&header.kind),
        offset = header.offset,
        end = header.end,
        "Box"
    );
}
