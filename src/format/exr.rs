//! OpenEXR header attribute list.
//!
//! After the magic number and version field the header is a sequence of
//! attributes, `name\0 type\0 size(u32 LE) value`, closed by an empty name.
//! The image size is the `displayWindow` attribute (`box2i`).

use tracing::trace;

use crate::error::ParseError;
use crate::io::{field, read_array, ByteSource};

use super::{ensure_within, Dimensions};

pub(crate) const SIGNATURE_LEN: usize = 4;

const MAGIC: [u8; 4] = [0x76, 0x2F, 0x31, 0x01];

/// Attribute names and type names are limited to 255 bytes.
const MAX_NAME_LEN: usize = 255;

const DISPLAY_WINDOW: &[u8] = b"displayWindow";
const BOX2I: &[u8] = b"box2i";
const BOX2I_LEN: u32 = 16;

pub(crate) fn matches(prefix: &[u8]) -> bool {
    prefix.starts_with(&MAGIC)
}

pub(crate) fn parse(source: &mut dyn ByteSource) -> Result<Dimensions, ParseError> {
    let header: [u8; 8] = read_array(source)?;
    let version = header[4];
    if version != 1 && version != 2 {
        return Err(ParseError::InvalidField {
            field: "version",
            message: format!("unsupported version {version}"),
        });
    }

    let mut name_buf = [0u8; MAX_NAME_LEN + 1];
    let mut kind_buf = [0u8; MAX_NAME_LEN + 1];
    loop {
        let name = read_name(source, &mut name_buf, "attribute name")?;
        if name.is_empty() {
            return Err(ParseError::MissingField("displayWindow"));
        }
        let kind = read_name(source, &mut kind_buf, "attribute type")?;
        let size = u32::from_le_bytes(read_array(source)?);

        if name == DISPLAY_WINDOW {
            if kind != BOX2I || size != BOX2I_LEN {
                return Err(ParseError::InvalidField {
                    field: "displayWindow",
                    message: format!(
                        "expected box2i of {BOX2I_LEN} bytes, got {} of {size}",
                        String::from_utf8_lossy(kind)
                    ),
                });
            }
            return read_display_window(source);
        }

        trace!(
            attribute = %String::from_utf8_lossy(name),
            size,
            "Skipping EXR attribute"
        );
        ensure_within(source, "EXR attribute", source.position(), u64::from(size))?;
        source.skip(u64::from(size))?;
    }
}

/// Read a NUL-terminated name into `buf`, returning the name without the NUL.
fn read_name<'a>(
    source: &mut dyn ByteSource,
    buf: &'a mut [u8; MAX_NAME_LEN + 1],
    field: &'static str,
) -> Result<&'a [u8], ParseError> {
    for len in 0..buf.len() {
        let [byte] = read_array::<1>(source)?;
        if byte == 0 {
            return Ok(&buf[..len]);
        }
        buf[len] = byte;
    }
    Err(ParseError::InvalidField {
        field,
        message: format!("longer than {MAX_NAME_LEN} bytes"),
    })
}

/// `xMin yMin xMax yMax` as signed 32-bit integers; bounds are inclusive.
fn read_display_window(source: &mut dyn ByteSource) -> Result<Dimensions, ParseError> {
    let window: [u8; 16] = read_array(source)?;
    let coord = |at: usize| -> Result<i64, ParseError> {
        Ok(i64::from(i32::from_le_bytes(field(&window, at)?)))
    };

    let width = coord(8)? - coord(0)? + 1;
    let height = coord(12)? - coord(4)? + 1;
    if width <= 0 || height <= 0 {
        return Err(ParseError::InvalidField {
            field: "displayWindow",
            message: format!("empty window {width}x{height}"),
        });
    }
    Ok(Dimensions::new(width as u64, height as u64))
}
