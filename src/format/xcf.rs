//! GIMP XCF header.

use crate::error::ParseError;
use crate::io::{field, read_array, ByteSource};

use super::Dimensions;

pub(crate) const SIGNATURE_LEN: usize = 9;

pub(crate) fn matches(prefix: &[u8]) -> bool {
    prefix.starts_with(b"gimp xcf ")
}

/// `gimp xcf ` + 4-byte version tag (`file` or `vNNN`) + NUL, then width
/// and height.
pub(crate) fn parse(source: &mut dyn ByteSource) -> Result<Dimensions, ParseError> {
    let header: [u8; 22] = read_array(source)?;

    if header[13] != 0 {
        return Err(ParseError::InvalidField {
            field: "version tag",
            message: "version tag is not NUL-terminated".to_string(),
        });
    }

    Ok(Dimensions::new(
        u64::from(u32::from_be_bytes(field(&header, 14)?)),
        u64::from(u32::from_be_bytes(field(&header, 18)?)),
    ))
}
