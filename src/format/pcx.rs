//! ZSoft PCX header.

use crate::error::ParseError;
use crate::io::{field, read_array, ByteSource};

use super::Dimensions;

pub(crate) const SIGNATURE_LEN: usize = 4;

const MANUFACTURER: u8 = 0x0A;

/// Manufacturer byte, version 0..=5 and a valid bits-per-plane.
///
/// The encoding byte is not checked.
pub(crate) fn matches(prefix: &[u8]) -> bool {
    matches!(prefix, [MANUFACTURER, 0..=5, _, 1 | 2 | 4 | 8, ..])
}

/// Dimensions come from the inclusive window `xmin ymin xmax ymax`.
pub(crate) fn parse(source: &mut dyn ByteSource) -> Result<Dimensions, ParseError> {
    let header: [u8; 12] = read_array(source)?;

    let x_min = i64::from(u16::from_le_bytes(field(&header, 4)?));
    let y_min = i64::from(u16::from_le_bytes(field(&header, 6)?));
    let x_max = i64::from(u16::from_le_bytes(field(&header, 8)?));
    let y_max = i64::from(u16::from_le_bytes(field(&header, 10)?));

    Ok(Dimensions::new(
        window_extent("window width", x_min, x_max)?,
        window_extent("window height", y_min, y_max)?,
    ))
}

fn window_extent(field: &'static str, min: i64, max: i64) -> Result<u64, ParseError> {
    let extent = max - min + 1;
    if extent <= 0 {
        return Err(ParseError::InvalidField {
            field,
            message: format!("window {min}..={max} is empty"),
        });
    }
    Ok(extent as u64)
}
