//! TIFF tag value reading.
//!
//! Values are stored either inline in the IFD entry (when they fit in the
//! 4- or 8-byte value field) or at an offset in the file. Only the first
//! value of an entry is read.

use crate::error::ParseError;
use crate::format::ensure_within;
use crate::io::ByteSource;

use super::parser::{ByteOrder, IfdEntry, TiffHeader};
use super::tags::FieldType;

/// Read the first value of a numeric entry as an unsigned number.
///
/// Integer types are taken as they are. Rationals are divided and floats
/// truncated toward zero. Negative or non-finite values and a zero
/// denominator are rejected. For out-of-line values the source is returned
/// to its position afterwards so the IFD walk can continue.
pub fn read_unsigned(
    source: &mut dyn ByteSource,
    header: &TiffHeader,
    entry: &IfdEntry,
    field: &'static str,
) -> Result<u64, ParseError> {
    let field_type = match entry.field_type {
        Some(field_type) if field_type.is_numeric() => field_type,
        _ => {
            return Err(ParseError::InvalidField {
                field,
                message: format!("field type {} is not numeric", entry.field_type_raw),
            })
        }
    };
    if entry.count == 0 {
        return Err(ParseError::InvalidField {
            field,
            message: "entry has no values".to_string(),
        });
    }

    let size = field_type.size_in_bytes();
    let mut bytes = [0u8; 8];
    if entry.is_inline {
        bytes[..size].copy_from_slice(&entry.value_offset_bytes[..size]);
    } else {
        let offset = entry.value_offset(header.byte_order, header.is_bigtiff);
        ensure_within(source, "TIFF value", offset, size as u64)?;
        let resume = source.position();
        source.seek_to(offset)?;
        source.read_exact(&mut bytes[..size])?;
        source.seek_to(resume)?;
    }

    decode(field_type, header.byte_order, bytes, field)
}

fn decode(
    field_type: FieldType,
    order: ByteOrder,
    bytes: [u8; 8],
    field: &'static str,
) -> Result<u64, ParseError> {
    let invalid = |message: String| ParseError::InvalidField { field, message };
    let [b0, b1, b2, b3, b4, b5, b6, b7] = bytes;
    let first = [b0, b1, b2, b3];
    let second = [b4, b5, b6, b7];

    let signed = match field_type {
        FieldType::Byte => return Ok(u64::from(b0)),
        FieldType::Short => return Ok(u64::from(order.u16([b0, b1]))),
        FieldType::Long => return Ok(u64::from(order.u32(first))),
        FieldType::Long8 => return Ok(order.u64(bytes)),
        FieldType::SByte => i64::from(b0 as i8),
        FieldType::SShort => i64::from(order.u16([b0, b1]) as i16),
        FieldType::SLong => i64::from(order.u32(first) as i32),
        FieldType::SLong8 => order.u64(bytes) as i64,
        FieldType::Rational => {
            let (numerator, denominator) = (order.u32(first), order.u32(second));
            if denominator == 0 {
                return Err(invalid(format!("rational {numerator}/0")));
            }
            return Ok(u64::from(numerator / denominator));
        }
        FieldType::SRational => {
            let numerator = i64::from(order.u32(first) as i32);
            let denominator = i64::from(order.u32(second) as i32);
            if denominator == 0 {
                return Err(invalid(format!("rational {numerator}/0")));
            }
            numerator / denominator
        }
        FieldType::Float => return float(f64::from(f32::from_bits(order.u32(first))), field),
        FieldType::Double => return float(f64::from_bits(order.u64(bytes)), field),
        other => return Err(invalid(format!("{other:?} is not a numeric type"))),
    };

    u64::try_from(signed).map_err(|_| invalid(format!("negative value {signed}")))
}

fn float(value: f64, field: &'static str) -> Result<u64, ParseError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ParseError::InvalidField {
            field,
            message: format!("{value} is not a valid size"),
        });
    }
    Ok(value as u64)
}
