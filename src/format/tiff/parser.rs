//! TIFF header and IFD entry decoding.
//!
//! ```text
//! offset  classic TIFF            BigTIFF
//! 0       "II" or "MM"            "II" or "MM"
//! 2       42                      43
//! 4       first IFD (u32)         offset size, always 8 (u16)
//! 6                               reserved (u16)
//! 8                               first IFD (u64)
//! ```
//!
//! Everything after the first two bytes follows the declared byte order.

use crate::error::ParseError;
use crate::io::field;

use super::tags::FieldType;

// =============================================================================
// Constants
// =============================================================================

/// "II"
const BYTE_ORDER_LITTLE_ENDIAN: u16 = 0x4949;

/// "MM"
const BYTE_ORDER_BIG_ENDIAN: u16 = 0x4D4D;

const VERSION_TIFF: u16 = 42;
const VERSION_BIGTIFF: u16 = 43;

pub const TIFF_HEADER_SIZE: usize = 8;
pub const BIGTIFF_HEADER_SIZE: usize = 16;

/// Largest IFD entry (BigTIFF)
pub const MAX_IFD_ENTRY_SIZE: usize = 20;

// =============================================================================
// ByteOrder
// =============================================================================

/// Byte order declared by the first two bytes of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    LittleEndian,
    BigEndian,
}

impl ByteOrder {
    #[inline]
    pub fn u16(self, bytes: [u8; 2]) -> u16 {
        match self {
            ByteOrder::LittleEndian => u16::from_le_bytes(bytes),
            ByteOrder::BigEndian => u16::from_be_bytes(bytes),
        }
    }

    #[inline]
    pub fn u32(self, bytes: [u8; 4]) -> u32 {
        match self {
            ByteOrder::LittleEndian => u32::from_le_bytes(bytes),
            ByteOrder::BigEndian => u32::from_be_bytes(bytes),
        }
    }

    #[inline]
    pub fn u64(self, bytes: [u8; 8]) -> u64 {
        match self {
            ByteOrder::LittleEndian => u64::from_le_bytes(bytes),
            ByteOrder::BigEndian => u64::from_be_bytes(bytes),
        }
    }
}

/// Whether the first four bytes are a TIFF or BigTIFF signature.
pub fn is_tiff_header(bytes: &[u8]) -> bool {
    matches!(
        bytes.get(..4),
        Some(b"II*\0") | Some(b"MM\0*") | Some(b"II+\0") | Some(b"MM\0+")
    )
}

// =============================================================================
// TiffHeader
// =============================================================================

/// The fields of a TIFF or BigTIFF header needed to reach the first IFD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TiffHeader {
    pub byte_order: ByteOrder,
    /// 64-bit offsets and counts
    pub is_bigtiff: bool,
    pub first_ifd_offset: u64,
}

impl TiffHeader {
    /// Whether a header starting with `bytes` is BigTIFF and needs 16 bytes.
    pub fn is_bigtiff_signature(bytes: &[u8]) -> bool {
        matches!(bytes.get(..4), Some(b"II+\0" | b"MM\0+"))
    }

    /// Parse a TIFF header from raw bytes.
    ///
    /// `file_size`, when known, bounds the first IFD offset.
    ///
    /// # Errors
    /// - `Truncated` if there aren't enough bytes for the header
    /// - `InvalidMagic` if byte order bytes are not II or MM
    /// - `InvalidField` for an unknown version, a BigTIFF offset size other
    ///   than 8, or a zero IFD offset
    /// - `OutOfBounds` if the first IFD offset is outside the file
    pub fn parse(bytes: &[u8], file_size: Option<u64>) -> Result<Self, ParseError> {
        if bytes.len() < TIFF_HEADER_SIZE {
            return Err(ParseError::Truncated {
                offset: 0,
                requested: TIFF_HEADER_SIZE as u64,
            });
        }

        // Read as little-endian because we're checking for specific byte patterns
        let magic = u16::from_le_bytes([bytes[0], bytes[1]]);
        let byte_order = match magic {
            BYTE_ORDER_LITTLE_ENDIAN => ByteOrder::LittleEndian,
            BYTE_ORDER_BIG_ENDIAN => ByteOrder::BigEndian,
            _ => return Err(ParseError::InvalidMagic("TIFF byte order")),
        };

        let version = byte_order.u16(field(bytes, 2)?);
        let (is_bigtiff, first_ifd_offset) = match version {
            VERSION_TIFF => (false, u64::from(byte_order.u32(field(bytes, 4)?))),
            VERSION_BIGTIFF => {
                if bytes.len() < BIGTIFF_HEADER_SIZE {
                    return Err(ParseError::Truncated {
                        offset: 0,
                        requested: BIGTIFF_HEADER_SIZE as u64,
                    });
                }

                let offset_size = byte_order.u16(field(bytes, 4)?);
                if offset_size != 8 {
                    return Err(ParseError::InvalidField {
                        field: "BigTIFF offset size",
                        message: format!("expected 8, got {offset_size}"),
                    });
                }

                // Bytes 6-7 are reserved; not checked.
                (true, byte_order.u64(field(bytes, 8)?))
            }
            _ => {
                return Err(ParseError::InvalidField {
                    field: "TIFF version",
                    message: format!("expected 42 or 43, got {version}"),
                })
            }
        };

        if first_ifd_offset == 0 {
            return Err(ParseError::InvalidField {
                field: "first IFD offset",
                message: "file has no image directory".to_string(),
            });
        }
        if let Some(size) = file_size {
            if first_ifd_offset >= size {
                return Err(ParseError::OutOfBounds {
                    what: "first IFD",
                    offset: first_ifd_offset,
                    len: 0,
                    size,
                });
            }
        }

        Ok(TiffHeader {
            byte_order,
            is_bigtiff,
            first_ifd_offset,
        })
    }

    /// Size of an IFD entry in bytes.
    ///
    /// Classic TIFF: 12 bytes (2 tag + 2 type + 4 count + 4 value/offset)
    /// BigTIFF: 20 bytes (2 tag + 2 type + 8 count + 8 value/offset)
    #[inline]
    pub const fn ifd_entry_size(&self) -> usize {
        if self.is_bigtiff {
            20
        } else {
            12
        }
    }

    /// Size of the entry count field at the start of an IFD.
    #[inline]
    pub const fn ifd_count_size(&self) -> usize {
        if self.is_bigtiff {
            8
        } else {
            2
        }
    }

    /// Decode the entry count at the start of an IFD.
    ///
    /// Only the first `ifd_count_size()` bytes are used.
    pub fn read_entry_count(&self, bytes: [u8; 8]) -> u64 {
        let [b0, b1, ..] = bytes;
        if self.is_bigtiff {
            self.byte_order.u64(bytes)
        } else {
            u64::from(self.byte_order.u16([b0, b1]))
        }
    }
}

// =============================================================================
// IfdEntry
// =============================================================================

/// One 12- or 20-byte entry of an Image File Directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IfdEntry {
    pub tag: u16,

    /// Field type as stored; may not be a known type.
    pub field_type_raw: u16,

    pub field_type: Option<FieldType>,

    /// Number of values (not bytes)
    pub count: u64,

    /// Raw value/offset field, left-aligned; only the first 4 bytes are
    /// used in classic TIFF.
    pub value_offset_bytes: [u8; 8],

    /// Whether the value is stored in `value_offset_bytes` itself
    pub is_inline: bool,
}

impl IfdEntry {
    /// Parse an entry from its raw bytes.
    ///
    /// # Errors
    /// `Truncated` if `bytes` is shorter than `header.ifd_entry_size()`.
    pub fn parse(bytes: &[u8], header: &TiffHeader) -> Result<Self, ParseError> {
        let order = header.byte_order;
        let tag = order.u16(field(bytes, 0)?);
        let field_type_raw = order.u16(field(bytes, 2)?);
        let field_type = FieldType::from_u16(field_type_raw);

        let (count, value_offset_bytes): (u64, [u8; 8]) = if header.is_bigtiff {
            (order.u64(field(bytes, 4)?), field(bytes, 12)?)
        } else {
            let [v0, v1, v2, v3]: [u8; 4] = field(bytes, 8)?;
            (
                u64::from(order.u32(field(bytes, 4)?)),
                [v0, v1, v2, v3, 0, 0, 0, 0],
            )
        };

        let is_inline = field_type
            .map(|ft| ft.fits_inline(count, header.is_bigtiff))
            .unwrap_or(false);

        Ok(IfdEntry {
            tag,
            field_type_raw,
            field_type,
            count,
            value_offset_bytes,
            is_inline,
        })
    }

    /// Offset of an out-of-line value.
    pub fn value_offset(&self, byte_order: ByteOrder, is_bigtiff: bool) -> u64 {
        let [b0, b1, b2, b3, ..] = self.value_offset_bytes;
        if is_bigtiff {
            byte_order.u64(self.value_offset_bytes)
        } else {
            u64::from(byte_order.u32([b0, b1, b2, b3]))
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
