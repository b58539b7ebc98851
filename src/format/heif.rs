//! HEIF still images: AVIF and HEIC.
//!
//! The size of a HEIF image is an item property. The parser collects, from
//! the `meta` box:
//!
//! - `pitm`: the primary item id
//! - `iprp/ipco`: the property container; `ispe` entries hold extents
//! - `iprp/ipma`: which properties (by 1-based index) belong to which item
//!
//! and reports the primary item's `ispe`. Files without usable associations
//! fall back to the largest `ispe` in the container.

use crate::error::ParseError;
use crate::io::{field, read_array, ByteSource};

use super::isobmff::{
    ensure_inside, find_box, for_each_child, read_full_box_header, source_end, BoxHeader, FourCc,
};
use super::{ensure_within, Dimensions, ImageFormat};

pub(crate) const SIGNATURE_LEN: usize = 12;

/// Size of an `ftyp` box holding only a major brand and minor version.
const MIN_FTYP_LEN: u64 = 12;

/// FullBox header plus 32-bit width and height.
const ISPE_LEN: u64 = 12;

/// Brands that only say "this is a HEIF file"; the codec brand is among the
/// compatible brands.
const STRUCTURAL_BRANDS: [&FourCc; 3] = [b"mif1", b"msf1", b"miaf"];

// =============================================================================
// Brand Classification
// =============================================================================

fn classify_brand(brand: &[u8]) -> Option<ImageFormat> {
    match brand {
        b"avif" | b"avis" => Some(ImageFormat::Avif),
        b"heic" | b"heix" | b"heim" | b"heis" | b"hevc" | b"hevx" => Some(ImageFormat::Heic),
        _ => None,
    }
}

/// Classify an ISOBMFF prefix as AVIF or HEIC by its `ftyp` brands.
///
/// The major brand decides unless it is a structural brand, in which case
/// the first compatible brand that names a codec decides. Only brands
/// inside both the prefix and the `ftyp` box are considered.
pub(crate) fn brand_format(prefix: &[u8]) -> Option<ImageFormat> {
    if &prefix[4..8] != b"ftyp" {
        return None;
    }

    let major = &prefix[8..12];
    if let Some(format) = classify_brand(major) {
        return Some(format);
    }
    if !STRUCTURAL_BRANDS.iter().any(|brand| &brand[..] == major) {
        return None;
    }

    // Compatible brands follow the 4-byte minor version.
    let ftyp_len = u32::from_be_bytes(field(prefix, 0).ok()?) as usize;
    let end = ftyp_len.min(prefix.len());
    prefix
        .get(16..end)?
        .chunks_exact(4)
        .find_map(classify_brand)
}

// =============================================================================
// Item Properties
// =============================================================================

#[derive(Debug, Default)]
struct ItemProperties {
    primary_item: Option<u32>,
    /// `ispe` extents keyed by their 1-based index in `ipco`.
    extents: Vec<(u16, Dimensions)>,
    /// (item id, property index) pairs from `ipma`.
    associations: Vec<(u32, u16)>,
}

impl ItemProperties {
    fn primary_extent(&self) -> Option<Dimensions> {
        let primary = self.primary_item?;
        self.associations
            .iter()
            .filter(|(item, _)| *item == primary)
            .find_map(|(_, index)| {
                self.extents
                    .iter()
                    .find(|(candidate, _)| candidate == index)
                    .map(|(_, dims)| *dims)
            })
    }

    fn largest_extent(&self) -> Option<Dimensions> {
        self.extents
            .iter()
            .map(|(_, dims)| *dims)
            .reduce(|best, dims| if dims.area() > best.area() { dims } else { best })
    }
}

fn read_pitm(source: &mut dyn ByteSource, pitm: &BoxHeader) -> Result<u32, ParseError> {
    let (version, _) = read_full_box_header(source)?;
    let item = if version == 0 {
        u32::from(u16::from_be_bytes(read_array(source)?))
    } else {
        u32::from_be_bytes(read_array(source)?)
    };
    ensure_inside(source, pitm, "pitm")?;
    Ok(item)
}

fn read_ipco(
    source: &mut dyn ByteSource,
    ipco: &BoxHeader,
    extents: &mut Vec<(u16, Dimensions)>,
) -> Result<(), ParseError> {
    let mut index: u16 = 0;
    for_each_child(source, ipco.payload_start(), ipco.end, |source, property| {
        index = index.checked_add(1).ok_or_else(|| ParseError::InvalidField {
            field: "ipco",
            message: "too many properties".to_string(),
        })?;

        if &property.kind == b"ispe" {
            if property.payload_len() < ISPE_LEN {
                return Err(ParseError::InvalidField {
                    field: "ispe size",
                    message: format!(
                        "expected {ISPE_LEN} bytes, got {}",
                        property.payload_len()
                    ),
                });
            }
            let data: [u8; 12] = read_array(source)?;
            extents.push((
                index,
                Dimensions::new(
                    u64::from(u32::from_be_bytes(field(&data, 4)?)),
                    u64::from(u32::from_be_bytes(field(&data, 8)?)),
                ),
            ));
        }
        Ok(())
    })
}

fn read_ipma(
    source: &mut dyn ByteSource,
    ipma: &BoxHeader,
    associations: &mut Vec<(u32, u16)>,
) -> Result<(), ParseError> {
    let (version, flags) = read_full_box_header(source)?;
    if version > 1 {
        return Err(ParseError::InvalidField {
            field: "ipma version",
            message: format!("unsupported version {version}"),
        });
    }
    let entry_count = u32::from_be_bytes(read_array(source)?);
    ensure_inside(source, ipma, "ipma")?;

    // Each entry needs at least an item id and an association count.
    let id_len: u64 = if version == 0 { 2 } else { 4 };
    let remaining = ipma.end - source.position();
    if u64::from(entry_count) * (id_len + 1) > remaining {
        return Err(ParseError::InvalidField {
            field: "ipma",
            message: format!("{entry_count} entries do not fit in the box"),
        });
    }

    let wide_index = flags & 1 == 1;
    for _ in 0..entry_count {
        let item = if version == 0 {
            u32::from(u16::from_be_bytes(read_array(source)?))
        } else {
            u32::from_be_bytes(read_array(source)?)
        };
        let [count] = read_array::<1>(source)?;
        for _ in 0..count {
            // The top bit marks an essential property.
            let index = if wide_index {
                u16::from_be_bytes(read_array(source)?) & 0x7FFF
            } else {
                u16::from(read_array::<1>(source)?[0] & 0x7F)
            };
            associations.push((item, index));
        }
        ensure_inside(source, ipma, "ipma")?;
    }
    Ok(())
}

// =============================================================================
// Parser
// =============================================================================

pub(crate) fn parse(source: &mut dyn ByteSource) -> Result<Dimensions, ParseError> {
    let file_end = source_end(source);

    let head: [u8; 8] = read_array(source)?;
    let ftyp_len = u64::from(u32::from_be_bytes(field(&head, 0)?));
    if ftyp_len < MIN_FTYP_LEN {
        return Err(ParseError::InvalidField {
            field: "ftyp size",
            message: format!("{ftyp_len} is smaller than {MIN_FTYP_LEN}"),
        });
    }
    ensure_within(source, "ftyp box", 0, ftyp_len)?;

    let meta = find_box(source, ftyp_len, file_end, b"meta")?;
    if meta.payload_len() < 4 {
        return Err(ParseError::InvalidField {
            field: "meta size",
            message: "meta box is missing its version and flags".to_string(),
        });
    }
    read_full_box_header(source)?;

    let mut properties = ItemProperties::default();
    for_each_child(source, meta.payload_start() + 4, meta.end, |source, child| {
        match &child.kind {
            b"pitm" => properties.primary_item = Some(read_pitm(source, child)?),
            b"iprp" => {
                for_each_child(source, child.payload_start(), child.end, |source, entry| {
                    match &entry.kind {
                        b"ipco" => read_ipco(source, entry, &mut properties.extents),
                        b"ipma" => read_ipma(source, entry, &mut properties.associations),
                        _ => Ok(()),
                    }
                })?;
            }
            _ => {}
        }
        Ok(())
    })?;

    properties
        .primary_extent()
        .or_else(|| properties.largest_extent())
        .ok_or(ParseError::MissingField("ispe"))
}
