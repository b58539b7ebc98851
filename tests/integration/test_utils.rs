//! Test utilities for integration tests.
//!
//! Every fixture is a minimal but well-formed 32x16 image built in memory.
//! Besides the bytes, each fixture records how many leading bytes the
//! sniffer needs and how many bytes the parser needs, so truncation tests
//! know which outcome to expect at every length.

use std::path::PathBuf;

use bytes::BufMut;
use tempfile::TempDir;

use imsz::ImageFormat;

pub const WIDTH: u32 = 32;
pub const HEIGHT: u32 = 16;

/// A generated test image.
#[derive(Debug, Clone)]
pub struct Fixture {
    /// File name, with the format's extension
    pub name: &'static str,
    pub format: ImageFormat,
    pub data: Vec<u8>,
    /// Prefix length below which no signature can match
    pub signature_len: usize,
    /// Smallest prefix the parser can succeed on
    pub header_len: usize,
}

impl Fixture {
    fn new(
        name: &'static str,
        format: ImageFormat,
        data: Vec<u8>,
        signature_len: usize,
        header_len: usize,
    ) -> Self {
        assert!(signature_len <= header_len && header_len <= data.len());
        Self {
            name,
            format,
            data,
            signature_len,
            header_len,
        }
    }
}

/// All fixtures, one or more per format.
pub fn fixtures() -> Vec<Fixture> {
    vec![
        gif(),
        png(),
        bmp(),
        bmp_core(),
        jpeg(),
        webp_vp8(),
        webp_vp8l(),
        webp_vp8x(),
        heif(ImageFormat::Avif),
        heif(ImageFormat::Heic),
        jp2(),
        tiff_le(),
        tiff_be(),
        bigtiff(),
        qoi(),
        psd(1),
        psd(2),
        xcf(),
        ico(),
        exr(),
        pcx(),
        tga(),
        dds(),
    ]
}

/// The first fixture of a format.
pub fn fixture(format: ImageFormat) -> Fixture {
    fixtures()
        .into_iter()
        .find(|fixture| fixture.format == format)
        .unwrap()
}

/// Write every fixture into a fresh temporary directory.
pub fn write_fixtures() -> (TempDir, Vec<(Fixture, PathBuf)>) {
    let dir = tempfile::tempdir().unwrap();
    let written = fixtures()
        .into_iter()
        .map(|fixture| {
            let path = dir.path().join(fixture.name);
            std::fs::write(&path, &fixture.data).unwrap();
            (fixture, path)
        })
        .collect();
    (dir, written)
}

// =============================================================================
// Builders
// =============================================================================

fn gif() -> Fixture {
    let mut buf = Vec::new();
    buf.put_slice(b"GIF89a");
    buf.put_u16_le(WIDTH as u16);
    buf.put_u16_le(HEIGHT as u16);
    let header_len = buf.len();
    // Flags, background colour, aspect ratio, then the trailer.
    buf.put_slice(&[0x00, 0x00, 0x00, 0x3B]);
    Fixture::new("sample.gif", ImageFormat::Gif, buf, 6, header_len)
}

fn png() -> Fixture {
    let mut buf = Vec::new();
    buf.put_slice(b"\x89PNG\r\n\x1a\n");
    buf.put_u32(13);
    buf.put_slice(b"IHDR");
    buf.put_u32(WIDTH);
    buf.put_u32(HEIGHT);
    let header_len = buf.len();
    buf.put_slice(&[8, 6, 0, 0, 0]);
    buf.put_u32(0); // CRC, not checked
    buf.put_u32(0);
    buf.put_slice(b"IEND");
    buf.put_u32(0xAE42_6082);
    Fixture::new("sample.png", ImageFormat::Png, buf, 8, header_len)
}

fn bmp_file_header(buf: &mut Vec<u8>, dib_size: u32) {
    buf.put_slice(b"BM");
    buf.put_u32_le(0); // file size, not checked
    buf.put_u32_le(0); // reserved
    buf.put_u32_le(14 + dib_size);
    buf.put_u32_le(dib_size);
}

fn bmp() -> Fixture {
    let mut buf = Vec::new();
    bmp_file_header(&mut buf, 40);
    buf.put_i32_le(WIDTH as i32);
    // Top-down bitmap.
    buf.put_i32_le(-(HEIGHT as i32));
    let header_len = buf.len();
    buf.put_u16_le(1); // planes
    buf.put_u16_le(24); // bits per pixel
    buf.put_bytes(0, 24);
    Fixture::new("sample.bmp", ImageFormat::Bmp, buf, 10, header_len)
}

fn bmp_core() -> Fixture {
    let mut buf = Vec::new();
    bmp_file_header(&mut buf, 12);
    buf.put_u16_le(WIDTH as u16);
    buf.put_u16_le(HEIGHT as u16);
    let header_len = buf.len();
    buf.put_u16_le(1);
    buf.put_u16_le(24);
    Fixture::new("core.dib", ImageFormat::Bmp, buf, 10, header_len)
}

fn jpeg() -> Fixture {
    let mut buf = Vec::new();
    buf.put_slice(&[0xFF, 0xD8]);
    // APP0 JFIF
    buf.put_slice(&[0xFF, 0xE0]);
    buf.put_u16(16);
    buf.put_slice(b"JFIF\0");
    buf.put_slice(&[1, 1, 0, 0, 1, 0, 1, 0, 0]);
    // COM
    buf.put_slice(&[0xFF, 0xFE]);
    buf.put_u16(7);
    buf.put_slice(b"hello");
    // SOF0 with three components
    buf.put_slice(&[0xFF, 0xC0]);
    buf.put_u16(17);
    buf.put_u8(8);
    buf.put_u16(HEIGHT as u16);
    buf.put_u16(WIDTH as u16);
    let header_len = buf.len();
    buf.put_u8(3);
    buf.put_slice(&[1, 0x22, 0, 2, 0x11, 1, 3, 0x11, 1]);
    // SOS
    buf.put_slice(&[0xFF, 0xDA]);
    buf.put_u16(12);
    buf.put_slice(&[3, 1, 0, 2, 0x11, 3, 0x11, 0, 63, 0]);
    buf.put_slice(&[0x12, 0xFF, 0x00, 0x34]);
    buf.put_slice(&[0xFF, 0xD9]);
    Fixture::new("sample.jpg", ImageFormat::Jpeg, buf, 2, header_len)
}

/// RIFF container around a single chunk.
fn webp(chunk: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.put_slice(b"WEBP");
    body.put_slice(chunk);
    body.put_u32_le(payload.len() as u32);
    body.put_slice(payload);
    if payload.len() % 2 == 1 {
        body.put_u8(0);
    }

    let mut buf = Vec::new();
    buf.put_slice(b"RIFF");
    buf.put_u32_le(body.len() as u32);
    buf.put_slice(&body);
    buf
}

fn webp_vp8() -> Fixture {
    let mut payload = Vec::new();
    payload.put_slice(&[0x50, 0x01, 0x00]); // key frame tag
    payload.put_slice(&[0x9D, 0x01, 0x2A]);
    payload.put_u16_le(WIDTH as u16);
    payload.put_u16_le(HEIGHT as u16);
    payload.put_bytes(0, 8);
    Fixture::new(
        "lossy.webp",
        ImageFormat::WebP,
        webp(b"VP8 ", &payload),
        12,
        30,
    )
}

fn webp_vp8l() -> Fixture {
    let mut payload = Vec::new();
    payload.put_u8(0x2F);
    payload.put_u32_le((WIDTH - 1) | ((HEIGHT - 1) << 14));
    payload.put_bytes(0, 4);
    Fixture::new(
        "lossless.webp",
        ImageFormat::WebP,
        webp(b"VP8L", &payload),
        12,
        25,
    )
}

fn webp_vp8x() -> Fixture {
    let mut payload = Vec::new();
    payload.put_u32_le(0x10); // alpha flag and reserved bytes
    payload.put_uint_le(u64::from(WIDTH - 1), 3);
    payload.put_uint_le(u64::from(HEIGHT - 1), 3);
    Fixture::new(
        "extended.webp",
        ImageFormat::WebP,
        webp(b"VP8X", &payload),
        12,
        30,
    )
}

fn iso_box(kind: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.put_u32(payload.len() as u32 + 8);
    buf.put_slice(kind);
    buf.put_slice(payload);
    buf
}

fn full_box(kind: &[u8; 4], version: u8, flags: u32, payload: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.put_u8(version);
    body.put_uint(u64::from(flags), 3);
    body.put_slice(payload);
    iso_box(kind, &body)
}

fn ispe(width: u32, height: u32) -> Vec<u8> {
    let mut payload = Vec::new();
    payload.put_u32(width);
    payload.put_u32(height);
    full_box(b"ispe", 0, 0, &payload)
}

/// HEIF with a 64x64 thumbnail listed first and the 32x16 primary item.
fn heif(format: ImageFormat) -> Fixture {
    let (name, brand): (&'static str, &[u8; 4]) = match format {
        ImageFormat::Avif => ("sample.avif", b"avif"),
        _ => ("sample.heic", b"heic"),
    };

    let mut ftyp = Vec::new();
    ftyp.put_slice(brand);
    ftyp.put_u32(0);
    ftyp.put_slice(b"mif1");
    ftyp.put_slice(brand);

    let mut hdlr = Vec::new();
    hdlr.put_u32(0);
    hdlr.put_slice(b"pict");
    hdlr.put_bytes(0, 13);

    let ipco = iso_box(b"ipco", &[ispe(64, 64), ispe(WIDTH, HEIGHT)].concat());
    let mut ipma = Vec::new();
    ipma.put_u32(2);
    for (item, property) in [(1u16, 2u8), (2, 1)] {
        ipma.put_u16(item);
        ipma.put_u8(1);
        ipma.put_u8(property | 0x80);
    }
    let iprp = iso_box(b"iprp", &[ipco, full_box(b"ipma", 0, 0, &ipma)].concat());

    let meta = full_box(
        b"meta",
        0,
        0,
        &[
            full_box(b"hdlr", 0, 0, &hdlr),
            full_box(b"pitm", 0, 0, &1u16.to_be_bytes()),
            iprp,
        ]
        .concat(),
    );

    let data = [iso_box(b"ftyp", &ftyp), meta].concat();
    let header_len = data.len();
    Fixture::new(name, format, data, 12, header_len)
}

fn jp2() -> Fixture {
    let mut buf = Vec::new();
    buf.put_slice(&[0, 0, 0, 12, b'j', b'P', b' ', b' ', 0x0D, 0x0A, 0x87, 0x0A]);

    let mut ftyp = Vec::new();
    ftyp.put_slice(b"jp2 ");
    ftyp.put_u32(0);
    ftyp.put_slice(b"jp2 ");
    buf.put_slice(&iso_box(b"ftyp", &ftyp));

    let mut ihdr = Vec::new();
    ihdr.put_u32(HEIGHT);
    ihdr.put_u32(WIDTH);
    ihdr.put_u16(3); // components
    ihdr.put_slice(&[7, 7, 0, 0]);
    let colr = iso_box(b"colr", &[1, 0, 0, 0, 0, 0, 16]);
    buf.put_slice(&iso_box(b"jp2h", &[iso_box(b"ihdr", &ihdr), colr].concat()));
    let header_len = buf.len();

    buf.put_slice(&iso_box(b"jp2c", &[0xFF, 0x4F, 0xFF, 0x51, 0xFF, 0xD9]));
    Fixture::new("sample.jp2", ImageFormat::Jp2k, buf, 12, header_len)
}

/// Classic TIFF with ImageWidth, ImageLength and Compression entries.
fn tiff_classic(name: &'static str, big_endian: bool) -> Fixture {
    let mut buf = Vec::new();
    let put_u16 = |buf: &mut Vec<u8>, value: u16| {
        if big_endian {
            buf.put_u16(value)
        } else {
            buf.put_u16_le(value)
        }
    };
    let put_u32 = |buf: &mut Vec<u8>, value: u32| {
        if big_endian {
            buf.put_u32(value)
        } else {
            buf.put_u32_le(value)
        }
    };

    buf.put_slice(if big_endian { b"MM\0*" } else { b"II*\0" });
    put_u32(&mut buf, 8);
    put_u16(&mut buf, 3);
    // Short values sit in the first two bytes of the value field.
    for (tag, value) in [(256u16, WIDTH as u16), (257, HEIGHT as u16), (259, 1)] {
        put_u16(&mut buf, tag);
        put_u16(&mut buf, 3);
        put_u32(&mut buf, 1);
        put_u16(&mut buf, value);
        put_u16(&mut buf, 0);
    }
    let header_len = buf.len();
    put_u32(&mut buf, 0);
    buf.put_bytes(0, 64);
    Fixture::new(name, ImageFormat::Tiff, buf, 4, header_len)
}

/// Little-endian TIFF whose ImageWidth has the given type and raw value.
///
/// Values longer than four bytes are stored after the IFD.
pub fn tiff_with_width(field_type: u16, value: &[u8]) -> Vec<u8> {
    const VALUE_OFFSET: u32 = 8 + 2 + 2 * 12 + 4;

    let mut buf = Vec::new();
    buf.put_slice(b"II*\0");
    buf.put_u32_le(8);
    buf.put_u16_le(2);

    buf.put_u16_le(256);
    buf.put_u16_le(field_type);
    buf.put_u32_le(1);
    if value.len() <= 4 {
        buf.put_slice(value);
        buf.put_bytes(0, 4 - value.len());
    } else {
        buf.put_u32_le(VALUE_OFFSET);
    }

    buf.put_u16_le(257);
    buf.put_u16_le(3);
    buf.put_u32_le(1);
    buf.put_u16_le(HEIGHT as u16);
    buf.put_u16_le(0);

    buf.put_u32_le(0);
    if value.len() > 4 {
        buf.put_slice(value);
    }
    buf
}

fn tiff_le() -> Fixture {
    tiff_classic("little.tiff", false)
}

fn tiff_be() -> Fixture {
    tiff_classic("big.tif", true)
}

fn bigtiff() -> Fixture {
    let mut buf = Vec::new();
    buf.put_slice(b"II+\0");
    buf.put_u16_le(8);
    buf.put_u16_le(0);
    buf.put_u64_le(16);
    buf.put_u64_le(2);
    // Long ImageWidth, Long8 ImageLength
    for (tag, field_type, value) in [(256u16, 4u16, WIDTH as u64), (257, 16, HEIGHT as u64)] {
        buf.put_u16_le(tag);
        buf.put_u16_le(field_type);
        buf.put_u64_le(1);
        buf.put_u64_le(value);
    }
    let header_len = buf.len();
    buf.put_u64_le(0);
    Fixture::new("bigtiff.tif", ImageFormat::Tiff, buf, 4, header_len)
}

fn qoi() -> Fixture {
    let mut buf = Vec::new();
    buf.put_slice(b"qoif");
    buf.put_u32(WIDTH);
    buf.put_u32(HEIGHT);
    buf.put_u8(4);
    buf.put_u8(0);
    let header_len = buf.len();
    buf.put_slice(&[0, 0, 0, 0, 0, 0, 0, 1]);
    Fixture::new("sample.qoi", ImageFormat::Qoi, buf, 4, header_len)
}

/// Version 1 is PSD, version 2 is the large-document PSB.
fn psd(version: u16) -> Fixture {
    let mut buf = Vec::new();
    buf.put_slice(b"8BPS");
    buf.put_u16(version);
    buf.put_bytes(0, 6);
    buf.put_u16(3);
    buf.put_u32(HEIGHT);
    buf.put_u32(WIDTH);
    let header_len = buf.len();
    buf.put_u16(8); // depth
    buf.put_u16(3); // RGB
    buf.put_u32(0); // colour mode data
    let name = if version == 1 { "sample.psd" } else { "large.psb" };
    Fixture::new(name, ImageFormat::Psd, buf, 6, header_len)
}

fn xcf() -> Fixture {
    let mut buf = Vec::new();
    buf.put_slice(b"gimp xcf v011\0");
    buf.put_u32(WIDTH);
    buf.put_u32(HEIGHT);
    let header_len = buf.len();
    buf.put_u32(0); // RGB
    buf.put_u32(0); // no properties
    Fixture::new("sample.xcf", ImageFormat::Xcf, buf, 9, header_len)
}

/// A 16x16 icon followed by a 32x16 one.
fn ico() -> Fixture {
    let mut buf = Vec::new();
    buf.put_u16_le(0);
    buf.put_u16_le(1);
    buf.put_u16_le(2);
    let images_at = 6 + 2 * 16;
    for (index, (width, height)) in [(16u8, 16u8), (WIDTH as u8, HEIGHT as u8)].into_iter().enumerate() {
        buf.put_u8(width);
        buf.put_u8(height);
        buf.put_u8(0); // palette size
        buf.put_u8(0);
        buf.put_u16_le(1);
        buf.put_u16_le(32);
        buf.put_u32_le(8);
        buf.put_u32_le(images_at + 8 * index as u32);
    }
    let header_len = buf.len();
    buf.put_bytes(0xAB, 16);
    Fixture::new("sample.ico", ImageFormat::Ico, buf, 4, header_len)
}

fn exr_attribute(buf: &mut Vec<u8>, name: &str, kind: &str, value: &[u8]) {
    buf.put_slice(name.as_bytes());
    buf.put_u8(0);
    buf.put_slice(kind.as_bytes());
    buf.put_u8(0);
    buf.put_u32_le(value.len() as u32);
    buf.put_slice(value);
}

fn box2i(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> Vec<u8> {
    let mut buf = Vec::new();
    for value in [x_min, y_min, x_max, y_max] {
        buf.put_i32_le(value);
    }
    buf
}

fn exr() -> Fixture {
    let mut buf = Vec::new();
    buf.put_slice(&[0x76, 0x2F, 0x31, 0x01]);
    buf.put_slice(&[2, 0, 0, 0]);

    let mut channels = Vec::new();
    channels.put_slice(b"R\0");
    channels.put_i32_le(1); // HALF
    channels.put_slice(&[0, 0, 0, 0]);
    channels.put_i32_le(1);
    channels.put_i32_le(1);
    channels.put_u8(0);
    exr_attribute(&mut buf, "channels", "chlist", &channels);
    exr_attribute(&mut buf, "compression", "compression", &[0]);
    // The data window is offset; only the display window counts.
    exr_attribute(&mut buf, "dataWindow", "box2i", &box2i(-4, -4, 3, 3));
    exr_attribute(
        &mut buf,
        "displayWindow",
        "box2i",
        &box2i(10, 20, 10 + WIDTH as i32 - 1, 20 + HEIGHT as i32 - 1),
    );
    let header_len = buf.len();
    exr_attribute(&mut buf, "lineOrder", "lineOrder", &[0]);
    buf.put_u8(0);
    Fixture::new("sample.exr", ImageFormat::OpenExr, buf, 4, header_len)
}

fn pcx() -> Fixture {
    let mut buf = Vec::new();
    buf.put_slice(&[0x0A, 5, 1, 8]);
    buf.put_u16_le(0);
    buf.put_u16_le(0);
    buf.put_u16_le(WIDTH as u16 - 1);
    buf.put_u16_le(HEIGHT as u16 - 1);
    let header_len = buf.len();
    buf.put_bytes(0, 128 - header_len);
    Fixture::new("sample.pcx", ImageFormat::Pcx, buf, 4, header_len)
}

/// TGA 2.0 with its footer. The trailer is the only signature, so every
/// truncation is unsupported rather than a parse failure.
fn tga() -> Fixture {
    let mut buf = Vec::new();
    buf.put_u8(0); // id length
    buf.put_u8(0); // no colour map
    buf.put_u8(2); // uncompressed true colour
    buf.put_bytes(0, 5); // colour map spec
    buf.put_u16_le(0);
    buf.put_u16_le(0);
    buf.put_u16_le(WIDTH as u16);
    buf.put_u16_le(HEIGHT as u16);
    buf.put_u8(32);
    buf.put_u8(0x28);
    buf.put_bytes(0x7F, 16);
    buf.put_u32_le(0); // extension offset
    buf.put_u32_le(0); // developer area offset
    buf.put_slice(b"TRUEVISION-XFILE.\0");
    let len = buf.len();
    Fixture::new("sample.tga", ImageFormat::Tga, buf, len, len)
}

fn dds() -> Fixture {
    let mut buf = Vec::new();
    buf.put_slice(b"DDS ");
    buf.put_u32_le(124);
    buf.put_u32_le(0x1007);
    buf.put_u32_le(HEIGHT);
    buf.put_u32_le(WIDTH);
    let header_len = buf.len();
    buf.put_bytes(0, 128 - header_len);
    Fixture::new("sample.dds", ImageFormat::Dds, buf, 8, header_len)
}
