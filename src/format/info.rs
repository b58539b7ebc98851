use crate::error::DetectError;

// =============================================================================
// ImageFormat
// =============================================================================

/// Supported image formats.
///
/// The discriminants are stable numeric identifiers shared with foreign
/// callers (see [`crate::boundary`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum ImageFormat {
    Gif = 1,
    Png = 2,
    Bmp = 3,
    Jpeg = 4,
    WebP = 5,
    Qoi = 6,
    /// Photoshop document, including the large-document PSB variant
    Psd = 7,
    /// GIMP native format
    Xcf = 8,
    Ico = 9,
    Avif = 10,
    /// TIFF and BigTIFF
    Tiff = 11,
    OpenExr = 12,
    Pcx = 13,
    Tga = 14,
    Dds = 15,
    Heic = 16,
    Jp2k = 17,
}

impl ImageFormat {
    /// Every format, in identifier order.
    pub const ALL: [ImageFormat; 17] = [
        ImageFormat::Gif,
        ImageFormat::Png,
        ImageFormat::Bmp,
        ImageFormat::Jpeg,
        ImageFormat::WebP,
        ImageFormat::Qoi,
        ImageFormat::Psd,
        ImageFormat::Xcf,
        ImageFormat::Ico,
        ImageFormat::Avif,
        ImageFormat::Tiff,
        ImageFormat::OpenExr,
        ImageFormat::Pcx,
        ImageFormat::Tga,
        ImageFormat::Dds,
        ImageFormat::Heic,
        ImageFormat::Jp2k,
    ];

    /// Stable numeric identifier.
    pub const fn id(self) -> u32 {
        self as u32
    }

    pub const fn from_id(id: u32) -> Option<Self> {
        match id {
            1 => Some(ImageFormat::Gif),
            2 => Some(ImageFormat::Png),
            3 => Some(ImageFormat::Bmp),
            4 => Some(ImageFormat::Jpeg),
            5 => Some(ImageFormat::WebP),
            6 => Some(ImageFormat::Qoi),
            7 => Some(ImageFormat::Psd),
            8 => Some(ImageFormat::Xcf),
            9 => Some(ImageFormat::Ico),
            10 => Some(ImageFormat::Avif),
            11 => Some(ImageFormat::Tiff),
            12 => Some(ImageFormat::OpenExr),
            13 => Some(ImageFormat::Pcx),
            14 => Some(ImageFormat::Tga),
            15 => Some(ImageFormat::Dds),
            16 => Some(ImageFormat::Heic),
            17 => Some(ImageFormat::Jp2k),
            _ => None,
        }
    }

    /// Canonical display name.
    pub const fn name(self) -> &'static str {
        match self {
            ImageFormat::Gif => "GIF",
            ImageFormat::Png => "PNG",
            ImageFormat::Bmp => "BMP",
            ImageFormat::Jpeg => "JPEG",
            ImageFormat::WebP => "WebP",
            ImageFormat::Qoi => "QOI",
            ImageFormat::Psd => "PSD",
            ImageFormat::Xcf => "XCF",
            ImageFormat::Ico => "ICO",
            ImageFormat::Avif => "AVIF",
            ImageFormat::Tiff => "TIFF",
            ImageFormat::OpenExr => "OpenEXR",
            ImageFormat::Pcx => "PCX",
            ImageFormat::Tga => "TGA",
            ImageFormat::Dds => "DDS",
            ImageFormat::Heic => "HEIC",
            ImageFormat::Jp2k => "JPEG 2000",
        }
    }

    /// Common file extensions, lowercase and without the dot.
    ///
    /// The first entry is the preferred one.
    pub const fn extensions(self) -> &'static [&'static str] {
        match self {
            ImageFormat::Gif => &["gif"],
            ImageFormat::Png => &["png"],
            ImageFormat::Bmp => &["bmp", "dib"],
            ImageFormat::Jpeg => &["jpg", "jpeg", "jpe", "jfif"],
            ImageFormat::WebP => &["webp"],
            ImageFormat::Qoi => &["qoi"],
            ImageFormat::Psd => &["psd", "psb"],
            ImageFormat::Xcf => &["xcf"],
            ImageFormat::Ico => &["ico", "cur"],
            ImageFormat::Avif => &["avif"],
            ImageFormat::Tiff => &["tiff", "tif"],
            ImageFormat::OpenExr => &["exr"],
            ImageFormat::Pcx => &["pcx"],
            ImageFormat::Tga => &["tga"],
            ImageFormat::Dds => &["dds"],
            ImageFormat::Heic => &["heic", "heif"],
            ImageFormat::Jp2k => &["jp2", "j2k", "jpf"],
        }
    }

    /// Look up a format by file extension, ignoring case and a leading dot.
    pub fn from_extension(extension: &str) -> Option<Self> {
        let extension = extension.strip_prefix('.').unwrap_or(extension);
        Self::ALL.into_iter().find(|format| {
            format
                .extensions()
                .iter()
                .any(|candidate| candidate.eq_ignore_ascii_case(extension))
        })
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// ImageInfo
// =============================================================================

/// Format and pixel dimensions of a successfully parsed image.
///
/// Dimensions are reported exactly as the header declares them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageInfo {
    pub format: ImageFormat,
    pub width: u64,
    pub height: u64,
}

/// Result of one detection call.
pub type DetectionOutcome = Result<ImageInfo, DetectError>;

/// Width and height as returned by a format parser.
///
/// The dispatcher attaches the format to build an [`ImageInfo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u64,
    pub height: u64,
}

impl Dimensions {
    pub const fn new(width: u64, height: u64) -> Self {
        Self { width, height }
    }

    pub(crate) const fn area(&self) -> u128 {
        self.width as u128 * self.height as u128
    }

    pub(crate) const fn with_format(self, format: ImageFormat) -> ImageInfo {
        ImageInfo {
            format,
            width: self.width,
            height: self.height,
        }
    }
}
