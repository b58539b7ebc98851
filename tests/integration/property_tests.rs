//! Property tests over arbitrary input.

use proptest::prelude::*;

use imsz::{detect_bytes, detect_stream, sniff, DetectError, ImageFormat};

/// Leading magic that identifies exactly one format.
const SIGNATURES: &[(&[u8], ImageFormat)] = &[
    (b"GIF89a", ImageFormat::Gif),
    (b"\x89PNG\r\n\x1a\n", ImageFormat::Png),
    (b"\xFF\xD8", ImageFormat::Jpeg),
    (b"II*\x00", ImageFormat::Tiff),
    (b"MM\x00+", ImageFormat::Tiff),
    (b"qoif", ImageFormat::Qoi),
    (b"8BPS\x00\x01", ImageFormat::Psd),
    (b"gimp xcf ", ImageFormat::Xcf),
    (b"\x76\x2f\x31\x01", ImageFormat::OpenExr),
    (b"DDS \x7c\x00\x00\x00", ImageFormat::Dds),
];

proptest! {
    #[test]
    fn arbitrary_bytes_never_panic(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = detect_bytes(&data);
        let _ = detect_stream(&data[..]);
    }

    #[test]
    fn no_signature_means_unsupported(data in prop::collection::vec(any::<u8>(), 0..256)) {
        prop_assume!(sniff(&data).is_none());
        prop_assume!(!data.ends_with(b"TRUEVISION-XFILE.\0"));
        prop_assert_eq!(detect_bytes(&data), Err(DetectError::UnsupportedFormat));
    }

    #[test]
    fn signature_decides_format(
        (magic, format) in prop::sample::select(SIGNATURES),
        tail in prop::collection::vec(any::<u8>(), 0..256),
    ) {
        let mut data = magic.to_vec();
        data.extend_from_slice(&tail);

        match detect_bytes(&data) {
            Ok(info) => prop_assert_eq!(info.format, format),
            Err(DetectError::Parse { format: attempted, .. }) => prop_assert_eq!(attempted, format),
            Err(other) => prop_assert!(false, "unexpected {:?}", other),
        }
    }
}
