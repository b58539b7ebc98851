//! Truncation tests.
//!
//! Cutting a file short must never produce dimensions. Below the signature
//! length nothing matches; past it the identified format's parser fails.

use imsz::{detect_bytes, DetectError, ImageFormat};

use super::test_utils::fixtures;

#[test]
fn test_empty_input_is_unsupported() {
    assert_eq!(detect_bytes(&[]), Err(DetectError::UnsupportedFormat));
}

#[test]
fn test_below_signature_is_unsupported() {
    for fixture in fixtures() {
        for len in 0..fixture.signature_len.min(fixture.data.len()) {
            assert_eq!(
                detect_bytes(&fixture.data[..len]),
                Err(DetectError::UnsupportedFormat),
                "{} truncated to {len}",
                fixture.name
            );
        }
    }
}

#[test]
fn test_inside_header_is_parse_failure() {
    for fixture in fixtures() {
        if fixture.format == ImageFormat::Tga {
            continue;
        }
        for len in fixture.signature_len..fixture.header_len {
            let err = detect_bytes(&fixture.data[..len]).unwrap_err();
            assert!(
                matches!(err, DetectError::Parse { format, .. } if format == fixture.format),
                "{} truncated to {len}: {err:?}",
                fixture.name
            );
        }
    }
}

#[test]
fn test_header_alone_is_enough() {
    for fixture in fixtures() {
        let info = detect_bytes(&fixture.data[..fixture.header_len])
            .unwrap_or_else(|e| panic!("{}: {}", fixture.name, e));
        assert_eq!(info.format, fixture.format, "{}", fixture.name);
    }
}

#[test]
fn test_truncated_tga_is_unsupported() {
    let tga = fixtures()
        .into_iter()
        .find(|fixture| fixture.format == ImageFormat::Tga)
        .unwrap();
    for len in 0..tga.data.len() {
        assert_eq!(
            detect_bytes(&tga.data[..len]),
            Err(DetectError::UnsupportedFormat),
            "TGA truncated to {len}"
        );
    }
}
