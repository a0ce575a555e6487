use half::f16;

use super::*;
use crate::common::test_utils::*;
use crate::common::SUPPORTED_FORMATS;

macro_rules! test_decode_standard {
    ($name:ident, $source:expr, $expected:expr) => {
        #[test]
        fn $name() {
            let buf = decode_standard(&$source).unwrap();
            assert!(
                buf.pixels().iter().all(|p| *p == $expected),
                "expected {:?}, first pixel {:?}",
                $expected,
                buf.pixels()[0]
            );
        }
    };
}

macro_rules! test_decode_high_precision {
    ($name:ident, $source:expr, $expected:expr) => {
        #[test]
        fn $name() {
            let buf = decode_high_precision(&$source).unwrap();
            let expected: ColorF = $expected;
            for p in buf.pixels() {
                for (got, want) in p.to_working().iter().zip(expected.to_working()) {
                    assert!(
                        (got - want).abs() < 1e-6,
                        "expected {:?}, got {:?}",
                        expected,
                        p
                    );
                }
            }
        }
    };
}

// Standard mode: scalar replicated, alpha opaque unless carried.
test_decode_standard!(standard_gray8, gray8_solid("g8", 3, 2, 77), Color8::gray(77));
test_decode_standard!(standard_gray16_takes_high_byte, gray16_solid("g16", 3, 2, 0xAB12), Color8::gray(0xAB));
test_decode_standard!(standard_float16_scales, float16_gray_solid("r16f", 2, 2, 0.5), Color8::gray(127));
test_decode_standard!(standard_float32_scales, float32_gray_solid("r32f", 2, 2, 1.0), Color8::gray(255));
test_decode_standard!(standard_float32_clamps_high, float32_gray_solid("hdr", 2, 2, 4.0), Color8::gray(255));
test_decode_standard!(standard_float32_clamps_low, float32_gray_solid("neg", 2, 2, -0.3), Color8::gray(0));
test_decode_standard!(
    standard_float32_rgba_keeps_red_only,
    float32_rgba_solid("rgba", 2, 2, [0.2, 0.9, 0.9, 0.1]),
    Color8::gray(51)
);
test_decode_standard!(
    standard_bgra_reorders_memory,
    bgra8_solid("bgra", 2, 2, [10, 20, 30, 40]),
    Color8::new(30, 20, 10, 40)
);

// High precision: linear floats, alpha 1.0 unless carried.
test_decode_high_precision!(hp_gray8, gray8_solid("g8", 2, 2, 255), ColorF::gray(1.0));
test_decode_high_precision!(hp_gray16, gray16_solid("g16", 2, 2, 65535), ColorF::gray(1.0));
test_decode_high_precision!(hp_float16_direct, float16_gray_solid("r16f", 2, 2, 0.25), ColorF::gray(0.25));
test_decode_high_precision!(hp_float32_keeps_hdr, float32_gray_solid("hdr", 2, 2, 3.5), ColorF::gray(3.5));
test_decode_high_precision!(
    hp_float32_rgba_copies_all,
    float32_rgba_solid("rgba", 2, 2, [0.1, 0.2, 0.3, 0.4]),
    ColorF::new(0.1, 0.2, 0.3, 0.4)
);
test_decode_high_precision!(
    hp_bgra_normalizes_and_reorders,
    bgra8_solid("bgra", 2, 2, [0, 51, 255, 102]),
    ColorF::new(1.0, 0.2, 0.0, 0.4)
);

#[test]
fn every_supported_format_has_a_table_entry() {
    for format in SUPPORTED_FORMATS {
        assert!(find_entry(*format).is_some(), "missing entry for {}", format);
    }
    assert_eq!(DECODE_TABLE.len(), SUPPORTED_FORMATS.len());
}

#[test]
fn decode_preserves_pixel_order() {
    let source = gray8_from_fn("ramp", 4, 3, |x, y| (y * 4 + x) as u8);
    let buf = decode_standard(&source).unwrap();
    assert_eq!((buf.width(), buf.height()), (4, 3));
    for (i, p) in buf.pixels().iter().enumerate() {
        assert_eq!(p.r, i as u8);
    }
}

#[test]
fn float16_gray_reads_little_endian() {
    let bytes = [f16::from_f32(0.75).to_le_bytes(), f16::ZERO.to_le_bytes()].concat();
    let source = SourceImage::new("le", 2, 1, SourceFormat::Float16Gray, bytes);
    let buf = decode_high_precision(&source).unwrap();
    assert_eq!(buf.pixels()[0].r, 0.75);
    assert_eq!(buf.pixels()[1].r, 0.0);
}

#[test]
fn unrecognized_format_is_reported() {
    let err = decode_standard(&unsupported("T_Weird", 2, 2)).unwrap_err();
    assert_eq!(
        err,
        ChannelError::UnsupportedFormat {
            source_name: "T_Weird".to_string(),
            format: SourceFormat::Unrecognized(99),
        }
    );
}

#[test]
fn short_buffer_is_rejected() {
    let source = SourceImage::new("short", 4, 4, SourceFormat::Gray16, vec![0; 31]);
    let err = decode_high_precision(&source).unwrap_err();
    assert!(matches!(err, ChannelError::InvalidBuffer { ref source_name, .. } if source_name == "short"));
}

#[test]
fn overflowing_declared_size_is_rejected() {
    let source = SourceImage::new("corrupt", 1 << 31, 1 << 31, SourceFormat::Float32Gray, vec![0; 16]);
    let err = decode_high_precision(&source).unwrap_err();
    assert!(
        matches!(err, ChannelError::InvalidBuffer { ref reason, .. } if reason.contains("overflows")),
        "{err}"
    );
}

#[test]
fn empty_image_is_rejected() {
    let source = SourceImage::new("empty", 0, 4, SourceFormat::Gray8, vec![]);
    assert!(matches!(
        decode_standard(&source),
        Err(ChannelError::InvalidBuffer { .. })
    ));
}

#[test]
fn trailing_bytes_are_ignored() {
    let mut bytes = vec![5u8; 4];
    bytes.extend_from_slice(&[200; 16]);
    let source = SourceImage::new("padded", 2, 2, SourceFormat::Gray8, bytes);
    let buf = decode_standard(&source).unwrap();
    assert_eq!(buf.pixels().len(), 4);
    assert!(buf.pixels().iter().all(|p| p.r == 5));
}
