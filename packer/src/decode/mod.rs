//! Decoding of raw source buffers into canonical pixels.
//!
//! Every supported format has one entry in [`DECODE_TABLE`] holding its
//! conversion for each precision mode. Supporting a new format means adding an
//! entry; nothing else dispatches on the format.

use half::f16;
use rayon::prelude::*;

use crate::common::{CanonicalPixel, ChannelError, Color8, ColorBuffer, ColorF, SourceFormat};
use crate::image::SourceImage;

#[cfg(test)]
mod tests;

/// Per-format conversions of one pixel's bytes.
pub(crate) struct DecodeEntry {
    format: SourceFormat,
    standard: fn(&[u8]) -> Color8,
    high_precision: fn(&[u8]) -> ColorF,
}

pub(crate) const DECODE_TABLE: &[DecodeEntry] = &[
    DecodeEntry {
        format: SourceFormat::Color8Bgra,
        standard: |p| Color8::new(p[2], p[1], p[0], p[3]),
        high_precision: |p| {
            ColorF::new(
                unorm8(p[2]),
                unorm8(p[1]),
                unorm8(p[0]),
                unorm8(p[3]),
            )
        },
    },
    DecodeEntry {
        format: SourceFormat::Gray8,
        standard: |p| Color8::gray(p[0]),
        high_precision: |p| ColorF::gray(unorm8(p[0])),
    },
    DecodeEntry {
        format: SourceFormat::Gray16,
        standard: |p| Color8::gray(p[1]),
        high_precision: |p| ColorF::gray(u16::from_le_bytes([p[0], p[1]]) as f32 / 65535.0),
    },
    DecodeEntry {
        format: SourceFormat::Float16Gray,
        standard: |p| Color8::gray(float_to_u8(read_f16(p))),
        high_precision: |p| ColorF::gray(read_f16(p)),
    },
    DecodeEntry {
        format: SourceFormat::Float32Gray,
        standard: |p| Color8::gray(float_to_u8(read_f32(p, 0))),
        high_precision: |p| ColorF::gray(read_f32(p, 0)),
    },
    DecodeEntry {
        format: SourceFormat::Float32Rgba,
        standard: |p| Color8::gray(float_to_u8(read_f32(p, 0))),
        high_precision: |p| {
            ColorF::new(
                read_f32(p, 0),
                read_f32(p, 4),
                read_f32(p, 8),
                read_f32(p, 12),
            )
        },
    },
];

/// Canonical pixel types the decoder can produce.
pub(crate) trait DecodePixel: CanonicalPixel {
    fn conversion(entry: &DecodeEntry) -> fn(&[u8]) -> Self;
}

impl DecodePixel for Color8 {
    fn conversion(entry: &DecodeEntry) -> fn(&[u8]) -> Self {
        entry.standard
    }
}

impl DecodePixel for ColorF {
    fn conversion(entry: &DecodeEntry) -> fn(&[u8]) -> Self {
        entry.high_precision
    }
}

pub(crate) fn find_entry(format: SourceFormat) -> Option<&'static DecodeEntry> {
    DECODE_TABLE.iter().find(|entry| entry.format == format)
}

/// Decodes `source` into 8-bit canonical pixels.
pub fn decode_standard(source: &SourceImage) -> Result<ColorBuffer<Color8>, ChannelError> {
    decode(source)
}

/// Decodes `source` into linear float canonical pixels.
pub fn decode_high_precision(source: &SourceImage) -> Result<ColorBuffer<ColorF>, ChannelError> {
    decode(source)
}

/// Decodes the declared `width * height` region of `source`.
///
/// Trailing bytes past the declared region are ignored.
pub(crate) fn decode<P: DecodePixel>(source: &SourceImage) -> Result<ColorBuffer<P>, ChannelError> {
    let entry = find_entry(source.format()).ok_or_else(|| ChannelError::UnsupportedFormat {
        source_name: source.name().to_string(),
        format: source.format(),
    })?;

    let (region, bytes_per_pixel) = declared_region(source)?;
    let convert = P::conversion(entry);

    let pixels: Vec<P> = region
        .par_chunks_exact(bytes_per_pixel)
        .map(convert)
        .collect();

    Ok(ColorBuffer::new(source.width(), source.height(), pixels))
}

/// Returns the bytes covering exactly the declared pixels of `source`, with
/// the pixel size of its format.
pub(crate) fn declared_region(source: &SourceImage) -> Result<(&[u8], usize), ChannelError> {
    let invalid = |reason: String| ChannelError::InvalidBuffer {
        source_name: source.name().to_string(),
        reason,
    };

    if source.pixel_count() == 0 {
        return Err(invalid(format!(
            "empty image {}x{}",
            source.width(),
            source.height()
        )));
    }

    let bytes_per_pixel =
        source
            .format()
            .bytes_per_pixel()
            .ok_or_else(|| ChannelError::UnsupportedFormat {
                source_name: source.name().to_string(),
                format: source.format(),
            })?;

    let expected = bytes_per_pixel
        .checked_mul(source.pixel_count())
        .ok_or_else(|| {
            invalid(format!(
                "declared size {}x{} {} overflows",
                source.width(),
                source.height(),
                source.format()
            ))
        })?;

    if source.bytes().len() < expected {
        return Err(invalid(format!(
            "expected {} bytes for {}x{} {}, got {}",
            expected,
            source.width(),
            source.height(),
            source.format(),
            source.bytes().len()
        )));
    }

    Ok((&source.bytes()[..expected], bytes_per_pixel))
}

#[inline]
fn unorm8(v: u8) -> f32 {
    v as f32 / 255.0
}

/// Scales a normalized float to 8 bits, clamping and truncating.
#[inline]
fn float_to_u8(v: f32) -> u8 {
    (v * 255.0).clamp(0.0, 255.0) as u8
}

#[inline]
fn read_f16(p: &[u8]) -> f32 {
    f16::from_le_bytes([p[0], p[1]]).to_f32()
}

#[inline]
fn read_f32(p: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes([p[offset], p[offset + 1], p[offset + 2], p[offset + 3]])
}
