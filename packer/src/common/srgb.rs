//! sRGB transfer functions used when resampling 8-bit display values.

use std::sync::OnceLock;

/// Decoded linear value for every 8-bit sRGB code.
static SRGB_TO_LINEAR_LUT: OnceLock<[f32; 256]> = OnceLock::new();

fn srgb_to_linear_lut() -> &'static [f32; 256] {
    SRGB_TO_LINEAR_LUT.get_or_init(|| {
        let mut lut = [0.0f32; 256];
        for (code, value) in lut.iter_mut().enumerate() {
            *value = srgb_to_linear(code as f32 / 255.0);
        }
        lut
    })
}

#[inline]
pub(crate) fn srgb_to_linear(v: f32) -> f32 {
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

#[inline]
pub(crate) fn linear_to_srgb(v: f32) -> f32 {
    if v <= 0.0031308 {
        v * 12.92
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    }
}

#[inline]
pub(crate) fn srgb_u8_to_linear(code: u8) -> f32 {
    srgb_to_linear_lut()[code as usize]
}

/// Encodes a linear value to the nearest 8-bit sRGB code.
#[inline]
pub(crate) fn linear_to_srgb_u8(v: f32) -> u8 {
    unorm_to_u8(linear_to_srgb(v.clamp(0.0, 1.0)))
}

/// Rounds a normalized value to 8 bits, clamping out-of-range input.
#[inline]
pub(crate) fn unorm_to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}
