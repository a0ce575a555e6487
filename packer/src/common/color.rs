//! Canonical pixel types shared by the decode, resample and extract stages.

use bytemuck::{Pod, Zeroable};
use half::f16;

use crate::common::samples::PlaneSample;
use crate::common::srgb::{linear_to_srgb_u8, srgb_u8_to_linear, unorm_to_u8};

/// Decoded 8-bit pixel, logical RGBA order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct Color8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Decoded full-precision pixel in linear space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct ColorF {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque gray with `v` replicated to R, G and B.
    pub const fn gray(v: u8) -> Self {
        Self::new(v, v, v, u8::MAX)
    }
}

impl ColorF {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque gray with `v` replicated to R, G and B.
    pub const fn gray(v: f32) -> Self {
        Self::new(v, v, v, 1.0)
    }
}

/// Pixel representation flowing between decode and extraction.
///
/// Resampling happens in a working space of four f32 channels; each pixel type
/// decides how its stored values map into that space.
pub trait CanonicalPixel: Copy + Default + Send + Sync + 'static {
    type Sample: PlaneSample;

    fn to_working(self) -> [f32; 4];
    fn from_working(v: [f32; 4]) -> Self;
    fn red(self) -> Self::Sample;
}

/// 8-bit pixels are display values: color interpolates in linear light, alpha
/// as stored.
impl CanonicalPixel for Color8 {
    type Sample = u8;

    #[inline]
    fn to_working(self) -> [f32; 4] {
        [
            srgb_u8_to_linear(self.r),
            srgb_u8_to_linear(self.g),
            srgb_u8_to_linear(self.b),
            self.a as f32 / 255.0,
        ]
    }

    #[inline]
    fn from_working(v: [f32; 4]) -> Self {
        Self {
            r: linear_to_srgb_u8(v[0]),
            g: linear_to_srgb_u8(v[1]),
            b: linear_to_srgb_u8(v[2]),
            a: unorm_to_u8(v[3]),
        }
    }

    #[inline]
    fn red(self) -> u8 {
        self.r
    }
}

/// Float pixels already hold linear data and are interpolated untouched.
impl CanonicalPixel for ColorF {
    type Sample = f16;

    #[inline]
    fn to_working(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[inline]
    fn from_working(v: [f32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }

    #[inline]
    fn red(self) -> f16 {
        f16::from_f32(self.r)
    }
}

/// Row-major grid of canonical pixels without padding.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorBuffer<P> {
    width: u32,
    height: u32,
    pixels: Vec<P>,
}

impl<P: CanonicalPixel> ColorBuffer<P> {
    /// # Panics
    ///
    /// Panics if `pixels.len()` differs from `width * height`.
    pub fn new(width: u32, height: u32, pixels: Vec<P>) -> Self {
        assert_eq!(
            pixels.len(),
            width as usize * height as usize,
            "pixel count does not match {}x{}",
            width,
            height
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn filled(width: u32, height: u32, pixel: P) -> Self {
        Self::new(width, height, vec![pixel; width as usize * height as usize])
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[P] {
        &self.pixels
    }

    pub fn take_pixels(self) -> Vec<P> {
        self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> P {
        self.pixels[y as usize * self.width as usize + x as usize]
    }
}
