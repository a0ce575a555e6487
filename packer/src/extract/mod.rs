//! Reduction of canonical pixels to one scalar per pixel.

use rayon::prelude::*;

use crate::common::{CanonicalPixel, ChannelSlot, ColorBuffer, PlaneSample, Samples, SourceFormat};
use crate::image::SourceImage;
use crate::precision::PrecisionMode;


/// Single-channel grid feeding one slot of the packed image.
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarPlane {
    width: u32,
    height: u32,
    samples: Samples,
}

impl ScalarPlane {
    /// # Panics
    ///
    /// Panics if the sample count differs from `width * height`.
    pub fn new(width: u32, height: u32, samples: Samples) -> Self {
        assert_eq!(
            samples.len(),
            width as usize * height as usize,
            "sample count does not match {}x{}",
            width,
            height
        );
        Self {
            width,
            height,
            samples,
        }
    }

    /// Plane used for a slot without usable input.
    pub fn default_for(slot: ChannelSlot, mode: PrecisionMode, width: u32, height: u32) -> Self {
        let samples = match mode {
            PrecisionMode::Standard => Samples::U8(default_samples(slot, width, height)),
            PrecisionMode::HighPrecision => Samples::F16(default_samples(slot, width, height)),
        };
        Self::new(width, height, samples)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn samples(&self) -> &Samples {
        &self.samples
    }

    pub fn precision(&self) -> PrecisionMode {
        self.samples.precision()
    }
}

pub(crate) fn default_samples<S: PlaneSample>(slot: ChannelSlot, width: u32, height: u32) -> Vec<S> {
    vec![slot.default_sample::<S>(); width as usize * height as usize]
}

/// Extracts the red component of every pixel.
pub fn extract_red<P: CanonicalPixel>(buffer: &ColorBuffer<P>) -> ScalarPlane {
    let samples = red_samples(buffer);
    ScalarPlane::new(
        buffer.width(),
        buffer.height(),
        <P::Sample as PlaneSample>::into_samples(samples),
    )
}

pub(crate) fn red_samples<P: CanonicalPixel>(buffer: &ColorBuffer<P>) -> Vec<P::Sample> {
    buffer.pixels().par_iter().map(|p| p.red()).collect()
}

/// Moves the bytes of a Gray8 source that already has the target size straight
/// into a plane, skipping decode and resample.
///
/// Hands the source back when the shortcut does not apply.
pub(crate) fn gray8_passthrough(
    source: SourceImage,
    width: u32,
    height: u32,
) -> Result<Vec<u8>, SourceImage> {
    let applies = source.format() == SourceFormat::Gray8
        && source.has_size(width, height)
        && source.pixel_count() > 0
        && source.bytes().len() >= source.pixel_count();
    if !applies {
        return Err(source);
    }

    let count = source.pixel_count();
    let mut bytes = source.take_bytes();
    bytes.truncate(count);
    Ok(bytes)
}
