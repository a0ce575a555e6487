//! Rescaling of canonical pixel buffers to the target resolution.
//!
//! Resampling is separable: a horizontal pass over every source row, then a
//! vertical pass over the intermediate rows. Both passes share one set of
//! normalized weights per output coordinate, applied to all four channels
//! alike. When downscaling, the kernel widens by the scale ratio so every
//! source pixel contributes.
//!
//! Interpolation runs in the working space of the pixel type: 8-bit pixels
//! are sRGB display values and are blended in linear light, float pixels are
//! linear data and are blended as stored.

use rayon::prelude::*;

use crate::common::{CanonicalPixel, ColorBuffer};
use crate::config::ResampleFilter;


type Working = [f32; 4];

/// Source span and normalized weights contributing to one output coordinate.
#[derive(Debug, Clone, PartialEq)]
struct AxisTaps {
    start: usize,
    weights: Vec<f32>,
}

impl AxisTaps {
    #[inline]
    fn apply(&self, fetch: impl Fn(usize) -> Working) -> Working {
        let mut acc = [0.0f32; 4];
        for (k, &weight) in self.weights.iter().enumerate() {
            let sample = fetch(self.start + k);
            for c in 0..4 {
                acc[c] += weight * sample[c];
            }
        }
        acc
    }
}

/// Resamples `buffer` to `width` x `height`.
///
/// Returns the buffer untouched when it already has the target size.
///
/// # Panics
///
/// Panics if the target size is zero in either dimension.
pub fn resample<P: CanonicalPixel>(
    buffer: ColorBuffer<P>,
    width: u32,
    height: u32,
    filter: ResampleFilter,
) -> ColorBuffer<P> {
    assert!(width > 0 && height > 0, "target size must be non-zero");

    if buffer.width() == width && buffer.height() == height {
        return buffer;
    }
    if buffer.pixels().is_empty() {
        return ColorBuffer::filled(width, height, P::default());
    }

    let src_w = buffer.width() as usize;
    let src_h = buffer.height() as usize;
    let dst_w = width as usize;
    let dst_h = height as usize;

    let working: Vec<Working> = buffer.pixels().par_iter().map(|p| p.to_working()).collect();
    drop(buffer);

    let horizontal = if src_w == dst_w {
        working
    } else {
        resample_rows(&working, src_w, &axis_taps(src_w, dst_w, filter))
    };

    let vertical = if src_h == dst_h {
        horizontal
    } else {
        resample_columns(&horizontal, dst_w, &axis_taps(src_h, dst_h, filter))
    };

    let pixels: Vec<P> = vertical.par_iter().map(|v| P::from_working(*v)).collect();

    ColorBuffer::new(width, height, pixels)
}

/// Computes the taps for every output coordinate along one axis.
fn axis_taps(src_len: usize, dst_len: usize, filter: ResampleFilter) -> Vec<AxisTaps> {
    debug_assert!(src_len > 0 && dst_len > 0);

    let ratio = src_len as f32 / dst_len as f32;
    let scale = ratio.max(1.0);
    let support = filter.support() * scale;

    (0..dst_len)
        .map(|i| {
            let center = (i as f32 + 0.5) * ratio;
            let left = ((center - support).floor().max(0.0) as usize).min(src_len - 1);
            let right = ((center + support).ceil() as usize)
                .min(src_len)
                .max(left + 1);

            let mut weights: Vec<f32> = (left..right)
                .map(|j| filter.kernel((j as f32 + 0.5 - center) / scale))
                .collect();
            let sum: f32 = weights.iter().sum();

            if sum > 0.0 {
                weights.iter_mut().for_each(|w| *w /= sum);
                AxisTaps {
                    start: left,
                    weights,
                }
            } else {
                // kernel missed every sample; fall back to nearest
                AxisTaps {
                    start: (center as usize).min(src_len - 1),
                    weights: vec![1.0],
                }
            }
        })
        .collect()
}

/// Horizontal pass: every row of `src` is resampled to `taps.len()` pixels.
fn resample_rows(src: &[Working], src_w: usize, taps: &[AxisTaps]) -> Vec<Working> {
    let dst_w = taps.len();
    let rows = src.len() / src_w;
    let mut dst = vec![[0.0f32; 4]; rows * dst_w];

    dst.par_chunks_mut(dst_w)
        .zip(src.par_chunks(src_w))
        .for_each(|(dst_row, src_row)| {
            for (out, tap) in dst_row.iter_mut().zip(taps) {
                *out = tap.apply(|x| src_row[x]);
            }
        });

    dst
}

/// Vertical pass: output row `y` blends the source rows selected by `taps[y]`.
fn resample_columns(src: &[Working], width: usize, taps: &[AxisTaps]) -> Vec<Working> {
    let mut dst = vec![[0.0f32; 4]; taps.len() * width];

    dst.par_chunks_mut(width)
        .zip(taps.par_iter())
        .for_each(|(dst_row, tap)| {
            for (x, out) in dst_row.iter_mut().enumerate() {
                *out = tap.apply(|y| src[y * width + x]);
            }
        });

    dst
}
