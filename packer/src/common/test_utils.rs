use half::f16;

use crate::common::SourceFormat;
use crate::image::SourceImage;

/// Gray8 source produced by `f(x, y)`.
pub fn gray8_from_fn(
    name: &str,
    width: u32,
    height: u32,
    f: impl Fn(u32, u32) -> u8,
) -> SourceImage {
    let mut bytes = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        for x in 0..width {
            bytes.push(f(x, y));
        }
    }
    SourceImage::new(name, width, height, SourceFormat::Gray8, bytes)
}

pub fn gray8_solid(name: &str, width: u32, height: u32, value: u8) -> SourceImage {
    gray8_from_fn(name, width, height, |_, _| value)
}

pub fn gray16_solid(name: &str, width: u32, height: u32, value: u16) -> SourceImage {
    let bytes = repeat_bytes(&value.to_le_bytes(), width, height);
    SourceImage::new(name, width, height, SourceFormat::Gray16, bytes)
}

pub fn float16_gray_solid(name: &str, width: u32, height: u32, value: f32) -> SourceImage {
    let bytes = repeat_bytes(&f16::from_f32(value).to_le_bytes(), width, height);
    SourceImage::new(name, width, height, SourceFormat::Float16Gray, bytes)
}

pub fn float32_gray_solid(name: &str, width: u32, height: u32, value: f32) -> SourceImage {
    let bytes = repeat_bytes(&value.to_le_bytes(), width, height);
    SourceImage::new(name, width, height, SourceFormat::Float32Gray, bytes)
}

pub fn float32_rgba_solid(name: &str, width: u32, height: u32, rgba: [f32; 4]) -> SourceImage {
    let pixel: Vec<u8> = rgba.iter().flat_map(|c| c.to_le_bytes()).collect();
    let bytes = repeat_bytes(&pixel, width, height);
    SourceImage::new(name, width, height, SourceFormat::Float32Rgba, bytes)
}

/// BGRA8 source; `bgra` is given in memory order.
pub fn bgra8_solid(name: &str, width: u32, height: u32, bgra: [u8; 4]) -> SourceImage {
    let bytes = repeat_bytes(&bgra, width, height);
    SourceImage::new(name, width, height, SourceFormat::Color8Bgra, bytes)
}

pub fn unsupported(name: &str, width: u32, height: u32) -> SourceImage {
    SourceImage::new(
        name,
        width,
        height,
        SourceFormat::Unrecognized(99),
        vec![0; width as usize * height as usize * 4],
    )
}

fn repeat_bytes(pixel: &[u8], width: u32, height: u32) -> Vec<u8> {
    pixel.repeat(width as usize * height as usize)
}
