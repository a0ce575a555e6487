//! Writing packed images and scalar planes to disk.

use std::path::Path;

use half::f16;
use image as image_lib;

use common::file_format::format_from_extension;

use crate::common::{ExportError, ExportResult, Samples};
use crate::extract::ScalarPlane;
use crate::pack::PackedImage;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// 8-bit RGBA. Only for standard precision images.
    Png,
    /// Half-float linear RGBA.
    Exr,
}

const EXTENSIONS: &[(&str, ExportFormat)] = &[("png", ExportFormat::Png), ("exr", ExportFormat::Exr)];

impl ExportFormat {
    /// Infers the format from the extension of `path`, ignoring case.
    pub fn from_path<P: AsRef<Path>>(path: P) -> ExportResult<Self> {
        Ok(format_from_extension(path.as_ref(), EXTENSIONS)?)
    }
}

/// Writes `image` to `path` in `format`.
pub fn export<P: AsRef<Path>>(image: &PackedImage, path: P, format: ExportFormat) -> ExportResult<()> {
    match format {
        ExportFormat::Png => save_png(image, path.as_ref()),
        ExportFormat::Exr => save_exr(image, path.as_ref()),
    }
}

impl PackedImage {
    /// Writes the image, picking the format from the file extension.
    pub fn save_file<P: AsRef<Path>>(&self, path: P) -> ExportResult<()> {
        let format = ExportFormat::from_path(&path)?;
        export(self, path, format)
    }
}

/// Writes an 8-bit plane as a grayscale PNG.
pub fn export_plane<P: AsRef<Path>>(plane: &ScalarPlane, path: P) -> ExportResult<()> {
    let Samples::U8(bytes) = plane.samples() else {
        return Err(ExportError::UnsupportedFormat(
            "PNG export of a 16-bit float plane".to_string(),
        ));
    };

    image_lib::save_buffer_with_format(
        path,
        bytes,
        plane.width(),
        plane.height(),
        image_lib::ColorType::L8,
        image_lib::ImageFormat::Png,
    )?;

    Ok(())
}

fn save_png(image: &PackedImage, path: &Path) -> ExportResult<()> {
    let Samples::U8(bytes) = image.samples() else {
        return Err(ExportError::UnsupportedFormat(format!(
            "PNG export of a {} image",
            image.mode()
        )));
    };

    image_lib::save_buffer_with_format(
        path,
        bytes,
        image.width(),
        image.height(),
        image_lib::ColorType::Rgba8,
        image_lib::ImageFormat::Png,
    )?;

    tracing::debug!("Wrote {}x{} PNG to {}", image.width(), image.height(), path.display());
    Ok(())
}

fn save_exr(image: &PackedImage, path: &Path) -> ExportResult<()> {
    let width = image.width() as usize;
    let height = image.height() as usize;
    let offset = |x: usize, y: usize| (y * width + x) * PackedImage::CHANNELS;

    match image.samples() {
        Samples::F16(v) => exr::prelude::write_rgba_file(path, width, height, |x, y| {
            let i = offset(x, y);
            (v[i], v[i + 1], v[i + 2], v[i + 3])
        })?,
        // 8-bit samples are taken as linear values, without sRGB decoding.
        Samples::U8(v) => exr::prelude::write_rgba_file(path, width, height, |x, y| {
            let i = offset(x, y);
            (unorm(v[i]), unorm(v[i + 1]), unorm(v[i + 2]), unorm(v[i + 3]))
        })?,
    }

    tracing::debug!("Wrote {}x{} EXR to {}", width, height, path.display());
    Ok(())
}

#[inline]
fn unorm(v: u8) -> f16 {
    f16::from_f32(v as f32 / 255.0)
}
