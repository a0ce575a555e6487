/// Pixel encoding of a raw source buffer.
///
/// Multi-byte samples are little-endian. `Unrecognized` carries the host's raw
/// format code so unsupported inputs can still be represented and reported.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum SourceFormat {
    Gray8,
    Gray16,
    Float16Gray,
    Float32Gray,
    Float32Rgba,
    Color8Bgra,
    Unrecognized(u32),
}

impl SourceFormat {
    /// Bytes per pixel, `None` for unrecognized formats.
    pub fn bytes_per_pixel(&self) -> Option<usize> {
        match self {
            SourceFormat::Gray8 => Some(1),
            SourceFormat::Gray16 | SourceFormat::Float16Gray => Some(2),
            SourceFormat::Float32Gray | SourceFormat::Color8Bgra => Some(4),
            SourceFormat::Float32Rgba => Some(16),
            SourceFormat::Unrecognized(_) => None,
        }
    }

    /// Formats whose precision exceeds 8 bits per sample.
    pub fn is_high_precision(&self) -> bool {
        matches!(
            self,
            SourceFormat::Gray16
                | SourceFormat::Float16Gray
                | SourceFormat::Float32Gray
                | SourceFormat::Float32Rgba
        )
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFormat::Gray8 => write!(f, "G8"),
            SourceFormat::Gray16 => write!(f, "G16"),
            SourceFormat::Float16Gray => write!(f, "R16F"),
            SourceFormat::Float32Gray => write!(f, "R32F"),
            SourceFormat::Float32Rgba => write!(f, "RGBA32F"),
            SourceFormat::Color8Bgra => write!(f, "BGRA8"),
            SourceFormat::Unrecognized(code) => write!(f, "unknown (code {})", code),
        }
    }
}

/// All formats the decoder understands.
pub const SUPPORTED_FORMATS: &[SourceFormat] = &[
    SourceFormat::Gray8,
    SourceFormat::Gray16,
    SourceFormat::Float16Gray,
    SourceFormat::Float32Gray,
    SourceFormat::Float32Rgba,
    SourceFormat::Color8Bgra,
];
