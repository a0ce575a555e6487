use crate::common::SourceFormat;


/// Raw pixels of one input, captured by value from host storage.
///
/// The buffer is read-only once captured. Its length is not checked here; the
/// decoder validates it against the declared size and format.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceImage {
    name: String,
    width: u32,
    height: u32,
    format: SourceFormat,
    bytes: Vec<u8>,
}

impl SourceImage {
    pub fn new(
        name: impl Into<String>,
        width: u32,
        height: u32,
        format: SourceFormat,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            format,
            bytes,
        }
    }

    /// Name used to identify the source in warnings and logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> SourceFormat {
        self.format
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn take_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn pixel_count(&self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    /// Size of the declared pixel region, `None` for unrecognized formats or
    /// when the declared size does not fit in memory.
    pub fn expected_len(&self) -> Option<usize> {
        self.format
            .bytes_per_pixel()
            .and_then(|bpp| bpp.checked_mul(self.pixel_count()))
    }

    pub fn has_size(&self, width: u32, height: u32) -> bool {
        self.width == width && self.height == height
    }
}

impl std::fmt::Display for SourceImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "'{}' {}x{} {}",
            self.name, self.width, self.height, self.format
        )
    }
}
