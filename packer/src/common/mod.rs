pub(crate) mod channel_slot;
pub(crate) mod color;
pub(crate) mod error;
pub(crate) mod samples;
pub(crate) mod source_format;
pub(crate) mod srgb;
#[cfg(test)]
pub(crate) mod test_utils;

// Public API
pub use channel_slot::ChannelSlot;
pub use color::{CanonicalPixel, Color8, ColorBuffer, ColorF};
pub use error::{
    ChannelError, ExportError, ExportResult, HostError, PackError, PackResult, ValidationError,
};
pub use samples::{PlaneSample, Samples};
pub use source_format::{SourceFormat, SUPPORTED_FORMATS};
