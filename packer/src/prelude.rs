// Formats and pixels
pub use crate::common::{
    CanonicalPixel, ChannelSlot, Color8, ColorBuffer, ColorF, PlaneSample, Samples, SourceFormat,
    SUPPORTED_FORMATS,
};

// Error handling
pub use crate::common::{
    ChannelError, ExportError, ExportResult, HostError, PackError, PackResult, ValidationError,
};

// Configuration
pub use crate::config::{PackConfig, ResampleFilter, MAX_CHANNEL_TASKS};

// Pipeline stages
pub use crate::decode::{decode_high_precision, decode_standard};
pub use crate::extract::{extract_red, ScalarPlane};
pub use crate::image::SourceImage;
pub use crate::precision::{determine_mode, PrecisionMode};
pub use crate::resample::resample;

// Packing
pub use crate::pack::{
    pack, ChannelWarning, CompressionIntent, PackOutput, PackRequest, PackedImage, Packer,
    MAX_RESOLUTION, MIN_RESOLUTION,
};

// Host orchestration
pub use crate::orchestrator::{AssetHandle, Outcome, PackHost, PackJob, PackJobOutput, PackStage};

// Export
pub use crate::export::{export, export_plane, ExportFormat};

pub use common::CancelToken;
