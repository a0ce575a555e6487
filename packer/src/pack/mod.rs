//! Assembly of up to four scalar planes into one interleaved RGBA image.

use std::sync::Arc;
use std::time::Instant;

use half::f16;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};

use common::parallel::par_map_limited;
use common::CancelToken;

use crate::common::{
    ChannelError, ChannelSlot, Color8, ColorF, PackError, PackResult, PlaneSample, Samples,
    SourceFormat, ValidationError,
};
use crate::config::{PackConfig, ResampleFilter};
use crate::decode::{decode, DecodePixel};
use crate::extract::{default_samples, gray8_passthrough, red_samples, ScalarPlane};
use crate::image::SourceImage;
use crate::orchestrator::PackStage;
use crate::precision::{determine_mode, PrecisionMode};
use crate::resample::resample;


pub const MIN_RESOLUTION: u32 = 1;
pub const MAX_RESOLUTION: u32 = 8192;

/// Hint for the host's texture pipeline on how to compress the packed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CompressionIntent {
    /// Independent masks per channel, no sRGB.
    Masks,
    Grayscale,
    #[default]
    Default,
}

impl std::fmt::Display for CompressionIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompressionIntent::Masks => write!(f, "Masks"),
            CompressionIntent::Grayscale => write!(f, "Grayscale"),
            CompressionIntent::Default => write!(f, "Default"),
        }
    }
}

/// Inputs of one pack call. Built per invocation; nothing carries over.
#[derive(Clone, Debug, Default)]
pub struct PackRequest {
    sources: [Option<SourceImage>; 4],
    resolution: u32,
    compression: CompressionIntent,
}

impl PackRequest {
    pub fn new(resolution: u32) -> Self {
        Self {
            resolution,
            ..Self::default()
        }
    }

    pub fn with_source(mut self, slot: ChannelSlot, source: SourceImage) -> Self {
        self.sources[slot.index()] = Some(source);
        self
    }

    pub fn with_compression(mut self, compression: CompressionIntent) -> Self {
        self.compression = compression;
        self
    }

    pub fn source(&self, slot: ChannelSlot) -> Option<&SourceImage> {
        self.sources[slot.index()].as_ref()
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn compression(&self) -> CompressionIntent {
        self.compression
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let populated = self.sources.iter().filter(|s| s.is_some()).count();
        validate_target(populated, self.resolution)
    }
}

pub(crate) fn validate_target(populated: usize, resolution: u32) -> Result<(), ValidationError> {
    if populated == 0 {
        return Err(ValidationError::NoInputs);
    }
    if !(MIN_RESOLUTION..=MAX_RESOLUTION).contains(&resolution) {
        return Err(ValidationError::ResolutionOutOfRange(resolution));
    }
    Ok(())
}

/// Square 4-channel raster with channels interleaved as R, G, B, A per pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct PackedImage {
    width: u32,
    height: u32,
    compression: CompressionIntent,
    samples: Samples,
}

impl PackedImage {
    pub const CHANNELS: usize = 4;

    /// # Panics
    ///
    /// Panics if the sample count differs from `width * height * 4`.
    pub fn new(width: u32, height: u32, compression: CompressionIntent, samples: Samples) -> Self {
        assert_eq!(
            samples.len(),
            width as usize * height as usize * Self::CHANNELS,
            "sample count does not match {}x{} RGBA",
            width,
            height
        );
        Self {
            width,
            height,
            compression,
            samples,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn compression(&self) -> CompressionIntent {
        self.compression
    }

    pub fn mode(&self) -> PrecisionMode {
        self.samples.precision()
    }

    pub fn samples(&self) -> &Samples {
        &self.samples
    }

    pub fn bytes(&self) -> &[u8] {
        self.samples.as_bytes()
    }

    pub fn take_samples(self) -> Samples {
        self.samples
    }

    /// RGBA of one pixel, or `None` for a high precision image.
    pub fn pixel_u8(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let offset = self.offset(x, y);
        let v = self.samples.as_u8()?;
        Some([v[offset], v[offset + 1], v[offset + 2], v[offset + 3]])
    }

    /// RGBA of one pixel, or `None` for a standard image.
    pub fn pixel_f16(&self, x: u32, y: u32) -> Option<[f16; 4]> {
        let offset = self.offset(x, y);
        let v = self.samples.as_f16()?;
        Some([v[offset], v[offset + 1], v[offset + 2], v[offset + 3]])
    }

    /// Copies one channel out into its own plane.
    pub fn channel(&self, slot: ChannelSlot) -> ScalarPlane {
        let samples = match &self.samples {
            Samples::U8(v) => Samples::U8(deinterleave(v, slot)),
            Samples::F16(v) => Samples::F16(deinterleave(v, slot)),
        };
        ScalarPlane::new(self.width, self.height, samples)
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        (y as usize * self.width as usize + x as usize) * Self::CHANNELS
    }
}

fn deinterleave<S: PlaneSample>(samples: &[S], slot: ChannelSlot) -> Vec<S> {
    samples
        .iter()
        .skip(slot.index())
        .step_by(PackedImage::CHANNELS)
        .copied()
        .collect()
}

/// Slot that degraded to its default fill.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelWarning {
    pub slot: ChannelSlot,
    pub source_name: String,
    pub cause: ChannelError,
}

impl ChannelWarning {
    pub fn new(slot: ChannelSlot, cause: ChannelError) -> Self {
        Self {
            slot,
            source_name: cause.source_name().to_string(),
            cause,
        }
    }
}

impl std::fmt::Display for ChannelWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} channel: {}", self.slot, self.cause)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PackOutput {
    pub image: PackedImage,
    pub warnings: Vec<ChannelWarning>,
}

/// Packs `request` with the default configuration.
pub fn pack(request: &PackRequest) -> PackResult<PackOutput> {
    Packer::default().pack(request)
}

/// Runs pack requests on its own worker pool of `max_concurrent_channels`
/// threads. Every data-parallel loop of a slot pipeline runs inside that pool.
#[derive(Debug, Clone)]
pub struct Packer {
    config: PackConfig,
    pool: Option<Arc<ThreadPool>>,
}

impl Default for Packer {
    fn default() -> Self {
        Self::new(PackConfig::default())
    }
}

impl Packer {
    /// # Panics
    ///
    /// Panics if `config` is invalid, see [`PackConfig::validate`].
    pub fn new(config: PackConfig) -> Self {
        config.validate();

        let pool = match ThreadPoolBuilder::new()
            .num_threads(config.max_concurrent_channels)
            .thread_name(|index| format!("packer-{index}"))
            .build()
        {
            Ok(pool) => Some(Arc::new(pool)),
            // no threads available (e.g. wasm), work runs on the caller
            Err(err) => {
                tracing::warn!("Packer pool unavailable, running on the calling thread: {}", err);
                None
            }
        };

        Self { config, pool }
    }

    pub fn config(&self) -> &PackConfig {
        &self.config
    }

    pub fn pack(&self, request: &PackRequest) -> PackResult<PackOutput> {
        self.pack_cancellable(request, &CancelToken::new())
    }

    /// Like [`Packer::pack`], checking `cancel` before and after the
    /// per-channel work.
    pub fn pack_cancellable(
        &self,
        request: &PackRequest,
        cancel: &CancelToken,
    ) -> PackResult<PackOutput> {
        request.validate()?;
        cancel
            .checkpoint(PackStage::Idle)
            .map_err(|stage| PackError::Cancelled { stage })?;

        let inputs = request.sources.clone().map(|source| match source {
            Some(source) => SlotInput::Source(source),
            None => SlotInput::Empty,
        });
        let processed = self.process(inputs, request.resolution);

        cancel
            .checkpoint(PackStage::Joining)
            .map_err(|stage| PackError::Cancelled { stage })?;

        Ok(processed.into_output(request.resolution, request.compression))
    }

    /// Runs every slot pipeline and joins the results.
    pub(crate) fn process(&self, inputs: [SlotInput; 4], size: u32) -> ProcessedSlots {
        let start = Instant::now();
        let mode = determine_mode(inputs.iter().filter_map(SlotInput::format));
        tracing::debug!("Packing {}x{} in {} mode", size, size, mode);

        let config = &self.config;
        let processed = self.install(|| match mode {
            PrecisionMode::Standard => {
                let (planes, warnings) = process_slots::<Color8>(inputs, size, config);
                ProcessedSlots {
                    planes: PlaneSet::Standard(planes),
                    warnings,
                }
            }
            PrecisionMode::HighPrecision => {
                let (planes, warnings) = process_slots::<ColorF>(inputs, size, config);
                ProcessedSlots {
                    planes: PlaneSet::HighPrecision(planes),
                    warnings,
                }
            }
        });

        tracing::debug!("Channel processing took {:?}", start.elapsed());
        processed
    }

    /// Runs `op` inside the packer's pool, so nested rayon work is bounded by it.
    pub(crate) fn install<R, F>(&self, op: F) -> R
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }
}

/// Per-slot input after capture from the host.
#[derive(Debug)]
pub(crate) enum SlotInput {
    Empty,
    Source(SourceImage),
    /// Capture itself failed; the slot gets its default fill.
    Failed(ChannelError),
}

impl SlotInput {
    fn format(&self) -> Option<SourceFormat> {
        match self {
            SlotInput::Source(source) => Some(source.format()),
            SlotInput::Empty | SlotInput::Failed(_) => None,
        }
    }
}

pub(crate) enum PlaneSet {
    Standard(Vec<Vec<u8>>),
    HighPrecision(Vec<Vec<f16>>),
}

/// Joined result of all four slot pipelines.
pub(crate) struct ProcessedSlots {
    planes: PlaneSet,
    pub(crate) warnings: Vec<ChannelWarning>,
}

impl ProcessedSlots {
    pub(crate) fn into_output(self, size: u32, compression: CompressionIntent) -> PackOutput {
        let samples = match &self.planes {
            PlaneSet::Standard(planes) => Samples::U8(interleave(planes)),
            PlaneSet::HighPrecision(planes) => Samples::F16(interleave(planes)),
        };
        PackOutput {
            image: PackedImage::new(size, size, compression, samples),
            warnings: self.warnings,
        }
    }
}

/// Canonical pixel types a slot pipeline can run in.
pub(crate) trait PlanePixel: DecodePixel {
    /// Builds the plane directly from `source` when no conversion is needed.
    fn passthrough(source: SourceImage, _size: u32) -> Result<Vec<Self::Sample>, SourceImage> {
        Err(source)
    }
}

impl PlanePixel for Color8 {
    fn passthrough(source: SourceImage, size: u32) -> Result<Vec<Self::Sample>, SourceImage> {
        gray8_passthrough(source, size, size)
    }
}

impl PlanePixel for ColorF {}

fn process_slots<P: PlanePixel>(
    inputs: [SlotInput; 4],
    size: u32,
    config: &PackConfig,
) -> (Vec<Vec<P::Sample>>, Vec<ChannelWarning>) {
    let tasks: Vec<(ChannelSlot, SlotInput)> = ChannelSlot::ALL.into_iter().zip(inputs).collect();
    let results = par_map_limited(tasks, config.max_concurrent_channels, |(slot, input)| {
        process_slot::<P>(slot, input, size, config)
    });

    let mut warnings = Vec::new();
    let planes = results
        .into_iter()
        .map(|(plane, warning)| {
            warnings.extend(warning);
            plane
        })
        .collect();
    (planes, warnings)
}

fn process_slot<P: PlanePixel>(
    slot: ChannelSlot,
    input: SlotInput,
    size: u32,
    config: &PackConfig,
) -> (Vec<P::Sample>, Option<ChannelWarning>) {
    let source = match input {
        SlotInput::Empty => return (default_samples(slot, size, size), None),
        SlotInput::Failed(cause) => {
            return (
                default_samples(slot, size, size),
                Some(ChannelWarning::new(slot, cause)),
            )
        }
        SlotInput::Source(source) => source,
    };

    let source = if config.gray8_fast_path {
        match P::passthrough(source, size) {
            Ok(plane) => {
                tracing::debug!("{} channel: Gray8 source moved without conversion", slot);
                return (plane, None);
            }
            Err(source) => source,
        }
    } else {
        source
    };

    match plane_from_source::<P>(&source, size, config.filter) {
        Ok(plane) => (plane, None),
        Err(cause) => {
            tracing::warn!(
                "{} channel falls back to default fill, source {} format {}: {}",
                slot,
                source.name(),
                source.format(),
                cause
            );
            (
                default_samples(slot, size, size),
                Some(ChannelWarning::new(slot, cause)),
            )
        }
    }
}

fn plane_from_source<P: DecodePixel>(
    source: &SourceImage,
    size: u32,
    filter: ResampleFilter,
) -> Result<Vec<P::Sample>, ChannelError> {
    let decoded = decode::<P>(source)?;
    let resized = resample(decoded, size, size, filter);
    Ok(red_samples(&resized))
}

/// Interleaves four equally sized planes into R, G, B, A order.
pub(crate) fn interleave<S: PlaneSample>(planes: &[Vec<S>]) -> Vec<S> {
    assert_eq!(planes.len(), PackedImage::CHANNELS, "expected one plane per slot");
    let len = planes[0].len();
    assert!(
        planes.iter().all(|p| p.len() == len),
        "planes must have equal length"
    );

    let mut out = vec![S::ZERO; len * PackedImage::CHANNELS];
    for (i, pixel) in out.chunks_exact_mut(PackedImage::CHANNELS).enumerate() {
        for (channel, plane) in pixel.iter_mut().zip(planes) {
            *channel = plane[i];
        }
    }
    out
}
