//! Runs a complete pack job against a host application.
//!
//! Source data is captured from the host on the calling thread, processed per
//! slot on a bounded parallel map, joined, interleaved, and handed back to the
//! host as a new asset. Cancellation is observed only between stages.

use std::time::Instant;

use common::CancelToken;

use crate::common::{ChannelError, ChannelSlot, HostError, PackError, PackResult, ValidationError};
use crate::config::PackConfig;
use crate::image::SourceImage;
use crate::pack::{validate_target, ChannelWarning, CompressionIntent, PackedImage, Packer, SlotInput};

#[cfg(test)]
mod tests;

/// Progress of a [`PackJob`], reported to the host on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackStage {
    Idle,
    Extracting,
    Processing,
    Joining,
    Interleaving,
    Finalizing,
    Done,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

/// Host-side identifier of a created output asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetHandle(pub u64);

/// Services the packer consumes from the host application.
///
/// All methods are called from the thread that runs the job.
pub trait PackHost {
    /// Host reference to a source texture.
    type SourceHandle;

    /// Copies the pixels of `handle` out of host storage.
    fn load_source_image(&self, handle: &Self::SourceHandle) -> Result<SourceImage, ChannelError>;

    fn create_output_asset(
        &self,
        path: &str,
        image: &PackedImage,
        compression: CompressionIntent,
    ) -> Result<AssetHandle, HostError>;

    /// Removes an asset created by a job that was cancelled afterwards.
    fn discard_output_asset(&self, asset: AssetHandle);

    fn report_progress(&self, stage: PackStage);

    fn notify(&self, message: &str, outcome: Outcome);
}

#[derive(Debug, Clone)]
pub struct PackJobOutput {
    pub asset: AssetHandle,
    pub image: PackedImage,
    pub warnings: Vec<ChannelWarning>,
}

/// One pack invocation against a host: slot handles, target and destination.
#[derive(Debug, Clone)]
pub struct PackJob<H> {
    sources: [Option<H>; 4],
    resolution: u32,
    compression: CompressionIntent,
    output_path: String,
    config: PackConfig,
}

impl<H> PackJob<H> {
    pub fn new(output_path: impl Into<String>, resolution: u32) -> Self {
        Self {
            sources: [None, None, None, None],
            resolution,
            compression: CompressionIntent::default(),
            output_path: output_path.into(),
            config: PackConfig::default(),
        }
    }

    pub fn with_source(mut self, slot: ChannelSlot, handle: H) -> Self {
        self.sources[slot.index()] = Some(handle);
        self
    }

    pub fn with_compression(mut self, compression: CompressionIntent) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_config(mut self, config: PackConfig) -> Self {
        self.config = config;
        self
    }

    pub fn output_path(&self) -> &str {
        &self.output_path
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let populated = self.sources.iter().filter(|s| s.is_some()).count();
        validate_target(populated, self.resolution)?;
        if self.output_path.trim().is_empty() {
            return Err(ValidationError::EmptyOutputName);
        }
        self.config.check()
    }

    /// Runs the job to completion, notifying the host of the outcome.
    pub fn run<T>(&self, host: &T, cancel: &CancelToken) -> PackResult<PackJobOutput>
    where
        T: PackHost<SourceHandle = H>,
    {
        let start = Instant::now();
        let result = self.execute(host, cancel);

        match &result {
            Ok(output) => {
                host.report_progress(PackStage::Done);
                tracing::info!(
                    "Packed '{}' {}x{} in {:?} with {} warning(s)",
                    self.output_path,
                    output.image.width(),
                    output.image.height(),
                    start.elapsed(),
                    output.warnings.len()
                );
                host.notify(&self.success_message(output), Outcome::Success);
            }
            Err(PackError::Cancelled { stage }) => {
                host.report_progress(PackStage::Cancelled);
                tracing::info!("Packing '{}' cancelled during {:?}", self.output_path, stage);
                host.notify("Channel packing was cancelled", Outcome::Failure);
            }
            Err(err) => {
                tracing::error!("Packing '{}' failed: {}", self.output_path, err);
                host.notify(&format!("Channel packing failed: {err}"), Outcome::Failure);
            }
        }

        result
    }

    fn execute<T>(&self, host: &T, cancel: &CancelToken) -> PackResult<PackJobOutput>
    where
        T: PackHost<SourceHandle = H>,
    {
        self.validate()?;
        let packer = Packer::new(self.config.clone());
        checkpoint(cancel, PackStage::Idle)?;

        host.report_progress(PackStage::Extracting);
        let inputs = self.capture(host);
        checkpoint(cancel, PackStage::Extracting)?;

        host.report_progress(PackStage::Processing);
        let processed = packer.process(inputs, self.resolution);
        host.report_progress(PackStage::Joining);
        checkpoint(cancel, PackStage::Joining)?;

        host.report_progress(PackStage::Interleaving);
        let output = processed.into_output(self.resolution, self.compression);

        host.report_progress(PackStage::Finalizing);
        let asset = host.create_output_asset(&self.output_path, &output.image, self.compression)?;
        if let Err(err) = checkpoint(cancel, PackStage::Finalizing) {
            tracing::debug!("Discarding asset {:?} of cancelled job", asset);
            host.discard_output_asset(asset);
            return Err(err);
        }

        Ok(PackJobOutput {
            asset,
            image: output.image,
            warnings: output.warnings,
        })
    }

    /// Copies every assigned source out of the host, in slot order.
    fn capture<T>(&self, host: &T) -> [SlotInput; 4]
    where
        T: PackHost<SourceHandle = H>,
    {
        ChannelSlot::ALL.map(|slot| {
            let Some(handle) = &self.sources[slot.index()] else {
                return SlotInput::Empty;
            };
            match host.load_source_image(handle) {
                Ok(source) => SlotInput::Source(source),
                Err(cause) => {
                    tracing::warn!("{} channel falls back to default fill: {}", slot, cause);
                    SlotInput::Failed(cause)
                }
            }
        })
    }

    fn success_message(&self, output: &PackJobOutput) -> String {
        let mut message = format!(
            "Packed texture '{}' created ({}x{}, {})",
            self.output_path,
            output.image.width(),
            output.image.height(),
            output.image.mode()
        );
        for warning in &output.warnings {
            message.push_str(&format!("\n{warning}"));
        }
        message
    }
}

fn checkpoint(cancel: &CancelToken, stage: PackStage) -> PackResult<()> {
    cancel
        .checkpoint(stage)
        .map_err(|stage| PackError::Cancelled { stage })
}
