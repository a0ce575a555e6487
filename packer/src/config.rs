//! Configuration types for the packing pipeline.

use serde::{Deserialize, Serialize};

use crate::common::ValidationError;

/// Most channel tasks that can run at once; one per slot.
pub const MAX_CHANNEL_TASKS: usize = 4;

/// Reconstruction filter used when source and target sizes differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResampleFilter {
    /// Triangle kernel; bilinear when upscaling, tent-weighted area when downscaling.
    #[default]
    Bilinear,
    /// Box kernel; plain area average when downscaling.
    Box,
}

impl ResampleFilter {
    /// Kernel radius in source pixels at a 1:1 scale.
    #[inline]
    pub(crate) fn support(&self) -> f32 {
        match self {
            ResampleFilter::Bilinear => 1.0,
            ResampleFilter::Box => 0.5,
        }
    }

    #[inline]
    pub(crate) fn kernel(&self, x: f32) -> f32 {
        match self {
            ResampleFilter::Bilinear => (1.0 - x.abs()).max(0.0),
            ResampleFilter::Box => {
                if x.abs() <= 0.5 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

/// Tuning of a [`Packer`](crate::Packer). Missing fields deserialize to defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackConfig {
    /// Channel tasks allowed in flight at once, 1..=4.
    pub max_concurrent_channels: usize,
    pub filter: ResampleFilter,
    /// Move Gray8 sources already at target size straight into their plane.
    pub gray8_fast_path: bool,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            max_concurrent_channels: MAX_CHANNEL_TASKS,
            filter: ResampleFilter::default(),
            gray8_fast_path: true,
        }
    }
}

impl PackConfig {
    /// Checks configuration parameters, e.g. after deserialization.
    pub fn check(&self) -> Result<(), ValidationError> {
        if !(1..=MAX_CHANNEL_TASKS).contains(&self.max_concurrent_channels) {
            return Err(ValidationError::InvalidConfig(format!(
                "max_concurrent_channels must be in 1..={}, got {}",
                MAX_CHANNEL_TASKS, self.max_concurrent_channels
            )));
        }
        Ok(())
    }

    /// Validate configuration parameters.
    ///
    /// # Panics
    ///
    /// Panics with the [`PackConfig::check`] error if the config is invalid.
    pub fn validate(&self) {
        if let Err(err) = self.check() {
            panic!("{err}");
        }
    }
}
