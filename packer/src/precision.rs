use serde::{Deserialize, Serialize};

use crate::common::SourceFormat;

/// Sample precision of a whole pack operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrecisionMode {
    /// 8 bits per channel.
    Standard,
    /// 16-bit float per channel.
    HighPrecision,
}

impl PrecisionMode {
    pub fn bytes_per_sample(&self) -> usize {
        match self {
            PrecisionMode::Standard => 1,
            PrecisionMode::HighPrecision => 2,
        }
    }
}

impl std::fmt::Display for PrecisionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrecisionMode::Standard => write!(f, "8-bit"),
            PrecisionMode::HighPrecision => write!(f, "16-bit float"),
        }
    }
}

/// Picks one mode for every input of a request.
///
/// Any input with more than 8 bits of precision lifts the whole operation to
/// [`PrecisionMode::HighPrecision`]; 8-bit inputs are then upcast. Unrecognized
/// formats never raise precision.
pub fn determine_mode(formats: impl IntoIterator<Item = SourceFormat>) -> PrecisionMode {
    if formats.into_iter().any(|f| f.is_high_precision()) {
        PrecisionMode::HighPrecision
    } else {
        PrecisionMode::Standard
    }
}
