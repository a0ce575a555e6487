use std::io;

use thiserror::Error;

use crate::common::source_format::SourceFormat;
use crate::orchestrator::PackStage;

/// Request problems detected before any work starts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No input textures selected")]
    NoInputs,
    #[error("Resolution {0} is outside the supported range 1..=8192")]
    ResolutionOutOfRange(u32),
    #[error("Output name is empty")]
    EmptyOutputName,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Failure of a single channel slot. The slot falls back to its default fill
/// and packing continues.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChannelError {
    #[error("Source '{source_name}' has unsupported format {format}")]
    UnsupportedFormat {
        source_name: String,
        format: SourceFormat,
    },
    #[error("Source '{source_name}' could not be accessed: {reason}")]
    LockFailed { source_name: String, reason: String },
    #[error("Source '{source_name}' has an invalid pixel buffer: {reason}")]
    InvalidBuffer { source_name: String, reason: String },
}

impl ChannelError {
    /// Name of the source the error refers to.
    pub fn source_name(&self) -> &str {
        match self {
            ChannelError::UnsupportedFormat { source_name, .. }
            | ChannelError::LockFailed { source_name, .. }
            | ChannelError::InvalidBuffer { source_name, .. } => source_name,
        }
    }
}

/// Error reported by the host while creating the output asset.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Host failed to create '{path}': {reason}")]
pub struct HostError {
    pub path: String,
    pub reason: String,
}

/// Fatal errors of a pack call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PackError {
    #[error("Invalid pack request: {0}")]
    Validation(#[from] ValidationError),
    #[error("Packing cancelled during {stage:?}")]
    Cancelled { stage: PackStage },
    #[error(transparent)]
    Host(#[from] HostError),
}

pub type PackResult<T> = std::result::Result<T, PackError>;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Encoding error: {0}")]
    Encoding(String),
    #[error("Unsupported export: {0}")]
    UnsupportedFormat(String),
    #[error("Invalid file extension: {0}")]
    InvalidExtension(#[from] common::FileExtensionError),
}

impl From<image::ImageError> for ExportError {
    fn from(e: image::ImageError) -> Self {
        match e {
            image::ImageError::IoError(e) => ExportError::Io(e),
            e => ExportError::Encoding(e.to_string()),
        }
    }
}

impl From<exr::error::Error> for ExportError {
    fn from(e: exr::error::Error) -> Self {
        match e {
            exr::error::Error::Io(e) => ExportError::Io(e),
            e => ExportError::Encoding(e.to_string()),
        }
    }
}

pub type ExportResult<T> = std::result::Result<T, ExportError>;
