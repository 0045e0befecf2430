use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

// Main application error type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("GUI error: {0}")]
    Gui(#[from] iced::Error),
    #[error("Service client error: {0}")]
    Service(#[from] ExtractError),
}

/// Failures of the submit/transfer pipeline.
///
/// Every variant is recoverable: the user can pick another image or resubmit.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractError {
    #[error("No image selected")]
    NoAssetSelected,
    #[error("Number of colors must be at least 1 (got {0})")]
    InvalidColorCount(u32),
    #[error("Extraction service unreachable: {0}")]
    Transport(String),
    #[error("Extraction service answered with HTTP {0}")]
    Status(u16),
    #[error("Extraction timed out after {0:?}")]
    Timeout(Duration),
    #[error("Extraction cancelled")]
    Cancelled,
    #[error("Could not decode extraction response: {0}")]
    Decode(String),
    #[error("No extraction result to display")]
    MissingTransferPayload,
}

impl ExtractError {
    /// Network-level failures: unreachable service, non-2xx answer, or timeout.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ExtractError::Transport(_) | ExtractError::Status(_) | ExtractError::Timeout(_)
        )
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssetError {
    #[error("Failed to read {path}: {reason}")]
    Io { path: PathBuf, reason: String },
    #[error("{0} is not a supported image")]
    UnsupportedFormat(PathBuf),
    #[error("{path} is {size} bytes, the limit is {limit}")]
    TooLarge { path: PathBuf, size: u64, limit: u64 },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Read(PathBuf, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    Parse(PathBuf, serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
