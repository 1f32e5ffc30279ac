//! Error types shared by intake, submission and configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Message shown for every failed prediction round trip.
pub const REQUEST_FAILED_MESSAGE: &str = "Prediction failed. Please try again.";

/// Message shown when a selected file cannot be read from disk.
pub const READ_FAILED_MESSAGE: &str = "Could not read the selected file";

/// Rejection reasons produced by the file validator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please upload a valid image file (JPG, JPEG, or PNG)")]
    UnsupportedType { mime: String },
    #[error("File size must be less than 10MB")]
    TooLarge { size: u64 },
}

/// Failures while turning a user-selected file into an `UploadedImage`.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("Could not read the selected file: {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IntakeError {
    /// Text suitable for the error box. Validation messages are shown as-is,
    /// I/O details stay in the log.
    pub fn user_message(&self) -> String {
        match self {
            IntakeError::Invalid(err) => err.to_string(),
            IntakeError::Read { .. } => READ_FAILED_MESSAGE.to_string(),
        }
    }
}

/// Failures of a single prediction round trip. All of them collapse to
/// [`REQUEST_FAILED_MESSAGE`] for display.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("prediction service answered with status {0}")]
    Status(reqwest::StatusCode),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("could not decode prediction response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("confidence {0} is outside [0, 1]")]
    ConfidenceOutOfRange(f64),
    #[error("could not start prediction worker: {0}")]
    Worker(#[source] std::io::Error),
}

impl RequestError {
    pub fn user_message(&self) -> &'static str {
        REQUEST_FAILED_MESSAGE
    }
}

/// Problems found while loading `config.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("endpoint {0:?} is not an http(s) URL")]
    InvalidEndpoint(String),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}
