use lanvakt_capture::CaptureError;
use lanvakt_core::{Category, CoreError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetectionError {
    /// A capture query failed; the cycle produced no result.
    #[error("Capture unavailable while checking for {category}: {source}")]
    CaptureUnavailable {
        category: Category,
        #[source]
        source: CaptureError,
    },

    /// The cascade cannot be built from what it was given.
    #[error("Invalid cascade configuration: {0}")]
    InvalidConfiguration(String),
}

impl From<CoreError> for DetectionError {
    fn from(err: CoreError) -> Self {
        DetectionError::InvalidConfiguration(err.to_string())
    }
}
