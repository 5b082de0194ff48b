use lanvakt_capture::CaptureError;
use lanvakt_config::ConfigError;
use lanvakt_detection::DetectionError;
use thiserror::Error;
use tokio::task::JoinError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Detection error: {0}")]
    Detection(#[from] DetectionError),

    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("Scheduler must be started from within a tokio runtime")]
    NoRuntime,

    #[error("Cycle task failed: {0}")]
    Task(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<JoinError> for EngineError {
    fn from(err: JoinError) -> Self {
        EngineError::Task(err.to_string())
    }
}
