use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Invalid host identity '{input}': {reason}")]
    InvalidHostIdentity { input: String, reason: &'static str },
}
