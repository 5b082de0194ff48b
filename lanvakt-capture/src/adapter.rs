use lanvakt_core::SamplingWindow;
use thiserror::Error;

use crate::frame::Frame;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("Interface '{interface}' unavailable: {reason}")]
    InterfaceUnavailable { interface: String, reason: String },

    #[error("Filter '{filter}' rejected: {reason}")]
    FilterInvalid { filter: String, reason: String },

    #[error("Capture read failed: {0}")]
    Read(String),
}

/// Frames observed by one query. Empty means no frame matched the filter
/// within the window, whether or not any traffic was seen at all.
#[derive(Debug, Clone, Default)]
pub struct CaptureOutcome {
    pub frames: Vec<Frame>,
}

impl CaptureOutcome {
    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn matched(&self) -> bool {
        !self.frames.is_empty()
    }
}

/// Blocking, filter-driven capture primitive.
///
/// Implementations must return within `window.timeout` plus their own
/// overhead. They may be reused across cycles, one query at a time.
pub trait CaptureAdapter: Send + Sync {
    fn capture(&self, filter: &str, window: &SamplingWindow)
        -> Result<CaptureOutcome, CaptureError>;
}

impl<T: CaptureAdapter + ?Sized> CaptureAdapter for std::sync::Arc<T> {
    fn capture(
        &self,
        filter: &str,
        window: &SamplingWindow,
    ) -> Result<CaptureOutcome, CaptureError> {
        (**self).capture(filter, window)
    }
}
