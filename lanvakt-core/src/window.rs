use std::time::Duration;

/// Parameters of a single capture query. Built once per run and handed to
/// every query of every cycle; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplingWindow {
    /// Network interface to sample.
    pub interface: String,
    /// How long one query may observe traffic.
    pub timeout: Duration,
}

impl SamplingWindow {
    #[inline]
    pub fn new(interface: impl Into<String>, timeout: Duration) -> Self {
        Self {
            interface: interface.into(),
            timeout,
        }
    }
}
