//! # Scripted capture
//!
//! Deterministic stand-in for a live capture, used by tests and benches.
//! Answers are keyed on the exact filter string; every query is recorded.

use std::collections::HashSet;

use lanvakt_core::SamplingWindow;
use parking_lot::Mutex;

use crate::adapter::{CaptureAdapter, CaptureError, CaptureOutcome};
use crate::frame::Frame;

/// A capture whose answers are fixed up front.
#[derive(Debug, Default)]
pub struct ScriptedCapture {
    matching: HashSet<String>,
    fail_on: Option<(usize, CaptureError)>,
    queries: Mutex<Vec<String>>,
}

impl ScriptedCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes queries for `filter` return one frame.
    pub fn matching(mut self, filter: impl Into<String>) -> Self {
        self.matching.insert(filter.into());
        self
    }

    /// Makes the `nth` query (zero-based, counted over the adapter's lifetime)
    /// and every later one fail with `error`.
    pub fn failing_from(mut self, nth: usize, error: CaptureError) -> Self {
        self.fail_on = Some((nth, error));
        self
    }

    /// Filters queried so far, in order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().len()
    }

    pub fn reset(&self) {
        self.queries.lock().clear();
    }
}

impl CaptureAdapter for ScriptedCapture {
    fn capture(
        &self,
        filter: &str,
        _window: &SamplingWindow,
    ) -> Result<CaptureOutcome, CaptureError> {
        let index = {
            let mut queries = self.queries.lock();
            queries.push(filter.to_string());
            queries.len() - 1
        };

        if let Some((nth, error)) = &self.fail_on {
            if index >= *nth {
                return Err(error.clone());
            }
        }

        if self.matching.contains(filter) {
            // Broadcast ARP request from a foreign host.
            let mut raw = vec![0xff; 6];
            raw.extend_from_slice(&[0x02, 0, 0, 0, 0, 0x01, 0x08, 0x06]);
            Ok(CaptureOutcome {
                frames: vec![Frame::new(raw)],
            })
        } else {
            Ok(CaptureOutcome::empty())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn window() -> SamplingWindow {
        SamplingWindow::new("eth0", Duration::from_millis(10))
    }

    #[test]
    fn answers_by_filter_and_records_queries() {
        let capture = ScriptedCapture::new().matching("vlan");
        assert!(!capture.capture("arp", &window()).unwrap().matched());
        assert!(capture.capture("vlan", &window()).unwrap().matched());
        assert_eq!(capture.queries(), vec!["arp", "vlan"]);
    }

    #[test]
    fn fails_from_nth_query() {
        let error = CaptureError::InterfaceUnavailable {
            interface: "eth0".into(),
            reason: "down".into(),
        };
        let capture = ScriptedCapture::new().failing_from(1, error.clone());
        assert!(capture.capture("arp", &window()).is_ok());
        assert_eq!(capture.capture("arp", &window()).unwrap_err(), error);
        assert_eq!(capture.capture("tcp", &window()).unwrap_err(), error);
        assert_eq!(capture.query_count(), 3);
    }
}
