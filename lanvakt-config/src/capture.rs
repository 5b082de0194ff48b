// lanvakt-config/src/capture.rs
//! Packet capture configuration.
//!
//! Every rule of a cycle samples the same interface for the same window.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

/// Packet capture configuration.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct CaptureConfig {
    /// Network interface to sample.
    #[validate(custom(function = validation::validate_interface))]
    #[serde(default = "default_interface")]
    pub interface: String,

    /// How long each rule query observes traffic (milliseconds).
    #[validate(range(min = 100, max = 60_000))]
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,

    /// Run in promiscuous mode?
    #[serde(default = "default_promiscuous")]
    pub promiscuous: bool,

    /// Bytes kept per captured frame.
    #[validate(range(min = 64, max = 262_144))]
    #[serde(default = "default_snaplen")]
    pub snaplen: i32,

    /// A query stops early once this many frames matched.
    #[validate(range(min = 1, max = 10_000))]
    #[serde(default = "default_frame_limit")]
    pub frame_limit: usize,
}

impl CaptureConfig {
    #[inline]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_interface() -> String {
    "eth0".into()
}

fn default_timeout() -> u64 {
    5000
}

fn default_promiscuous() -> bool {
    true
}

fn default_snaplen() -> i32 {
    65535
}

fn default_frame_limit() -> usize {
    1
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            interface: default_interface(),
            timeout_ms: default_timeout(),
            promiscuous: default_promiscuous(),
            snaplen: default_snaplen(),
            frame_limit: default_frame_limit(),
        }
    }
}
