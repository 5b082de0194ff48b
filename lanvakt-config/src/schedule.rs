//! Cycle scheduling configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

/// When the first cycle of a run fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirstTick {
    /// Right after start.
    Immediate,
    /// One full period after start.
    #[default]
    AfterPeriod,
}

/// What a run does when a cycle fails to capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Report the failure and keep cycling.
    #[default]
    Continue,
    /// Report the failure once and go idle.
    Stop,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct ScheduleConfig {
    /// Interval between cycle starts (milliseconds).
    #[validate(range(min = 100, max = 3_600_000))]
    #[serde(default = "default_period")]
    pub period_ms: u64,

    #[serde(default)]
    pub first_tick: FirstTick,

    #[serde(default)]
    pub on_error: ErrorPolicy,
}

impl ScheduleConfig {
    #[inline]
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }
}

fn default_period() -> u64 {
    2000
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            period_ms: default_period(),
            first_tick: FirstTick::default(),
            on_error: ErrorPolicy::default(),
        }
    }
}
