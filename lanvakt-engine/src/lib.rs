//! # Lanvakt Engine
//!
//! Drives the rule cascade: a cancellable periodic scheduler, the status and
//! alert sinks outcomes are routed to, and the run modes frontends share.

pub mod error;
pub mod runtime;
pub mod scheduler;
pub mod sink;

pub use error::EngineError;
pub use runtime::{
    console_reporter, cycle_once, host_identity, live_adapter, load_config, metrics_recorder,
    run_once, run_replay, run_watch, sampling_window,
};
pub use scheduler::{CycleScheduler, ScheduleOptions, SchedulerState};
pub use sink::{AlertSink, ConsoleStatus, LogAlert, Reporter, StatusLine, StatusSink, ALERT_MESSAGE};
