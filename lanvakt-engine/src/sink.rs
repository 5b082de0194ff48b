//! ## lanvakt-engine::sink
//! **Where cycle results go**
//!
//! The status sink renders every outcome; the alert sink is raised exactly
//! once per matched cycle and never for a clean one. `Reporter` enforces that
//! contract between the scheduler and whichever sinks the frontend supplies.

use std::sync::Arc;

use chrono::Local;
use lanvakt_core::{Category, CycleResult, HostIdentity};
use lanvakt_detection::DetectionError;
use lanvakt_telemetry::{EventLogger, MetricsRecorder};
use opentelemetry::KeyValue;
use tracing::{error, info, warn};

/// Text shown to the operator when a cycle matches.
pub const ALERT_MESSAGE: &str =
    "Are you on a public wifi connection? Your computer is possibly under attack!";

pub trait StatusSink: Send + Sync {
    fn on_result(&self, result: &CycleResult);
    fn on_error(&self, error: &DetectionError);
}

pub trait AlertSink: Send + Sync {
    fn on_alert(&self, category: Category);
}

/// Renders outcomes as operator-facing status lines.
#[derive(Debug, Clone)]
pub struct StatusLine {
    network: String,
    identity: HostIdentity,
}

impl StatusLine {
    pub fn new(network: impl Into<String>, identity: HostIdentity) -> Self {
        Self {
            network: network.into(),
            identity,
        }
    }

    pub fn checking() -> &'static str {
        "Checking network status..."
    }

    pub fn render(&self, result: &CycleResult) -> String {
        match result {
            CycleResult::Clean => {
                format!("Connected to {} network ({})", self.network, self.identity)
            }
            CycleResult::Matched(category) => category.description().to_string(),
        }
    }

    pub fn render_error(&self, error: &DetectionError) -> String {
        format!("Network check failed: {error}")
    }
}

/// Dispatches each outcome to a status sink and, for matches, an alert sink.
pub struct Reporter {
    status: Arc<dyn StatusSink>,
    alert: Arc<dyn AlertSink>,
}

impl Reporter {
    pub fn new(status: Arc<dyn StatusSink>, alert: Arc<dyn AlertSink>) -> Self {
        Self { status, alert }
    }

    pub fn deliver(&self, result: CycleResult) {
        if let CycleResult::Matched(category) = result {
            self.alert.on_alert(category);
        }
        self.status.on_result(&result);
    }

    pub fn fail(&self, error: &DetectionError) {
        self.status.on_error(error);
    }
}

/// Writes status lines to the log.
pub struct ConsoleStatus {
    line: StatusLine,
}

impl ConsoleStatus {
    pub fn new(line: StatusLine) -> Self {
        Self { line }
    }
}

impl StatusSink for ConsoleStatus {
    fn on_result(&self, result: &CycleResult) {
        let at = Local::now().format("%H:%M:%S");
        let text = self.line.render(result);
        match result {
            CycleResult::Clean => info!("[{at}] {text}"),
            CycleResult::Matched(category) => warn!(category = category.label(), "[{at}] {text}"),
        }
    }

    fn on_error(&self, error: &DetectionError) {
        let at = Local::now().format("%H:%M:%S");
        error!("[{at}] {}", self.line.render_error(error));
    }
}

/// Raises alerts as structured security events.
pub struct LogAlert {
    metrics: Option<Arc<MetricsRecorder>>,
}

impl LogAlert {
    pub fn new(metrics: Option<Arc<MetricsRecorder>>) -> Self {
        Self { metrics }
    }
}

impl AlertSink for LogAlert {
    fn on_alert(&self, category: Category) {
        if let Some(metrics) = &self.metrics {
            metrics.inc_alerts(category.label());
        }
        EventLogger::log_event(
            "network_alert",
            vec![
                KeyValue::new("category", category.label()),
                KeyValue::new("message", ALERT_MESSAGE),
            ],
        );
        warn!("{ALERT_MESSAGE}");
    }
}
