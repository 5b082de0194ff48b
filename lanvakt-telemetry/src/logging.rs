//! ## lanvakt-telemetry::logging
//! **Structured logging with tracing and OpenTelemetry attributes**
//!
//! Security events are emitted inside a `security_event` span so they can be
//! filtered apart from operational logs.

use opentelemetry::KeyValue;
use tracing::info_span;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Installs the global subscriber. `RUST_LOG` wins over `default_level`.
    /// Calling it twice is harmless; the second call is ignored.
    pub fn init(default_level: &str) {
        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new(default_level)),
            )
            .with_thread_names(true)
            .with_span_events(FmtSpan::ENTER)
            .try_init();
    }

    #[inline]
    pub fn log_event(event_type: &str, metadata: Vec<KeyValue>) {
        let span = info_span!(
            "security_event",
            event_type = event_type,
            otel.kind = "INTERNAL"
        );
        let _entered = span.enter();

        tracing::warn!(
            metadata = ?metadata,
            "Security event occurred"
        );
    }
}
