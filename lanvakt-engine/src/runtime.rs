/*!
# Runtime

Wires configuration, capture, cascade and sinks together for the frontends:
continuous watching on a live interface, a single live cycle, and one-shot
classification of a recorded trace.
*/

use std::path::Path;
use std::sync::Arc;

use lanvakt_capture::{hardware_address, CaptureAdapter, PcapCapture, SavefileCapture};
use lanvakt_config::LanvaktConfig;
use lanvakt_core::{CycleResult, HostIdentity, SamplingWindow};
use lanvakt_detection::{DetectionError, RuleCascade};
use lanvakt_telemetry::{EventLogger, MetricsRecorder};
use opentelemetry::KeyValue;
use tokio::time::{self, MissedTickBehavior};
use tracing::{info, instrument};

use crate::error::EngineError;
use crate::scheduler::{CycleScheduler, ScheduleOptions};
use crate::sink::{ConsoleStatus, LogAlert, Reporter, StatusLine};

/// Loads `path`, or the default hierarchy when none is given.
pub fn load_config(path: Option<&Path>) -> Result<LanvaktConfig, EngineError> {
    let config = match path {
        Some(path) => LanvaktConfig::load_from_path(path)?,
        None => LanvaktConfig::load()?,
    };
    Ok(config)
}

/// A fresh recorder when metrics are enabled.
pub fn metrics_recorder(
    config: &LanvaktConfig,
) -> Result<Option<Arc<MetricsRecorder>>, EngineError> {
    if !config.telemetry.metrics {
        return Ok(None);
    }
    Ok(Some(Arc::new(MetricsRecorder::new()?)))
}

/// The configured override, or the hardware address of the capture interface.
pub fn host_identity(config: &LanvaktConfig) -> Result<HostIdentity, EngineError> {
    match config.host.mac {
        Some(mac) => Ok(mac),
        None => identity_from(hardware_address(&config.capture.interface)?),
    }
}

// Loopback and some virtual interfaces report addresses no host can own.
fn identity_from(octets: [u8; 6]) -> Result<HostIdentity, EngineError> {
    let identity = HostIdentity::new(octets).map_err(DetectionError::from)?;
    Ok(identity)
}

pub fn sampling_window(config: &LanvaktConfig) -> SamplingWindow {
    SamplingWindow::new(config.capture.interface.clone(), config.capture.timeout())
}

pub fn live_adapter(config: &LanvaktConfig) -> PcapCapture {
    PcapCapture::new(
        config.capture.promiscuous,
        config.capture.snaplen,
        config.capture.frame_limit,
    )
}

/// Console status plus logged alerts.
pub fn console_reporter(
    network: &str,
    identity: HostIdentity,
    metrics: Option<Arc<MetricsRecorder>>,
) -> Reporter {
    Reporter::new(
        Arc::new(ConsoleStatus::new(StatusLine::new(network, identity))),
        Arc::new(LogAlert::new(metrics)),
    )
}

/// Evaluates one cycle and reports the outcome.
pub fn cycle_once<A>(
    cascade: &RuleCascade,
    adapter: &A,
    window: &SamplingWindow,
    reporter: &Reporter,
) -> Result<CycleResult, DetectionError>
where
    A: CaptureAdapter + ?Sized,
{
    match cascade.evaluate(adapter, window) {
        Ok(result) => {
            reporter.deliver(result);
            Ok(result)
        }
        Err(e) => {
            reporter.fail(&e);
            Err(e)
        }
    }
}

/// Samples the configured interface every period until Ctrl-C, or until the
/// scheduler halts itself on a capture failure.
#[instrument(level = "info", name = "run_watch", skip_all, fields(interface = %config.capture.interface))]
pub async fn run_watch(
    config: &LanvaktConfig,
    metrics: Option<Arc<MetricsRecorder>>,
) -> Result<(), EngineError> {
    let identity = host_identity(config)?;
    let reporter = Arc::new(console_reporter(
        &config.host.network_label,
        identity,
        metrics.clone(),
    ));
    let options = ScheduleOptions::from(&config.schedule);

    let mut scheduler = CycleScheduler::new(
        Arc::new(RuleCascade::new(identity)),
        Arc::new(live_adapter(config)),
        sampling_window(config),
        options,
    );
    if let Some(metrics) = metrics {
        scheduler = scheduler.with_metrics(metrics);
    }

    info!(%identity, "{}", StatusLine::checking());
    let on_result = reporter.clone();
    let on_error = reporter;
    scheduler.start(
        move |result| on_result.deliver(result),
        move |err| on_error.fail(&err),
    )?;

    let mut idle_check = time::interval(options.period);
    idle_check.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);

    loop {
        tokio::select! {
            signal = &mut interrupt => {
                signal?;
                info!("Interrupt received, stopping");
                break;
            }
            _ = idle_check.tick() => {
                if !scheduler.is_running() {
                    break;
                }
            }
        }
    }

    scheduler.shutdown().await;
    Ok(())
}

/// Runs a single live cycle.
#[instrument(level = "info", name = "run_once", skip_all, fields(interface = %config.capture.interface))]
pub async fn run_once(
    config: &LanvaktConfig,
    metrics: Option<Arc<MetricsRecorder>>,
) -> Result<CycleResult, EngineError> {
    let identity = host_identity(config)?;
    let reporter = console_reporter(&config.host.network_label, identity, metrics);
    let cascade = RuleCascade::new(identity);
    let adapter = live_adapter(config);
    let window = sampling_window(config);

    info!(%identity, "{}", StatusLine::checking());
    let result = tokio::task::spawn_blocking(move || {
        cycle_once(&cascade, &adapter, &window, &reporter)
    })
    .await??;
    Ok(result)
}

/// Classifies a recorded trace with the same cascade used live.
#[instrument(level = "info", name = "run_replay", skip(network, metrics))]
pub async fn run_replay(
    path: &Path,
    identity: HostIdentity,
    network: &str,
    frame_limit: usize,
    metrics: Option<Arc<MetricsRecorder>>,
) -> Result<CycleResult, EngineError> {
    let reporter = console_reporter(network, identity, metrics);
    let cascade = RuleCascade::new(identity);
    let adapter = SavefileCapture::new(path, frame_limit);
    // Savefiles ignore the timeout; the name only shows up in logs.
    let window = SamplingWindow::new(path.display().to_string(), Default::default());

    let result = tokio::task::spawn_blocking(move || {
        cycle_once(&cascade, &adapter, &window, &reporter)
    })
    .await??;

    EventLogger::log_event(
        "replay_complete",
        vec![
            KeyValue::new("file", path.display().to_string()),
            KeyValue::new(
                "category",
                result.category().map_or("none", |c| c.label()),
            ),
        ],
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lanvakt_capture::{CaptureError, ScriptedCapture};
    use lanvakt_core::Category;
    use lanvakt_detection::standard_rules;
    use parking_lot::Mutex;
    use std::time::Duration;

    use crate::sink::{AlertSink, StatusSink};

    #[derive(Default)]
    struct Recorder {
        alerts: Mutex<Vec<Category>>,
        results: Mutex<Vec<CycleResult>>,
        errors: Mutex<usize>,
    }

    impl StatusSink for Recorder {
        fn on_result(&self, result: &CycleResult) {
            self.results.lock().push(*result);
        }

        fn on_error(&self, _error: &DetectionError) {
            *self.errors.lock() += 1;
        }
    }

    impl AlertSink for Recorder {
        fn on_alert(&self, category: Category) {
            self.alerts.lock().push(category);
        }
    }

    fn identity() -> HostIdentity {
        "aa:bb:cc:dd:ee:fe".parse().unwrap()
    }

    fn window() -> SamplingWindow {
        SamplingWindow::new("eth0", Duration::from_millis(100))
    }

    #[test]
    fn cycle_once_alerts_on_match() {
        let recorder = Arc::new(Recorder::default());
        let reporter = Reporter::new(recorder.clone(), recorder.clone());
        let cascade = RuleCascade::new(identity());
        let filter = standard_rules(&identity())[1].filter().to_string();
        let capture = ScriptedCapture::new().matching(filter);

        let result = cycle_once(&cascade, &capture, &window(), &reporter).unwrap();
        assert_eq!(result, CycleResult::Matched(Category::SpoofedArp));
        assert_eq!(*recorder.alerts.lock(), vec![Category::SpoofedArp]);
        assert_eq!(*recorder.results.lock(), vec![result]);
    }

    #[test]
    fn cycle_once_reports_clean_without_alert() {
        let recorder = Arc::new(Recorder::default());
        let reporter = Reporter::new(recorder.clone(), recorder.clone());
        let cascade = RuleCascade::new(identity());

        let result = cycle_once(&cascade, &ScriptedCapture::new(), &window(), &reporter).unwrap();
        assert!(result.is_clean());
        assert!(recorder.alerts.lock().is_empty());
        assert_eq!(recorder.results.lock().len(), 1);
    }

    #[test]
    fn cycle_once_routes_failures_to_error_sink() {
        let recorder = Arc::new(Recorder::default());
        let reporter = Reporter::new(recorder.clone(), recorder.clone());
        let cascade = RuleCascade::new(identity());
        let capture = ScriptedCapture::new().failing_from(
            2,
            CaptureError::Read("link went down".into()),
        );

        let err = cycle_once(&cascade, &capture, &window(), &reporter).unwrap_err();
        assert!(matches!(
            err,
            DetectionError::CaptureUnavailable {
                category: Category::WellKnownPort,
                ..
            }
        ));
        assert_eq!(*recorder.errors.lock(), 1);
        assert!(recorder.results.lock().is_empty());
        assert!(recorder.alerts.lock().is_empty());
    }

    #[test]
    fn configured_mac_overrides_interface() {
        let mut config = LanvaktConfig::default();
        config.capture.interface = "lanvakt-does-not-exist0".into();
        config.host.mac = Some(identity());
        assert_eq!(host_identity(&config).unwrap(), identity());
    }

    #[test]
    fn unknown_interface_without_override_fails() {
        let mut config = LanvaktConfig::default();
        config.capture.interface = "lanvakt-does-not-exist0".into();
        assert!(matches!(
            host_identity(&config),
            Err(EngineError::Capture(CaptureError::InterfaceUnavailable { .. }))
        ));
    }

    #[test]
    fn window_follows_capture_config() {
        let mut config = LanvaktConfig::default();
        config.capture.interface = "wlan0".into();
        config.capture.timeout_ms = 750;
        let window = sampling_window(&config);
        assert_eq!(window.interface, "wlan0");
        assert_eq!(window.timeout, Duration::from_millis(750));
    }

    #[test]
    fn unusable_interface_address_is_a_configuration_error() {
        for octets in [[0; 6], [0x01, 0x00, 0x5e, 0x00, 0x00, 0x01]] {
            assert!(matches!(
                identity_from(octets),
                Err(EngineError::Detection(DetectionError::InvalidConfiguration(_)))
            ));
        }
        assert_eq!(
            identity_from([0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xfe]).unwrap(),
            identity()
        );
    }

    #[test]
    fn missing_config_file_is_a_config_error() {
        assert!(matches!(
            load_config(Some(Path::new("/nonexistent/lanvakt.yaml"))),
            Err(EngineError::Config(lanvakt_config::ConfigError::FileNotFound(_)))
        ));
    }

    #[test]
    fn metrics_follow_telemetry_switch() {
        let mut config = LanvaktConfig::default();
        assert!(metrics_recorder(&config).unwrap().is_some());
        config.telemetry.metrics = false;
        assert!(metrics_recorder(&config).unwrap().is_none());
    }

    #[tokio::test]
    async fn replay_of_missing_trace_is_a_detection_error() {
        let err = run_replay(
            Path::new("/nonexistent/trace.pcap"),
            identity(),
            "Wi-Fi",
            1,
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Detection(DetectionError::CaptureUnavailable {
                category: Category::BroadcastFlood,
                ..
            })
        ));
    }
}
