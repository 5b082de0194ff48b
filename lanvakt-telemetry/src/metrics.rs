//! ## lanvakt-telemetry::metrics
//! **Prometheus counters and histograms for classification cycles**

use prometheus::{Counter, Histogram, HistogramOpts, IntCounterVec, Opts, Registry};

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub cycles: Counter,
    pub cycle_errors: Counter,
    pub alerts: IntCounterVec,
    pub cycle_duration: Histogram,
}

impl MetricsRecorder {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let cycles = Counter::new("lanvakt_cycles_total", "Completed classification cycles")?;
        let cycle_errors = Counter::new(
            "lanvakt_cycle_errors_total",
            "Cycles aborted because capture was unavailable",
        )?;
        let alerts = IntCounterVec::new(
            Opts::new("lanvakt_alerts_total", "Cycles that matched a category"),
            &["category"],
        )?;
        let cycle_duration = Histogram::with_opts(
            HistogramOpts::new(
                "lanvakt_cycle_duration_seconds",
                "Wall time of one cascade evaluation",
            )
            .buckets(vec![0.01, 0.1, 1.0, 5.0, 10.0, 25.0]),
        )?;

        registry.register(Box::new(cycles.clone()))?;
        registry.register(Box::new(cycle_errors.clone()))?;
        registry.register(Box::new(alerts.clone()))?;
        registry.register(Box::new(cycle_duration.clone()))?;

        Ok(Self {
            registry,
            cycles,
            cycle_errors,
            alerts,
            cycle_duration,
        })
    }

    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    pub fn inc_cycles(&self) {
        self.cycles.inc();
    }

    pub fn inc_cycle_errors(&self) {
        self.cycle_errors.inc();
    }

    pub fn inc_alerts(&self, category: &str) {
        self.alerts.with_label_values(&[category]).inc();
    }

    pub fn observe_cycle(&self, seconds: f64) {
        self.cycle_duration.observe(seconds);
    }
}
