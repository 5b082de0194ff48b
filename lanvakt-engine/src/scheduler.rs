//! ## lanvakt-engine::scheduler
//! **Periodic, cancellable cascade driver**
//!
//! One run is a single tokio task ticking on a fixed period. Each tick
//! evaluates the cascade on the blocking pool and waits for it, so cycles
//! never overlap; ticks missed while a cycle is still capturing are skipped.
//!
//! Stopping discards in-flight work: a capture already underway may finish
//! on the blocking pool, but its outcome is dropped. Delivery happens under
//! the same lock `stop` takes, so once `stop` returns no callback of that run
//! can be observed. The lock is reentrant, so a callback may stop the
//! scheduler it is called from.

use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use lanvakt_capture::CaptureAdapter;
use lanvakt_config::{ErrorPolicy, FirstTick, ScheduleConfig};
use lanvakt_core::{CycleResult, SamplingWindow};
use lanvakt_detection::{DetectionError, RuleCascade};
use lanvakt_telemetry::MetricsRecorder;
use parking_lot::{Mutex, ReentrantMutex};
use tokio::runtime::Handle;
use tokio::task::{self, JoinHandle};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::error::EngineError;

const MIN_PERIOD: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleOptions {
    pub period: Duration,
    pub first_tick: FirstTick,
    pub on_error: ErrorPolicy,
}

impl ScheduleOptions {
    pub fn every(period: Duration) -> Self {
        Self {
            period,
            first_tick: FirstTick::default(),
            on_error: ErrorPolicy::default(),
        }
    }

    pub fn first_tick(mut self, first_tick: FirstTick) -> Self {
        self.first_tick = first_tick;
        self
    }

    pub fn on_error(mut self, policy: ErrorPolicy) -> Self {
        self.on_error = policy;
        self
    }
}

impl From<&ScheduleConfig> for ScheduleOptions {
    fn from(config: &ScheduleConfig) -> Self {
        Self {
            period: config.period(),
            first_tick: config.first_tick,
            on_error: config.on_error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
}

type ResultCallback = Box<dyn Fn(CycleResult) + Send + Sync>;
type ErrorCallback = Box<dyn Fn(DetectionError) + Send + Sync>;
type CancelFlag = Arc<ReentrantMutex<Cell<bool>>>;

struct ActiveRun {
    id: u64,
    cancelled: CancelFlag,
    handle: JoinHandle<()>,
}

impl ActiveRun {
    fn cancel(self) -> JoinHandle<()> {
        // Waits for a delivery in progress, then blocks all later ones.
        self.cancelled.lock().set(true);
        self.handle.abort();
        self.handle
    }
}

pub struct CycleScheduler {
    cascade: Arc<RuleCascade>,
    adapter: Arc<dyn CaptureAdapter>,
    window: SamplingWindow,
    options: ScheduleOptions,
    metrics: Option<Arc<MetricsRecorder>>,
    active: Arc<Mutex<Option<ActiveRun>>>,
    runs: AtomicU64,
}

impl CycleScheduler {
    pub fn new(
        cascade: Arc<RuleCascade>,
        adapter: Arc<dyn CaptureAdapter>,
        window: SamplingWindow,
        options: ScheduleOptions,
    ) -> Self {
        Self {
            cascade,
            adapter,
            window,
            options,
            metrics: None,
            active: Arc::new(Mutex::new(None)),
            runs: AtomicU64::new(0),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsRecorder>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn options(&self) -> ScheduleOptions {
        self.options
    }

    pub fn state(&self) -> SchedulerState {
        if self.active.lock().is_some() {
            SchedulerState::Running
        } else {
            SchedulerState::Idle
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state() == SchedulerState::Running
    }

    /// Starts periodic evaluation. Returns `Ok(false)` when a run is already
    /// active; that run is left untouched.
    ///
    /// Callbacks run on the loop task and may call `stop`; once they do, no
    /// further callbacks of this run follow.
    pub fn start<R, E>(&self, on_result: R, on_error: E) -> Result<bool, EngineError>
    where
        R: Fn(CycleResult) + Send + Sync + 'static,
        E: Fn(DetectionError) + Send + Sync + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| EngineError::NoRuntime)?;

        let mut active = self.active.lock();
        if active.is_some() {
            debug!("Scheduler already running, start ignored");
            return Ok(false);
        }

        let id = self.runs.fetch_add(1, Ordering::Relaxed) + 1;
        let cancelled = Arc::new(ReentrantMutex::new(Cell::new(false)));
        let cycle_loop = CycleLoop {
            id,
            cascade: self.cascade.clone(),
            adapter: self.adapter.clone(),
            window: self.window.clone(),
            options: self.options,
            metrics: self.metrics.clone(),
            cancelled: cancelled.clone(),
            active: self.active.clone(),
            on_result: Box::new(on_result),
            on_error: Box::new(on_error),
        };

        // The loop can only retire itself once this lock is released, so the
        // slot is always filled before it could be cleared.
        let handle = runtime.spawn(cycle_loop.run());
        *active = Some(ActiveRun {
            id,
            cancelled,
            handle,
        });

        info!(
            run = id,
            interface = %self.window.interface,
            period_ms = self.options.period.as_millis() as u64,
            "Scheduler started"
        );
        Ok(true)
    }

    /// Cancels future cycles. Returns `false` when already idle.
    pub fn stop(&self) -> bool {
        let run = self.active.lock().take();
        match run {
            Some(run) => {
                let id = run.id;
                drop(run.cancel());
                info!(run = id, "Scheduler stopped");
                true
            }
            None => false,
        }
    }

    /// Stops and waits for the loop task to wind down.
    pub async fn shutdown(&self) {
        let run = self.active.lock().take();
        if let Some(run) = run {
            let id = run.id;
            // Abort surfaces as a cancelled JoinError.
            let _ = run.cancel().await;
            info!(run = id, "Scheduler shut down");
        }
    }
}

impl Drop for CycleScheduler {
    fn drop(&mut self) {
        if let Some(run) = self.active.lock().take() {
            drop(run.cancel());
        }
    }
}

enum Flow {
    Continue,
    Halt,
}

struct CycleLoop {
    id: u64,
    cascade: Arc<RuleCascade>,
    adapter: Arc<dyn CaptureAdapter>,
    window: SamplingWindow,
    options: ScheduleOptions,
    metrics: Option<Arc<MetricsRecorder>>,
    cancelled: CancelFlag,
    active: Arc<Mutex<Option<ActiveRun>>>,
    on_result: ResultCallback,
    on_error: ErrorCallback,
}

impl CycleLoop {
    async fn run(self) {
        let period = self.options.period.max(MIN_PERIOD);
        let first = match self.options.first_tick {
            FirstTick::Immediate => Instant::now(),
            FirstTick::AfterPeriod => Instant::now() + period,
        };
        let mut ticker = time::interval_at(first, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            let outcome = self.cycle().await;
            if let Flow::Halt = self.deliver(outcome) {
                break;
            }
        }
        debug!(run = self.id, "Cycle loop finished");
    }

    async fn cycle(&self) -> Option<Result<CycleResult, DetectionError>> {
        let cascade = self.cascade.clone();
        let adapter = self.adapter.clone();
        let window = self.window.clone();

        let started = std::time::Instant::now();
        let joined =
            task::spawn_blocking(move || cascade.evaluate(adapter.as_ref(), &window)).await;
        if let Some(metrics) = &self.metrics {
            metrics.observe_cycle(started.elapsed().as_secs_f64());
        }

        match joined {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                error!(run = self.id, "Cycle evaluation failed: {e}");
                None
            }
        }
    }

    fn deliver(&self, outcome: Option<Result<CycleResult, DetectionError>>) -> Flow {
        let cancelled = self.cancelled.lock();
        if cancelled.get() {
            debug!(run = self.id, "Discarding outcome of a stopped run");
            return Flow::Halt;
        }

        match outcome {
            None => {}
            Some(Ok(result)) => {
                if let Some(metrics) = &self.metrics {
                    metrics.inc_cycles();
                }
                (self.on_result)(result);
            }
            Some(Err(err)) => {
                if let Some(metrics) = &self.metrics {
                    metrics.inc_cycle_errors();
                }
                (self.on_error)(err);
                if self.options.on_error == ErrorPolicy::Stop {
                    cancelled.set(true);
                    drop(cancelled);
                    self.retire();
                    return Flow::Halt;
                }
            }
        }

        // Set when a callback stopped this run.
        if cancelled.get() {
            Flow::Halt
        } else {
            Flow::Continue
        }
    }

    fn retire(&self) {
        let mut active = self.active.lock();
        if active.as_ref().is_some_and(|run| run.id == self.id) {
            *active = None;
            info!(run = self.id, "Scheduler stopped after capture failure");
        }
    }
}
