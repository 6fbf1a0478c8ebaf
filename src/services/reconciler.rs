use crate::metrics::Metrics;
use crate::models::{Activity, Settings, StatusValue, TargetConfig, WritePolicy};
use crate::services::host::{HostError, PresenceSource, StatusSink};
use crate::state::StateManager;
use std::sync::{Arc, Mutex as SyncMutex, PoisonError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Errors surfaced to callers of the reconciler lifecycle
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconcilerError {
    #[error("Reconciler is already running")]
    AlreadyRunning,

    #[error("Failed to capture baseline status: {0}")]
    BaselineRead(#[source] HostError),
}

/// Tuning for a reconciler instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcilerOptions {
    pub poll_interval: Duration,
    pub write_policy: WritePolicy,
}

impl Default for ReconcilerOptions {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for ReconcilerOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            poll_interval: settings.poll_interval(),
            write_policy: settings.write_policy,
        }
    }
}

/// What a single snapshot scan decided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickDecision {
    pub status: StatusValue,
    pub target_present: bool,
}

/// Decide the status for one tick.
///
/// The target wins as soon as any activity matches it; otherwise the baseline
/// is restored. Exactly one status comes out no matter how many activities
/// match.
pub fn decide(activities: &[Activity], target: &TargetConfig, baseline: StatusValue) -> TickDecision {
    let target_present = activities
        .iter()
        .any(|activity| target.matches(&activity.name));

    TickDecision {
        status: if target_present { StatusValue::Dnd } else { baseline },
        target_present,
    }
}

/// Result of running one tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TickOutcome {
    /// Reconciler was stopped before the tick started
    Aborted,
    Wrote(StatusValue),
    /// Transition policy and the status was already in place
    Unchanged(StatusValue),
    Failed(HostError),
}

/// Owns everything a tick needs; moved into the polling task.
struct TickWorker {
    presence: Arc<dyn PresenceSource>,
    sink: Arc<dyn StatusSink>,
    target: TargetConfig,
    baseline: StatusValue,
    policy: WritePolicy,
    running: Arc<AtomicBool>,
    /// Held for a whole read-scan-write sequence; teardown takes it before restoring
    gate: Arc<SyncMutex<()>>,
    last_written: Option<StatusValue>,
    state: Arc<StateManager>,
    metrics: Arc<Metrics>,
}

impl TickWorker {
    fn run_tick(&mut self) -> TickOutcome {
        let gate = Arc::clone(&self.gate);
        let _guard = gate.lock().unwrap_or_else(PoisonError::into_inner);

        if !self.running.load(Ordering::Acquire) {
            tracing::debug!("Tick fired after stop was requested, skipping");
            self.metrics.record_aborted_tick();
            return TickOutcome::Aborted;
        }

        let activities = match self.presence.current_activities() {
            Ok(activities) => activities,
            Err(e) => {
                self.metrics.record_presence_failure();
                return self.fail(e);
            }
        };

        let decision = decide(&activities, &self.target, self.baseline);
        tracing::trace!(
            "Scanned {} activities, target present: {}",
            activities.len(),
            decision.target_present
        );

        if self.policy == WritePolicy::OnTransition && self.last_written == Some(decision.status) {
            self.metrics.record_tick();
            self.metrics.record_unchanged_tick();
            self.state.record_tick(decision.target_present, None);
            return TickOutcome::Unchanged(decision.status);
        }

        match self.sink.write_status(decision.status) {
            Ok(()) => {
                if decision.target_present && self.last_written != Some(StatusValue::Dnd) {
                    tracing::info!("{} detected, switching status to dnd", self.target.game_name);
                } else if !decision.target_present && self.last_written == Some(StatusValue::Dnd) {
                    tracing::info!(
                        "{} no longer running, restoring status {}",
                        self.target.game_name,
                        decision.status
                    );
                }

                self.last_written = Some(decision.status);
                self.metrics.record_tick();
                if decision.target_present {
                    self.metrics.record_dnd_write();
                } else {
                    self.metrics.record_restore_write();
                }
                self.state
                    .record_tick(decision.target_present, Some(decision.status));
                TickOutcome::Wrote(decision.status)
            }
            Err(e) => {
                // Forget the last write so the next tick retries it
                self.last_written = None;
                self.metrics.record_write_failure();
                self.fail(e)
            }
        }
    }

    fn fail(&self, error: HostError) -> TickOutcome {
        tracing::warn!("Tick failed, will retry next period: {}", error);
        self.state.record_tick_failure(error.to_string());
        TickOutcome::Failed(error)
    }

    /// Drive ticks until cancelled. The first tick fires one full period after start.
    async fn run(mut self, period: Duration, mut cancel_rx: watch::Receiver<bool>) {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                // Fires on cancel and when the sender is dropped
                _ = cancel_rx.changed() => break,
                _ = interval.tick() => {
                    self.run_tick();
                }
            }
        }

        tracing::debug!("Polling task for {} finished", self.target.game_name);
    }
}

/// A run in progress
struct ActiveRun {
    baseline: StatusValue,
    running: Arc<AtomicBool>,
    gate: Arc<SyncMutex<()>>,
    cancel_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ActiveRun {
    /// Stop new ticks and signal the polling task to exit
    fn request_stop(&self) {
        self.running.store(false, Ordering::Release);
        let _ = self.cancel_tx.send(true);
    }

    /// Wait out a tick that is mid-sequence on another thread.
    ///
    /// Once this returns no tick can write again: the next one to take the
    /// gate sees `running == false`.
    fn wait_for_tick(&self) {
        drop(self.gate.lock().unwrap_or_else(PoisonError::into_inner));
    }
}

/// Forces Do Not Disturb while the target activity is running and restores the
/// user's own status otherwise.
///
/// # Lifecycle
///
/// - [`start()`](Self::start) captures the baseline status and begins polling.
///   Starting while already running is rejected with
///   [`ReconcilerError::AlreadyRunning`] and changes nothing.
/// - [`stop()`](Self::stop) cancels polling, waits for an in-flight tick and
///   writes the baseline back. Stopping while stopped is a no-op.
///
/// Ticks run one at a time on a single tokio task. Per-tick failures are
/// logged, counted in [`Metrics`] and broadcast through the [`StateManager`];
/// they never stop the loop.
pub struct StatusReconciler {
    presence: Arc<dyn PresenceSource>,
    sink: Arc<dyn StatusSink>,
    options: ReconcilerOptions,
    state: Arc<StateManager>,
    metrics: Arc<Metrics>,
    active: Mutex<Option<ActiveRun>>,
}

impl StatusReconciler {
    pub fn new(
        presence: Arc<dyn PresenceSource>,
        sink: Arc<dyn StatusSink>,
        options: ReconcilerOptions,
    ) -> Self {
        Self {
            presence,
            sink,
            options,
            state: Arc::new(StateManager::new()),
            metrics: Arc::new(Metrics::new()),
            active: Mutex::new(None),
        }
    }

    pub fn options(&self) -> ReconcilerOptions {
        self.options
    }

    pub fn state(&self) -> Arc<StateManager> {
        Arc::clone(&self.state)
    }

    pub fn metrics(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }

    pub fn is_running(&self) -> bool {
        self.state.read(|s| s.is_running())
    }

    /// Baseline captured by the current run, if any
    pub fn baseline(&self) -> Option<StatusValue> {
        self.state
            .read(|s| if s.is_running() { s.baseline } else { None })
    }

    /// Capture the baseline status and begin polling for `target`.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// - [`ReconcilerError::AlreadyRunning`] if a run is in progress
    /// - [`ReconcilerError::BaselineRead`] if the current status cannot be read;
    ///   the reconciler stays stopped
    pub async fn start(&self, target: TargetConfig) -> Result<(), ReconcilerError> {
        let mut active = self.active.lock().await;
        if active.is_some() {
            tracing::warn!("start() called while already running, ignoring");
            return Err(ReconcilerError::AlreadyRunning);
        }

        let baseline = self.sink.read_status().map_err(|e| {
            tracing::error!("Error starting GameZen: {}", e);
            ReconcilerError::BaselineRead(e)
        })?;

        if target.game_name.trim().is_empty() {
            tracing::warn!("Target game name is empty, dnd will never be forced");
        }

        let running = Arc::new(AtomicBool::new(true));
        let gate = Arc::new(SyncMutex::new(()));
        let (cancel_tx, cancel_rx) = watch::channel(false);

        let worker = TickWorker {
            presence: Arc::clone(&self.presence),
            sink: Arc::clone(&self.sink),
            target: target.clone(),
            baseline,
            policy: self.options.write_policy,
            running: Arc::clone(&running),
            gate: Arc::clone(&gate),
            last_written: None,
            state: Arc::clone(&self.state),
            metrics: Arc::clone(&self.metrics),
        };

        self.state.mark_started(baseline, &target.game_name);
        let task = tokio::spawn(worker.run(self.options.poll_interval, cancel_rx));

        *active = Some(ActiveRun {
            baseline,
            running,
            gate,
            cancel_tx,
            task,
        });

        tracing::info!(
            "GameZen started: watching for {:?} every {:?}, baseline status {}",
            target.game_name,
            self.options.poll_interval,
            baseline
        );

        Ok(())
    }

    /// Stop polling and restore the baseline status.
    ///
    /// Always completes: a failing restore write is logged, not returned.
    ///
    /// Cancel-safe: the run stays registered until the restore write has been
    /// issued, so a dropped `stop()` future leaves the restore to the next
    /// `stop()` or to `Drop`.
    pub async fn stop(&self) {
        let mut active = self.active.lock().await;
        let Some(run) = active.as_mut() else {
            tracing::debug!("stop() called while not running, nothing to do");
            return;
        };

        run.request_stop();

        // The only await point; nothing below it can be cancelled
        if let Err(e) = (&mut run.task).await {
            tracing::error!("Polling task ended abnormally: {}", e);
        }

        run.wait_for_tick();
        let Some(run) = active.take() else {
            return;
        };

        let restored = match self.sink.write_status(run.baseline) {
            Ok(()) => {
                self.metrics.record_restore_write();
                Some(run.baseline)
            }
            Err(e) => {
                self.metrics.record_write_failure();
                tracing::error!("Error stopping GameZen: {}", e);
                None
            }
        };

        self.state.mark_stopped(restored);
        self.metrics.log_summary();
        tracing::info!("GameZen stopped, status restored to {}", run.baseline);
    }
}

impl Drop for StatusReconciler {
    /// Best-effort teardown when the reconciler is dropped without `stop()`
    fn drop(&mut self) {
        let Some(run) = self.active.get_mut().take() else {
            return;
        };

        run.request_stop();
        run.task.abort();
        run.wait_for_tick();

        if let Err(e) = self.sink.write_status(run.baseline) {
            tracing::error!("Failed to restore status while dropping reconciler: {}", e);
        }
    }
}
