// State management module
//
// This module provides the StateManager which wraps the observable reconciler
// status with thread-safe access and emits change events for interested listeners.

use crate::models::StatusValue;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::broadcast;

/// Lifecycle phase of the reconciler
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Stopped,
    Running,
}

/// Change events emitted when the reconciler status is modified
///
/// Tick failures are reported here as well, which makes this channel the place
/// to watch for per-tick errors that never reach the caller of `start()`.
#[derive(Clone, Debug, PartialEq)]
pub enum StateChange {
    /// Reconciler started and captured a baseline
    Started {
        baseline: StatusValue,
        game_name: String,
    },

    /// Reconciler stopped; `restored` is `None` if the final write failed
    Stopped { restored: Option<StatusValue> },

    /// The target activity appeared in the snapshot
    TargetDetected { game_name: String },

    /// The target activity is no longer reported
    TargetLost,

    /// A status write succeeded with a different value than the previous one
    StatusWritten { status: StatusValue },

    /// A tick failed to read presence or write status
    TickFailed { error: String },
}

/// Observable snapshot of what the reconciler is doing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReconcilerStatus {
    pub phase: Phase,

    /// Status captured by the most recent `start()`
    pub baseline: Option<StatusValue>,

    /// Target activity name for the current (or last) run
    pub game_name: Option<String>,

    /// Last status successfully written to the sink
    pub last_written: Option<StatusValue>,

    /// Whether the last completed tick saw the target activity
    pub target_present: bool,

    pub ticks_completed: u64,
    pub consecutive_failures: u32,
}

impl ReconcilerStatus {
    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }
}

/// Thread-safe status holder with event emission
///
/// - [`read()`](Self::read) for reading status under a short read lock
/// - [`update()`](Self::update) for mutations with automatic event emission
/// - [`subscribe()`](Self::subscribe) for listening to changes
pub struct StateManager {
    state: Arc<RwLock<ReconcilerStatus>>,
    state_tx: broadcast::Sender<StateChange>,
}

impl StateManager {
    /// Create a new StateManager with a broadcast buffer of 100 events
    pub fn new() -> Self {
        let (state_tx, _) = broadcast::channel(100);
        Self {
            state: Arc::new(RwLock::new(ReconcilerStatus::default())),
            state_tx,
        }
    }

    /// Clone of the current status
    pub fn snapshot(&self) -> ReconcilerStatus {
        self.read(|s| s.clone())
    }

    /// Execute a function with read access to the status
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ReconcilerStatus) -> R,
    {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    /// Update the status and emit change events
    ///
    /// Returns the events that were emitted.
    pub fn update<F>(&self, update_fn: F) -> Vec<StateChange>
    where
        F: FnOnce(&mut ReconcilerStatus),
    {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let old_state = state.clone();

        update_fn(&mut state);

        let changes = Self::detect_changes(&old_state, &state);
        for change in &changes {
            // No subscribers is fine
            let _ = self.state_tx.send(change.clone());
        }

        changes
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.state_tx.subscribe()
    }

    fn detect_changes(old: &ReconcilerStatus, new: &ReconcilerStatus) -> Vec<StateChange> {
        let mut changes = Vec::new();

        if old.phase != new.phase {
            match new.phase {
                Phase::Running => changes.push(StateChange::Started {
                    baseline: new.baseline.unwrap_or_default(),
                    game_name: new.game_name.clone().unwrap_or_default(),
                }),
                Phase::Stopped => changes.push(StateChange::Stopped {
                    restored: new.last_written,
                }),
            }
        }

        // Target transitions only matter inside a run
        if old.is_running() && new.is_running() && old.target_present != new.target_present {
            if new.target_present {
                changes.push(StateChange::TargetDetected {
                    game_name: new.game_name.clone().unwrap_or_default(),
                });
            } else {
                changes.push(StateChange::TargetLost);
            }
        }

        if new.is_running() && old.last_written != new.last_written {
            if let Some(status) = new.last_written {
                changes.push(StateChange::StatusWritten { status });
            }
        }

        changes
    }

    /// Enter the running phase with a freshly captured baseline
    pub fn mark_started(&self, baseline: StatusValue, game_name: &str) -> Vec<StateChange> {
        self.update(|state| {
            *state = ReconcilerStatus {
                phase: Phase::Running,
                baseline: Some(baseline),
                game_name: Some(game_name.to_string()),
                ..ReconcilerStatus::default()
            };
        })
    }

    /// Leave the running phase
    pub fn mark_stopped(&self, restored: Option<StatusValue>) -> Vec<StateChange> {
        self.update(|state| {
            state.phase = Phase::Stopped;
            state.target_present = false;
            state.last_written = restored;
        })
    }

    /// Record a completed tick
    ///
    /// `written` is `None` when the tick decided a status but skipped the write.
    pub fn record_tick(&self, target_present: bool, written: Option<StatusValue>) -> Vec<StateChange> {
        self.update(|state| {
            state.ticks_completed += 1;
            state.consecutive_failures = 0;
            state.target_present = target_present;
            if written.is_some() {
                state.last_written = written;
            }
        })
    }

    /// Record a failed tick and broadcast the error
    pub fn record_tick_failure(&self, error: String) -> Vec<StateChange> {
        let mut changes = self.update(|state| {
            state.consecutive_failures += 1;
        });

        let event = StateChange::TickFailed { error };
        let _ = self.state_tx.send(event.clone());
        changes.push(event);

        changes
    }
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}
