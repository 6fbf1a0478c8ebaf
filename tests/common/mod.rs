//! Shared test doubles for the integration tests

#![allow(dead_code)]

use gamezen::{Activity, HostError, PresenceSource, StatusSink, StatusValue};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Poll interval used by the timer-driven tests
pub const PERIOD: Duration = Duration::from_secs(10);

/// In-memory host whose activities and failures are scripted by the test.
///
/// The status behaves like the real thing: writes change what `read_status` returns.
pub struct ScriptedHost {
    status: Mutex<StatusValue>,
    activities: Mutex<Vec<Activity>>,
    writes: Mutex<Vec<StatusValue>>,
    status_reads: AtomicUsize,
    presence_calls: AtomicUsize,
    presence_delay: Mutex<Duration>,
    fail_presence: AtomicBool,
    fail_writes: AtomicBool,
}

impl ScriptedHost {
    pub fn new(status: StatusValue) -> Self {
        Self {
            status: Mutex::new(status),
            activities: Mutex::new(Vec::new()),
            writes: Mutex::new(Vec::new()),
            status_reads: AtomicUsize::new(0),
            presence_calls: AtomicUsize::new(0),
            presence_delay: Mutex::new(Duration::ZERO),
            fail_presence: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn set_activities(&self, names: &[&str]) {
        *self.activities.lock().unwrap() = names.iter().map(|n| Activity::new(*n)).collect();
    }

    pub fn writes(&self) -> Vec<StatusValue> {
        self.writes.lock().unwrap().clone()
    }

    pub fn status(&self) -> StatusValue {
        *self.status.lock().unwrap()
    }

    pub fn status_reads(&self) -> usize {
        self.status_reads.load(Ordering::SeqCst)
    }

    pub fn presence_calls(&self) -> usize {
        self.presence_calls.load(Ordering::SeqCst)
    }

    /// Make every presence read block the calling thread for `delay`
    pub fn set_presence_delay(&self, delay: Duration) {
        *self.presence_delay.lock().unwrap() = delay;
    }

    pub fn fail_presence(&self, fail: bool) {
        self.fail_presence.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl PresenceSource for ScriptedHost {
    fn current_activities(&self) -> Result<Vec<Activity>, HostError> {
        self.presence_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.presence_delay.lock().unwrap();
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }

        if self.fail_presence.load(Ordering::SeqCst) {
            return Err(HostError::PresenceRead("scripted failure".to_string()));
        }
        Ok(self.activities.lock().unwrap().clone())
    }
}

impl StatusSink for ScriptedHost {
    fn read_status(&self) -> Result<StatusValue, HostError> {
        self.status_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.status())
    }

    fn write_status(&self, status: StatusValue) -> Result<(), HostError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(HostError::StatusWrite("scripted failure".to_string()));
        }
        self.writes.lock().unwrap().push(status);
        *self.status.lock().unwrap() = status;
        Ok(())
    }
}

/// Let paused time run for `duration`, giving the polling task a chance to tick
pub async fn advance(duration: Duration) {
    tokio::time::sleep(duration).await;
}
