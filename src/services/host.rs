use crate::models::{ActivitySnapshot, StatusValue};
use thiserror::Error;

/// Errors raised by the host services the reconciler talks to
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("Failed to read current activities: {0}")]
    PresenceRead(String),

    #[error("Failed to read current status: {0}")]
    StatusRead(String),

    #[error("Failed to write status: {0}")]
    StatusWrite(String),
}

/// Source of the activities the host currently reports for the local user.
#[cfg_attr(test, mockall::automock)]
pub trait PresenceSource: Send + Sync {
    /// Live, ordered list of activities. Called once per tick.
    fn current_activities(&self) -> Result<ActivitySnapshot, HostError>;
}

/// Read/write access to the user's visible status.
#[cfg_attr(test, mockall::automock)]
pub trait StatusSink: Send + Sync {
    /// Current status, read once per start to capture the baseline
    fn read_status(&self) -> Result<StatusValue, HostError>;

    fn write_status(&self, status: StatusValue) -> Result<(), HostError>;
}
