// GameZen - Do Not Disturb while you play
//
// This is the library crate containing the status reconciliation loop and its collaborators.
// The binary crate (main.rs) runs it against a file-backed host until interrupted.

pub mod config;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::{ConfigManager, SettingsStore};
pub use metrics::Metrics;
pub use models::{Activity, AppConfig, Settings, StatusValue, TargetConfig, WritePolicy};
pub use services::{
    FileHost, HostError, PresenceSource, ReconcilerError, ReconcilerOptions, StatusReconciler,
    StatusSink,
};
pub use state::{Phase, ReconcilerStatus, StateChange, StateManager};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
