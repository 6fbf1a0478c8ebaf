use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Placeholder game name used until the user configures one
pub const DEFAULT_GAME_NAME: &str = "Game Name";

/// Reference polling period
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

/// Key under which [`Settings`] are persisted in the plugin's namespace
pub const SETTINGS_KEY: &str = "settings";

/// The activity name that triggers the Do Not Disturb override.
///
/// Read once when the reconciler starts; edits take effect on the next start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetConfig {
    pub game_name: String,
}

impl TargetConfig {
    pub fn new(game_name: impl Into<String>) -> Self {
        Self {
            game_name: game_name.into(),
        }
    }

    /// Exact, case-sensitive match against an activity name
    pub fn matches(&self, activity_name: &str) -> bool {
        activity_name == self.game_name
    }
}

/// When the reconciler issues status writes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WritePolicy {
    /// Write the decided status on every tick, including a restore write on
    /// every tick the target is absent
    #[default]
    EveryTick,

    /// Write only when the decided status differs from the last successful write
    OnTransition,
}

/// Plugin settings blob stored under [`SETTINGS_KEY`].
///
/// Unset keys keep their defaults; unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub game_name: String,
    pub poll_interval_secs: u64,
    pub write_policy: WritePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            game_name: DEFAULT_GAME_NAME.to_string(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            write_policy: WritePolicy::default(),
        }
    }
}

impl Settings {
    pub fn target(&self) -> TargetConfig {
        TargetConfig::new(self.game_name.clone())
    }

    /// Polling period, never shorter than one second
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    /// True once the user has replaced the placeholder game name
    pub fn is_configured(&self) -> bool {
        let name = self.game_name.trim();
        !name.is_empty() && name != DEFAULT_GAME_NAME
    }
}

/// Application-level configuration for the `gamezen` binary.
///
/// Layered by [`ConfigManager`](crate::config::ConfigManager): defaults, then
/// `gamezen.yaml`, then `GAMEZEN_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding per-namespace settings files
    pub data_dir: String,

    /// Namespace the settings blob is stored under
    pub namespace: String,

    /// YAML file standing in for the host's presence and status services
    pub host_file: String,

    pub log_dir: String,
    pub debug_mode: bool,
    pub console_logging: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: "GameZen Data".to_string(),
            namespace: "GameZen".to_string(),
            host_file: "GameZen Data/host.yaml".to_string(),
            log_dir: "logs".to_string(),
            debug_mode: false,
            console_logging: true,
        }
    }
}
