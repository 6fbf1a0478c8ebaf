//! Data models for GameZen.
//!
//! - [`StatusValue`]: the user's visible status (`online`, `idle`, `invisible`, `dnd`)
//! - [`Activity`] / [`ActivitySnapshot`]: what the host reports the user is doing
//! - [`TargetConfig`]: the activity name that triggers Do Not Disturb
//! - [`Settings`]: the persisted plugin settings blob
//! - [`AppConfig`]: configuration for the standalone binary

pub mod activity;
pub mod config;
pub mod status;

pub use activity::{Activity, ActivitySnapshot};
pub use config::{
    AppConfig, DEFAULT_GAME_NAME, DEFAULT_POLL_INTERVAL_SECS, SETTINGS_KEY, Settings,
    TargetConfig, WritePolicy,
};
pub use status::{ParseStatusError, StatusValue};
