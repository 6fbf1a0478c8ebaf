use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The user's visible presence status.
///
/// Serialized in lowercase (`online`, `idle`, `invisible`, `dnd`), which is the
/// same spelling the host uses in its own settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusValue {
    #[default]
    Online,
    Idle,
    Invisible,
    Dnd,
}

impl StatusValue {
    /// All status values, in the order the host lists them
    pub const ALL: [StatusValue; 4] = [
        StatusValue::Online,
        StatusValue::Idle,
        StatusValue::Invisible,
        StatusValue::Dnd,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusValue::Online => "online",
            StatusValue::Idle => "idle",
            StatusValue::Invisible => "invisible",
            StatusValue::Dnd => "dnd",
        }
    }
}

impl fmt::Display for StatusValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown status value: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for StatusValue {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatusValue::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}
