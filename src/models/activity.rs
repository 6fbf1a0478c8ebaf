use serde::{Deserialize, Serialize};

/// A single activity the host reports for the local user.
///
/// Only the name matters for reconciliation. Any other fields the host attaches
/// (timestamps, assets, party info) are ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub name: String,
}

impl Activity {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Ordered list of activities, read fresh on every tick
pub type ActivitySnapshot = Vec<Activity>;
