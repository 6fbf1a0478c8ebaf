//! Services module - the status reconciliation loop and the host services it talks to.
//!
//! # Components
//!
//! - [`StatusReconciler`]: polls the host's activity list on a fixed period and
//!   forces `dnd` while the target activity is present, restoring the captured
//!   baseline status otherwise and on stop.
//! - [`PresenceSource`] / [`StatusSink`]: the two capabilities the reconciler
//!   needs from its host, injected at construction.
//! - [`FileHost`]: a YAML-file implementation of both capabilities for running
//!   outside a host application.
//!
//! # Usage Example
//!
//! ```ignore
//! use gamezen::services::{FileHost, ReconcilerOptions, StatusReconciler};
//! use gamezen::models::TargetConfig;
//! use std::sync::Arc;
//!
//! let host = Arc::new(FileHost::new("host.yaml"));
//! let reconciler = StatusReconciler::new(host.clone(), host, ReconcilerOptions::default());
//!
//! reconciler.start(TargetConfig::new("Chess")).await?;
//! // ... later
//! reconciler.stop().await;
//! ```

pub mod file_host;
pub mod host;
pub mod reconciler;

pub use file_host::{FileHost, HostDocument};
pub use host::{HostError, PresenceSource, StatusSink};
pub use reconciler::{
    ReconcilerError, ReconcilerOptions, StatusReconciler, TickDecision, decide,
};
