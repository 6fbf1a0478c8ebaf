//! GameZen - switches your status to Do Not Disturb while a game is running.
//!
//! # Overview
//!
//! This binary runs the [`StatusReconciler`] against a [`FileHost`], a YAML file
//! holding the user's status and current activities. It initializes:
//! - Application config ([`ConfigManager`]: defaults, `gamezen.yaml`, `GAMEZEN_*` env)
//! - Logging (daily rotating file + optional console output)
//! - Plugin settings ([`SettingsStore`], key `settings` in the `GameZen` namespace)
//! - The reconciler, which polls until Ctrl-C and then restores the baseline status
//!
//! # Execution Flow
//!
//! 1. Load app config
//! 2. Initialize logging → logs/gamezen.<date>
//! 3. Load settings from GameZen Data/GameZen.config.yaml
//! 4. Start the reconciler (captures the baseline status)
//! 5. Wait for Ctrl-C, forwarding state changes to the log
//! 6. Stop the reconciler (restores the baseline status)

use anyhow::{Context, Result};
use gamezen::{
    APP_NAME, ConfigManager, FileHost, ReconcilerOptions, SettingsStore, StateChange,
    StatusReconciler, VERSION,
};
use std::sync::Arc;
use tokio::sync::broadcast;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let app_config = ConfigManager::new("gamezen.yaml").load_app_config()?;

    let _log_guard = gamezen::logging::setup_logging(
        &app_config.log_dir,
        APP_NAME,
        app_config.debug_mode,
        app_config.console_logging,
    )?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let store = SettingsStore::new(&app_config.data_dir, &app_config.namespace)?;
    let settings = store.load_settings()?;

    if !settings.is_configured() {
        tracing::warn!(
            "No game configured yet; set settings.gameName in {}",
            store.path()
        );
    }

    let host = Arc::new(FileHost::new(&app_config.host_file));
    tracing::info!("Using host file {}", host.path());

    let reconciler = StatusReconciler::new(
        host.clone(),
        host,
        ReconcilerOptions::from(&settings),
    );

    let events = reconciler.state().subscribe();
    let event_logger = tokio::spawn(log_state_changes(events));

    reconciler
        .start(settings.target())
        .await
        .context("Failed to start GameZen")?;

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;

    tracing::info!("Interrupted, shutting down");
    reconciler.stop().await;

    // Last handle to the state channel; the logger drains it and exits on close
    drop(reconciler);
    if let Err(e) = event_logger.await {
        tracing::warn!("State listener ended abnormally: {}", e);
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Forward reconciler state changes to the log until the channel closes
async fn log_state_changes(mut events: broadcast::Receiver<StateChange>) {
    loop {
        match events.recv().await {
            Ok(change) => tracing::debug!("State change: {:?}", change),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!("State listener lagged, skipped {} events", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
