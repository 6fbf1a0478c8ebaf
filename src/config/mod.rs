use crate::models::{AppConfig, SETTINGS_KEY, Settings};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_yaml_ng::Value;
use std::fs;

/// Prefix for environment overrides of [`AppConfig`] (e.g. `GAMEZEN_DEBUG_MODE=true`)
pub const ENV_PREFIX: &str = "GAMEZEN";

/// Loads the application configuration for the `gamezen` binary.
///
/// Sources, later ones winning:
/// 1. Built-in defaults ([`AppConfig::default`])
/// 2. The YAML config file, if it exists
/// 3. `GAMEZEN_*` environment variables
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_file: Utf8PathBuf,
}

impl ConfigManager {
    pub fn new<P: AsRef<Utf8Path>>(config_file: P) -> Self {
        Self {
            config_file: config_file.as_ref().to_path_buf(),
        }
    }

    pub fn config_file(&self) -> &Utf8Path {
        &self.config_file
    }

    pub fn load_app_config(&self) -> Result<AppConfig> {
        let defaults = AppConfig::default();

        let layered = config::Config::builder()
            .set_default("data_dir", defaults.data_dir)?
            .set_default("namespace", defaults.namespace)?
            .set_default("host_file", defaults.host_file)?
            .set_default("log_dir", defaults.log_dir)?
            .set_default("debug_mode", defaults.debug_mode)?
            .set_default("console_logging", defaults.console_logging)?
            .add_source(
                config::File::from(self.config_file.as_std_path())
                    .format(config::FileFormat::Yaml)
                    .required(false),
            )
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .with_context(|| format!("Failed to load app config: {}", self.config_file))?;

        let app_config: AppConfig = layered
            .try_deserialize()
            .with_context(|| format!("Failed to parse app config: {}", self.config_file))?;

        tracing::info!("Loaded app config (file: {})", self.config_file);
        Ok(app_config)
    }
}

/// Per-namespace key-value store for plugin data.
///
/// Each namespace is one YAML mapping at `<data_dir>/<namespace>.config.yaml`.
/// Saving a key rewrites the file but keeps every other key and their order.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    data_dir: Utf8PathBuf,
    namespace: String,
    path: Utf8PathBuf,
}

impl SettingsStore {
    /// Create a store, creating `data_dir` if needed.
    pub fn new<P: AsRef<Utf8Path>>(data_dir: P, namespace: &str) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();

        if !data_dir.exists() {
            fs::create_dir_all(&data_dir)
                .with_context(|| format!("Failed to create data directory: {}", data_dir))?;
        }

        Ok(Self {
            path: data_dir.join(format!("{}.config.yaml", namespace)),
            namespace: namespace.to_string(),
            data_dir,
        })
    }

    pub fn data_dir(&self) -> &Utf8Path {
        &self.data_dir
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn load_entries(&self) -> Result<IndexMap<String, Value>> {
        if !self.path.exists() {
            return Ok(IndexMap::new());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read plugin data: {}", self.path))?;

        if contents.trim().is_empty() {
            return Ok(IndexMap::new());
        }

        serde_yaml_ng::from_str(&contents)
            .with_context(|| format!("Failed to parse plugin data: {}", self.path))
    }

    /// Load the value stored under `key`, or `None` if it was never saved.
    pub fn load_data<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let mut entries = self.load_entries()?;

        match entries.swap_remove(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_yaml_ng::from_value(value)
                .map(Some)
                .with_context(|| format!("Invalid value for '{}' in {}", key, self.path)),
        }
    }

    /// Store `value` under `key`, keeping other keys intact.
    pub fn save_data<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let mut entries = self.load_entries()?;

        let value = serde_yaml_ng::to_value(value)
            .with_context(|| format!("Failed to serialize '{}'", key))?;
        entries.insert(key.to_string(), value);

        let yaml = serde_yaml_ng::to_string(&entries).context("Failed to serialize plugin data")?;
        fs::write(&self.path, yaml)
            .with_context(|| format!("Failed to write plugin data: {}", self.path))?;

        tracing::info!("Saved '{}' to {}", key, self.path);
        Ok(())
    }

    /// Load plugin settings merged over the defaults.
    pub fn load_settings(&self) -> Result<Settings> {
        match self.load_data::<Settings>(SETTINGS_KEY)? {
            Some(settings) => {
                tracing::info!("Loaded settings from {}", self.path);
                Ok(settings)
            }
            None => {
                tracing::warn!("No saved settings in {}, using defaults", self.path);
                Ok(Settings::default())
            }
        }
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.save_data(SETTINGS_KEY, settings)
    }
}
