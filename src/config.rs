//! Layered configuration: defaults, then an optional TOML file, then
//! `TODO_DAPP_*` environment variables. Command-line flags are applied last by
//! the binary.

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = "todo-dapp.toml";
pub const ENV_BACKEND: &str = "TODO_DAPP_BACKEND";
pub const ENV_DB: &str = "TODO_DAPP_DB";
pub const ENV_LOG: &str = "TODO_DAPP_LOG";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Demo data kept in memory only
    Memory,
    /// SQLite-backed local storage
    #[default]
    Local,
    /// Replicated collaboration session
    Collab,
}

impl FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(BackendKind::Memory),
            "local" => Ok(BackendKind::Local),
            "collab" => Ok(BackendKind::Collab),
            other => Err(anyhow::anyhow!(
                "Invalid backend `{}`, expected memory|local|collab",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendKind,
    pub memory: MemoryConfig,
    pub local: LocalConfig,
    pub collab: CollabConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    pub seed_demo: bool,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self { seed_demo: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    pub path: PathBuf,
    pub storage_key: String,
    pub save_throttle_ms: u64,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("todos.db"),
            storage_key: "dapp-todos".to_string(),
            save_throttle_ms: 200,
        }
    }
}

impl LocalConfig {
    pub fn save_throttle(&self) -> Duration {
        Duration::from_millis(self.save_throttle_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollabConfig {
    pub app_name: String,
    pub collaboration: String,
    pub crdt: String,
    pub refresh_debounce_ms: u64,
}

impl Default for CollabConfig {
    fn default() -> Self {
        Self {
            app_name: "todo-dapp".to_string(),
            collaboration: "todos".to_string(),
            crdt: "rga".to_string(),
            refresh_debounce_ms: 200,
        }
    }
}

impl CollabConfig {
    pub fn refresh_debounce(&self) -> Duration {
        Duration::from_millis(self.refresh_debounce_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of trace, debug, info, warn, error
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        toml::from_str(contents).context("Failed to parse configuration")
    }

    /// Load from `explicit` (which must exist) or from `todo-dapp.toml` in the
    /// working directory if present, then apply environment overrides.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::read_file(path)?,
            None => {
                let default_path = Path::new(CONFIG_FILE_NAME);
                if default_path.is_file() {
                    Self::read_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn read_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        Self::from_toml(&contents).with_context(|| format!("Invalid config file {:?}", path))
    }

    /// Invalid override values are logged and ignored.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup(ENV_BACKEND) {
            match value.parse() {
                Ok(backend) => self.backend = backend,
                Err(err) => tracing::warn!("ignoring {}: {}", ENV_BACKEND, err),
            }
        }
        if let Some(value) = lookup(ENV_DB).filter(|value| !value.trim().is_empty()) {
            self.local.path = PathBuf::from(value);
        }
        if let Some(value) = lookup(ENV_LOG).filter(|value| !value.trim().is_empty()) {
            self.logging.level = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.backend, BackendKind::Local);
        assert_eq!(config.local.storage_key, "dapp-todos");
        assert_eq!(config.local.save_throttle(), Duration::from_millis(200));
        assert_eq!(config.collab.app_name, "todo-dapp");
        assert_eq!(config.collab.collaboration, "todos");
        assert!(config.memory.seed_demo);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::from_toml(
            r#"
            backend = "collab"

            [local]
            path = "/tmp/todos.sqlite"

            [collab]
            refresh_debounce_ms = 50
            "#,
        )
        .unwrap();

        assert_eq!(config.backend, BackendKind::Collab);
        assert_eq!(config.local.path, PathBuf::from("/tmp/todos.sqlite"));
        assert_eq!(config.local.storage_key, "dapp-todos");
        assert_eq!(config.collab.refresh_debounce(), Duration::from_millis(50));
        assert_eq!(config.collab.crdt, "rga");
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(Config::from_toml(r#"backend = "cloud""#).is_err());
    }

    #[test]
    fn env_overrides_apply_and_bad_values_are_ignored() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_BACKEND, "nope"),
            (ENV_DB, "other.db"),
            (ENV_LOG, "debug"),
        ]);
        let mut config = Config::default();
        config.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.backend, BackendKind::Local);
        assert_eq!(config.local.path, PathBuf::from("other.db"));
        assert_eq!(config.logging.level, "debug");

        config.apply_env_overrides(|key| (key == ENV_BACKEND).then(|| "Memory".to_string()));
        assert_eq!(config.backend, BackendKind::Memory);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = Config::load(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read config file"));
    }
}
