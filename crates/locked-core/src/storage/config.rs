//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Work and rest durations
//! - Progress flush cadence
//! - History granularity (daily totals or 30-minute slots)
//!
//! Configuration is stored at `~/.config/locked/config.toml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;
use crate::history::Granularity;
use crate::timer::{validate_duration_secs, Durations, EngineConfig, Mode};

/// Timer-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_work_duration")]
    pub work_duration_secs: u64,
    #[serde(default = "default_rest_duration")]
    pub rest_duration_secs: u64,
    #[serde(default = "default_flush_interval")]
    pub flush_interval_secs: u64,
}

/// History configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HistoryConfig {
    #[serde(default)]
    pub granularity: Granularity,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/locked/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

fn default_work_duration() -> u64 {
    60 * 60
}
fn default_rest_duration() -> u64 {
    15 * 60
}
fn default_flush_interval() -> u64 {
    10
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work_duration_secs: default_work_duration(),
            rest_duration_secs: default_rest_duration(),
            flush_interval_secs: default_flush_interval(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("cannot set a whole section".into()));
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing defaults when the file does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key, in memory only.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit the
    /// key's type or bounds. `self` is left unchanged on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (key, secs) in [
            ("timer.work_duration_secs", self.timer.work_duration_secs),
            ("timer.rest_duration_secs", self.timer.rest_duration_secs),
        ] {
            validate_duration_secs(secs).map_err(|e| ConfigError::InvalidValue {
                key: key.into(),
                message: e.to_string(),
            })?;
        }
        if self.timer.flush_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timer.flush_interval_secs".into(),
                message: "must be at least 1 second".into(),
            });
        }
        Ok(())
    }

    pub fn durations(&self) -> Durations {
        Durations {
            work_secs: self.timer.work_duration_secs,
            rest_secs: self.timer.rest_duration_secs,
        }
    }

    pub fn engine_config(&self, initial_mode: Mode) -> EngineConfig {
        EngineConfig {
            durations: self.durations(),
            granularity: self.history.granularity,
            flush_interval: Duration::from_secs(self.timer.flush_interval_secs.max(1)),
            initial_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.timer.work_duration_secs, 3600);
        assert_eq!(parsed.history.granularity, Granularity::Slotted);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[history]\ngranularity = \"daily\"\n").unwrap();
        assert_eq!(parsed.history.granularity, Granularity::Daily);
        assert_eq!(parsed.timer.rest_duration_secs, 900);
        assert_eq!(parsed.timer.flush_interval_secs, 10);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("timer.work_duration_secs").as_deref(), Some("3600"));
        assert_eq!(cfg.get("history.granularity").as_deref(), Some("slotted"));
        assert!(cfg.get("timer.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_number_and_enum() {
        let mut cfg = Config::default();
        cfg.set("timer.rest_duration_secs", "300").unwrap();
        cfg.set("history.granularity", "daily").unwrap();
        assert_eq!(cfg.timer.rest_duration_secs, 300);
        assert_eq!(cfg.history.granularity, Granularity::Daily);
    }

    #[test]
    fn set_rejects_unknown_key_and_bad_values() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("timer.nonexistent_key", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(cfg.set("timer.work_duration_secs", "soon").is_err());
        assert!(cfg.set("timer.work_duration_secs", "0").is_err());
        assert!(cfg.set("timer.flush_interval_secs", "0").is_err());
        assert!(cfg.set("history.granularity", "hourly").is_err());
        assert!(cfg.set("timer", "1").is_err());
        assert_eq!(cfg.timer.work_duration_secs, 3600);
        assert_eq!(cfg.history.granularity, Granularity::Slotted);
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.timer.work_duration_secs, 3600);
        assert!(path.exists());

        let mut cfg = cfg;
        cfg.set("timer.work_duration_secs", "1500").unwrap();
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().timer.work_duration_secs, 1500);
    }

    #[test]
    fn engine_config_carries_settings() {
        let mut cfg = Config::default();
        cfg.set("timer.flush_interval_secs", "30").unwrap();
        let engine = cfg.engine_config(Mode::Rest);
        assert_eq!(engine.flush_interval, Duration::from_secs(30));
        assert_eq!(engine.durations.rest_secs, 900);
        assert_eq!(engine.initial_mode, Mode::Rest);
    }
}
