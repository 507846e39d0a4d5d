//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Ranking ceilings (urgency window, effort window, default estimate)
//! - Focus timer options (short first-task allocation)
//! - Narration back-end and voice preferences
//! - Flow plan day start
//!
//! Configuration is stored at `<data dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::narration::{VoiceCriteria, VoiceInfo};
use crate::ranking::RankingConfig;
use crate::task::DEFAULT_DURATION_MINUTES;

/// Ranking configuration table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingSection {
    #[serde(default = "default_urgency_ceiling_days")]
    pub urgency_ceiling_days: f64,
    #[serde(default = "default_effort_ceiling_hours")]
    pub effort_ceiling_hours: f64,
    #[serde(default = "default_duration_minutes")]
    pub default_duration_minutes: u32,
}

/// Focus timer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Fixed allocation for the first task of a session, in seconds.
    /// Handy for demos; `None` uses the task's own estimate.
    #[serde(default)]
    pub first_task_secs: Option<u64>,
}

/// Which narrator implementation the CLI wires up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NarrationBackend {
    /// Log lines only.
    Log,
    /// Print to stdout.
    Console,
    /// Spawn an external TTS program.
    Command,
}

/// Narration configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrationConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_backend")]
    pub backend: NarrationBackend,
    /// Program used by the `command` backend (e.g. `espeak`, `say`).
    #[serde(default = "default_command")]
    pub command: String,
    /// Arguments; `{text}` and `{voice}` are substituted per utterance.
    #[serde(default = "default_command_args")]
    pub args: Vec<String>,
    /// Voices known to be installed on this host.
    #[serde(default)]
    pub voices: Vec<VoiceInfo>,
    #[serde(default)]
    pub criteria: VoiceCriteria,
}

/// Flow plan configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Hour of day (0-23) the first recommended block starts.
    #[serde(default = "default_day_start_hour")]
    pub day_start_hour: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data dir>/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ranking: RankingSection,
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub narration: NarrationConfig,
    #[serde(default)]
    pub plan: PlanConfig,
}

// Default functions
fn default_urgency_ceiling_days() -> f64 {
    10.0
}
fn default_effort_ceiling_hours() -> f64 {
    5.0
}
fn default_duration_minutes() -> u32 {
    DEFAULT_DURATION_MINUTES
}
fn default_true() -> bool {
    true
}
fn default_backend() -> NarrationBackend {
    NarrationBackend::Log
}
fn default_command() -> String {
    "espeak".into()
}
fn default_command_args() -> Vec<String> {
    vec!["{text}".into()]
}
fn default_day_start_hour() -> u32 {
    9
}

impl Default for RankingSection {
    fn default() -> Self {
        Self {
            urgency_ceiling_days: default_urgency_ceiling_days(),
            effort_ceiling_hours: default_effort_ceiling_hours(),
            default_duration_minutes: default_duration_minutes(),
        }
    }
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            backend: default_backend(),
            command: default_command(),
            args: default_command_args(),
            voices: Vec::new(),
            criteria: VoiceCriteria::default(),
        }
    }
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            day_start_hour: default_day_start_hour(),
        }
    }
}

impl RankingSection {
    pub fn to_ranking_config(&self) -> RankingConfig {
        RankingConfig {
            urgency_ceiling_days: self.urgency_ceiling_days,
            effort_ceiling_hours: self.effort_ceiling_hours,
            default_duration_minutes: self.default_duration_minutes,
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
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => parse_number(value)
                        .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    // Unset optional: "none" clears it, numbers stay numbers.
                    serde_json::Value::Null => match value {
                        "none" | "null" | "" => serde_json::Value::Null,
                        _ => parse_number(value)
                            .unwrap_or_else(|| serde_json::Value::String(value.into())),
                    },
                    serde_json::Value::String(_) => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        }

        Err(ConfigError::UnknownKey(key.to_string()))
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults if the file is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
                .into()
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
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

    /// Set a value by dot-separated key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit the
    /// field's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(error = %e, "falling back to default configuration");
                Self::default()
            }
        }
    }
}

fn parse_number(value: &str) -> Option<serde_json::Value> {
    if let Ok(n) = value.parse::<u64>() {
        Some(serde_json::Value::Number(n.into()))
    } else if let Ok(n) = value.parse::<f64>() {
        serde_json::Number::from_f64(n).map(serde_json::Value::Number)
    } else {
        None
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
        assert_eq!(parsed.ranking.urgency_ceiling_days, 10.0);
        assert_eq!(parsed.plan.day_start_hour, 9);
        assert_eq!(parsed.narration.backend, NarrationBackend::Log);
    }

    #[test]
    fn empty_file_uses_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.ranking.effort_ceiling_hours, 5.0);
        assert!(cfg.timer.first_task_secs.is_none());
        assert!(cfg.narration.enabled);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("narration.enabled").as_deref(), Some("true"));
        assert_eq!(cfg.get("plan.day_start_hour").as_deref(), Some("9"));
        assert_eq!(cfg.get("narration.backend").as_deref(), Some("log"));
        assert!(cfg.get("plan.missing_key").is_none());
    }

    #[test]
    fn set_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.set("narration.enabled", "false").unwrap();
        cfg.set("ranking.urgency_ceiling_days", "14").unwrap();
        cfg.set("narration.backend", "console").unwrap();
        assert!(!cfg.narration.enabled);
        assert_eq!(cfg.ranking.urgency_ceiling_days, 14.0);
        assert_eq!(cfg.narration.backend, NarrationBackend::Console);
    }

    #[test]
    fn set_fills_and_clears_optional_number() {
        let mut cfg = Config::default();
        cfg.set("timer.first_task_secs", "10").unwrap();
        assert_eq!(cfg.timer.first_task_secs, Some(10));
        cfg.set("timer.first_task_secs", "none").unwrap();
        assert_eq!(cfg.timer.first_task_secs, None);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        let err = cfg.set("timer.nonexistent_key", "1").unwrap_err();
        assert!(err.to_string().contains("unknown config key"));
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set("narration.enabled", "not_a_bool").is_err());
        assert!(cfg.set("narration.backend", "telepathy").is_err());
    }

    #[test]
    fn load_from_writes_defaults_then_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert!(path.exists());

        let mut changed = cfg.clone();
        changed.set("plan.day_start_hour", "8").unwrap();
        changed.save_to(&path).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.plan.day_start_hour, 8);
    }

    #[test]
    fn unreadable_file_is_reported_and_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("config.toml"), "unexpected error: {err}");
        assert_eq!(std::fs::read(&path).unwrap(), vec![0xff, 0xfe, 0x00]);
    }

    #[test]
    fn directory_in_place_of_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from(dir.path()).is_err());
    }

    #[test]
    fn ranking_section_converts() {
        let cfg = Config::default();
        let rc = cfg.ranking.to_ranking_config();
        assert_eq!(rc, RankingConfig::default());
    }
}
