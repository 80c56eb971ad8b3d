//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Default label for new sessions
//! - Tick interval and click-effect lifetime
//! - Haptic feedback switch and pulse patterns
//! - Background particle count
//!
//! Configuration is stored at `~/.config/craftmark/config.toml`.
//! Session history is never written here.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::data_dir;
use crate::effects::DEFAULT_EFFECT_LIFETIME_MS;
use crate::error::{ConfigError, CoreError, Result};
use crate::haptics::{HapticPatterns, Haptics, NoopHaptics};
use crate::nebula::DEFAULT_PARTICLES;
use crate::session::DEFAULT_CRAFT_TYPE;
use crate::timer::CraftTimer;

/// Session labelling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_craft_type")]
    pub default_type: String,
}

/// Recording clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

/// Click effects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectsConfig {
    #[serde(default = "default_effect_lifetime_ms")]
    pub lifetime_ms: u64,
}

/// Haptic feedback. Patterns are pulse lengths in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HapticsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_start_pattern")]
    pub start: Vec<u32>,
    #[serde(default = "default_stop_pattern")]
    pub stop: Vec<u32>,
    #[serde(default = "default_tap_pattern")]
    pub tap: Vec<u32>,
}

/// Background animation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NebulaConfig {
    #[serde(default = "default_particles")]
    pub particles: usize,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/craftmark/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub effects: EffectsConfig,
    #[serde(default)]
    pub haptics: HapticsConfig,
    #[serde(default)]
    pub nebula: NebulaConfig,
}

// Default functions
fn default_craft_type() -> String {
    DEFAULT_CRAFT_TYPE.into()
}
fn default_tick_interval_ms() -> u64 {
    1000
}
fn default_effect_lifetime_ms() -> u64 {
    DEFAULT_EFFECT_LIFETIME_MS
}
fn default_true() -> bool {
    true
}
fn default_start_pattern() -> Vec<u32> {
    HapticPatterns::default().start
}
fn default_stop_pattern() -> Vec<u32> {
    HapticPatterns::default().stop
}
fn default_tap_pattern() -> Vec<u32> {
    HapticPatterns::default().tap
}
fn default_particles() -> usize {
    DEFAULT_PARTICLES
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_type: default_craft_type(),
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            lifetime_ms: default_effect_lifetime_ms(),
        }
    }
}

impl Default for HapticsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            start: default_start_pattern(),
            stop: default_stop_pattern(),
            tap: default_tap_pattern(),
        }
    }
}

impl Default for NebulaConfig {
    fn default() -> Self {
        Self {
            particles: DEFAULT_PARTICLES,
        }
    }
}

impl HapticsConfig {
    pub fn patterns(&self) -> HapticPatterns {
        HapticPatterns {
            start: self.start.clone(),
            stop: self.stop.clone(),
            tap: self.tap.clone(),
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

    fn set_json_value_by_path(root: &mut serde_json::Value, key: &str, value: &str) -> Result<()> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown().into());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => serde_json::Value::Number(
                        value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                            .into(),
                    ),
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown().into())
    }

    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
                .into()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(CoreError::Io(e)),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

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

    /// Set a config value by key in memory. Returns error if key is unknown
    /// or the value has the wrong shape.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::ParseFailed {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Timer wired to this configuration. Haptics are replaced by a no-op
    /// when disabled.
    pub fn build_timer(&self, haptics: Arc<dyn Haptics>) -> CraftTimer {
        let haptics: Arc<dyn Haptics> = if self.haptics.enabled {
            haptics
        } else {
            Arc::new(NoopHaptics)
        };
        CraftTimer::new()
            .with_haptics(haptics)
            .with_patterns(self.haptics.patterns())
            .with_default_type(self.session.default_type.clone())
    }
}
