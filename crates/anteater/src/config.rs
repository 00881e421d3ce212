//! Tuning values and the optional config override.
//!
//! Native builds read a JSON file named by `ANTEATER_CONFIG`; the web build
//! reads the `anteater.config` storage key. Missing fields keep their defaults.

use core::ops::RangeInclusive;
use core::time::Duration;

use anteater_helpers::storage::StorageError;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SPAWN_PADDING: f32 = 50.0;
pub const SMALL_ANT_EXTENT: f32 = 28.0;
pub const LARGE_ANT_EXTENT: f32 = 48.0;

pub const LONG_PRESS_MILLIS: u64 = 600;
pub const MOVE_THRESHOLD: f32 = 10.0;
pub const CLUSTER_JITTER: f32 = 10.0;
pub const HAPTIC_MILLIS: u32 = 50;

pub const WOBBLE_MIN: u32 = 4;
pub const WOBBLE_MAX: u32 = 17;
pub const WOBBLE_MILLIS: u64 = 800;

pub const BASE_VOLUME: f64 = 0.2;
pub const VOLUME_PER_ANT: f64 = 0.05;
pub const MAX_VOLUME: f64 = 1.0;

pub const ANTEATER_WIDTH: f32 = 150.0;
pub const ANTEATER_HEIGHT: f32 = 110.0;
/// Vertical position of the anteater's center as a fraction of the viewport height.
pub const ANTEATER_CENTER_FRACTION: f32 = 0.3;

pub const CONFIG_PATH_VAR: &str = "ANTEATER_CONFIG";
pub const CONFIG_STORAGE_KEY: &str = "anteater.config";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config file {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config is not valid JSON")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub spawn_padding: f32,
    pub small_ant_extent: f32,
    pub large_ant_extent: f32,
    pub long_press_millis: u64,
    pub move_threshold: f32,
    pub cluster_jitter: f32,
    pub wobble_min: u32,
    pub wobble_max: u32,
    pub wobble_millis: u64,
    pub base_volume: f64,
    pub volume_per_ant: f64,
    pub max_volume: f64,
    pub anteater_width: f32,
    pub anteater_height: f32,
    /// Fixed RNG seed, mostly for reproducing a session.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            spawn_padding: SPAWN_PADDING,
            small_ant_extent: SMALL_ANT_EXTENT,
            large_ant_extent: LARGE_ANT_EXTENT,
            long_press_millis: LONG_PRESS_MILLIS,
            move_threshold: MOVE_THRESHOLD,
            cluster_jitter: CLUSTER_JITTER,
            wobble_min: WOBBLE_MIN,
            wobble_max: WOBBLE_MAX,
            wobble_millis: WOBBLE_MILLIS,
            base_volume: BASE_VOLUME,
            volume_per_ant: VOLUME_PER_ANT,
            max_volume: MAX_VOLUME,
            anteater_width: ANTEATER_WIDTH,
            anteater_height: ANTEATER_HEIGHT,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.wobble_min == 0 || self.wobble_min > self.wobble_max {
            return Err(ConfigError::Invalid(
                "wobble_min must be at least 1 and not above wobble_max",
            ));
        }
        if self.small_ant_extent <= 0.0 || self.large_ant_extent <= 0.0 {
            return Err(ConfigError::Invalid("ant extents must be positive"));
        }
        if self.anteater_width <= 0.0 || self.anteater_height <= 0.0 {
            return Err(ConfigError::Invalid("anteater size must be positive"));
        }
        if self.move_threshold < 0.0 || self.cluster_jitter < 0.0 || self.spawn_padding < 0.0 {
            return Err(ConfigError::Invalid("distances must not be negative"));
        }
        Ok(())
    }

    pub const fn long_press(&self) -> Duration {
        Duration::from_millis(self.long_press_millis)
    }

    pub const fn wobble_duration(&self) -> Duration {
        Duration::from_millis(self.wobble_millis)
    }

    pub const fn wobble_range(&self) -> RangeInclusive<u32> {
        self.wobble_min..=self.wobble_max
    }

    pub const fn anteater_size(&self) -> Vec2 {
        Vec2::new(self.anteater_width, self.anteater_height)
    }

    /// Loads the override if there is one, falling back to defaults on any problem.
    pub fn load() -> Self {
        match Self::load_override() {
            Ok(Some(config)) => {
                info!("Loaded game config override");
                config
            }
            Ok(None) => Self::default(),
            Err(err) => {
                warn!("Ignoring game config override: {err}");
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn load_override() -> Result<Option<Self>, ConfigError> {
        let Some(path) = std::env::var_os(CONFIG_PATH_VAR) else {
            return Ok(None);
        };
        let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.to_string_lossy().into_owned(),
            source,
        })?;
        Self::from_json(&raw).map(Some)
    }

    #[cfg(target_arch = "wasm32")]
    fn load_override() -> Result<Option<Self>, ConfigError> {
        use anteater_helpers::storage::{StorageScope, load_string};

        let Some(raw) = load_string(StorageScope::Local, CONFIG_STORAGE_KEY)? else {
            return Ok(None);
        };
        Self::from_json(&raw).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_defaults() {
        let config = GameConfig::from_json(r#"{ "long_press_millis": 900, "seed": 7 }"#)
            .expect("partial config is valid");
        assert_eq!(config.long_press(), Duration::from_millis(900), "override applied");
        assert_eq!(config.seed, Some(7), "seed applied");
        assert_eq!(config.wobble_range(), 4..=17, "untouched fields keep defaults");
    }

    #[test]
    fn inverted_wobble_range_is_rejected() {
        let result = GameConfig::from_json(r#"{ "wobble_min": 9, "wobble_max": 3 }"#);
        assert!(
            matches!(result, Err(ConfigError::Invalid(_))),
            "min above max must be refused"
        );
    }

    #[test]
    fn garbage_is_a_parse_error() {
        assert!(
            matches!(GameConfig::from_json("wobble"), Err(ConfigError::Parse(_))),
            "not JSON"
        );
    }

    #[test]
    fn defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok(), "defaults must pass");
    }
}
