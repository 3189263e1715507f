//! Tunable game constants
//!
//! One immutable `Config` is handed to the game at construction. It can be
//! loaded from JSON; missing fields keep their defaults.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sim::state::Viewport;

/// Error loading or validating a configuration
#[derive(Debug)]
pub enum ConfigError {
    /// JSON could not be parsed
    Parse(serde_json::Error),
    /// A field is out of range
    Invalid { field: &'static str, reason: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "invalid config json: {}", e),
            ConfigError::Invalid { field, reason } => write!(f, "invalid config field `{}`: {}", field, reason),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Gameplay constants. Speeds are in milliseconds per unit, so larger is slower.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial board size
    pub viewport: Viewport,

    // === Motion ===
    /// Milliseconds to grow the stick by one pixel
    pub stretching_speed: f32,
    /// Milliseconds to turn the stick by one degree
    pub turning_speed: f32,
    /// Milliseconds for the hero to walk one pixel
    pub walking_speed: f32,
    /// Milliseconds to scroll the camera one pixel
    pub transitioning_speed: f32,
    /// Falling speed at the start of a fall (px/ms)
    pub fall_initial_speed: f32,
    /// Falling acceleration (px/ms²)
    pub fall_acceleration: f32,
    /// Stick rotation while the hero falls (degrees/ms)
    pub stick_fall_rate: f32,

    // === Geometry ===
    /// Width of the centred window that scores a perfect hit
    pub perfect_area_size: f32,
    /// Distance the hero stops short of a platform's right edge
    pub hero_edge_offset: f32,
    /// How far past the stick tip the hero walks before dropping
    pub stick_overhang: f32,
    pub hero_width: f32,
    pub hero_height: f32,
    /// Extra drop below the hero height before the run ends
    pub fall_margin: f32,
    /// Where the landed platform's right edge rests after scrolling
    pub camera_padding: f32,

    // === Generation ===
    pub platform_min_gap: f32,
    pub platform_max_gap: f32,
    pub platform_min_width: f32,
    pub platform_max_width: f32,
    pub tree_min_gap: f32,
    pub tree_max_gap: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),

            stretching_speed: 4.0,
            turning_speed: 4.0,
            walking_speed: 4.0,
            transitioning_speed: 2.0,
            fall_initial_speed: 0.5,
            fall_acceleration: 0.007,
            stick_fall_rate: 0.48,

            perfect_area_size: 10.0,
            hero_edge_offset: 10.0,
            stick_overhang: 17.0,
            hero_width: 17.0,
            hero_height: 30.0,
            fall_margin: 10.0,
            camera_padding: 100.0,

            platform_min_gap: 40.0,
            platform_max_gap: 200.0,
            platform_min_width: 20.0,
            platform_max_width: 100.0,
            tree_min_gap: 30.0,
            tree_max_gap: 150.0,
        }
    }
}

impl Config {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON config, falling back to defaults on any problem
    pub fn load_or_default(json: Option<&str>) -> Self {
        let Some(json) = json else {
            log::info!("Using default config");
            return Self::default();
        };

        match Self::from_json(json) {
            Ok(config) => {
                log::info!("Loaded config");
                config
            }
            Err(e) => {
                log::warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every field is in a usable range
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: "must be positive",
                })
            }
        }

        fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value >= 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: "must not be negative",
                })
            }
        }

        fn range(field: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
            if min < max {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: "minimum must be below maximum",
                })
            }
        }

        positive("viewport.width", self.viewport.width)?;
        positive("viewport.height", self.viewport.height)?;

        positive("stretching_speed", self.stretching_speed)?;
        positive("turning_speed", self.turning_speed)?;
        positive("walking_speed", self.walking_speed)?;
        positive("transitioning_speed", self.transitioning_speed)?;
        non_negative("fall_initial_speed", self.fall_initial_speed)?;
        non_negative("fall_acceleration", self.fall_acceleration)?;
        positive("stick_fall_rate", self.stick_fall_rate)?;

        non_negative("perfect_area_size", self.perfect_area_size)?;
        non_negative("hero_edge_offset", self.hero_edge_offset)?;
        non_negative("hero_height", self.hero_height)?;
        non_negative("fall_margin", self.fall_margin)?;

        non_negative("platform_min_gap", self.platform_min_gap)?;
        range("platform_max_gap", self.platform_min_gap, self.platform_max_gap)?;
        positive("platform_min_width", self.platform_min_width)?;
        range("platform_max_width", self.platform_min_width, self.platform_max_width)?;
        non_negative("tree_min_gap", self.tree_min_gap)?;
        range("tree_max_gap", self.tree_min_gap, self.tree_max_gap)?;

        Ok(())
    }

    /// Hero y at which a fall ends the run
    pub fn fall_limit(&self, viewport: &Viewport) -> f32 {
        viewport.platform_height() + self.hero_height + self.fall_margin
    }
}
