//! Engine configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_GRID_SIZE_IN, DEFAULT_SNAP_DISTANCE_IN, DUPLICATE_OFFSET, HISTORY_CAPACITY, MAX_ZOOM, MIN_DIMENSION_IN,
    MIN_ZOOM, WALL_SAMPLE_INTERVAL_IN,
};
use crate::manipulate::{ParseModeError, RotationMode};
use crate::snap::SnapConfig;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
    #[error("BACKING_ROTATION_MODE: {0}")]
    RotationMode(#[from] ParseModeError),
}

/// Tunables for the interaction engine. Lengths are inches unless noted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub grid_size_in: f64,
    pub snap_distance_in: f64,
    pub min_dimension_in: f64,
    pub history_capacity: usize,
    /// Offset for duplicate and paste, in drawing units.
    pub duplicate_offset: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub rotation_mode: RotationMode,
    pub inches_per_unit: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid_size_in: DEFAULT_GRID_SIZE_IN,
            snap_distance_in: DEFAULT_SNAP_DISTANCE_IN,
            min_dimension_in: MIN_DIMENSION_IN,
            history_capacity: HISTORY_CAPACITY,
            duplicate_offset: DUPLICATE_OFFSET,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            rotation_mode: RotationMode::default(),
            inches_per_unit: 1.0,
        }
    }
}

impl EngineConfig {
    /// Build typed engine config from environment variables.
    ///
    /// Optional:
    /// - `BACKING_GRID_SIZE_IN`: default 24
    /// - `BACKING_SNAP_DISTANCE_IN`: default 12
    /// - `BACKING_MIN_DIMENSION_IN`: default 12, never lower
    /// - `BACKING_HISTORY_CAPACITY`: default 50
    /// - `BACKING_DUPLICATE_OFFSET`: default 24 drawing units
    /// - `BACKING_MIN_ZOOM` / `BACKING_MAX_ZOOM`: default 0.1 / 5
    /// - `BACKING_ROTATION_MODE`: `continuous` (default) or `discrete`
    /// - `BACKING_INCHES_PER_UNIT`: default 1
    ///
    /// Numbers that fail to parse fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unknown rotation mode or values that
    /// cannot work together (e.g. `min_zoom > max_zoom`).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key))
    }

    /// Same as [`EngineConfig::from_env`], reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// See [`EngineConfig::from_env`].
    pub fn from_lookup<F, E>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, E>,
    {
        let defaults = Self::default();
        let rotation_mode = match lookup("BACKING_ROTATION_MODE") {
            Ok(raw) => raw.parse::<RotationMode>()?,
            Err(_) => defaults.rotation_mode,
        };
        let config = Self {
            grid_size_in: parse_f64(&lookup, "BACKING_GRID_SIZE_IN", defaults.grid_size_in),
            snap_distance_in: parse_f64(&lookup, "BACKING_SNAP_DISTANCE_IN", defaults.snap_distance_in),
            min_dimension_in: parse_f64(&lookup, "BACKING_MIN_DIMENSION_IN", defaults.min_dimension_in),
            history_capacity: parse_usize(&lookup, "BACKING_HISTORY_CAPACITY", defaults.history_capacity),
            duplicate_offset: parse_f64(&lookup, "BACKING_DUPLICATE_OFFSET", defaults.duplicate_offset),
            min_zoom: parse_f64(&lookup, "BACKING_MIN_ZOOM", defaults.min_zoom),
            max_zoom: parse_f64(&lookup, "BACKING_MAX_ZOOM", defaults.max_zoom),
            rotation_mode,
            inches_per_unit: parse_f64(&lookup, "BACKING_INCHES_PER_UNIT", defaults.inches_per_unit),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that the values can drive an engine.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError::Invalid`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("BACKING_GRID_SIZE_IN", self.grid_size_in)?;
        non_negative("BACKING_SNAP_DISTANCE_IN", self.snap_distance_in)?;
        if self.min_dimension_in.is_nan() || self.min_dimension_in < MIN_DIMENSION_IN {
            return Err(invalid(
                "BACKING_MIN_DIMENSION_IN",
                format!("must be at least {MIN_DIMENSION_IN} inches, got {}", self.min_dimension_in),
            ));
        }
        positive("BACKING_MIN_ZOOM", self.min_zoom)?;
        positive("BACKING_MAX_ZOOM", self.max_zoom)?;
        positive("BACKING_INCHES_PER_UNIT", self.inches_per_unit)?;
        if !self.duplicate_offset.is_finite() {
            return Err(invalid("BACKING_DUPLICATE_OFFSET", "must be finite"));
        }
        if self.min_zoom > self.max_zoom {
            return Err(invalid(
                "BACKING_MIN_ZOOM",
                format!("min zoom {} exceeds max zoom {}", self.min_zoom, self.max_zoom),
            ));
        }
        if self.history_capacity == 0 {
            return Err(invalid("BACKING_HISTORY_CAPACITY", "must be at least 1"));
        }
        Ok(())
    }

    /// Snap settings derived from this config, with every layer enabled.
    #[must_use]
    pub fn snap_config(&self) -> SnapConfig {
        SnapConfig {
            grid_size: self.grid_size_in,
            snap_distance: self.snap_distance_in,
            wall_sample_interval: WALL_SAMPLE_INTERVAL_IN,
            ..SnapConfig::default()
        }
    }
}

fn parse_f64<F, E>(lookup: &F, key: &str, default: f64) -> f64
where
    F: Fn(&str) -> Result<String, E>,
{
    match lookup(key).map(|v| v.trim().parse::<f64>()) {
        Ok(Ok(value)) if value.is_finite() => value,
        _ => default,
    }
}

fn parse_usize<F, E>(lookup: &F, key: &str, default: usize) -> usize
where
    F: Fn(&str) -> Result<String, E>,
{
    match lookup(key).map(|v| v.trim().parse::<usize>()) {
        Ok(Ok(value)) => value,
        _ => default,
    }
}

fn invalid(var: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { var, reason: reason.into() }
}

fn positive(var: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 { Ok(()) } else { Err(invalid(var, format!("must be positive, got {value}"))) }
}

fn non_negative(var: &'static str, value: f64) -> Result<(), ConfigError> {
    if value >= 0.0 { Ok(()) } else { Err(invalid(var, format!("must not be negative, got {value}"))) }
}
