//! Simulation configuration (data-driven tuning)
//!
//! Значения по умолчанию — базовый баланс:
//! 60Hz тик, сетка 10x10 по 2м, граната 15 м/с, радиус 4м, 30 урона.

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::projectile::ArcCurve;

/// Ошибки загрузки конфига
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Root config resource
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed simulation tick rate (Hz)
    pub tick_hz: f64,
    /// Seed для DeterministicRng
    pub seed: u64,
    pub grid: GridConfig,
    pub grenade: GrenadeConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_hz: 60.0,
            seed: 42,
            grid: GridConfig::default(),
            grenade: GrenadeConfig::default(),
        }
    }
}

/// Level grid dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub width: u32,
    pub height: u32,
    /// World units per cell
    pub cell_size: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            cell_size: 2.0,
        }
    }
}

/// Grenade flight + explosion tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrenadeConfig {
    /// Horizontal speed (world units/sec)
    pub speed: f32,
    /// Remaining horizontal distance below which the grenade explodes
    pub reached_distance: f32,
    pub damage_radius: f32,
    pub damage: u32,
    /// Peak height = total_distance / arc_height_divisor
    pub arc_height_divisor: f32,
    pub arc: ArcCurve,
}

impl Default for GrenadeConfig {
    fn default() -> Self {
        Self {
            speed: 15.0,
            reached_distance: 0.2,
            damage_radius: 4.0,
            damage: 30,
            arc_height_divisor: 4.0,
            arc: ArcCurve::Parabolic,
        }
    }
}

impl SimulationConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tick_hz > 0.0) {
            return Err(ConfigError::Invalid(format!("tick_hz must be > 0, got {}", self.tick_hz)));
        }
        if self.grid.width == 0 || self.grid.height == 0 {
            return Err(ConfigError::Invalid("grid must be non-empty".to_string()));
        }
        if !(self.grid.cell_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "grid.cell_size must be > 0, got {}",
                self.grid.cell_size
            )));
        }
        if !(self.grenade.speed > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "grenade.speed must be > 0, got {}",
                self.grenade.speed
            )));
        }
        if self.grenade.reached_distance < 0.0 || self.grenade.damage_radius < 0.0 {
            return Err(ConfigError::Invalid(
                "grenade distances must be non-negative".to_string(),
            ));
        }
        if !(self.grenade.arc_height_divisor > 0.0) {
            return Err(ConfigError::Invalid(
                "grenade.arc_height_divisor must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grenade.damage, 30);
        assert_eq!(config.grenade.damage_radius, 4.0);
        assert_eq!(config.grenade.speed, 15.0);
        assert_eq!(config.grenade.reached_distance, 0.2);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config = SimulationConfig::from_json_str(r#"{ "seed": 7, "grid": { "width": 20 } }"#)
            .expect("partial config should parse");

        assert_eq!(config.seed, 7);
        assert_eq!(config.grid.width, 20);
        assert_eq!(config.grid.height, 10);
        assert_eq!(config.grenade, GrenadeConfig::default());
    }

    #[test]
    fn test_keyframe_arc_from_json() {
        let json = r#"{ "grenade": { "arc": { "Keyframes": [
            { "time": 0.0, "value": 0.0 },
            { "time": 0.5, "value": 1.0 },
            { "time": 1.0, "value": 0.0 }
        ] } } }"#;
        let config = SimulationConfig::from_json_str(json).expect("keyframe arc should parse");

        assert_eq!(config.grenade.arc.evaluate(0.5), 1.0);
    }

    #[test]
    fn test_rejects_zero_cell_size() {
        let result = SimulationConfig::from_json_str(r#"{ "grid": { "cell_size": 0.0 } }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let result = SimulationConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = SimulationConfig::load("/definitely/not/here/gridstrike.json");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
