//! Movement tuning settings (loaded from config, decoupled from constants)

use bevy::log::{info, warn};
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::constants::*;
use crate::error::{ChaseError, Result};

/// Path to global movement tuning config
pub const MOVEMENT_TUNING_FILE: &str = "config/movement_tuning.json";

fn default_crouch_speed_factor() -> f32 {
    CROUCH_SPEED_FACTOR
}
fn default_ground_check_distance() -> f32 {
    GROUND_CHECK_DISTANCE
}
fn default_gravity() -> f32 {
    GRAVITY
}

/// Serializable movement values. Treated as opaque constants by the simulation.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementTuning {
    pub move_speed: f32,
    pub accel_rate: f32,
    pub brake_rate: f32,
    pub turn_rate: f32,
    pub jump_speed: f32,
    #[serde(default = "default_gravity")]
    pub gravity: f32,
    #[serde(default = "default_crouch_speed_factor")]
    pub crouch_speed_factor: f32,
    pub speed_up_multiplier: f32,
    pub slow_down_multiplier: f32,
    pub powerup_duration: f32,
    #[serde(default = "default_ground_check_distance")]
    pub ground_check_distance: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            move_speed: MOVE_SPEED,
            accel_rate: ACCEL_RATE,
            brake_rate: BRAKE_RATE,
            turn_rate: TURN_RATE,
            jump_speed: JUMP_SPEED,
            gravity: default_gravity(),
            crouch_speed_factor: default_crouch_speed_factor(),
            speed_up_multiplier: SPEED_UP_MULTIPLIER,
            slow_down_multiplier: SLOW_DOWN_MULTIPLIER,
            powerup_duration: POWERUP_DURATION,
            ground_check_distance: default_ground_check_distance(),
        }
    }
}

impl MovementTuning {
    /// Read and parse a tuning file
    pub fn try_load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ChaseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|e| ChaseError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load tuning from file, or return defaults if missing or invalid
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            info!("No {} found, using default movement tuning", path.display());
            return Self::default();
        }
        match Self::try_load(path) {
            Ok(tuning) => {
                info!("Loaded movement tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                warn!("{}, using default movement tuning", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let json = r#"{
            "move_speed": 10.0,
            "accel_rate": 40.0,
            "brake_rate": 60.0,
            "turn_rate": 100.0,
            "jump_speed": 11.0,
            "speed_up_multiplier": 2.0,
            "slow_down_multiplier": 0.25,
            "powerup_duration": 5.0
        }"#;
        let tuning: MovementTuning = serde_json::from_str(json).unwrap();
        assert_eq!(tuning.move_speed, 10.0);
        assert_eq!(tuning.crouch_speed_factor, CROUCH_SPEED_FACTOR);
        assert_eq!(tuning.gravity, GRAVITY);
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let tuning = MovementTuning::load(Path::new("config/does_not_exist.json"));
        assert_eq!(tuning, MovementTuning::default());
    }

    #[test]
    fn test_try_load_reports_io_error() {
        let err = MovementTuning::try_load(Path::new("config/does_not_exist.json")).unwrap_err();
        assert!(matches!(err, ChaseError::Io { .. }));
    }
}
