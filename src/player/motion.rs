//! Horizontal motion model
//!
//! Turns raw directional input into a horizontal speed using separate
//! accelerate, brake and turn rates. Pure state so it can be stepped outside
//! the ECS.

use bevy::prelude::*;

use crate::helpers::{is_neutral, move_toward, sign_flipped};
use crate::tuning::MovementTuning;

/// Rates and target speed for one motion step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionParams {
    pub max_speed: f32,
    pub accel_rate: f32,
    pub brake_rate: f32,
    pub turn_rate: f32,
}

impl MotionParams {
    /// Build params from tuning, an active speed multiplier and crouch state
    pub fn from_tuning(tuning: &MovementTuning, speed_multiplier: f32, crouching: bool) -> Self {
        let mut max_speed = tuning.move_speed * speed_multiplier;
        if crouching {
            max_speed *= tuning.crouch_speed_factor;
        }
        Self {
            max_speed,
            accel_rate: tuning.accel_rate,
            brake_rate: tuning.brake_rate,
            turn_rate: tuning.turn_rate,
        }
    }
}

/// Per-actor horizontal speed state
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionModel {
    current_speed: f32,
    last_input: f32,
}

impl MotionModel {
    /// Advance one tick and return the new horizontal speed.
    ///
    /// A direction reversal between ticks snaps the speed to zero before the
    /// turn rate is applied, so momentum never carries through a flip.
    pub fn step(&mut self, input: f32, dt: f32, params: &MotionParams) -> f32 {
        let input = input.clamp(-1.0, 1.0);
        let target_speed = input * params.max_speed;

        let flipped = sign_flipped(self.last_input, input);
        if flipped {
            self.current_speed = 0.0;
        }

        let opposing = self.current_speed != 0.0 && target_speed.signum() != self.current_speed.signum();
        let rate = if is_neutral(input) {
            params.brake_rate
        } else if flipped || opposing {
            params.turn_rate
        } else {
            params.accel_rate
        };

        self.current_speed = move_toward(self.current_speed, target_speed, rate * dt);
        self.last_input = input;
        self.current_speed
    }

    pub fn current_speed(&self) -> f32 {
        self.current_speed
    }

    /// Mirrored-facing flag for presentation
    pub fn facing_left(&self) -> bool {
        self.current_speed < 0.0
    }

    /// Drop all momentum and input history
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.02;

    fn params() -> MotionParams {
        MotionParams {
            max_speed: 8.0,
            accel_rate: 50.0,
            brake_rate: 80.0,
            turn_rate: 120.0,
        }
    }

    #[test]
    fn test_saturates_at_max_speed() {
        let mut model = MotionModel::default();
        let mut elapsed = 0.0;
        let mut saturated_at = None;
        for _ in 0..100 {
            let speed = model.step(1.0, DT, &params());
            elapsed += DT;
            if saturated_at.is_none() && speed >= 8.0 {
                saturated_at = Some(elapsed);
            }
            assert!(speed <= 8.0);
        }
        let saturated_at = saturated_at.unwrap();
        assert!(saturated_at <= 0.16 + 1e-4, "saturated after {saturated_at}s");
        assert_eq!(model.current_speed(), 8.0);
    }

    #[test]
    fn test_brake_decays_without_overshoot() {
        let mut model = MotionModel::default();
        for _ in 0..20 {
            model.step(1.0, DT, &params());
        }
        let start = model.current_speed();
        for tick in 1..=10 {
            let speed = model.step(0.0, DT, &params());
            let expected = (start - 80.0 * DT * tick as f32).max(0.0);
            assert!((speed - expected).abs() < 1e-4, "tick {tick}: {speed} vs {expected}");
            assert!(speed >= 0.0);
        }
        assert_eq!(model.current_speed(), 0.0);
    }

    #[test]
    fn test_sign_flip_starts_from_zero() {
        let mut model = MotionModel::default();
        for _ in 0..20 {
            model.step(1.0, DT, &params());
        }
        assert_eq!(model.current_speed(), 8.0);

        let speed = model.step(-1.0, DT, &params());
        assert!((speed - (-120.0 * DT)).abs() < 1e-5);
        assert!(model.facing_left());
    }

    #[test]
    fn test_opposing_input_while_sliding_uses_turn_rate() {
        let mut model = MotionModel::default();
        for _ in 0..20 {
            model.step(1.0, DT, &params());
        }
        // Release, then press left while still sliding right: no snap, turn rate
        let sliding = model.step(0.0, DT, &params());
        let speed = model.step(-1.0, DT, &params());
        assert!((speed - (sliding - 120.0 * DT)).abs() < 1e-5);
    }

    #[test]
    fn test_params_apply_multiplier_and_crouch() {
        let tuning = MovementTuning::default();
        let boosted = MotionParams::from_tuning(&tuning, 1.5, false);
        assert_eq!(boosted.max_speed, tuning.move_speed * 1.5);

        let crouched = MotionParams::from_tuning(&tuning, 1.0, true);
        assert_eq!(crouched.max_speed, tuning.move_speed * tuning.crouch_speed_factor);
    }
}
