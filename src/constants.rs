//! Tunable constants for rewind_chase
//!
//! All gameplay defaults are defined here for easy tweaking. Runtime overrides
//! come from `config/movement_tuning.json` (see `tuning`).

use bevy::prelude::*;

// =============================================================================
// CONFIG FILES
// =============================================================================

pub const COURSES_FILE: &str = "config/courses.toml";

// =============================================================================
// COLORS (windowed binary only)
// =============================================================================

pub const BACKGROUND_COLOR: Color = Color::srgb(0.16, 0.18, 0.24);
pub const PLATFORM_COLOR: Color = Color::srgb(0.32, 0.3, 0.28);
pub const RUNNER_COLOR: Color = Color::srgb(0.2, 0.6, 0.9);
pub const CHASER_COLOR: Color = Color::srgb(0.9, 0.3, 0.2);
pub const FINISH_COLOR: Color = Color::srgba(0.3, 0.9, 0.4, 0.35);
pub const SPEED_UP_COLOR: Color = Color::srgb(1.0, 0.85, 0.2);
pub const SLOW_DOWN_COLOR: Color = Color::srgb(0.6, 0.3, 0.9);
pub const TEXT_PRIMARY: Color = Color::srgb(0.95, 0.9, 0.8);

// =============================================================================
// TIMING
// =============================================================================

/// Fixed simulation step (50 Hz)
pub const FIXED_TIMESTEP: f64 = 0.02;

/// World units visible vertically in the windowed binary
pub const CAMERA_VIEW_HEIGHT: f32 = 14.0;
pub const WINDOW_SIZE: (u32, u32) = (1280, 720);

// =============================================================================
// MOVEMENT
// =============================================================================

pub const MOVE_SPEED: f32 = 8.0;
pub const ACCEL_RATE: f32 = 50.0; // Toward target speed while pressing a direction
pub const BRAKE_RATE: f32 = 80.0; // Toward zero with no input
pub const TURN_RATE: f32 = 120.0; // When input opposes current motion
pub const JUMP_SPEED: f32 = 12.0;
pub const GRAVITY: f32 = 30.0;
pub const INPUT_EPSILON: f32 = 1e-5; // |input| below this counts as no input
pub const STICK_DEADZONE: f32 = 0.2;

// =============================================================================
// ACTOR BODY
// =============================================================================

pub const ACTOR_SIZE: Vec2 = Vec2::new(1.0, 2.0);
pub const GROUND_CHECK_DISTANCE: f32 = ACTOR_SIZE.y / 2.0 + 0.1; // From actor centre
pub const COLLISION_EPSILON: f32 = 0.01; // Skin width so the floor is still detected next tick

// =============================================================================
// CROUCH
// =============================================================================

pub const CROUCH_HEIGHT_FACTOR: f32 = 0.7;
pub const CROUCH_OFFSET_FACTOR: f32 = (1.0 - CROUCH_HEIGHT_FACTOR) / 2.0; // Keeps the feet in place
pub const CROUCH_SPEED_FACTOR: f32 = 0.5;
pub const HEADROOM_CLEARANCE: f32 = 0.5; // Stand-up probe = standing height - this

// =============================================================================
// POWERUPS
// =============================================================================

pub const SPEED_UP_MULTIPLIER: f32 = 1.5;
pub const SLOW_DOWN_MULTIPLIER: f32 = 0.5;
pub const POWERUP_DURATION: f32 = 3.0;
pub const PICKUP_SIZE: Vec2 = Vec2::new(0.6, 0.6);

// =============================================================================
// REPLAY PRESENTATION
// =============================================================================

pub const REPLAY_FACING_THRESHOLD: f32 = -0.1; // velocity.x below this faces left
