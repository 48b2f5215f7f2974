//! Rewind Chase - a two-phase platformer chase built with Bevy
//!
//! The player runs a course while every fixed tick is recorded. Crossing the
//! finish replays that run on the same body while the player, now in control of
//! the chaser, tries to catch it before the recording runs out.

// Core modules
pub mod constants;
pub mod error;
pub mod events;
pub mod helpers;
pub mod plugin;
pub mod simulation;
pub mod testing;
pub mod tuning;

// Game logic modules
pub mod camera;
pub mod course;
pub mod input;
pub mod match_state;
pub mod player;
pub mod powerup;
pub mod replay;
pub mod ui;

// Re-export commonly used types for convenience
pub use camera::{CameraFollow, camera_target_role, follow_target};
pub use constants::*;
pub use course::{CourseDatabase, CourseDef, CourseLayout, SelectedCourse, spawn_course};
pub use error::{ChaseError, Result};
pub use events::{BusEvent, MatchEvent, MatchEventBus};
pub use helpers::*;
pub use input::PlayerInput;
pub use match_state::{MatchPhase, MatchState, SetupStatus};
pub use player::{
    Actor, ActorRole, BodyMode, Crouching, Dormant, Facing, FinishZone, Grounded, Hitbox,
    MotionModel, MotionParams, Platform, PresentationSpeed, Velocity,
};
pub use plugin::{ChaseCorePlugin, ChaseUpdate};
pub use powerup::{ActivePowerup, Pickup, PowerupEffect, PowerupKind};
pub use replay::{FrameBuffer, FrameSample, ReplayDriver, ReplayStep};
pub use simulation::{HeadlessAppBuilder, HeadlessMatch, MatchOutcome, MatchResult};
pub use tuning::{MOVEMENT_TUNING_FILE, MovementTuning};
