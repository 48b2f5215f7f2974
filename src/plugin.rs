//! Core plugin - resources and system ordering shared by the game and headless runs

use bevy::prelude::*;

use crate::constants::FIXED_TIMESTEP;
use crate::course::{CourseLayout, SelectedCourse, spawn_selected_course};
use crate::events::{MatchEventBus, update_event_bus_time};
use crate::input::PlayerInput;
use crate::match_state::{
    MatchState, SetupStatus, detect_catch, handle_start_signal, match_in_play, match_over,
    stop_actors_on_match_end, tick_match_timer, validate_setup,
};
use crate::player::{
    apply_gravity, apply_input, apply_velocity, check_collisions, handle_crouch, handle_jump,
    update_grounded,
};
use crate::powerup::{collect_pickups, tick_powerups};
use crate::replay::{FrameBuffer, ReplayDriver, begin_rewind, record_frames, replay_step};
use crate::tuning::MovementTuning;

/// Update-schedule match systems. Input capture runs before this set.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChaseUpdate;

/// Registers match resources and systems. Insert `MovementTuning` and
/// `SelectedCourse` before adding to override the defaults.
pub struct ChaseCorePlugin;

impl Plugin for ChaseCorePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Time::<Fixed>::from_seconds(FIXED_TIMESTEP))
            .init_resource::<MovementTuning>()
            .init_resource::<MatchState>()
            .init_resource::<SetupStatus>()
            .init_resource::<FrameBuffer>()
            .init_resource::<ReplayDriver>()
            .init_resource::<MatchEventBus>()
            .init_resource::<PlayerInput>()
            .init_resource::<CourseLayout>();

        app.add_systems(
            Startup,
            spawn_selected_course.run_if(resource_exists::<SelectedCourse>),
        )
        .add_systems(PostStartup, validate_setup);

        app.add_systems(
            Update,
            (
                update_event_bus_time,
                handle_start_signal,
                tick_match_timer,
                update_grounded,
                handle_jump,
                handle_crouch,
            )
                .chain()
                .in_set(ChaseUpdate),
        );

        // Record before motion so each sample holds the state its tick started from
        app.add_systems(
            FixedUpdate,
            (
                stop_actors_on_match_end.run_if(match_over),
                tick_powerups,
                record_frames,
                apply_input,
                (apply_gravity, apply_velocity, check_collisions)
                    .chain()
                    .run_if(match_in_play),
                replay_step,
                collect_pickups,
                begin_rewind,
                detect_catch,
            )
                .chain(),
        );
    }
}
