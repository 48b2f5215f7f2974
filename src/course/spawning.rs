//! Course entity spawning
//!
//! Spawns gameplay components only. The windowed binary attaches sprites to
//! whatever appears, so the same spawn path serves headless runs.

use bevy::prelude::*;

use crate::constants::ACTOR_SIZE;
use crate::course::database::CourseDef;
use crate::player::{
    Actor, ActorRole, BodyMode, Crouching, Dormant, Facing, FinishZone, Grounded, Hitbox,
    MotionModel, Platform, PresentationSpeed, Velocity,
};
use crate::powerup::{ActivePowerup, Pickup};

/// Positions of the loaded course needed after spawn
#[derive(Resource, Debug, Clone, Default)]
pub struct CourseLayout {
    pub name: String,
    pub replay_start: Vec2,
}

/// Course the app spawns at startup
#[derive(Resource, Debug, Clone)]
pub struct SelectedCourse(pub CourseDef);

/// Components shared by both actors
pub fn actor_bundle(role: ActorRole, position: Vec2) -> impl Bundle {
    (
        Actor,
        role,
        Transform::from_xyz(position.x, position.y, 1.0),
        Velocity::default(),
        Grounded::default(),
        Crouching::default(),
        Facing::default(),
        PresentationSpeed::default(),
        BodyMode::Dynamic,
        Hitbox::new(ACTOR_SIZE),
        MotionModel::default(),
        ActivePowerup::default(),
    )
}

/// Spawn every entity of a course and return its layout
pub fn spawn_course(commands: &mut Commands, course: &CourseDef) -> CourseLayout {
    for platform in &course.platforms {
        commands.spawn((
            Transform::from_translation(platform.center().extend(0.0)),
            Platform {
                size: platform.size(),
            },
        ));
    }

    if let Some(finish) = &course.finish {
        commands.spawn((
            Transform::from_translation(finish.center().extend(0.0)),
            FinishZone {
                size: finish.size(),
            },
        ));
    }

    for pickup in &course.pickups {
        commands.spawn((
            Transform::from_xyz(pickup.x, pickup.y, 0.5),
            Pickup(pickup.kind),
        ));
    }

    commands.spawn(actor_bundle(ActorRole::Runner, course.runner_spawn()));
    if let Some(chaser_spawn) = course.chaser_spawn() {
        commands.spawn((actor_bundle(ActorRole::Chaser, chaser_spawn), Dormant));
    }

    info!(
        "Spawned course '{}': {} platforms, {} pickups",
        course.name,
        course.platforms.len(),
        course.pickups.len()
    );

    CourseLayout {
        name: course.name.clone(),
        replay_start: course.replay_start(),
    }
}

/// Startup system: spawn the selected course
pub fn spawn_selected_course(mut commands: Commands, selected: Res<SelectedCourse>) {
    let layout = spawn_course(&mut commands, &selected.0);
    commands.insert_resource(layout);
}
