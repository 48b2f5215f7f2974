//! Recording and replay systems (FixedUpdate)

use bevy::prelude::*;

use crate::constants::REPLAY_FACING_THRESHOLD;
use crate::course::CourseLayout;
use crate::events::{MatchEvent, MatchEventBus};
use crate::helpers::boxes_overlap;
use crate::match_state::{MatchPhase, MatchState, SetupStatus};
use crate::player::{
    Actor, ActorRole, BodyMode, Crouching, Dormant, Facing, FinishZone, Hitbox, MotionModel,
    PresentationSpeed, Velocity, fixed_dt,
};
use crate::powerup::ActivePowerup;

use super::data::{FrameBuffer, FrameSample};
use super::state::{ReplayDriver, ReplayStep};

/// Append one sample of the runner's state per tick while running.
/// Runs before the motion step so each sample is the state the tick started from.
pub fn record_frames(
    setup: Res<SetupStatus>,
    match_state: Res<MatchState>,
    time: Res<Time<Fixed>>,
    mut buffer: ResMut<FrameBuffer>,
    actors: Query<(&ActorRole, &BodyMode, &Transform, &Velocity, &Crouching), With<Actor>>,
) {
    if !setup.rewind_enabled() || match_state.phase() != MatchPhase::Running {
        return;
    }

    let tick_duration = fixed_dt(&time);
    for (role, body, transform, velocity, crouching) in &actors {
        if *role != ActorRole::Runner || *body != BodyMode::Dynamic {
            continue;
        }
        buffer.push(FrameSample {
            position: transform.translation.truncate(),
            velocity: velocity.0,
            crouching: crouching.0,
            tick_duration,
        });
    }
}

/// Runner crossing the finish: stop the timer, freeze the runner as a kinematic
/// body at the replay start and wake the chaser. The first sample is consumed on
/// the following tick.
#[allow(clippy::too_many_arguments)]
pub fn begin_rewind(
    mut commands: Commands,
    setup: Res<SetupStatus>,
    layout: Res<CourseLayout>,
    buffer: Res<FrameBuffer>,
    mut match_state: ResMut<MatchState>,
    mut driver: ResMut<ReplayDriver>,
    mut bus: ResMut<MatchEventBus>,
    mut actors: Query<
        (
            Entity,
            &ActorRole,
            &mut BodyMode,
            &mut Transform,
            &mut Velocity,
            &mut MotionModel,
            &mut Crouching,
            &mut Hitbox,
            &mut ActivePowerup,
        ),
        With<Actor>,
    >,
    finish: Query<(&Transform, &FinishZone), Without<Actor>>,
) {
    if !setup.rewind_enabled() || match_state.phase() != MatchPhase::Running || driver.is_active() {
        return;
    }

    let crossed = actors.iter().any(|(_, role, body, transform, _, _, _, hitbox, _)| {
        *role == ActorRole::Runner
            && *body == BodyMode::Dynamic
            && finish.iter().any(|(finish_transform, zone)| {
                boxes_overlap(
                    hitbox.center(transform.translation),
                    hitbox.size,
                    finish_transform.translation.truncate(),
                    zone.size,
                )
            })
    });
    if !crossed {
        return;
    }

    let event = match match_state.reach_finish(buffer.len()) {
        Ok(event) => event,
        Err(e) => {
            debug!("Ignoring finish: {}", e);
            return;
        }
    };
    info!(
        "Finish reached at {} with {} samples, rewinding",
        match_state.formatted_time(),
        buffer.len()
    );
    bus.emit(event);

    for (
        entity,
        role,
        mut body,
        mut transform,
        mut velocity,
        mut motion,
        mut crouching,
        mut hitbox,
        mut powerup,
    ) in &mut actors
    {
        match role {
            ActorRole::Runner => {
                *body = BodyMode::Kinematic;
                velocity.0 = Vec2::ZERO;
                motion.reset();
                transform.translation.x = layout.replay_start.x;
                transform.translation.y = layout.replay_start.y;
                crouching.0 = false;
                hitbox.stand();
                // A replayed body carries no effects
                powerup.clear();
            }
            ActorRole::Chaser => {
                commands.entity(entity).remove::<Dormant>();
            }
        }
    }

    driver.begin();
    bus.emit(MatchEvent::RewindStarted {
        samples: buffer.len(),
    });
}

/// Drive the runner through one recorded sample per tick. Ends early if the
/// match was decided; on exhaustion signals the escape while still active.
#[allow(clippy::too_many_arguments)]
pub fn replay_step(
    mut match_state: ResMut<MatchState>,
    mut driver: ResMut<ReplayDriver>,
    mut buffer: ResMut<FrameBuffer>,
    mut bus: ResMut<MatchEventBus>,
    mut actors: Query<
        (
            &ActorRole,
            &mut BodyMode,
            &mut Transform,
            &mut Crouching,
            &mut Hitbox,
            &mut Facing,
            &mut PresentationSpeed,
        ),
        With<Actor>,
    >,
) {
    if !driver.is_active() {
        return;
    }

    let Some((_, mut body, mut transform, mut crouching, mut hitbox, mut facing, mut speed)) =
        actors.iter_mut().find(|(role, ..)| **role == ActorRole::Runner)
    else {
        driver.finish();
        return;
    };

    let step = if match_state.phase().is_active() {
        driver.step(&buffer)
    } else {
        ReplayStep::Exhausted
    };

    match step {
        ReplayStep::Idle => {}
        ReplayStep::Sample(sample) => {
            if sample.crouching != crouching.0 {
                if sample.crouching {
                    hitbox.crouch();
                } else {
                    hitbox.stand();
                }
                crouching.0 = sample.crouching;
            }
            transform.translation.x = sample.position.x;
            transform.translation.y = sample.position.y;
            speed.0 = sample.velocity.length();
            facing.0 = if sample.velocity.x < REPLAY_FACING_THRESHOLD {
                -1.0
            } else {
                1.0
            };
        }
        ReplayStep::Exhausted => {
            let consumed = driver.consumed();
            driver.finish();
            buffer.clear();
            *body = BodyMode::Dynamic;
            crouching.0 = false;
            hitbox.stand();
            speed.0 = 0.0;

            if match_state.phase().is_active() {
                match match_state.escape() {
                    Ok(event) => {
                        info!("You lost: runner escaped after {} samples", consumed);
                        bus.emit(event);
                    }
                    Err(e) => debug!("Ignoring escape: {}", e),
                }
            } else {
                debug!("Replay stopped after {} samples, match already decided", consumed);
            }
        }
    }
}
