//! Actor physics systems
//!
//! FixedUpdate: live input -> motion model, gravity, integration, platform collision.
//! Update: ground probe, jump, crouch.

use bevy::prelude::*;

use crate::constants::*;
use crate::input::PlayerInput;
use crate::match_state::MatchState;
use crate::player::components::*;
use crate::player::motion::{MotionModel, MotionParams};
use crate::powerup::ActivePowerup;
use crate::tuning::MovementTuning;

/// Fixed tick duration in seconds
pub fn fixed_dt(time: &Time<Fixed>) -> f32 {
    time.timestep().as_secs_f32()
}

/// Runs in FixedUpdate to drive the live actor's horizontal speed from input.
/// Only the actor whose role is live in the current phase reads input.
pub fn apply_input(
    tuning: Res<MovementTuning>,
    input: Res<PlayerInput>,
    match_state: Res<MatchState>,
    time: Res<Time<Fixed>>,
    mut actors: Query<
        (
            &ActorRole,
            &BodyMode,
            &Crouching,
            &ActivePowerup,
            &mut MotionModel,
            &mut Velocity,
            &mut Facing,
            &mut PresentationSpeed,
        ),
        (With<Actor>, Without<Dormant>),
    >,
) {
    let dt = fixed_dt(&time);
    let phase = match_state.phase();

    for (role, body, crouching, powerup, mut motion, mut velocity, mut facing, mut speed) in
        &mut actors
    {
        if !role.is_live(phase) || *body != BodyMode::Dynamic {
            continue;
        }

        let params = MotionParams::from_tuning(&tuning, powerup.speed_multiplier(), crouching.0);
        velocity.0.x = motion.step(input.move_x, dt, &params);

        speed.0 = velocity.0.x.abs();
        facing.0 = if motion.facing_left() { -1.0 } else { 1.0 };
    }
}

/// Apply gravity to dynamic actors
pub fn apply_gravity(
    tuning: Res<MovementTuning>,
    time: Res<Time<Fixed>>,
    mut actors: Query<(&BodyMode, &mut Velocity), (With<Actor>, Without<Dormant>)>,
) {
    let dt = fixed_dt(&time);
    for (body, mut velocity) in &mut actors {
        if *body == BodyMode::Dynamic {
            velocity.0.y -= tuning.gravity * dt;
        }
    }
}

/// Integrate velocity into position for dynamic actors
pub fn apply_velocity(
    time: Res<Time<Fixed>>,
    mut actors: Query<(&BodyMode, &Velocity, &mut Transform), (With<Actor>, Without<Dormant>)>,
) {
    let dt = fixed_dt(&time);
    for (body, velocity, mut transform) in &mut actors {
        if *body == BodyMode::Dynamic {
            transform.translation += (velocity.0 * dt).extend(0.0);
        }
    }
}

/// Push dynamic actors out of platforms along the axis of least overlap
pub fn check_collisions(
    mut actors: Query<
        (&BodyMode, &Hitbox, &mut Transform, &mut Velocity),
        (With<Actor>, Without<Dormant>, Without<Platform>),
    >,
    platforms: Query<(&Transform, &Platform), Without<Actor>>,
) {
    for (body, hitbox, mut transform, mut velocity) in &mut actors {
        if *body != BodyMode::Dynamic {
            continue;
        }
        let half = hitbox.size / 2.0;

        for (platform_transform, platform) in &platforms {
            let platform_pos = platform_transform.translation.truncate();
            let platform_half = platform.size / 2.0;

            let center = hitbox.center(transform.translation);
            let diff = center - platform_pos;
            let overlap_x = half.x + platform_half.x - diff.x.abs();
            let overlap_y = half.y + platform_half.y - diff.y.abs();

            if overlap_x <= 0.0 || overlap_y <= 0.0 {
                continue;
            }

            if overlap_y < overlap_x {
                if diff.y > 0.0 {
                    // Landed on top; stay a hair inside so the next tick still sees the floor
                    let center_y = platform_pos.y + platform_half.y + half.y - COLLISION_EPSILON;
                    transform.translation.y = center_y - hitbox.offset.y;
                    if velocity.0.y < 0.0 {
                        velocity.0.y = 0.0;
                    }
                } else {
                    let center_y = platform_pos.y - platform_half.y - half.y;
                    transform.translation.y = center_y - hitbox.offset.y;
                    if velocity.0.y > 0.0 {
                        velocity.0.y = 0.0;
                    }
                }
            } else {
                let center_x = if diff.x > 0.0 {
                    platform_pos.x + platform_half.x + half.x
                } else {
                    platform_pos.x - platform_half.x - half.x
                };
                transform.translation.x = center_x - hitbox.offset.x;
                // Don't zero horizontal velocity - the motion model owns it
            }
        }
    }
}

/// Vertical probe from `origin` along `direction` (+1 up, -1 down).
/// True if any platform intersects the segment.
pub fn probe_platforms<'a>(
    origin: Vec2,
    direction: f32,
    distance: f32,
    platforms: impl IntoIterator<Item = (&'a Transform, &'a Platform)>,
) -> bool {
    let end = origin.y + direction.signum() * distance;
    let (low, high) = if end < origin.y {
        (end, origin.y)
    } else {
        (origin.y, end)
    };

    platforms.into_iter().any(|(transform, platform)| {
        let pos = transform.translation.truncate();
        let half = platform.size / 2.0;
        (origin.x - pos.x).abs() <= half.x && pos.y - half.y <= high && pos.y + half.y >= low
    })
}

/// Ground probe for every active actor (Update)
pub fn update_grounded(
    tuning: Res<MovementTuning>,
    mut actors: Query<(&Transform, &mut Grounded), (With<Actor>, Without<Dormant>)>,
    platforms: Query<(&Transform, &Platform), Without<Actor>>,
) {
    for (transform, mut grounded) in &mut actors {
        grounded.0 = probe_platforms(
            transform.translation.truncate(),
            -1.0,
            tuning.ground_check_distance,
            &platforms,
        );
    }
}

/// Edge-triggered jump for the live actor. The press is consumed either way.
pub fn handle_jump(
    tuning: Res<MovementTuning>,
    match_state: Res<MatchState>,
    mut input: ResMut<PlayerInput>,
    mut actors: Query<(&ActorRole, &BodyMode, &Grounded, &mut Velocity), (With<Actor>, Without<Dormant>)>,
) {
    if !input.jump_pressed {
        return;
    }
    input.jump_pressed = false;

    let phase = match_state.phase();
    for (role, body, grounded, mut velocity) in &mut actors {
        if role.is_live(phase) && *body == BodyMode::Dynamic && grounded.0 {
            velocity.0.y = tuning.jump_speed;
        }
    }
}

/// Crouch while grounded and held; stand when released and there is headroom
pub fn handle_crouch(
    input: Res<PlayerInput>,
    match_state: Res<MatchState>,
    mut actors: Query<
        (&ActorRole, &BodyMode, &Grounded, &Transform, &mut Crouching, &mut Hitbox),
        (With<Actor>, Without<Dormant>),
    >,
    platforms: Query<(&Transform, &Platform), Without<Actor>>,
) {
    let phase = match_state.phase();
    for (role, body, grounded, transform, mut crouching, mut hitbox) in &mut actors {
        if !role.is_live(phase) || *body != BodyMode::Dynamic {
            continue;
        }
        if input.crouch_held && grounded.0 {
            start_crouch(&mut crouching, &mut hitbox);
        } else {
            try_stand(&mut crouching, &mut hitbox, transform.translation.truncate(), &platforms);
        }
    }
}

pub fn start_crouch(crouching: &mut Crouching, hitbox: &mut Hitbox) {
    if crouching.0 {
        return;
    }
    crouching.0 = true;
    hitbox.crouch();
}

/// Stand up unless a platform sits inside the headroom probe. Returns true if standing.
pub fn try_stand<'a>(
    crouching: &mut Crouching,
    hitbox: &mut Hitbox,
    origin: Vec2,
    platforms: impl IntoIterator<Item = (&'a Transform, &'a Platform)>,
) -> bool {
    if !crouching.0 {
        return true;
    }
    let headroom = hitbox.standing_height() - HEADROOM_CLEARANCE;
    if probe_platforms(origin, 1.0, headroom, platforms) {
        return false;
    }
    crouching.0 = false;
    hitbox.stand();
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> (Transform, Platform) {
        (
            Transform::from_xyz(0.0, -0.5, 0.0),
            Platform {
                size: Vec2::new(20.0, 1.0),
            },
        )
    }

    #[test]
    fn test_ground_probe_hits_floor_below() {
        let (t, p) = floor();
        let platforms = [(&t, &p)];
        assert!(probe_platforms(Vec2::new(0.0, 1.0), -1.0, GROUND_CHECK_DISTANCE, platforms));
        assert!(!probe_platforms(Vec2::new(0.0, 2.0), -1.0, GROUND_CHECK_DISTANCE, platforms));
        assert!(!probe_platforms(Vec2::new(15.0, 1.0), -1.0, GROUND_CHECK_DISTANCE, platforms));
    }

    #[test]
    fn test_stand_blocked_under_low_ceiling() {
        let ceiling_t = Transform::from_xyz(0.0, 2.0, 0.0);
        let ceiling = Platform {
            size: Vec2::new(4.0, 0.5),
        };
        let mut crouching = Crouching::default();
        let mut hitbox = Hitbox::new(ACTOR_SIZE);
        start_crouch(&mut crouching, &mut hitbox);

        // Ceiling bottom at 1.75, probe from 0.7 reaches 2.2
        let stood = try_stand(&mut crouching, &mut hitbox, Vec2::new(0.0, 0.7), [(&ceiling_t, &ceiling)]);
        assert!(!stood);
        assert!(crouching.0);

        let stood = try_stand(&mut crouching, &mut hitbox, Vec2::new(3.0, 0.7), [(&ceiling_t, &ceiling)]);
        assert!(stood);
        assert!(!crouching.0);
        assert_eq!(hitbox.size, ACTOR_SIZE);
    }
}
