//! Rewind Chase - run a course, then catch your own replay
//!
//! Main entry point: window, camera and sprites on top of the core plugin.

use bevy::{camera::ScalingMode, prelude::*};
use rewind_chase::{
    Actor, ActorRole, CameraFollow, ChaseCorePlugin, ChaseUpdate, CourseDatabase, Dormant,
    Facing, FinishZone, Hitbox, MovementTuning, Pickup, Platform, PowerupKind, SelectedCourse,
    constants::*, follow_target, input, ui,
};
use std::path::Path;

/// Sprite child of an actor, kept in step with its hitbox
#[derive(Component)]
struct ActorVisual;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    // --course <name>
    let course_name = args
        .iter()
        .position(|a| a == "--course")
        .and_then(|i| args.get(i + 1).cloned());

    // --tuning <path>
    let tuning_file = args
        .iter()
        .position(|a| a == "--tuning")
        .and_then(|i| args.get(i + 1).cloned())
        .unwrap_or_else(|| rewind_chase::MOVEMENT_TUNING_FILE.to_string());

    let course_db = CourseDatabase::load_from_file(Path::new(COURSES_FILE));
    let course = match course_db.select(course_name.as_deref()) {
        Ok(course) => course.clone(),
        Err(e) => {
            error!("{}, falling back to the first course", e);
            course_db.courses[0].clone()
        }
    };
    let tuning = MovementTuning::load(Path::new(&tuning_file));

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                resolution: bevy::window::WindowResolution::new(WINDOW_SIZE.0, WINDOW_SIZE.1),
                title: "Rewind Chase".into(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(BACKGROUND_COLOR))
        .insert_resource(tuning)
        .insert_resource(SelectedCourse(course))
        .add_plugins(ChaseCorePlugin)
        .add_systems(Startup, (setup_camera, ui::spawn_hud))
        .add_systems(Update, input::capture_input.before(ChaseUpdate))
        .add_systems(
            Update,
            (
                attach_static_sprites,
                attach_actor_sprites,
                sync_actor_sprites,
                follow_target,
                ui::update_hud,
            )
                .chain()
                .after(ChaseUpdate),
        )
        .run();
}

fn setup_camera(mut commands: Commands) {
    let initial_y = CAMERA_VIEW_HEIGHT / 2.0 - 2.0;
    commands.spawn((
        Camera2d,
        Transform::from_xyz(0.0, initial_y, 0.0),
        Projection::Orthographic(OrthographicProjection {
            scaling_mode: ScalingMode::FixedVertical {
                viewport_height: CAMERA_VIEW_HEIGHT,
            },
            ..OrthographicProjection::default_2d()
        }),
        CameraFollow { initial_y },
    ));
}

/// Give freshly spawned course geometry something to draw
fn attach_static_sprites(
    mut commands: Commands,
    platforms: Query<(Entity, &Platform), Added<Platform>>,
    finishes: Query<(Entity, &FinishZone), Added<FinishZone>>,
    pickups: Query<(Entity, &Pickup), Added<Pickup>>,
) {
    for (entity, platform) in &platforms {
        commands
            .entity(entity)
            .insert(Sprite::from_color(PLATFORM_COLOR, platform.size));
    }
    for (entity, finish) in &finishes {
        commands
            .entity(entity)
            .insert(Sprite::from_color(FINISH_COLOR, finish.size));
    }
    for (entity, pickup) in &pickups {
        let color = match pickup.0 {
            PowerupKind::SpeedUp => SPEED_UP_COLOR,
            PowerupKind::SlowDown => SLOW_DOWN_COLOR,
        };
        commands
            .entity(entity)
            .insert(Sprite::from_color(color, PICKUP_SIZE));
    }
}

fn attach_actor_sprites(
    mut commands: Commands,
    actors: Query<(Entity, &ActorRole, &Hitbox), Added<Actor>>,
) {
    for (entity, role, hitbox) in &actors {
        let color = match role {
            ActorRole::Runner => RUNNER_COLOR,
            ActorRole::Chaser => CHASER_COLOR,
        };
        commands.entity(entity).insert(Visibility::default()).with_child((
            Sprite::from_color(color, hitbox.size),
            Transform::from_translation(hitbox.offset.extend(1.0)),
            ActorVisual,
        ));
    }
}

/// Crouch shape, facing, and hiding the chaser until it is woken
fn sync_actor_sprites(
    mut actors: Query<(&Hitbox, &Facing, &Children, Has<Dormant>, &mut Visibility), With<Actor>>,
    mut visuals: Query<(&mut Sprite, &mut Transform), With<ActorVisual>>,
) {
    for (hitbox, facing, children, dormant, mut visibility) in &mut actors {
        *visibility = if dormant {
            Visibility::Hidden
        } else {
            Visibility::Inherited
        };

        for child in children.iter() {
            if let Ok((mut sprite, mut transform)) = visuals.get_mut(child) {
                sprite.custom_size = Some(hitbox.size);
                sprite.flip_x = facing.is_left();
                transform.translation.x = hitbox.offset.x;
                transform.translation.y = hitbox.offset.y;
            }
        }
    }
}
