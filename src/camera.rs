//! Follow camera - tracks the runner, then the chaser once it is woken

use bevy::prelude::*;

use crate::match_state::{MatchPhase, MatchState};
use crate::player::{Actor, ActorRole};

/// Camera that follows an actor horizontally, keeping its start height
#[derive(Component, Debug)]
pub struct CameraFollow {
    pub initial_y: f32,
}

/// Which actor the camera should track in a phase
pub fn camera_target_role(phase: MatchPhase) -> ActorRole {
    match phase {
        MatchPhase::Rewinding | MatchPhase::Won => ActorRole::Chaser,
        MatchPhase::Idle | MatchPhase::Running | MatchPhase::Lost => ActorRole::Runner,
    }
}

/// X-only follow. Reports a missing target once.
pub fn follow_target(
    match_state: Res<MatchState>,
    mut reported: Local<bool>,
    actors: Query<(&ActorRole, &Transform), (With<Actor>, Without<CameraFollow>)>,
    mut cameras: Query<(&CameraFollow, &mut Transform), Without<Actor>>,
) {
    let role = camera_target_role(match_state.phase());
    let Some((_, target)) = actors.iter().find(|(r, _)| **r == role) else {
        if !*reported {
            error!("Camera target {} not found, camera stays put", role);
            *reported = true;
        }
        return;
    };

    for (follow, mut transform) in &mut cameras {
        transform.translation.x = target.translation.x;
        transform.translation.y = follow.initial_y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_switches_to_chaser_while_rewinding() {
        assert_eq!(camera_target_role(MatchPhase::Running), ActorRole::Runner);
        assert_eq!(camera_target_role(MatchPhase::Rewinding), ActorRole::Chaser);
        assert_eq!(camera_target_role(MatchPhase::Won), ActorRole::Chaser);
        assert_eq!(camera_target_role(MatchPhase::Lost), ActorRole::Runner);
    }
}
