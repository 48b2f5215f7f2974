//! Actor components

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::{CROUCH_HEIGHT_FACTOR, CROUCH_OFFSET_FACTOR};
use crate::match_state::MatchPhase;

/// Marker for actor entities (runner and chaser)
#[derive(Component)]
pub struct Actor;

/// Which side of the chase an actor plays
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorRole {
    /// Live and recorded while running, replayed while rewinding
    Runner,
    /// Dormant while running, live while rewinding
    Chaser,
}

impl ActorRole {
    /// Whether player input drives this actor in the given phase
    pub fn is_live(self, phase: MatchPhase) -> bool {
        match self {
            ActorRole::Runner => phase == MatchPhase::Running,
            ActorRole::Chaser => phase == MatchPhase::Rewinding,
        }
    }
}

impl std::fmt::Display for ActorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActorRole::Runner => write!(f, "runner"),
            ActorRole::Chaser => write!(f, "chaser"),
        }
    }
}

/// 2D velocity in world units per second
#[derive(Component, Default, Debug, Clone, Copy)]
pub struct Velocity(pub Vec2);

/// Whether the ground probe found a platform beneath the actor
#[derive(Component, Default, Debug)]
pub struct Grounded(pub bool);

/// Whether the actor is crouching
#[derive(Component, Default, Debug)]
pub struct Crouching(pub bool);

/// Direction the actor faces (-1.0 = left, 1.0 = right). Presentation only.
#[derive(Component, Debug)]
pub struct Facing(pub f32);

impl Default for Facing {
    fn default() -> Self {
        Self(1.0)
    }
}

impl Facing {
    pub fn is_left(&self) -> bool {
        self.0 < 0.0
    }
}

/// Speed reported to the presentation layer (animation speed)
#[derive(Component, Default, Debug)]
pub struct PresentationSpeed(pub f32);

/// Physics representation. Kinematic bodies ignore gravity and velocity;
/// their position is set directly.
#[derive(Component, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyMode {
    #[default]
    Dynamic,
    Kinematic,
}

/// Actor is parked off-stage and takes part in nothing until woken
#[derive(Component)]
pub struct Dormant;

/// Collision box relative to the actor's transform
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub size: Vec2,
    pub offset: Vec2,
    standing_size: Vec2,
    standing_offset: Vec2,
}

impl Hitbox {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            offset: Vec2::ZERO,
            standing_size: size,
            standing_offset: Vec2::ZERO,
        }
    }

    pub fn standing_height(&self) -> f32 {
        self.standing_size.y
    }

    /// Shrink to crouch height, keeping the feet in place
    pub fn crouch(&mut self) {
        self.size = Vec2::new(
            self.standing_size.x,
            self.standing_size.y * CROUCH_HEIGHT_FACTOR,
        );
        self.offset = Vec2::new(
            self.standing_offset.x,
            self.standing_offset.y - self.standing_size.y * CROUCH_OFFSET_FACTOR,
        );
    }

    pub fn stand(&mut self) {
        self.size = self.standing_size;
        self.offset = self.standing_offset;
    }

    /// World-space centre of the box
    pub fn center(&self, translation: Vec3) -> Vec2 {
        translation.truncate() + self.offset
    }
}

/// Static level geometry
#[derive(Component, Debug, Clone, Copy)]
pub struct Platform {
    pub size: Vec2,
}

/// Region whose crossing by the runner ends the run
#[derive(Component, Debug, Clone, Copy)]
pub struct FinishZone {
    pub size: Vec2,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_roles_per_phase() {
        assert!(ActorRole::Runner.is_live(MatchPhase::Running));
        assert!(!ActorRole::Runner.is_live(MatchPhase::Rewinding));
        assert!(ActorRole::Chaser.is_live(MatchPhase::Rewinding));
        assert!(!ActorRole::Chaser.is_live(MatchPhase::Running));
        assert!(!ActorRole::Runner.is_live(MatchPhase::Idle));
        assert!(!ActorRole::Chaser.is_live(MatchPhase::Won));
    }

    #[test]
    fn test_crouch_keeps_feet_in_place() {
        let mut hitbox = Hitbox::new(Vec2::new(1.0, 2.0));
        let feet = |h: &Hitbox| h.offset.y - h.size.y / 2.0;
        let standing_feet = feet(&hitbox);

        hitbox.crouch();
        assert!((hitbox.size.y - 1.4).abs() < 1e-5);
        assert!((feet(&hitbox) - standing_feet).abs() < 1e-5);

        hitbox.stand();
        assert_eq!(hitbox.size, Vec2::new(1.0, 2.0));
        assert_eq!(hitbox.offset, Vec2::ZERO);
    }
}
