//! Powerups - transient speed modifiers granted by world pickups
//!
//! At most one effect runs per actor. A new effect cancels the running one and
//! restores baseline speed before applying its own multiplier, so effects never stack.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::PICKUP_SIZE;
use crate::events::{MatchEvent, MatchEventBus};
use crate::helpers::boxes_overlap;
use crate::player::{Actor, ActorRole, BodyMode, Dormant, Hitbox, fixed_dt};
use crate::tuning::MovementTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerupKind {
    SpeedUp,
    SlowDown,
}

impl PowerupKind {
    pub fn multiplier(self, tuning: &MovementTuning) -> f32 {
        match self {
            PowerupKind::SpeedUp => tuning.speed_up_multiplier,
            PowerupKind::SlowDown => tuning.slow_down_multiplier,
        }
    }
}

/// A running speed modifier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerupEffect {
    pub kind: PowerupKind,
    pub multiplier: f32,
    pub remaining: f32,
}

impl PowerupEffect {
    pub fn new(kind: PowerupKind, tuning: &MovementTuning) -> Self {
        Self {
            kind,
            multiplier: kind.multiplier(tuning),
            remaining: tuning.powerup_duration,
        }
    }
}

/// Per-actor effect slot, stepped once per fixed tick
#[derive(Component, Debug, Default)]
pub struct ActivePowerup {
    effect: Option<PowerupEffect>,
}

impl ActivePowerup {
    /// Start an effect. Returns the effect it preempted, if any.
    pub fn activate(&mut self, effect: PowerupEffect) -> Option<PowerupEffect> {
        let preempted = self.effect.take();
        self.effect = Some(effect);
        preempted
    }

    /// Count down the running effect. Returns it once it expires.
    pub fn tick(&mut self, dt: f32) -> Option<PowerupEffect> {
        let effect = self.effect.as_mut()?;
        effect.remaining -= dt;
        if effect.remaining > 0.0 {
            return None;
        }
        self.effect.take()
    }

    /// Multiplier applied to max speed (1.0 when nothing runs)
    pub fn speed_multiplier(&self) -> f32 {
        self.effect.map(|e| e.multiplier).unwrap_or(1.0)
    }

    /// Which indicator the presentation layer should show
    pub fn indicator(&self) -> Option<PowerupKind> {
        self.effect.map(|e| e.kind)
    }

    pub fn effect(&self) -> Option<&PowerupEffect> {
        self.effect.as_ref()
    }

    pub fn clear(&mut self) {
        self.effect = None;
    }
}

/// World pickup granting a powerup on contact
#[derive(Component, Debug, Clone, Copy)]
pub struct Pickup(pub PowerupKind);

/// Count down running effects (FixedUpdate)
pub fn tick_powerups(
    time: Res<Time<Fixed>>,
    mut bus: ResMut<MatchEventBus>,
    mut actors: Query<(&ActorRole, &mut ActivePowerup), With<Actor>>,
) {
    let dt = fixed_dt(&time);
    for (role, mut powerup) in &mut actors {
        if let Some(expired) = powerup.tick(dt) {
            debug!("{} powerup {:?} expired", role, expired.kind);
            bus.emit(MatchEvent::PowerupExpired {
                role: *role,
                kind: expired.kind,
            });
        }
    }
}

/// Consume pickups touched by an actor that is not being replayed
pub fn collect_pickups(
    mut commands: Commands,
    tuning: Res<MovementTuning>,
    mut bus: ResMut<MatchEventBus>,
    mut actors: Query<
        (&ActorRole, &BodyMode, &Transform, &Hitbox, &mut ActivePowerup),
        (With<Actor>, Without<Dormant>),
    >,
    pickups: Query<(Entity, &Transform, &Pickup), Without<Actor>>,
) {
    for (role, body, transform, hitbox, mut powerup) in &mut actors {
        if *body != BodyMode::Dynamic {
            continue;
        }
        let center = hitbox.center(transform.translation);

        for (entity, pickup_transform, pickup) in &pickups {
            if !boxes_overlap(center, hitbox.size, pickup_transform.translation.truncate(), PICKUP_SIZE) {
                continue;
            }
            commands.entity(entity).despawn();

            let effect = PowerupEffect::new(pickup.0, &tuning);
            if let Some(preempted) = powerup.activate(effect) {
                info!("{} powerup {:?} replaced by {:?}", role, preempted.kind, effect.kind);
            } else {
                info!("{} picked up {:?}", role, effect.kind);
            }
            bus.emit(MatchEvent::PowerupActivated {
                role: *role,
                kind: effect.kind,
            });
        }
    }
}
