//! Match state machine: Idle -> Running -> Rewinding -> Won | Lost
//!
//! One explicitly constructed `MatchState` resource owns the phase and the run
//! timer. Transition methods yield the event to publish, so every terminal
//! event is produced exactly once.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{ChaseError, Result};
use crate::events::{MatchEvent, MatchEventBus};
use crate::helpers::{boxes_overlap, format_elapsed};
use crate::input::PlayerInput;
use crate::player::{
    Actor, ActorRole, Dormant, Hitbox, MotionModel, PresentationSpeed, Velocity,
};
use crate::replay::FrameBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatchPhase {
    #[default]
    Idle,
    Running,
    Rewinding,
    Won,
    Lost,
}

impl MatchPhase {
    /// Running or rewinding
    pub fn is_active(self) -> bool {
        matches!(self, MatchPhase::Running | MatchPhase::Rewinding)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, MatchPhase::Won | MatchPhase::Lost)
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "idle" => Some(MatchPhase::Idle),
            "running" => Some(MatchPhase::Running),
            "rewinding" => Some(MatchPhase::Rewinding),
            "won" => Some(MatchPhase::Won),
            "lost" => Some(MatchPhase::Lost),
            _ => None,
        }
    }
}

#[derive(Resource, Debug, Default)]
pub struct MatchState {
    phase: MatchPhase,
    timer_running: bool,
    elapsed: f32,
}

impl MatchState {
    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn timer_running(&self) -> bool {
        self.timer_running
    }

    /// Elapsed running time as `MM:SS:CC`
    pub fn formatted_time(&self) -> String {
        format_elapsed(self.elapsed)
    }

    fn reject(&self, event: &'static str) -> ChaseError {
        ChaseError::InvalidTransition {
            phase: self.phase,
            event,
        }
    }

    /// Idle -> Running. A second start is rejected and leaves the timer untouched.
    pub fn start(&mut self) -> Result<MatchEvent> {
        if self.phase != MatchPhase::Idle {
            return Err(self.reject("start"));
        }
        self.phase = MatchPhase::Running;
        self.start_timer();
        Ok(MatchEvent::Started)
    }

    /// Resume accumulating. Never resets elapsed time.
    pub fn start_timer(&mut self) {
        if !self.phase.is_terminal() {
            self.timer_running = true;
        }
    }

    /// Idempotent
    pub fn stop_timer(&mut self) {
        self.timer_running = false;
    }

    /// Advance the timer by one presentation tick
    pub fn tick(&mut self, dt: f32) {
        if self.timer_running {
            self.elapsed += dt;
        }
    }

    /// Running -> Rewinding; stops the timer
    pub fn reach_finish(&mut self, samples: usize) -> Result<MatchEvent> {
        if self.phase != MatchPhase::Running {
            return Err(self.reject("reach finish"));
        }
        self.stop_timer();
        self.phase = MatchPhase::Rewinding;
        Ok(MatchEvent::FinishReached {
            elapsed: self.elapsed,
            samples,
        })
    }

    /// Running | Rewinding -> Won
    pub fn catch(&mut self) -> Result<MatchEvent> {
        if !self.phase.is_active() {
            return Err(self.reject("catch"));
        }
        self.stop_timer();
        self.phase = MatchPhase::Won;
        Ok(MatchEvent::Won {
            elapsed: self.elapsed,
            formatted: self.formatted_time(),
        })
    }

    /// Running | Rewinding -> Lost (target escaped)
    pub fn escape(&mut self) -> Result<MatchEvent> {
        if !self.phase.is_active() {
            return Err(self.reject("escape"));
        }
        self.stop_timer();
        self.phase = MatchPhase::Lost;
        Ok(MatchEvent::Lost {
            elapsed: self.elapsed,
        })
    }
}

/// Which pieces of the scene were found at startup
#[derive(Resource, Debug, Clone, Copy)]
pub struct SetupStatus {
    pub runner: bool,
    pub chaser: bool,
    pub finish: bool,
}

impl Default for SetupStatus {
    fn default() -> Self {
        Self {
            runner: true,
            chaser: true,
            finish: true,
        }
    }
}

impl SetupStatus {
    /// Recording and the finish trigger need a runner and a finish zone
    pub fn rewind_enabled(&self) -> bool {
        self.runner && self.finish
    }

    /// Catching needs both actors
    pub fn catch_enabled(&self) -> bool {
        self.runner && self.chaser
    }
}

/// Run condition: match has not ended
pub fn match_in_play(match_state: Res<MatchState>) -> bool {
    !match_state.phase().is_terminal()
}

/// Run condition: match ended
pub fn match_over(match_state: Res<MatchState>) -> bool {
    match_state.phase().is_terminal()
}

/// Check the spawned scene once and disable whatever cannot work (PostStartup)
pub fn validate_setup(
    mut status: ResMut<SetupStatus>,
    actors: Query<&ActorRole, With<Actor>>,
    finish: Query<(), With<crate::player::FinishZone>>,
) {
    let count = |role: ActorRole| actors.iter().filter(|r| **r == role).count();

    status.runner = count(ActorRole::Runner) == 1;
    status.chaser = count(ActorRole::Chaser) == 1;
    status.finish = !finish.is_empty();

    if !status.runner {
        error!("{}; recording and rewind disabled", ChaseError::MissingReference("runner"));
    }
    if !status.chaser {
        error!("{}; catching disabled", ChaseError::MissingReference("chaser"));
    }
    if !status.finish {
        error!("{}; rewind disabled", ChaseError::MissingReference("finish zone"));
    }
}

/// Start the match on the start signal (Update). Clears any stale recording.
pub fn handle_start_signal(
    mut input: ResMut<PlayerInput>,
    mut match_state: ResMut<MatchState>,
    mut buffer: ResMut<FrameBuffer>,
    mut bus: ResMut<MatchEventBus>,
) {
    if !input.start_pressed {
        return;
    }
    input.start_pressed = false;

    match match_state.start() {
        Ok(event) => {
            buffer.clear();
            info!("Match started");
            bus.emit(event);
        }
        Err(e) => debug!("Ignoring start signal: {}", e),
    }
}

/// Accumulate running time (Update)
pub fn tick_match_timer(time: Res<Time>, mut match_state: ResMut<MatchState>) {
    match_state.tick(time.delta_secs());
}

/// Chaser touching the runner wins the match (FixedUpdate)
pub fn detect_catch(
    setup: Res<SetupStatus>,
    mut match_state: ResMut<MatchState>,
    mut bus: ResMut<MatchEventBus>,
    actors: Query<(&ActorRole, &Transform, &Hitbox), (With<Actor>, Without<Dormant>)>,
) {
    if !setup.catch_enabled() || !match_state.phase().is_active() {
        return;
    }

    let find = |role: ActorRole| {
        actors
            .iter()
            .find(|(r, _, _)| **r == role)
            .map(|(_, transform, hitbox)| (hitbox.center(transform.translation), hitbox.size))
    };
    let (Some((runner_pos, runner_size)), Some((chaser_pos, chaser_size))) =
        (find(ActorRole::Runner), find(ActorRole::Chaser))
    else {
        return;
    };

    if !boxes_overlap(runner_pos, runner_size, chaser_pos, chaser_size) {
        return;
    }

    match match_state.catch() {
        Ok(event) => {
            info!("You win: {}", match_state.formatted_time());
            bus.emit(event);
        }
        Err(e) => debug!("Ignoring catch: {}", e),
    }
}

/// Halt every actor once the match is decided (FixedUpdate)
pub fn stop_actors_on_match_end(
    mut actors: Query<
        (&mut Velocity, &mut MotionModel, &mut PresentationSpeed),
        With<Actor>,
    >,
) {
    for (mut velocity, mut motion, mut speed) in &mut actors {
        velocity.0 = Vec2::ZERO;
        motion.reset();
        speed.0 = 0.0;
    }
}
