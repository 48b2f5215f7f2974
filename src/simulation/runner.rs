//! Headless match stepping
//!
//! Drives the schedules by hand, one fixed tick per step, so runs are
//! deterministic regardless of wall-clock time.

use bevy::prelude::*;
use std::time::Duration;

use crate::constants::FIXED_TIMESTEP;
use crate::course::CourseLayout;
use crate::events::{BusEvent, MatchEventBus};
use crate::input::PlayerInput;
use crate::match_state::{MatchPhase, MatchState};
use crate::player::{Actor, ActorRole, BodyMode, Crouching, Dormant, Grounded, Velocity};
use crate::replay::{FrameBuffer, ReplayDriver};
use crate::simulation::app_builder::HeadlessAppBuilder;
use crate::simulation::metrics::MatchResult;

/// Snapshot of one actor for tools and assertions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorSnapshot {
    pub position: Vec2,
    pub velocity: Vec2,
    pub crouching: bool,
    pub grounded: bool,
    pub kinematic: bool,
    pub dormant: bool,
}

/// A headless app that has run its startup and is stepped manually
pub struct HeadlessMatch {
    app: App,
    ticks: u32,
    samples_recorded: usize,
}

impl HeadlessMatch {
    /// Take a built app through startup
    pub fn new(mut app: App) -> Self {
        app.finish();
        app.cleanup();
        app.update();
        Self {
            app,
            ticks: 0,
            samples_recorded: 0,
        }
    }

    pub fn from_builder(builder: HeadlessAppBuilder) -> Self {
        Self::new(builder.build())
    }

    /// Advance one fixed tick: Update (input consumers, timer) then FixedUpdate
    pub fn step(&mut self) {
        let dt = Duration::from_secs_f64(FIXED_TIMESTEP);
        let world = self.app.world_mut();

        world.resource_mut::<Time<Virtual>>().advance_by(dt);
        world.resource_mut::<Time<Real>>().advance_by(dt);
        world.resource_mut::<Time<Fixed>>().advance_by(dt);
        // First is skipped, so sync the generic clock by hand
        let generic = world.resource::<Time<Virtual>>().as_generic();
        *world.resource_mut::<Time>() = generic;

        world.run_schedule(Update);
        world.run_schedule(FixedUpdate);

        self.ticks += 1;
        let recorded = self.app.world().resource::<FrameBuffer>().len();
        self.samples_recorded = self.samples_recorded.max(recorded);
    }

    pub fn step_n(&mut self, n: u32) {
        for _ in 0..n {
            self.step();
        }
    }

    /// Press start and step once
    pub fn start(&mut self) {
        self.input_mut().start_pressed = true;
        self.step();
    }

    pub fn input_mut(&mut self) -> Mut<'_, PlayerInput> {
        self.app.world_mut().resource_mut::<PlayerInput>()
    }

    pub fn state(&self) -> &MatchState {
        self.app.world().resource::<MatchState>()
    }

    pub fn phase(&self) -> MatchPhase {
        self.state().phase()
    }

    pub fn buffer(&self) -> &FrameBuffer {
        self.app.world().resource::<FrameBuffer>()
    }

    pub fn buffer_len(&self) -> usize {
        self.buffer().len()
    }

    pub fn replay_active(&self) -> bool {
        self.app.world().resource::<ReplayDriver>().is_active()
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    pub fn actor(&mut self, role: ActorRole) -> Option<ActorSnapshot> {
        let world = self.app.world_mut();
        let mut query = world.query_filtered::<(
            &ActorRole,
            &Transform,
            &Velocity,
            &Crouching,
            &Grounded,
            &BodyMode,
            Has<Dormant>,
        ), With<Actor>>();
        query
            .iter(world)
            .find(|(r, ..)| **r == role)
            .map(
                |(_, transform, velocity, crouching, grounded, body, dormant)| ActorSnapshot {
                    position: transform.translation.truncate(),
                    velocity: velocity.0,
                    crouching: crouching.0,
                    grounded: grounded.0,
                    kinematic: *body == BodyMode::Kinematic,
                    dormant,
                },
            )
    }

    pub fn actor_position(&mut self, role: ActorRole) -> Option<Vec2> {
        self.actor(role).map(|a| a.position)
    }

    /// Consume pending bus events
    pub fn drain_events(&mut self) -> Vec<BusEvent> {
        self.app.world_mut().resource_mut::<MatchEventBus>().drain()
    }

    /// Names of every event emitted so far, in order
    pub fn event_names(&self) -> Vec<&'static str> {
        self.app
            .world()
            .resource::<MatchEventBus>()
            .history()
            .map(|e| e.event.name())
            .collect()
    }

    /// Step until the match is decided or `max_ticks` have passed.
    /// `policy` sets the input before every tick.
    pub fn run(
        &mut self,
        max_ticks: u32,
        mut policy: impl FnMut(u32, MatchPhase, &mut PlayerInput),
    ) -> MatchResult {
        while self.ticks < max_ticks && !self.phase().is_terminal() {
            let tick = self.ticks;
            let phase = self.phase();
            policy(tick, phase, &mut self.input_mut());
            self.step();
        }
        self.result()
    }

    pub fn result(&self) -> MatchResult {
        let state = self.state();
        MatchResult {
            course: self.app.world().resource::<CourseLayout>().name.clone(),
            outcome: state.phase().into(),
            elapsed: state.elapsed(),
            formatted_time: state.formatted_time(),
            ticks: self.ticks,
            samples_recorded: self.samples_recorded,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{ACTOR_SIZE, CROUCH_HEIGHT_FACTOR};
    use crate::course::{CourseDef, PickupDef, RectDef};
    use crate::events::MatchEvent;
    use crate::match_state::SetupStatus;
    use crate::player::{Facing, Hitbox, PresentationSpeed};
    use crate::powerup::{ActivePowerup, PowerupKind};
    use crate::replay::FrameSample;
    use crate::simulation::metrics::MatchOutcome;
    use crate::tuning::MovementTuning;

    fn floor() -> RectDef {
        RectDef {
            x: 20.0,
            y: -0.5,
            width: 80.0,
            height: 1.0,
        }
    }

    fn course(chaser_x: Option<f32>, finish_x: Option<f32>) -> CourseDef {
        CourseDef {
            name: "test".to_string(),
            platforms: vec![floor()],
            runner_spawn: [0.0, 1.0],
            chaser_spawn: chaser_x.map(|x| [x, 1.0]),
            replay_start: None,
            finish: finish_x.map(|x| RectDef {
                x,
                y: 2.0,
                width: 1.0,
                height: 4.0,
            }),
            pickups: Vec::new(),
        }
    }

    fn headless(course: CourseDef) -> HeadlessMatch {
        HeadlessMatch::from_builder(HeadlessAppBuilder::new().with_course(course))
    }

    /// Put the match straight into rewinding with a hand-made recording
    fn force_rewind(m: &mut HeadlessMatch, xs: &[f32]) {
        let samples = xs
            .iter()
            .map(|&x| FrameSample {
                position: Vec2::new(x, 0.99),
                velocity: Vec2::new(5.0, 0.0),
                crouching: false,
                tick_duration: 0.02,
            })
            .collect();
        force_rewind_with(m, samples);
    }

    fn force_rewind_with(m: &mut HeadlessMatch, samples: FrameBuffer) {
        m.start();
        let world = m.world_mut();
        let count = samples.len();
        *world.resource_mut::<FrameBuffer>() = samples;
        let event = world
            .resource_mut::<MatchState>()
            .reach_finish(count)
            .unwrap();
        world.resource_mut::<MatchEventBus>().emit(event);

        let mut runners = world.query::<(&ActorRole, &mut BodyMode)>();
        for (role, mut body) in runners.iter_mut(world) {
            if *role == ActorRole::Runner {
                *body = BodyMode::Kinematic;
            }
        }
        world.resource_mut::<ReplayDriver>().begin();
    }

    /// (crouching, hitbox height, facing left, presentation speed)
    fn runner_pose(m: &mut HeadlessMatch) -> (bool, f32, bool, f32) {
        let world = m.world_mut();
        let mut query = world.query::<(
            &ActorRole,
            &Crouching,
            &Hitbox,
            &Facing,
            &PresentationSpeed,
        )>();
        query
            .iter(world)
            .find(|(role, ..)| **role == ActorRole::Runner)
            .map(|(_, crouching, hitbox, facing, speed)| {
                (crouching.0, hitbox.size.y, facing.is_left(), speed.0)
            })
            .unwrap()
    }

    fn tuning(m: &mut HeadlessMatch) -> MovementTuning {
        m.world_mut().resource::<MovementTuning>().clone()
    }

    #[test]
    fn test_nothing_recorded_before_start() {
        let mut m = headless(course(Some(-4.0), Some(20.0)));
        m.input_mut().move_x = 1.0;
        m.step_n(10);
        assert_eq!(m.phase(), MatchPhase::Idle);
        assert_eq!(m.buffer_len(), 0);
        assert_eq!(m.state().elapsed(), 0.0);
    }

    #[test]
    fn test_one_sample_per_tick_while_running() {
        let mut m = headless(course(Some(-4.0), Some(20.0)));
        m.start();
        m.input_mut().move_x = 1.0;
        m.step_n(4);
        assert_eq!(m.phase(), MatchPhase::Running);
        assert_eq!(m.buffer_len(), 5);
        assert!(m.buffer().iter().all(|s| (s.tick_duration - 0.02).abs() < 1e-6));
        // Chaser waits while the runner runs
        assert!(m.actor(ActorRole::Chaser).unwrap().dormant);
    }

    #[test]
    fn test_replay_consumes_one_sample_per_tick_then_escapes() {
        let mut m = headless(course(Some(-30.0), Some(20.0)));
        force_rewind(&mut m, &[1.0, 2.0, 3.0]);

        for expected_x in [1.0, 2.0, 3.0] {
            m.step();
            assert_eq!(m.phase(), MatchPhase::Rewinding);
            let runner = m.actor_position(ActorRole::Runner).unwrap();
            assert_eq!(runner.x, expected_x);
        }

        // Fourth tick finds nothing left
        m.step();
        assert_eq!(m.phase(), MatchPhase::Lost);
        assert_eq!(m.buffer_len(), 0);
        assert!(!m.replay_active());
        // Replay ends on the last sample's position
        assert_eq!(m.actor_position(ActorRole::Runner).unwrap().x, 3.0);
        assert!(!m.actor(ActorRole::Runner).unwrap().kinematic);
        assert_eq!(m.event_names().last(), Some(&"Lost"));
    }

    #[test]
    fn test_empty_recording_escapes_on_first_replay_tick() {
        let mut m = headless(course(Some(-30.0), Some(20.0)));
        force_rewind(&mut m, &[]);
        m.step();
        assert_eq!(m.phase(), MatchPhase::Lost);
    }

    #[test]
    fn test_finish_at_spawn_replays_single_sample() {
        let mut m = headless(course(Some(-30.0), Some(0.0)));
        m.start();
        // Recorded one sample, then crossed the finish on the same tick
        assert_eq!(m.phase(), MatchPhase::Rewinding);
        assert!(m.actor(ActorRole::Runner).unwrap().kinematic);
        assert!(!m.actor(ActorRole::Chaser).unwrap().dormant);

        m.step();
        assert_eq!(m.phase(), MatchPhase::Rewinding);
        m.step();
        assert_eq!(m.phase(), MatchPhase::Lost);

        let events: Vec<_> = m.drain_events().into_iter().map(|e| e.event).collect();
        assert!(matches!(events[1], MatchEvent::FinishReached { samples: 1, .. }));
        assert!(matches!(events[2], MatchEvent::RewindStarted { samples: 1 }));
    }

    #[test]
    fn test_chaser_in_the_replay_path_wins_once() {
        let mut m = headless(course(Some(4.0), Some(10.0)));
        let result = m.run(600, |_, phase, input| {
            input.start_pressed = phase == MatchPhase::Idle;
            input.move_x = if phase == MatchPhase::Running { 1.0 } else { 0.0 };
        });
        assert_eq!(result.outcome, MatchOutcome::Won);
        assert!(result.samples_recorded > 0);

        let finish_elapsed = m.state().elapsed();
        m.step_n(200);
        // Timer stayed stopped, no escape after the catch
        assert_eq!(m.state().elapsed(), finish_elapsed);
        let names = m.event_names();
        assert_eq!(names.iter().filter(|n| **n == "Won").count(), 1);
        assert!(!names.contains(&"Lost"));
        assert!(!m.replay_active());
        assert_eq!(m.actor(ActorRole::Chaser).unwrap().velocity, Vec2::ZERO);
    }

    #[test]
    fn test_idle_chaser_lets_runner_escape() {
        let mut m = headless(course(Some(-4.0), Some(10.0)));
        let result = m.run(600, |_, phase, input| {
            input.start_pressed = phase == MatchPhase::Idle;
            input.move_x = if phase == MatchPhase::Running { 1.0 } else { 0.0 };
        });
        assert_eq!(result.outcome, MatchOutcome::Lost);
        assert_eq!(m.event_names().iter().filter(|n| **n == "Lost").count(), 1);
    }

    #[test]
    fn test_timer_stops_at_finish() {
        let mut m = headless(course(Some(-30.0), Some(6.0)));
        m.input_mut().move_x = 1.0;
        m.start();
        while m.phase() == MatchPhase::Running {
            m.step();
        }
        let at_finish = m.state().elapsed();
        assert!(at_finish > 0.0);
        m.step_n(3);
        assert_eq!(m.state().elapsed(), at_finish);
    }

    #[test]
    fn test_missing_finish_disables_rewind() {
        let mut m = headless(course(Some(-4.0), None));
        assert!(!m.world_mut().resource::<SetupStatus>().rewind_enabled());
        m.input_mut().move_x = 1.0;
        m.start();
        m.step_n(20);
        assert_eq!(m.phase(), MatchPhase::Running);
        assert_eq!(m.buffer_len(), 0);
    }

    #[test]
    fn test_runner_lands_and_stays_grounded() {
        let mut m = headless(course(Some(-4.0), Some(20.0)));
        m.step_n(5);
        let runner = m.actor(ActorRole::Runner).unwrap();
        assert!(runner.grounded);
        assert!((runner.position.y - 1.0).abs() < 0.05);
    }

    #[test]
    fn test_jump_only_from_the_ground() {
        let mut m = headless(course(Some(-30.0), Some(20.0)));
        let tuning = tuning(&mut m);
        let one_tick_of_gravity = tuning.gravity * FIXED_TIMESTEP as f32;
        m.start();
        m.step_n(3);
        assert!(m.actor(ActorRole::Runner).unwrap().grounded);

        m.input_mut().jump_pressed = true;
        m.step();
        let vy = m.actor(ActorRole::Runner).unwrap().velocity.y;
        assert!((vy - (tuning.jump_speed - one_tick_of_gravity)).abs() < 1e-3);
        assert!(!m.input_mut().jump_pressed);

        m.step_n(4);
        let before = m.actor(ActorRole::Runner).unwrap();
        assert!(!before.grounded);

        // Second press in the air: no impulse, gravity keeps pulling
        m.input_mut().jump_pressed = true;
        m.step();
        let after = m.actor(ActorRole::Runner).unwrap();
        assert!((after.velocity.y - (before.velocity.y - one_tick_of_gravity)).abs() < 1e-3);
        assert!(!m.input_mut().jump_pressed);
    }

    #[test]
    fn test_crouch_needs_ground() {
        let mut m = headless(course(Some(-30.0), Some(20.0)));
        m.start();
        m.step_n(3);
        m.input_mut().jump_pressed = true;
        m.step_n(3);
        assert!(!m.actor(ActorRole::Runner).unwrap().grounded);

        m.input_mut().crouch_held = true;
        m.step();
        let (crouching, height, ..) = runner_pose(&mut m);
        assert!(!crouching);
        assert_eq!(height, ACTOR_SIZE.y);
    }

    #[test]
    fn test_crouched_run_tops_out_at_reduced_speed() {
        let mut m = headless(course(Some(-30.0), Some(20.0)));
        let tuning = tuning(&mut m);
        m.start();
        m.input_mut().crouch_held = true;
        m.input_mut().move_x = 1.0;
        m.step_n(60);

        let runner = m.actor(ActorRole::Runner).unwrap();
        assert!(runner.crouching);
        assert_eq!(m.phase(), MatchPhase::Running);
        let crouched_top = tuning.move_speed * tuning.crouch_speed_factor;
        assert!((runner.velocity.x - crouched_top).abs() < 1e-3);
    }

    #[test]
    fn test_replay_follows_recorded_crouch_and_facing() {
        let mut m = headless(course(Some(-30.0), Some(20.0)));
        let crouches = [false, true, true, false, true];
        let samples = crouches
            .iter()
            .enumerate()
            .map(|(i, &crouching)| FrameSample {
                position: Vec2::new(5.0 - i as f32 * 0.1, 0.99),
                velocity: Vec2::new(-3.0, 4.0),
                crouching,
                tick_duration: 0.02,
            })
            .collect();
        force_rewind_with(&mut m, samples);

        let standing = ACTOR_SIZE.y;
        let crouched = ACTOR_SIZE.y * CROUCH_HEIGHT_FACTOR;
        for crouching in crouches {
            m.step();
            assert_eq!(m.phase(), MatchPhase::Rewinding);
            let (is_crouching, height, facing_left, speed) = runner_pose(&mut m);
            assert_eq!(is_crouching, crouching);
            assert_eq!(height, if crouching { crouched } else { standing });
            assert!(facing_left);
            assert!((speed - 5.0).abs() < 1e-5);
        }

        // Exhaustion releases the last recorded crouch
        m.step();
        assert_eq!(m.phase(), MatchPhase::Lost);
        let (is_crouching, height, _, speed) = runner_pose(&mut m);
        assert!(!is_crouching);
        assert_eq!(height, standing);
        assert_eq!(speed, 0.0);
    }

    #[test]
    fn test_replayed_runner_drops_its_powerup() {
        let mut layout = course(Some(-30.0), Some(8.0));
        layout.pickups.push(PickupDef {
            kind: PowerupKind::SpeedUp,
            x: 2.0,
            y: 1.0,
        });
        let mut m = headless(layout);
        m.input_mut().move_x = 1.0;
        m.start();
        while m.phase() == MatchPhase::Running && m.ticks() < 300 {
            m.step();
        }
        assert_eq!(m.phase(), MatchPhase::Rewinding);
        assert!(m.event_names().contains(&"PowerupActivated"));

        let world = m.world_mut();
        let mut query = world.query::<(&ActorRole, &ActivePowerup)>();
        let (_, runner_powerup) = query
            .iter(world)
            .find(|(role, _)| **role == ActorRole::Runner)
            .unwrap();
        assert!(runner_powerup.effect().is_none());

        // Outlast the effect's duration
        m.input_mut().move_x = 0.0;
        m.step_n(200);
        assert_eq!(m.phase(), MatchPhase::Lost);
        assert!(!m.event_names().contains(&"PowerupExpired"));
    }
}
