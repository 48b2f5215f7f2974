//! Test execution engine

use std::collections::HashMap;

use crate::course::CourseDatabase;
use crate::player::ActorRole;
use crate::simulation::{HeadlessAppBuilder, HeadlessMatch};

use super::assertions::{
    AssertionError, CapturedEvent, EntityState, WorldState, check_absent, check_sequence,
    check_state,
};
use super::input::ScriptedInputs;
use super::parser::TestDefinition;

/// Frames to run when nothing in the scenario says how long
const DEFAULT_FRAMES: u64 = 60;

/// Result of running a test
#[derive(Debug)]
pub enum TestResult {
    Pass { frames: u64 },
    Fail { error: AssertionError },
    Error { message: String },
}

/// Run a single scenario and return the result
pub fn run_test(test: &TestDefinition, courses: &CourseDatabase) -> TestResult {
    let course = match &test.setup.layout {
        Some(layout) => layout.clone(),
        None => match courses.select(test.setup.course.as_deref()) {
            Ok(course) => course.clone(),
            Err(e) => {
                return TestResult::Error {
                    message: format!(
                        "{}. Available: {:?}",
                        e,
                        courses.names().collect::<Vec<_>>()
                    ),
                };
            }
        },
    };

    let mut builder = HeadlessAppBuilder::new().with_course(course).with_minimal_threads();
    if let Some(tuning) = &test.setup.tuning {
        builder = builder.with_tuning(tuning.clone());
    }
    let mut headless = HeadlessMatch::from_builder(builder);

    let mut scripted = ScriptedInputs::from_inputs(&test.input);
    for state in &test.expect.state {
        scripted.set_max_frame(state.after_frame);
    }
    for expected in &test.expect.sequence {
        if let Some(max) = expected.frame_max {
            scripted.set_max_frame(max);
        }
    }
    if scripted.max_frame == 0 {
        scripted.max_frame = DEFAULT_FRAMES;
    }

    let mut captured = Vec::new();

    while scripted.should_continue() {
        let frame = scripted.current_frame;
        let frame_input = scripted.advance_frame();
        frame_input.apply(&mut headless.input_mut());
        headless.step();

        captured.extend(
            headless
                .drain_events()
                .iter()
                .map(|e| CapturedEvent::from_match_event(frame, &e.event)),
        );

        let due: Vec<_> = test
            .expect
            .state
            .iter()
            .filter(|a| a.after_frame == frame)
            .collect();
        if due.is_empty() {
            continue;
        }
        let world_state = extract_world_state(&mut headless);
        for assertion in due {
            if let Err(error) = check_state(assertion, &world_state) {
                return TestResult::Fail { error };
            }
        }
    }

    if let Err(error) = check_sequence(&test.expect.sequence, &captured) {
        return TestResult::Fail { error };
    }
    if let Err(error) = check_absent(&test.expect.absent, &captured) {
        return TestResult::Fail { error };
    }

    TestResult::Pass {
        frames: scripted.current_frame,
    }
}

/// Extract world state for assertions
fn extract_world_state(headless: &mut HeadlessMatch) -> WorldState {
    let mut actors = HashMap::new();
    for role in [ActorRole::Runner, ActorRole::Chaser] {
        if let Some(actor) = headless.actor(role) {
            actors.insert(
                role.to_string(),
                EntityState {
                    x: actor.position.x,
                    y: actor.position.y,
                    velocity_x: actor.velocity.x,
                    velocity_y: actor.velocity.y,
                    grounded: actor.grounded,
                    crouching: actor.crouching,
                    kinematic: actor.kinematic,
                    dormant: actor.dormant,
                },
            );
        }
    }

    let state = headless.state();
    WorldState {
        phase: state.phase(),
        elapsed: state.elapsed(),
        buffer_len: headless.buffer_len(),
        actors,
    }
}
