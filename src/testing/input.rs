//! Scripted input injection for scenarios

use std::collections::HashMap;

use super::parser::FrameInput;
use crate::input::PlayerInput;

/// Holds scripted inputs for a scenario and replays them frame by frame
#[derive(Debug, Default)]
pub struct ScriptedInputs {
    /// Map of frame -> input change
    pub frames: HashMap<u64, FrameInput>,
    /// Held state (persists between frames)
    pub current_state: CurrentInputState,
    /// Current frame number
    pub current_frame: u64,
    /// Maximum frame to run
    pub max_frame: u64,
}

/// Input for one frame, with held values carried over
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CurrentInputState {
    pub move_x: f32,
    pub crouch_held: bool,
    pub jump_pressed: bool,
    pub start_pressed: bool,
}

impl CurrentInputState {
    /// Copy into the input resource. Presses only ever set flags, the
    /// consuming systems clear them.
    pub fn apply(&self, input: &mut PlayerInput) {
        input.move_x = self.move_x;
        input.crouch_held = self.crouch_held;
        if self.jump_pressed {
            input.jump_pressed = true;
        }
        if self.start_pressed {
            input.start_pressed = true;
        }
    }
}

impl ScriptedInputs {
    pub fn from_inputs(inputs: &[FrameInput]) -> Self {
        let mut frames = HashMap::new();
        let mut max_frame = 0u64;

        for fi in inputs {
            max_frame = max_frame.max(fi.frame);
            frames.insert(fi.frame, fi.clone());
        }

        Self {
            frames,
            current_state: CurrentInputState::default(),
            current_frame: 0,
            max_frame,
        }
    }

    /// Extend the run so later assertions get evaluated
    pub fn set_max_frame(&mut self, frame: u64) {
        self.max_frame = self.max_frame.max(frame);
    }

    /// Advance to the next frame and return its input
    pub fn advance_frame(&mut self) -> CurrentInputState {
        let state = &mut self.current_state;
        state.jump_pressed = false;
        state.start_pressed = false;

        if let Some(change) = self.frames.get(&self.current_frame) {
            if let Some(x) = change.effective_move_x() {
                state.move_x = x;
            }
            if let Some(crouch) = change.crouch {
                state.crouch_held = crouch;
            }
            state.jump_pressed = change.jump.unwrap_or(false);
            state.start_pressed = change.start.unwrap_or(false);
        }

        self.current_frame += 1;
        *state
    }

    /// Check if the scenario should keep stepping
    pub fn should_continue(&self) -> bool {
        self.current_frame <= self.max_frame
    }
}
