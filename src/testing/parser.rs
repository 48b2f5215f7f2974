//! TOML scenario file parsing

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::course::CourseDef;
use crate::error::{ChaseError, Result};
use crate::tuning::MovementTuning;

/// Complete scenario definition from a TOML file
#[derive(Debug, Deserialize)]
pub struct TestDefinition {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub setup: TestSetup,
    #[serde(default)]
    pub input: Vec<FrameInput>,
    #[serde(default)]
    pub expect: TestExpectations,
}

/// Which course and tuning the scenario runs on
#[derive(Debug, Default, Deserialize)]
pub struct TestSetup {
    /// Course name in the courses file (default: the first course)
    pub course: Option<String>,
    /// Inline course, takes precedence over `course`
    pub layout: Option<CourseDef>,
    /// Inline movement tuning (default: built-in values)
    pub tuning: Option<MovementTuning>,
}

/// Input change at a specific frame. Unset fields keep their previous value;
/// `jump` and `start` are single-frame presses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrameInput {
    pub frame: u64,
    #[serde(default)]
    pub move_x: Option<f32>,
    #[serde(default)]
    pub move_left: Option<bool>,
    #[serde(default)]
    pub move_right: Option<bool>,
    #[serde(default)]
    pub jump: Option<bool>,
    #[serde(default)]
    pub crouch: Option<bool>,
    #[serde(default)]
    pub start: Option<bool>,
}

impl FrameInput {
    /// Effective move_x, if this frame changes it
    pub fn effective_move_x(&self) -> Option<f32> {
        if let Some(x) = self.move_x {
            return Some(x);
        }
        if self.move_left.is_none() && self.move_right.is_none() {
            return None;
        }
        let mut x = 0.0;
        if self.move_left.unwrap_or(false) {
            x -= 1.0;
        }
        if self.move_right.unwrap_or(false) {
            x += 1.0;
        }
        Some(x)
    }
}

/// Expected scenario outcomes
#[derive(Debug, Default, Deserialize)]
pub struct TestExpectations {
    /// Events that must occur in this order (others may interleave)
    #[serde(default)]
    pub sequence: Vec<ExpectedEvent>,
    /// Events that must never occur
    #[serde(default)]
    pub absent: Vec<String>,
    /// State checks at given frames (uses [[expect.state]] TOML syntax)
    #[serde(default)]
    pub state: Vec<StateAssertion>,
}

/// Expected event in sequence
#[derive(Debug, Deserialize)]
pub struct ExpectedEvent {
    pub event: String,
    /// "runner" or "chaser" for powerup events
    pub role: Option<String>,
    pub frame_min: Option<u64>,
    pub frame_max: Option<u64>,
}

/// State checks evaluated after a frame has been stepped
#[derive(Debug, Clone, Deserialize)]
pub struct StateAssertion {
    pub after_frame: u64,
    #[serde(default)]
    pub checks: Vec<String>,
}

/// Parse a scenario from a string
pub fn parse_test(content: &str, path: &Path) -> Result<TestDefinition> {
    toml::from_str(content).map_err(|e| ChaseError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Parse a scenario file from path
pub fn parse_test_file(path: &Path) -> Result<TestDefinition> {
    let content = fs::read_to_string(path).map_err(|source| ChaseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_test(&content, path)
}
