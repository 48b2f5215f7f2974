//! Scenario testing for deterministic match checks
//!
//! Runs scripted input against the headless match and checks the emitted
//! events and actor state against TOML expectations.

pub mod assertions;
pub mod input;
pub mod parser;
pub mod runner;

pub use assertions::{AssertionError, CapturedEvent, check_absent, check_sequence, check_state};
pub use input::ScriptedInputs;
pub use parser::{
    ExpectedEvent, FrameInput, StateAssertion, TestDefinition, TestExpectations, TestSetup,
    parse_test, parse_test_file,
};
pub use runner::{TestResult, run_test};

/// Default path for test scenarios
pub const SCENARIOS_DIR: &str = "tests/scenarios";
