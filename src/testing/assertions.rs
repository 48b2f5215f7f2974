//! Assertion checking for scenario expectations

use std::collections::HashMap;

use super::parser::{ExpectedEvent, StateAssertion};
use crate::events::MatchEvent;
use crate::match_state::MatchPhase;

/// Error when an assertion fails
#[derive(Debug)]
pub struct AssertionError {
    pub message: String,
    pub expected: String,
    pub actual: String,
}

impl std::fmt::Display for AssertionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\n    Expected: {}\n    Actual: {}", self.message, self.expected, self.actual)
    }
}

/// Captured event with timing info
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub frame: u64,
    pub event_type: String,
    pub role: Option<String>,
}

impl CapturedEvent {
    pub fn from_match_event(frame: u64, event: &MatchEvent) -> Self {
        let role = match event {
            MatchEvent::PowerupActivated { role, .. } | MatchEvent::PowerupExpired { role, .. } => {
                Some(role.to_string())
            }
            _ => None,
        };
        Self {
            frame,
            event_type: event.name().to_string(),
            role,
        }
    }
}

/// Check if captured events match the expected sequence
pub fn check_sequence(expected: &[ExpectedEvent], captured: &[CapturedEvent]) -> Result<(), AssertionError> {
    let mut captured_idx = 0;

    for (i, exp) in expected.iter().enumerate() {
        // Find matching event starting from current position
        let found = captured[captured_idx..].iter().enumerate().find(|(_, cap)| {
            cap.event_type == exp.event
                && exp.role.as_ref().is_none_or(|role| cap.role.as_ref() == Some(role))
        });

        let Some((offset, cap)) = found else {
            let role_str = exp.role.as_ref().map(|r| format!(" (role: {})", r)).unwrap_or_default();
            return Err(AssertionError {
                message: format!("Event #{} '{}'{} not found", i + 1, exp.event, role_str),
                expected: format!("'{}' event in sequence", exp.event),
                actual: format!(
                    "events after position {}: {:?}",
                    captured_idx,
                    captured[captured_idx..].iter().map(|e| &e.event_type).collect::<Vec<_>>()
                ),
            });
        };

        if let Some(min) = exp.frame_min
            && cap.frame < min
        {
            return Err(AssertionError {
                message: format!("Event #{} '{}' occurred too early", i + 1, exp.event),
                expected: format!("frame >= {}", min),
                actual: format!("frame {}", cap.frame),
            });
        }
        if let Some(max) = exp.frame_max
            && cap.frame > max
        {
            return Err(AssertionError {
                message: format!("Event #{} '{}' occurred too late", i + 1, exp.event),
                expected: format!("frame <= {}", max),
                actual: format!("frame {}", cap.frame),
            });
        }
        captured_idx += offset + 1;
    }

    Ok(())
}

/// Fail if any forbidden event was captured
pub fn check_absent(forbidden: &[String], captured: &[CapturedEvent]) -> Result<(), AssertionError> {
    for name in forbidden {
        if let Some(cap) = captured.iter().find(|c| &c.event_type == name) {
            return Err(AssertionError {
                message: format!("Forbidden event '{}' occurred", name),
                expected: format!("no '{}' event", name),
                actual: format!("frame {}", cap.frame),
            });
        }
    }
    Ok(())
}

/// World state for assertions
#[derive(Debug, Clone)]
pub struct WorldState {
    pub phase: MatchPhase,
    pub elapsed: f32,
    pub buffer_len: usize,
    /// Keyed by role name ("runner", "chaser")
    pub actors: HashMap<String, EntityState>,
}

#[derive(Debug, Clone, Copy)]
pub struct EntityState {
    pub x: f32,
    pub y: f32,
    pub velocity_x: f32,
    pub velocity_y: f32,
    pub grounded: bool,
    pub crouching: bool,
    pub kinematic: bool,
    pub dormant: bool,
}

/// Parse a check string into (path, operator, value)
fn parse_check(check: &str) -> Option<(&str, &str, &str)> {
    // Try operators in order of specificity (== before =, >= before >, etc.)
    for op in &["==", ">=", "<=", "!=", "=", ">", "<"] {
        if let Some(idx) = check.find(op) {
            let path = check[..idx].trim();
            let value = check[idx + op.len()..].trim();
            return Some((path, op, value));
        }
    }
    None
}

/// Check state assertions against world state
pub fn check_state(assertion: &StateAssertion, state: &WorldState) -> Result<(), AssertionError> {
    for check in &assertion.checks {
        let (path, operator, expected_value) = parse_check(check).ok_or_else(|| AssertionError {
            message: format!("Invalid check syntax: {}", check),
            expected: "format: 'entity.property = value' or 'entity.property > value'".to_string(),
            actual: check.clone(),
        })?;

        let path_parts: Vec<&str> = path.split('.').collect();

        match path_parts.as_slice() {
            ["phase"] => {
                let expected = MatchPhase::from_str(expected_value).ok_or_else(|| AssertionError {
                    message: format!("Unknown phase in: {}", check),
                    expected: "Idle | Running | Rewinding | Won | Lost".to_string(),
                    actual: expected_value.to_string(),
                })?;
                let equal = state.phase == expected;
                let pass = if operator == "!=" { !equal } else { equal };
                if !pass {
                    return Err(AssertionError {
                        message: format!("Phase check failed: {}", check),
                        expected: format!("phase {} {:?}", operator, expected),
                        actual: format!("{:?}", state.phase),
                    });
                }
            }
            ["buffer", "len"] => {
                check_float_comparison(path, state.buffer_len as f32, operator, expected_value)?
            }
            ["timer", "elapsed"] => {
                check_float_comparison(path, state.elapsed, operator, expected_value)?
            }
            [entity_id, property] => {
                let entity = state.actors.get(*entity_id).ok_or_else(|| AssertionError {
                    message: format!("Entity '{}' not found", entity_id),
                    expected: format!("entity '{}'", entity_id),
                    actual: format!("available: {:?}", state.actors.keys().collect::<Vec<_>>()),
                })?;

                match *property {
                    "x" => check_float_comparison(path, entity.x, operator, expected_value)?,
                    "y" => check_float_comparison(path, entity.y, operator, expected_value)?,
                    "velocity_x" => check_float_comparison(path, entity.velocity_x, operator, expected_value)?,
                    "velocity_y" => check_float_comparison(path, entity.velocity_y, operator, expected_value)?,
                    "grounded" => check_bool(check, entity.grounded, expected_value)?,
                    "crouching" => check_bool(check, entity.crouching, expected_value)?,
                    "kinematic" => check_bool(check, entity.kinematic, expected_value)?,
                    "dormant" => check_bool(check, entity.dormant, expected_value)?,
                    other => {
                        return Err(AssertionError {
                            message: format!("Unknown property '{}' in: {}", other, check),
                            expected: "x, y, velocity_x, velocity_y, grounded, crouching, kinematic, dormant".to_string(),
                            actual: other.to_string(),
                        });
                    }
                }
            }
            _ => {
                return Err(AssertionError {
                    message: format!("Unknown check path: {}", path),
                    expected: "phase, buffer.len, timer.elapsed or <role>.<property>".to_string(),
                    actual: path.to_string(),
                });
            }
        }
    }

    Ok(())
}

fn check_bool(check: &str, actual: bool, expected_value: &str) -> Result<(), AssertionError> {
    let expected = expected_value == "true";
    if actual != expected {
        return Err(AssertionError {
            message: format!("Check failed: {}", check),
            expected: expected_value.to_string(),
            actual: actual.to_string(),
        });
    }
    Ok(())
}

/// Check float comparison with operator
fn check_float_comparison(path: &str, actual: f32, operator: &str, expected_str: &str) -> Result<(), AssertionError> {
    let value: f32 = expected_str.trim().parse().map_err(|_| AssertionError {
        message: format!("Invalid value for {}", path),
        expected: "number".to_string(),
        actual: expected_str.to_string(),
    })?;

    let pass = match operator {
        ">=" => actual >= value,
        "<=" => actual <= value,
        ">" => actual > value,
        "<" => actual < value,
        "=" | "==" => (actual - value).abs() < 0.01,
        "!=" => (actual - value).abs() >= 0.01,
        _ => true, // Unknown operator, pass by default
    };

    if !pass {
        return Err(AssertionError {
            message: format!("Check failed: {} {} {} (actual: {:.2})", path, operator, expected_str, actual),
            expected: format!("{} {} {}", path, operator, value),
            actual: format!("{:.2}", actual),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> WorldState {
        let mut actors = HashMap::new();
        actors.insert(
            "runner".to_string(),
            EntityState {
                x: 3.5,
                y: 0.99,
                velocity_x: 8.0,
                velocity_y: 0.0,
                grounded: true,
                crouching: false,
                kinematic: true,
                dormant: false,
            },
        );
        WorldState {
            phase: MatchPhase::Rewinding,
            elapsed: 2.4,
            buffer_len: 0,
            actors,
        }
    }

    fn assertion(checks: &[&str]) -> StateAssertion {
        StateAssertion {
            after_frame: 0,
            checks: checks.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn test_state_checks_pass() {
        let checks = assertion(&[
            "runner.x > 3.0",
            "phase == Rewinding",
            "buffer.len == 0",
            "timer.elapsed >= 2.4",
            "runner.kinematic = true",
        ]);
        assert!(check_state(&checks, &state()).is_ok());
    }

    #[test]
    fn test_state_checks_fail() {
        assert!(check_state(&assertion(&["phase == Won"]), &state()).is_err());
        assert!(check_state(&assertion(&["runner.x < 3.0"]), &state()).is_err());
        assert!(check_state(&assertion(&["chaser.x > 0"]), &state()).is_err());
        assert!(check_state(&assertion(&["runner.speed > 0"]), &state()).is_err());
    }

    #[test]
    fn test_sequence_allows_interleaving_but_keeps_order() {
        let captured: Vec<_> = ["Started", "PowerupActivated", "FinishReached", "Lost"]
            .iter()
            .enumerate()
            .map(|(i, name)| CapturedEvent {
                frame: i as u64 * 10,
                event_type: name.to_string(),
                role: None,
            })
            .collect();

        let expect = |names: &[&str]| -> Vec<ExpectedEvent> {
            names
                .iter()
                .map(|n| ExpectedEvent {
                    event: n.to_string(),
                    role: None,
                    frame_min: None,
                    frame_max: None,
                })
                .collect()
        };

        assert!(check_sequence(&expect(&["Started", "Lost"]), &captured).is_ok());
        assert!(check_sequence(&expect(&["Lost", "Started"]), &captured).is_err());
        assert!(check_absent(&["Won".to_string()], &captured).is_ok());
        assert!(check_absent(&["Lost".to_string()], &captured).is_err());
    }
}
