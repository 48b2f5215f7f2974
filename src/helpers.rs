//! Utility functions for rewind_chase

use bevy::prelude::*;

use crate::constants::INPUT_EPSILON;

/// Move a value toward a target by a maximum delta
pub fn move_toward(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

/// True when the value counts as "no input"
pub fn is_neutral(value: f32) -> bool {
    value.abs() < INPUT_EPSILON
}

/// True when both inputs are held and point in opposite directions
pub fn sign_flipped(previous: f32, current: f32) -> bool {
    !is_neutral(previous) && !is_neutral(current) && previous.signum() != current.signum()
}

/// Format elapsed seconds as `MM:SS:CC` (minutes, seconds, hundredths)
pub fn format_elapsed(elapsed_secs: f32) -> String {
    let elapsed = elapsed_secs.max(0.0);
    let minutes = (elapsed / 60.0).floor() as u32;
    let seconds = (elapsed % 60.0).floor() as u32;
    let hundredths = ((elapsed * 100.0) % 100.0).floor() as u32;
    format!("{:02}:{:02}:{:02}", minutes, seconds, hundredths)
}

/// Axis-aligned box overlap test (centres and full sizes)
pub fn boxes_overlap(a_center: Vec2, a_size: Vec2, b_center: Vec2, b_size: Vec2) -> bool {
    let diff = (a_center - b_center).abs();
    let reach = (a_size + b_size) / 2.0;
    diff.x < reach.x && diff.y < reach.y
}
