//! Replay cursor

use bevy::prelude::*;

use super::data::{FrameBuffer, FrameSample};

/// Outcome of one replay tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReplayStep {
    /// Not replaying
    Idle,
    /// Apply this sample to the replayed body
    Sample(FrameSample),
    /// Every sample has been consumed
    Exhausted,
}

/// Resumable replay: holds its own cursor and hands out one sample per call
#[derive(Resource, Debug, Default)]
pub struct ReplayDriver {
    active: bool,
    cursor: usize,
}

impl ReplayDriver {
    /// Arm the driver at the start of the buffer
    pub fn begin(&mut self) {
        self.active = true;
        self.cursor = 0;
    }

    /// Advance one tick. Never yields more than one sample per call.
    pub fn step(&mut self, buffer: &FrameBuffer) -> ReplayStep {
        if !self.active {
            return ReplayStep::Idle;
        }
        match buffer.get(self.cursor) {
            Some(sample) => {
                self.cursor += 1;
                ReplayStep::Sample(*sample)
            }
            None => ReplayStep::Exhausted,
        }
    }

    /// Disarm and rewind the cursor
    pub fn finish(&mut self) {
        self.active = false;
        self.cursor = 0;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Samples consumed so far
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}
