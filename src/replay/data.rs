//! Recorded frame data

use bevy::prelude::*;

/// Physical state of the runner at one fixed tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSample {
    pub position: Vec2,
    pub velocity: Vec2,
    pub crouching: bool,
    /// Duration of the tick this sample was taken in (seconds)
    pub tick_duration: f32,
}

/// Chronological recording. Append-only while running, read sequentially
/// while rewinding, cleared when the replay completes or a match starts.
#[derive(Resource, Debug, Default)]
pub struct FrameBuffer {
    samples: Vec<FrameSample>,
}

impl FrameBuffer {
    pub fn push(&mut self, sample: FrameSample) {
        self.samples.push(sample);
    }

    pub fn get(&self, index: usize) -> Option<&FrameSample> {
        self.samples.get(index)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FrameSample> {
        self.samples.iter()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl FromIterator<FrameSample> for FrameBuffer {
    fn from_iter<I: IntoIterator<Item = FrameSample>>(iter: I) -> Self {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}
