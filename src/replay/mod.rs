//! Record and replay of the runner's movement.
//!
//! While the match is running, the runner's physical state is sampled once per
//! fixed tick. When the runner crosses the finish, the same body is teleported to
//! the start and driven through the samples one per tick while the chaser hunts it.

mod data;
mod state;
mod systems;

pub use data::{FrameBuffer, FrameSample};
pub use state::{ReplayDriver, ReplayStep};
pub use systems::{begin_rewind, record_frames, replay_step};
