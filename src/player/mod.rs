//! Player module - actor components, motion model and physics systems

mod components;
mod motion;
mod physics;

pub use components::*;
pub use motion::*;
pub use physics::*;
