//! UI module - HUD text for the windowed binary

mod hud;

pub use hud::*;
