//! Course module - database and spawning

mod database;
mod spawning;

pub use database::*;
pub use spawning::*;
