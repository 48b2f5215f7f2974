//! Match events observed by the UI layer, tools and tests
//!
//! The MatchEventBus replaces engine-style callbacks: match logic pushes events,
//! observers peek or drain them on their own schedule. Terminal events are pushed
//! at most once per match because `MatchState` only yields them on a real transition.

mod bus;
mod types;

pub use bus::{BusEvent, MatchEventBus, update_event_bus_time};
pub use types::MatchEvent;
