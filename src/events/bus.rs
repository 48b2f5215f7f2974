//! Match event bus - hub between match logic and its observers
//!
//! Systems emit events to the bus; the HUD, the headless runner and the
//! scenario harness consume them.

use bevy::prelude::*;

use super::types::MatchEvent;

/// Event stamped with the app time it was emitted at
#[derive(Debug, Clone)]
pub struct BusEvent {
    pub time_ms: u32,
    pub event: MatchEvent,
}

/// Match events, split into not-yet-consumed and consumed.
/// The consumed log is kept for the whole match.
#[derive(Resource, Default)]
pub struct MatchEventBus {
    pending: Vec<BusEvent>,
    consumed: Vec<BusEvent>,
    now_ms: u32,
}

impl MatchEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_time(&mut self, elapsed_secs: f32) {
        self.now_ms = (elapsed_secs * 1000.0) as u32;
    }

    pub fn emit(&mut self, event: MatchEvent) {
        debug!("match event {} at {}ms", event.name(), self.now_ms);
        self.pending.push(BusEvent {
            time_ms: self.now_ms,
            event,
        });
    }

    /// Hand out pending events; they move to the consumed log
    pub fn drain(&mut self) -> Vec<BusEvent> {
        let events = std::mem::take(&mut self.pending);
        self.consumed.extend(events.iter().cloned());
        events
    }

    /// Every event seen so far, consumed or not, oldest first
    pub fn history(&self) -> impl Iterator<Item = &BusEvent> {
        self.consumed.iter().chain(self.pending.iter())
    }

    /// The Won or Lost event, once the match has produced one
    pub fn terminal(&self) -> Option<&MatchEvent> {
        self.history().map(|e| &e.event).find(|e| e.is_terminal())
    }
}

/// Keep bus timestamps in step with the app clock (Update)
pub fn update_event_bus_time(mut bus: ResMut<MatchEventBus>, time: Res<Time>) {
    bus.update_time(time.elapsed_secs());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_stamps_and_moves_to_history() {
        let mut bus = MatchEventBus::new();
        bus.update_time(1.5);
        bus.emit(MatchEvent::Started);

        let events = bus.drain();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].time_ms, 1500);
        assert!(bus.drain().is_empty());
        assert_eq!(bus.history().count(), 1);
    }

    #[test]
    fn test_history_spans_consumed_and_pending() {
        let mut bus = MatchEventBus::new();
        bus.emit(MatchEvent::Started);
        bus.drain();
        assert!(bus.terminal().is_none());
        bus.emit(MatchEvent::Lost { elapsed: 4.0 });

        let names: Vec<_> = bus.history().map(|e| e.event.name()).collect();
        assert_eq!(names, vec!["Started", "Lost"]);
        assert_eq!(bus.terminal(), Some(&MatchEvent::Lost { elapsed: 4.0 }));
    }
}
