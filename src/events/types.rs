//! Event type definitions

use serde::{Deserialize, Serialize};

use crate::player::ActorRole;
use crate::powerup::PowerupKind;

/// Everything the match reports to observers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatchEvent {
    /// Start signal accepted
    Started,
    /// Runner crossed the finish boundary; timer stopped
    FinishReached { elapsed: f32, samples: usize },
    /// Replay of the runner began
    RewindStarted { samples: usize },
    /// Chaser caught the runner
    Won { elapsed: f32, formatted: String },
    /// Replay ran out while the match was active
    Lost { elapsed: f32 },
    PowerupActivated { role: ActorRole, kind: PowerupKind },
    PowerupExpired { role: ActorRole, kind: PowerupKind },
}

impl MatchEvent {
    /// Short name used by scenario expectations
    pub fn name(&self) -> &'static str {
        match self {
            MatchEvent::Started => "Started",
            MatchEvent::FinishReached { .. } => "FinishReached",
            MatchEvent::RewindStarted { .. } => "RewindStarted",
            MatchEvent::Won { .. } => "Won",
            MatchEvent::Lost { .. } => "Lost",
            MatchEvent::PowerupActivated { .. } => "PowerupActivated",
            MatchEvent::PowerupExpired { .. } => "PowerupExpired",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, MatchEvent::Won { .. } | MatchEvent::Lost { .. })
    }
}
