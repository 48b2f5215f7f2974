//! Results of headless matches

use serde::{Deserialize, Serialize};

use crate::match_state::MatchPhase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    Won,
    Lost,
    /// Tick limit hit before the match was decided
    Unfinished,
}

impl From<MatchPhase> for MatchOutcome {
    fn from(phase: MatchPhase) -> Self {
        match phase {
            MatchPhase::Won => MatchOutcome::Won,
            MatchPhase::Lost => MatchOutcome::Lost,
            MatchPhase::Idle | MatchPhase::Running | MatchPhase::Rewinding => {
                MatchOutcome::Unfinished
            }
        }
    }
}

/// Result of a single match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub course: String,
    pub outcome: MatchOutcome,
    /// Running time in seconds (timer stops at the finish)
    pub elapsed: f32,
    /// `MM:SS:CC`
    pub formatted_time: String,
    /// Fixed ticks stepped
    pub ticks: u32,
    /// Largest recording seen during the match
    pub samples_recorded: usize,
    /// RNG seed for reproducibility (scripted runs have none)
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Aggregate over a batch of matches
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    pub runs: u32,
    pub wins: u32,
    pub losses: u32,
    pub unfinished: u32,
    /// Fastest finish among won matches
    pub best_win_time: Option<f32>,
    pub avg_samples: f32,
}

impl BatchSummary {
    pub fn from_results(results: &[MatchResult]) -> Self {
        let mut summary = Self {
            runs: results.len() as u32,
            ..Default::default()
        };
        let mut total_samples = 0usize;

        for result in results {
            total_samples += result.samples_recorded;
            match result.outcome {
                MatchOutcome::Won => {
                    summary.wins += 1;
                    summary.best_win_time = Some(
                        summary
                            .best_win_time
                            .map_or(result.elapsed, |best| best.min(result.elapsed)),
                    );
                }
                MatchOutcome::Lost => summary.losses += 1,
                MatchOutcome::Unfinished => summary.unfinished += 1,
            }
        }

        if !results.is_empty() {
            summary.avg_samples = total_samples as f32 / results.len() as f32;
        }
        summary
    }

    pub fn win_rate(&self) -> f32 {
        if self.runs == 0 {
            0.0
        } else {
            self.wins as f32 / self.runs as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(outcome: MatchOutcome, elapsed: f32, samples: usize) -> MatchResult {
        MatchResult {
            course: "test".to_string(),
            outcome,
            elapsed,
            formatted_time: String::new(),
            ticks: 0,
            samples_recorded: samples,
            seed: None,
        }
    }

    #[test]
    fn test_batch_summary() {
        let results = [
            result(MatchOutcome::Won, 3.0, 100),
            result(MatchOutcome::Won, 2.5, 120),
            result(MatchOutcome::Lost, 4.0, 200),
            result(MatchOutcome::Unfinished, 10.0, 0),
        ];
        let summary = BatchSummary::from_results(&results);
        assert_eq!(summary.runs, 4);
        assert_eq!(summary.wins, 2);
        assert_eq!(summary.losses, 1);
        assert_eq!(summary.unfinished, 1);
        assert_eq!(summary.best_win_time, Some(2.5));
        assert_eq!(summary.avg_samples, 105.0);
        assert_eq!(summary.win_rate(), 0.5);
    }

    #[test]
    fn test_result_serializes_outcome() {
        let json = serde_json::to_string(&result(MatchOutcome::Lost, 1.0, 3)).unwrap();
        assert!(json.contains("\"outcome\":\"Lost\""));
    }
}
