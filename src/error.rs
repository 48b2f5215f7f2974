//! Error types shared by config loading and match transitions

use std::path::PathBuf;

use thiserror::Error;

use crate::match_state::MatchPhase;

#[derive(Debug, Error)]
pub enum ChaseError {
    /// A match event arrived in a phase that does not accept it
    #[error("cannot {event} while match is {phase:?}")]
    InvalidTransition {
        phase: MatchPhase,
        event: &'static str,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Scene omission found during startup validation
    #[error("missing setup reference: {0}")]
    MissingReference(&'static str),

    #[error("unknown course '{0}'")]
    UnknownCourse(String),

    #[error("failed to start worker threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T, E = ChaseError> = std::result::Result<T, E>;
