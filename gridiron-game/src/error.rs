//! Error types for engine operations and persistence.
use thiserror::Error;

use crate::season::SeasonPhase;

/// Caller-side invariant violations. None of these leave the career changed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("career is over: the coach was fired")]
    CareerOver,
    #[error("no season is in progress")]
    NoSeason,
    #[error("{label} has already been played")]
    GameAlreadyPlayed { label: String },
    #[error("no unplayed game remains in the {phase} phase")]
    NoGameRemaining { phase: SeasonPhase },
    #[error("no side choice is pending")]
    NoPendingChoice,
    #[error("operation is not valid during the {phase} phase")]
    WrongPhase { phase: SeasonPhase },
}

/// Failures reading or writing a saved career.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("snapshot is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("snapshot version {found} is not supported (expected {expected})")]
    Version { found: u32, expected: u32 },
    #[error("storage backend failed: {0}")]
    Backend(String),
}
