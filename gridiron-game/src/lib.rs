//! Gridiron Game Engine
//!
//! Platform-agnostic core for a dice-driven high school football coaching
//! career: game scoring, the season and playoff state machine, and the
//! advantage economy that links one season to the next. Rendering, input
//! collection and storage backends live outside this crate.

pub mod advantage;
pub mod career;
pub mod config;
pub mod constants;
pub mod dice;
pub mod error;
pub mod game;
pub mod narration;
pub mod score;
pub mod season;
pub mod snapshot;
pub mod tiebreak;
pub mod view;

// Re-export commonly used types
pub use advantage::{
    Advantage, PreseasonRoll, PreseasonVerdict, RetentionDecision, RetentionInput, Side,
    evaluate_retention, roll_preseason,
};
pub use career::{AdvanceOutcome, CareerState, SeasonClose};
pub use config::CareerConfig;
pub use dice::{DicePair, DiceSource, ExplodingRoll, ScriptedDice, SeededDice};
pub use error::{EngineError, StorageError};
pub use game::{Game, GameKind, GameReport, GameResult, resolve_game};
pub use narration::NarrationLog;
pub use score::{ScoreContext, Team, TeamScore, resolve_team_score};
pub use season::{Season, SeasonPhase, SeasonStep};
pub use snapshot::CareerSnapshot;
pub use tiebreak::{TieBreak, break_tie};
pub use view::CareerView;

use constants::STORAGE_KEY;

/// Trait for abstracting save/load of serialized careers.
/// Platform-specific implementations should provide this
pub trait CareerStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Store `contents` under `key`, replacing any earlier save
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    fn save_snapshot(&self, key: &str, contents: &str) -> Result<(), Self::Error>;

    /// Read the snapshot stored under `key`, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn load_snapshot(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Delete the snapshot stored under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    fn delete_snapshot(&self, key: &str) -> Result<(), Self::Error>;
}

/// Outcome of a fire-and-forget save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    Saved,
    Failed(String),
}

impl SaveStatus {
    #[must_use]
    pub const fn is_saved(&self) -> bool {
        matches!(self, Self::Saved)
    }
}

/// Engine facade tying a career to its storage backend
pub struct CareerEngine<S>
where
    S: CareerStorage,
{
    storage: S,
    key: String,
}

impl<S> CareerEngine<S>
where
    S: CareerStorage,
{
    /// Create an engine that saves under the standard key
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, STORAGE_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Load the saved career without any fallback
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails or the snapshot cannot be parsed.
    pub fn load(&self) -> Result<Option<CareerState>, StorageError> {
        let raw = self
            .storage
            .load_snapshot(&self.key)
            .map_err(|err| StorageError::Backend(err.to_string()))?;
        raw.map(|json| CareerSnapshot::from_json(&json).map(CareerSnapshot::into_career))
            .transpose()
    }

    /// Load the saved career, or start a fresh one when there is none or it is
    /// unreadable. A saved career with no season yet gets its first season.
    pub fn load_or_new<D>(&self, config: &CareerConfig, dice: &mut D) -> CareerState
    where
        D: DiceSource + ?Sized,
    {
        match self.load() {
            Ok(Some(mut career)) => {
                if career.season.is_none() && !career.fired {
                    if let Err(err) = career.begin_season(dice) {
                        log::warn!("saved career under {} cannot open a season: {err}", self.key);
                    }
                }
                career
            }
            Ok(None) => CareerState::start(config, dice),
            Err(err) => {
                log::warn!("discarding saved career under {}: {err}", self.key);
                CareerState::start(config, dice)
            }
        }
    }

    /// Save the career. Failures are reported, never raised.
    pub fn persist(&self, career: &CareerState) -> SaveStatus {
        let result = CareerSnapshot::capture(career)
            .to_json()
            .and_then(|json| {
                self.storage
                    .save_snapshot(&self.key, &json)
                    .map_err(|err| StorageError::Backend(err.to_string()))
            });
        match result {
            Ok(()) => SaveStatus::Saved,
            Err(err) => {
                log::warn!("save under {} failed: {err}", self.key);
                SaveStatus::Failed(err.to_string())
            }
        }
    }

    /// Remove the saved career
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot delete the save.
    pub fn discard(&self) -> Result<(), StorageError> {
        self.storage
            .delete_snapshot(&self.key)
            .map_err(|err| StorageError::Backend(err.to_string()))
    }
}
