//! Versioned save format for a career.
use serde::{Deserialize, Serialize};

use crate::career::CareerState;
use crate::constants::SNAPSHOT_VERSION;
use crate::error::StorageError;

/// On-disk wrapper around a [`CareerState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareerSnapshot {
    pub version: u32,
    pub career: CareerState,
}

impl CareerSnapshot {
    #[must_use]
    pub fn capture(career: &CareerState) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            career: career.clone(),
        }
    }

    /// Serialize to the JSON stored under the save key.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a stored snapshot, rejecting other format versions.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Parse`] for malformed JSON and
    /// [`StorageError::Version`] for a snapshot written by another format.
    pub fn from_json(json: &str) -> Result<Self, StorageError> {
        let snapshot: Self = serde_json::from_str(json)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(StorageError::Version {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        Ok(snapshot)
    }

    #[must_use]
    pub fn into_career(self) -> CareerState {
        self.career
    }
}
