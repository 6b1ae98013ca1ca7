//! Preferences contract and the document every store keeps.

use std::collections::BTreeMap;
use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::Difficulty;

/// Async key-value preferences consumed by the game engine
///
/// Implementations must enforce keep-minimum on [`save_best_score`]: a score
/// is only written when it is lower than the stored one.
///
/// [`save_best_score`]: PreferencesStore::save_best_score
pub trait PreferencesStore: Send + Sync + 'static {
    /// Best score for `difficulty`, `None` when nothing was recorded
    fn best_score(&self, difficulty: Difficulty)
        -> impl Future<Output = Result<Option<u32>>> + Send;

    fn save_best_score(
        &self,
        difficulty: Difficulty,
        score: u32,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Last chosen difficulty, [`Difficulty::Medium`] when never saved
    fn selected_difficulty(&self) -> impl Future<Output = Result<Difficulty>> + Send;

    fn save_difficulty(&self, difficulty: Difficulty) -> impl Future<Output = Result<()>> + Send;
}

/// Stored preferences
///
/// Serialized as:
///
/// ```json
/// { "selected_difficulty": "hard", "best_scores": { "easy": 6, "hard": 19 } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_difficulty: Option<Difficulty>,
    #[serde(default)]
    pub best_scores: BTreeMap<Difficulty, u32>,
}

impl Preferences {
    pub fn best_score(&self, difficulty: Difficulty) -> Option<u32> {
        self.best_scores.get(&difficulty).copied()
    }

    pub fn selected_difficulty(&self) -> Difficulty {
        self.selected_difficulty.unwrap_or_default()
    }

    /// Record `score` if it beats the stored best. Returns whether it was written.
    pub fn record_best_score(&mut self, difficulty: Difficulty, score: u32) -> bool {
        match self.best_scores.get(&difficulty) {
            Some(&best) if best <= score => false,
            _ => {
                self.best_scores.insert(difficulty, score);
                true
            }
        }
    }

    /// Record the chosen difficulty. Returns whether it changed.
    pub fn record_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if self.selected_difficulty == Some(difficulty) {
            return false;
        }
        self.selected_difficulty = Some(difficulty);
        true
    }
}
