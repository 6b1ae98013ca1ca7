use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::Result;
use crate::store::{Preferences, PreferencesStore};
use crate::types::Difficulty;

/// In-process preferences
///
/// Clones share the same document, so a test can keep a handle while the
/// engine owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    inner: Arc<Mutex<Preferences>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preferences(prefs: Preferences) -> Self {
        Self {
            inner: Arc::new(Mutex::new(prefs)),
        }
    }

    /// Copy of the current document
    pub fn preferences(&self) -> Preferences {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Preferences> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PreferencesStore for MemoryPreferences {
    async fn best_score(&self, difficulty: Difficulty) -> Result<Option<u32>> {
        Ok(self.lock().best_score(difficulty))
    }

    async fn save_best_score(&self, difficulty: Difficulty, score: u32) -> Result<()> {
        self.lock().record_best_score(difficulty, score);
        Ok(())
    }

    async fn selected_difficulty(&self) -> Result<Difficulty> {
        Ok(self.lock().selected_difficulty())
    }

    async fn save_difficulty(&self, difficulty: Difficulty) -> Result<()> {
        self.lock().record_difficulty(difficulty);
        Ok(())
    }
}
