//! JSON file preferences.
//!
//! The whole document is cached in memory and written through on every
//! change. Writes go to a sibling temp file that is then renamed over the
//! target, so a crash mid-write leaves the previous document intact. The
//! cache never runs ahead of the file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use crate::error::Result;
use crate::store::{Preferences, PreferencesStore};
use crate::types::Difficulty;

/// Environment variable naming the preferences file
pub const PREFS_PATH_ENV: &str = "MIND_PAIRS_PREFS_PATH";

/// File used when [`PREFS_PATH_ENV`] is unset
pub const DEFAULT_PREFS_FILE: &str = "mind_pairs_prefs.json";

#[derive(Debug)]
pub struct JsonFilePreferences {
    path: PathBuf,
    cache: Mutex<Preferences>,
}

impl JsonFilePreferences {
    /// Open the document at `path`
    ///
    /// A missing file is an empty document. A file that does not parse is
    /// logged and replaced on the next write; other I/O errors are returned.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let prefs = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<Preferences>(&bytes) {
                Ok(prefs) => prefs,
                Err(e) => {
                    log::warn!(
                        "ignoring malformed preferences at {}: {}",
                        path.display(),
                        e
                    );
                    Preferences::default()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Preferences::default(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            cache: Mutex::new(prefs),
        })
    }

    /// Open the file named by `MIND_PAIRS_PREFS_PATH`, or the default file
    pub async fn from_env() -> Result<Self> {
        let path = std::env::var(PREFS_PATH_ENV)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_PREFS_FILE.to_string());
        Self::open(path).await
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy of the cached document
    pub async fn preferences(&self) -> Preferences {
        self.cache.lock().await.clone()
    }

    /// Apply `change` to a copy of the document and write it through
    ///
    /// The cache only takes the copy once it is on disk, so a failed write
    /// is retried by the next save of the same value.
    async fn update(&self, change: impl FnOnce(&mut Preferences) -> bool) -> Result<()> {
        let mut cache = self.cache.lock().await;
        let mut next = cache.clone();
        if change(&mut next) {
            self.persist(&next).await?;
            *cache = next;
        }
        Ok(())
    }

    async fn persist(&self, prefs: &Preferences) -> Result<()> {
        let json = serde_json::to_vec_pretty(prefs)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

impl PreferencesStore for JsonFilePreferences {
    async fn best_score(&self, difficulty: Difficulty) -> Result<Option<u32>> {
        Ok(self.cache.lock().await.best_score(difficulty))
    }

    async fn save_best_score(&self, difficulty: Difficulty, score: u32) -> Result<()> {
        self.update(|prefs| prefs.record_best_score(difficulty, score))
            .await
    }

    async fn selected_difficulty(&self) -> Result<Difficulty> {
        Ok(self.cache.lock().await.selected_difficulty())
    }

    async fn save_difficulty(&self, difficulty: Difficulty) -> Result<()> {
        self.update(|prefs| prefs.record_difficulty(difficulty)).await
    }
}
