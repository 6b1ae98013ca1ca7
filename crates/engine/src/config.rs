use std::time::Duration;

use crate::types::{Difficulty, Symbol, DEFAULT_SYMBOLS, FLIP_BACK_DELAY_MS};

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// How long a mismatched pair stays face-up
    pub flip_back_delay: Duration,
    /// Difficulty dealt at construction, before any saved choice is restored
    pub initial_difficulty: Difficulty,
    /// Fixed shuffle seed; `None` seeds from OS entropy
    pub seed: Option<u64>,
    /// Symbols cards are drawn from
    pub symbols: Vec<Symbol>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            flip_back_delay: Duration::from_millis(FLIP_BACK_DELAY_MS),
            initial_difficulty: Difficulty::default(),
            seed: None,
            symbols: DEFAULT_SYMBOLS.iter().map(|&face| Symbol::new(face)).collect(),
        }
    }
}

impl EngineConfig {
    /// Create from environment variables
    ///
    /// - `MIND_PAIRS_FLIP_BACK_MS`: mismatch reveal delay in milliseconds
    /// - `MIND_PAIRS_SEED`: fixed shuffle seed
    /// - `MIND_PAIRS_DIFFICULTY`: `easy`, `medium` or `hard`
    ///
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let flip_back_delay = var("MIND_PAIRS_FLIP_BACK_MS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.flip_back_delay);

        let seed = var("MIND_PAIRS_SEED").and_then(|s| s.trim().parse::<u64>().ok());

        let initial_difficulty = var("MIND_PAIRS_DIFFICULTY")
            .and_then(|s| s.parse::<Difficulty>().ok())
            .unwrap_or(defaults.initial_difficulty);

        Self {
            flip_back_delay,
            initial_difficulty,
            seed,
            ..defaults
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_flip_back_delay(mut self, delay: Duration) -> Self {
        self.flip_back_delay = delay;
        self
    }

    pub fn with_initial_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.initial_difficulty = difficulty;
        self
    }

    pub fn with_symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        self.symbols = symbols.into_iter().map(Into::into).collect();
        self
    }
}
