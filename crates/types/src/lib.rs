//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the game.
//! All types are plain data with no runtime dependencies, so they can be
//! shared by the reducer, the preferences stores and any rendering layer.
//!
//! # Grid Sizes
//!
//! | Difficulty | Columns | Rows | Cards | Pairs |
//! |------------|---------|------|-------|-------|
//! | `Easy`     | 4       | 2    | 8     | 4     |
//! | `Medium`   | 4       | 3    | 12    | 6     |
//! | `Hard`     | 4       | 4    | 16    | 8     |
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `FLIP_BACK_DELAY_MS` | 1000 | How long a mismatched pair stays face-up |
//!
//! # Examples
//!
//! ```
//! use mind_pairs_types::{Difficulty, Card, Symbol};
//!
//! let difficulty: Difficulty = "EASY".parse().unwrap();
//! assert_eq!(difficulty.grid_size(), (4, 2));
//! assert_eq!(difficulty.total_pairs(), 4);
//!
//! let card = Card::new(0, Symbol::new("🌹"));
//! assert!(!card.is_flipped && !card.is_matched);
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Delay before a mismatched pair is turned face-down again (1000ms)
pub const FLIP_BACK_DELAY_MS: u64 = 1000;

/// Default symbol pool: 20 distinct faces, enough for the largest grid.
pub const DEFAULT_SYMBOLS: [&str; 20] = [
    "🌹", "🌻", "🌷", "🌺", "🍎", "🍊", "🍇", "🍓", "🚗", "🌿", "☎️", "⚽", "🦆", "🏠", "⭐", "🌙",
    "🎂", "☕", "🐰", "🦜",
];

/// Identifier of a card within one dealt game (`0..cards`).
pub type CardId = u32;

/// Opaque token shared by the two cards of a pair.
///
/// Cheap to clone; equality is by content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol(Arc<str>);

impl Symbol {
    pub fn new(face: &str) -> Self {
        Self(Arc::from(face))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One card on the table.
///
/// `is_flipped` stays true after a card is matched, so a renderer only needs
/// `is_flipped` to decide which face to draw.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Card {
    pub id: CardId,
    pub symbol: Symbol,
    pub is_flipped: bool,
    pub is_matched: bool,
}

impl Card {
    /// Create a face-down, unmatched card
    pub fn new(id: CardId, symbol: Symbol) -> Self {
        Self {
            id,
            symbol,
            is_flipped: false,
            is_matched: false,
        }
    }

    /// A card can be turned over only while face-down and unresolved
    pub fn can_flip(&self) -> bool {
        !self.is_flipped && !self.is_matched
    }
}

/// Difficulty levels, each with a fixed grid
///
/// Serialized as the lowercase key (`"easy"`, `"medium"`, `"hard"`), which is
/// also the key used for per-difficulty best scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Every difficulty, smallest grid first
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Grid size as `(columns, rows)`
    pub const fn grid_size(self) -> (u32, u32) {
        match self {
            Difficulty::Easy => (4, 2),
            Difficulty::Medium => (4, 3),
            Difficulty::Hard => (4, 4),
        }
    }

    pub const fn columns(self) -> u32 {
        self.grid_size().0
    }

    pub const fn rows(self) -> u32 {
        self.grid_size().1
    }

    pub const fn total_cards(self) -> u32 {
        let (columns, rows) = self.grid_size();
        columns * rows
    }

    pub const fn total_pairs(self) -> u32 {
        self.total_cards() / 2
    }

    /// Largest pair count across all difficulties
    ///
    /// A symbol pool must hold at least this many distinct symbols.
    pub fn max_pairs() -> u32 {
        Self::ALL
            .iter()
            .map(|d| d.total_pairs())
            .max()
            .unwrap_or(0)
    }

    /// Human-readable label for menus
    ///
    /// # Examples
    ///
    /// ```
    /// use mind_pairs_types::Difficulty;
    ///
    /// assert_eq!(Difficulty::Hard.label(), "Hard (16 cards)");
    /// ```
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy (8 cards)",
            Difficulty::Medium => "Medium (12 cards)",
            Difficulty::Hard => "Hard (16 cards)",
        }
    }

    /// Stable lowercase key
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// Error returned when parsing an unknown difficulty key
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty: {0:?}")]
pub struct ParseDifficultyError(pub String);

/// Parse difficulty from its key (case-insensitive)
///
/// # Examples
///
/// ```
/// use mind_pairs_types::Difficulty;
///
/// assert_eq!("medium".parse::<Difficulty>(), Ok(Difficulty::Medium));
/// assert_eq!(" Hard ".parse::<Difficulty>(), Ok(Difficulty::Hard));
/// assert!("insane".parse::<Difficulty>().is_err());
/// ```
impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ParseDifficultyError(s.to_string())),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whole-game phase
///
/// `Complete` is entered by the final match and only left by dealing a new
/// game. Dismissing the "you won" notice does not change the phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamePhase {
    Playing,
    Complete,
}
