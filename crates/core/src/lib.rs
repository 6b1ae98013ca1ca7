//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the pairs rules and state transitions. It has **no
//! dependencies** on timers, storage or rendering, making it:
//!
//! - **Deterministic**: Same seed deals identical tables
//! - **Testable**: Every rule is a plain method on [`GameState`]
//! - **Portable**: Usable from any async runtime or a synchronous UI loop
//!
//! # Module Structure
//!
//! - [`deck`]: symbol pool validation and shuffled dealing
//! - [`game_state`]: the flip / match / mismatch / completion reducer
//! - [`error`]: deck configuration errors
//!
//! # Game Rules
//!
//! - Cards are turned over one at a time; a second card completes a pair-attempt
//! - `moves` counts completed pair-attempts, not single flips
//! - A matching pair stays face-up for the rest of the game
//! - A mismatched pair stays face-up until [`GameState::resolve_mismatch`] is called;
//!   no other card can be flipped in the meantime
//! - The game is complete once every pair is matched; a best score improves
//!   only when strictly fewer moves were needed
//!
//! # Example
//!
//! ```
//! use mind_pairs_core::{DeckRng, FlipOutcome, GameState, SymbolPool};
//! use mind_pairs_core::types::Difficulty;
//!
//! let pool = SymbolPool::default();
//! let mut rng = DeckRng::new(12345);
//! let cards = pool.deal(Difficulty::Easy, &mut rng);
//! let mut game = GameState::new(Difficulty::Easy, cards, None, 1);
//!
//! // Cards 0 and 1 always share a symbol
//! assert_eq!(game.flip_card(0), FlipOutcome::Flipped);
//! assert!(matches!(game.flip_card(1), FlipOutcome::Matched { .. }));
//! assert_eq!(game.matched_pairs(), 1);
//! assert_eq!(game.moves(), 1);
//! ```

pub mod deck;
pub mod error;
pub mod game_state;

pub use mind_pairs_types as types;

// Re-export commonly used types for convenience
pub use deck::{DeckRng, SymbolPool};
pub use error::{DeckError, Result};
pub use game_state::{FlipOutcome, GameState};
