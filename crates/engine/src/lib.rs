//! Game engine - drives a pairs game for a UI
//!
//! [`GameEngine`] wraps the pure reducer from `mind-pairs-core` with the
//! pieces that need a runtime:
//!
//! - a `tokio::sync::watch` slot holding the latest [`GameState`] snapshot
//! - the delayed flip-back after a mismatch, cancelled on a new deal
//! - fire-and-forget reads and writes to a [`PreferencesStore`]
//!
//! Persistence never blocks or fails gameplay: read errors fall back to
//! defaults and write errors are logged.
//!
//! # Example
//!
//! ```
//! use mind_pairs_engine::{EngineConfig, GameEngine};
//! use mind_pairs_prefs::MemoryPreferences;
//! use mind_pairs_types::Difficulty;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let engine = GameEngine::new(EngineConfig::default(), MemoryPreferences::new()).unwrap();
//! engine.start_new_game(Difficulty::Easy);
//!
//! let rx = engine.subscribe();
//! engine.flip_card(0);
//! engine.flip_card(1);
//! assert_eq!(rx.borrow().matched_pairs(), 1);
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod error;

pub use mind_pairs_core::GameState;
pub use mind_pairs_prefs::PreferencesStore;
pub use mind_pairs_types as types;

pub use config::EngineConfig;
pub use engine::GameEngine;
pub use error::{EngineError, Result};
