//! Preferences collaborator - best scores and the last chosen difficulty
//!
//! The game engine never talks to storage directly. It is handed a
//! [`PreferencesStore`] and treats every call as fallible and slow: reads fall
//! back to defaults, writes are fire-and-forget.
//!
//! # Stores
//!
//! - [`MemoryPreferences`]: in-process document, for tests and throwaway sessions
//! - [`JsonFilePreferences`]: one small JSON document on disk
//!
//! Both enforce keep-minimum on best scores themselves, so a stray larger
//! score can never overwrite a better one.
//!
//! # Environment Variables
//!
//! - `MIND_PAIRS_PREFS_PATH`: location of the JSON document (default: `mind_pairs_prefs.json`)

pub mod error;
pub mod file;
pub mod memory;
pub mod store;

pub use mind_pairs_types as types;

pub use error::{PrefsError, Result};
pub use file::JsonFilePreferences;
pub use memory::MemoryPreferences;
pub use store::{Preferences, PreferencesStore};
