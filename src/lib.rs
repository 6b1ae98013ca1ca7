//! Mind Pairs (workspace facade crate).
//!
//! Re-exports the workspace crates under one name so hosts can depend on
//! `mind_pairs::{core,engine,prefs,types}` while the implementation lives in
//! dedicated crates under `crates/`.

pub use mind_pairs_core as core;
pub use mind_pairs_engine as engine;
pub use mind_pairs_prefs as prefs;
pub use mind_pairs_types as types;
