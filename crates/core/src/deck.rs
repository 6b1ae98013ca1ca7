//! Deck module - symbol pool and shuffled dealing
//!
//! A deal picks `pairs` distinct symbols from the pool at random, creates two
//! cards per symbol, and shuffles the cards with Fisher-Yates so every
//! permutation is equally likely.
//!
//! Card ids are assigned before the shuffle: cards `2k` and `2k + 1` carry the
//! k-th chosen symbol. Ids therefore say nothing about table position.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{DeckError, Result};
use crate::types::{Card, CardId, Difficulty, Symbol, DEFAULT_SYMBOLS};

/// Seedable RNG used for symbol choice and card order
///
/// The same seed deals the same sequence of games, which keeps tests and
/// replays deterministic.
#[derive(Debug, Clone)]
pub struct DeckRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl DeckRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an RNG seeded from OS entropy
    pub fn from_entropy() -> Self {
        let seed = rand::thread_rng().next_u64();
        Self::new(seed)
    }

    /// Seed this RNG was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Shuffle a slice in place
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }

    /// Pick `amount` distinct elements in random order
    pub fn choose_distinct<T: Clone>(&mut self, items: &[T], amount: usize) -> Vec<T> {
        items
            .choose_multiple(&mut self.inner, amount)
            .cloned()
            .collect()
    }
}

/// Validated pool of distinct symbols
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolPool {
    symbols: Vec<Symbol>,
}

impl SymbolPool {
    /// Build a pool, failing if it cannot serve every difficulty
    pub fn new(symbols: Vec<Symbol>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(symbols.len());
        for symbol in &symbols {
            if !seen.insert(symbol.as_str()) {
                return Err(DeckError::DuplicateSymbol(symbol.to_string()));
            }
        }

        let required = Difficulty::max_pairs();
        let available = symbols.len() as u32;
        if available < required {
            return Err(DeckError::PoolTooSmall {
                required,
                available,
            });
        }

        Ok(Self { symbols })
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Deal a fresh, shuffled, face-down table for `difficulty`
    pub fn deal(&self, difficulty: Difficulty, rng: &mut DeckRng) -> Vec<Card> {
        let pairs = difficulty.total_pairs() as usize;
        let chosen = rng.choose_distinct(&self.symbols, pairs);

        let mut cards: Vec<Card> = chosen
            .into_iter()
            .enumerate()
            .flat_map(|(index, symbol)| {
                let id = (index * 2) as CardId;
                [Card::new(id, symbol.clone()), Card::new(id + 1, symbol)]
            })
            .collect();

        rng.shuffle(&mut cards);
        log::debug!(
            "dealt {} cards for {} (seed {})",
            cards.len(),
            difficulty.as_str(),
            rng.seed()
        );
        cards
    }
}

impl Default for SymbolPool {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_SYMBOLS.iter().map(|&face| Symbol::new(face)).collect(),
        }
    }
}
