//! Game state module - the pairs reducer
//!
//! [`GameState`] is the single snapshot observers see. Every transition is a
//! method that mutates it in place and reports what happened, so the caller
//! can publish the whole state at once and then start any side effects (the
//! flip-back timer, best-score persistence).
//!
//! The reducer is synchronous and knows nothing about time: a mismatch leaves
//! both cards face-up and it is up to the caller to call
//! [`GameState::resolve_mismatch`] once the reveal delay has elapsed.

use arrayvec::ArrayVec;

use crate::types::{Card, CardId, Difficulty, GamePhase};

/// Result of [`GameState::flip_card`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipOutcome {
    /// Flip rejected; state untouched
    Ignored,
    /// First card of a pair-attempt turned over
    Flipped,
    /// Second card matched the first
    Matched {
        /// All pairs are now matched
        completed: bool,
        /// Set when this win beat the cached best score
        new_best: Option<u32>,
    },
    /// Second card differs; both stay face-up until resolved
    Mismatched { pair: [CardId; 2] },
}

impl FlipOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, FlipOutcome::Ignored)
    }
}

/// Complete state of one dealt game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    cards: Vec<Card>,
    /// Face-up unresolved cards, in flip order.
    flipped_cards: ArrayVec<Card, 2>,
    matched_pairs: u32,
    moves: u32,
    /// "You won" notice flag; cleared by dismissal while the phase stays Complete.
    is_complete: bool,
    difficulty: Difficulty,
    best_score: Option<u32>,
    /// Monotonic id of the dealt game (changes on every new deal).
    episode_id: u32,
}

impl GameState {
    /// Create a game from an already dealt table
    pub fn new(
        difficulty: Difficulty,
        cards: Vec<Card>,
        best_score: Option<u32>,
        episode_id: u32,
    ) -> Self {
        debug_assert_eq!(cards.len() as u32, difficulty.total_cards());
        Self {
            cards,
            flipped_cards: ArrayVec::new(),
            matched_pairs: 0,
            moves: 0,
            is_complete: false,
            difficulty,
            best_score,
            episode_id,
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == id)
    }

    pub fn flipped_cards(&self) -> &[Card] {
        &self.flipped_cards
    }

    pub fn matched_pairs(&self) -> u32 {
        self.matched_pairs
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn best_score(&self) -> Option<u32> {
        self.best_score
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn total_pairs(&self) -> u32 {
        self.difficulty.total_pairs()
    }

    pub fn phase(&self) -> GamePhase {
        if self.matched_pairs >= self.total_pairs() {
            GamePhase::Complete
        } else {
            GamePhase::Playing
        }
    }

    /// Two cards are face-up waiting to be turned back
    pub fn is_resolving(&self) -> bool {
        self.flipped_cards.is_full()
    }

    /// Turn a card face-up, evaluating the pair when it is the second one
    pub fn flip_card(&mut self, id: CardId) -> FlipOutcome {
        if self.is_resolving() || self.phase() == GamePhase::Complete {
            return FlipOutcome::Ignored;
        }

        let Some(index) = self.cards.iter().position(|card| card.id == id) else {
            return FlipOutcome::Ignored;
        };
        if !self.cards[index].can_flip() {
            return FlipOutcome::Ignored;
        }

        self.cards[index].is_flipped = true;
        self.flipped_cards.push(self.cards[index].clone());

        if self.flipped_cards.is_full() {
            self.evaluate_pair()
        } else {
            FlipOutcome::Flipped
        }
    }

    fn evaluate_pair(&mut self) -> FlipOutcome {
        self.moves += 1;

        let pair = [self.flipped_cards[0].id, self.flipped_cards[1].id];
        if self.flipped_cards[0].symbol != self.flipped_cards[1].symbol {
            return FlipOutcome::Mismatched { pair };
        }

        for card in self.cards.iter_mut().filter(|c| pair.contains(&c.id)) {
            card.is_matched = true;
            card.is_flipped = true;
        }
        self.flipped_cards.clear();
        self.matched_pairs += 1;

        let completed = self.phase() == GamePhase::Complete;
        let mut new_best = None;
        if completed {
            self.is_complete = true;
            if self.best_score.map_or(true, |best| self.moves < best) {
                self.best_score = Some(self.moves);
                new_best = Some(self.moves);
            }
        }

        FlipOutcome::Matched {
            completed,
            new_best,
        }
    }

    /// Turn a mismatched pair face-down again
    ///
    /// Ignored unless `pair` is exactly the pair currently face-up, so a late
    /// call for a pair that was already resolved (or belongs to an earlier
    /// deal) never touches the table. Returns whether the state changed.
    pub fn resolve_mismatch(&mut self, pair: [CardId; 2]) -> bool {
        if !self.is_resolving() {
            return false;
        }
        let current = [self.flipped_cards[0].id, self.flipped_cards[1].id];
        if current != pair {
            return false;
        }

        for card in self
            .cards
            .iter_mut()
            .filter(|c| pair.contains(&c.id) && !c.is_matched)
        {
            card.is_flipped = false;
        }
        self.flipped_cards.clear();
        true
    }

    /// Hide the "you won" notice without dealing a new game
    pub fn dismiss_completion_notice(&mut self) -> bool {
        if !self.is_complete {
            return false;
        }
        self.is_complete = false;
        true
    }

    /// Merge a best score read from the store into the cached one
    ///
    /// Keeps the lower of the two so a lookup that lands after a fresh win
    /// cannot hide it.
    pub fn apply_stored_best_score(&mut self, stored: Option<u32>) -> bool {
        let merged = match (self.best_score, stored) {
            (Some(cached), Some(stored)) => Some(cached.min(stored)),
            (cached, stored) => cached.or(stored),
        };
        if merged == self.best_score {
            return false;
        }
        self.best_score = merged;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Symbol;

    /// Easy table laid out in id order: (0,1) ⭐, (2,3) 🌙, (4,5) 🍎, (6,7) 🦆
    fn easy_game() -> GameState {
        let faces = ["⭐", "🌙", "🍎", "🦆"];
        let cards = (0..8)
            .map(|id| Card::new(id, Symbol::new(faces[id as usize / 2])))
            .collect();
        GameState::new(Difficulty::Easy, cards, None, 1)
    }

    fn play_perfect(state: &mut GameState) {
        for k in 0..state.total_pairs() {
            state.flip_card(2 * k);
            state.flip_card(2 * k + 1);
        }
    }

    #[test]
    fn test_new_game_state() {
        let state = easy_game();
        assert_eq!(state.cards().len(), 8);
        assert!(state.flipped_cards().is_empty());
        assert_eq!(state.matched_pairs(), 0);
        assert_eq!(state.moves(), 0);
        assert!(!state.is_complete());
        assert_eq!(state.phase(), GamePhase::Playing);
        assert_eq!(state.best_score(), None);
    }

    #[test]
    fn test_first_flip() {
        let mut state = easy_game();
        assert_eq!(state.flip_card(4), FlipOutcome::Flipped);
        assert!(state.card(4).unwrap().is_flipped);
        assert_eq!(state.flipped_cards().len(), 1);
        assert_eq!(state.flipped_cards()[0].id, 4);
        assert_eq!(state.moves(), 0);
    }

    #[test]
    fn test_unknown_id_is_ignored() {
        let mut state = easy_game();
        let before = state.clone();
        assert_eq!(state.flip_card(42), FlipOutcome::Ignored);
        assert_eq!(state, before);
    }

    #[test]
    fn test_reflip_same_card_is_ignored() {
        let mut state = easy_game();
        state.flip_card(0);
        let before = state.clone();
        assert_eq!(state.flip_card(0), FlipOutcome::Ignored);
        assert_eq!(state, before);
    }

    #[test]
    fn test_match() {
        let mut state = easy_game();
        state.flip_card(0);
        let outcome = state.flip_card(1);
        assert_eq!(
            outcome,
            FlipOutcome::Matched {
                completed: false,
                new_best: None
            }
        );
        assert_eq!(state.matched_pairs(), 1);
        assert_eq!(state.moves(), 1);
        assert!(state.flipped_cards().is_empty());
        for id in [0, 1] {
            let card = state.card(id).unwrap();
            assert!(card.is_matched);
            assert!(card.is_flipped);
        }
    }

    #[test]
    fn test_mismatch_waits_for_resolution() {
        let mut state = easy_game();
        state.flip_card(0);
        assert_eq!(state.flip_card(2), FlipOutcome::Mismatched { pair: [0, 2] });
        assert_eq!(state.moves(), 1);
        assert!(state.is_resolving());
        for id in [0, 2] {
            let card = state.card(id).unwrap();
            assert!(card.is_flipped);
            assert!(!card.is_matched);
        }

        assert!(state.resolve_mismatch([0, 2]));
        assert!(!state.is_resolving());
        assert!(state.flipped_cards().is_empty());
        assert!(!state.card(0).unwrap().is_flipped);
        assert!(!state.card(2).unwrap().is_flipped);
        assert_eq!(state.moves(), 1);
    }

    #[test]
    fn test_flip_blocked_while_resolving() {
        let mut state = easy_game();
        state.flip_card(0);
        state.flip_card(2);
        let before = state.clone();
        assert_eq!(state.flip_card(4), FlipOutcome::Ignored);
        assert_eq!(state, before);
    }

    #[test]
    fn test_resolve_wrong_pair_is_ignored() {
        let mut state = easy_game();
        state.flip_card(0);
        state.flip_card(2);
        let before = state.clone();
        assert!(!state.resolve_mismatch([0, 4]));
        assert!(!state.resolve_mismatch([2, 0]));
        assert_eq!(state, before);
    }

    #[test]
    fn test_resolve_without_pending_pair_is_ignored() {
        let mut state = easy_game();
        state.flip_card(0);
        state.flip_card(1);
        let before = state.clone();
        assert!(!state.resolve_mismatch([0, 1]));
        assert_eq!(state, before);
    }

    #[test]
    fn test_full_play_through() {
        let mut state = easy_game();

        state.flip_card(0);
        state.flip_card(2);
        assert!(state.resolve_mismatch([0, 2]));

        play_perfect(&mut state);

        assert!(state.is_complete());
        assert_eq!(state.phase(), GamePhase::Complete);
        assert_eq!(state.matched_pairs(), state.total_pairs());
        assert!(state.flipped_cards().is_empty());
        assert_eq!(state.moves(), 5);
        assert_eq!(state.best_score(), Some(5));
        assert!(state.cards().iter().all(|c| c.is_matched && c.is_flipped));
    }

    #[test]
    fn test_completion_reports_new_best() {
        let mut state = easy_game();
        for k in 0..3 {
            state.flip_card(2 * k);
            state.flip_card(2 * k + 1);
        }
        state.flip_card(6);
        assert_eq!(
            state.flip_card(7),
            FlipOutcome::Matched {
                completed: true,
                new_best: Some(4)
            }
        );
    }

    #[test]
    fn test_best_score_only_improves_strictly() {
        let cards = easy_game().cards().to_vec();

        let mut equal = GameState::new(Difficulty::Easy, cards.clone(), Some(4), 2);
        play_perfect(&mut equal);
        assert_eq!(equal.moves(), 4);
        assert_eq!(equal.best_score(), Some(4));

        let mut worse = GameState::new(Difficulty::Easy, cards.clone(), Some(3), 3);
        play_perfect(&mut worse);
        assert_eq!(worse.best_score(), Some(3));

        let mut better = GameState::new(Difficulty::Easy, cards, Some(9), 4);
        play_perfect(&mut better);
        assert_eq!(better.best_score(), Some(4));
    }

    #[test]
    fn test_flip_after_complete_is_ignored() {
        let mut state = easy_game();
        play_perfect(&mut state);
        state.dismiss_completion_notice();
        let before = state.clone();
        assert_eq!(state.flip_card(0), FlipOutcome::Ignored);
        assert_eq!(state, before);
    }

    #[test]
    fn test_dismiss_keeps_phase() {
        let mut state = easy_game();
        play_perfect(&mut state);
        assert!(state.dismiss_completion_notice());
        assert!(!state.is_complete());
        assert_eq!(state.phase(), GamePhase::Complete);
        assert_eq!(state.moves(), 4);
        assert_eq!(state.matched_pairs(), 4);
    }

    #[test]
    fn test_dismiss_when_not_complete_is_noop() {
        let mut state = easy_game();
        state.flip_card(3);
        let before = state.clone();
        assert!(!state.dismiss_completion_notice());
        assert_eq!(state, before);
    }

    #[test]
    fn test_apply_stored_best_score() {
        let mut state = easy_game();
        assert!(!state.apply_stored_best_score(None));
        assert!(state.apply_stored_best_score(Some(12)));
        assert_eq!(state.best_score(), Some(12));
        assert!(state.apply_stored_best_score(Some(9)));
        assert_eq!(state.best_score(), Some(9));
        assert!(!state.apply_stored_best_score(Some(15)));
        assert!(!state.apply_stored_best_score(None));
        assert_eq!(state.best_score(), Some(9));
    }
}
