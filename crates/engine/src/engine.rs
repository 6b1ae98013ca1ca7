//! Game engine - owns the current game and its timers.
//!
//! Every transition runs under the engine's control lock and publishes the
//! new state through a `watch` channel in one step, so observers always see a
//! whole snapshot and never a backlog.
//!
//! The only timer is the flip-back task started by a mismatch. Its
//! `JoinHandle` lives in a single slot: scheduling another one or dealing a
//! new game aborts the previous task first. When it fires it re-reads the
//! latest state and only acts if the same game and the same face-up pair are
//! still there.
//!
//! Preference writes go through one channel to a single writer task, so the
//! store sees them in call order.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use mind_pairs_core::{DeckRng, FlipOutcome, GameState, SymbolPool};
use mind_pairs_prefs::PreferencesStore;

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::types::{CardId, Difficulty};

/// Pairs game engine
///
/// Cheap to clone; clones drive the same game.
pub struct GameEngine<P: PreferencesStore> {
    shared: Arc<Shared<P>>,
}

impl<P: PreferencesStore> Clone for GameEngine<P> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

struct Shared<P> {
    flip_back_delay: Duration,
    pool: SymbolPool,
    prefs: Arc<P>,
    runtime: Handle,
    state: watch::Sender<GameState>,
    writes: mpsc::UnboundedSender<PrefsWrite>,
    control: Mutex<Control>,
}

enum PrefsWrite {
    Difficulty(Difficulty),
    BestScore(Difficulty, u32),
}

impl PrefsWrite {
    async fn apply<P: PreferencesStore>(self, prefs: &P) {
        match self {
            PrefsWrite::Difficulty(difficulty) => {
                if let Err(e) = prefs.save_difficulty(difficulty).await {
                    log::warn!("failed to save difficulty {}: {}", difficulty.as_str(), e);
                }
            }
            PrefsWrite::BestScore(difficulty, score) => {
                if let Err(e) = prefs.save_best_score(difficulty, score).await {
                    log::warn!(
                        "failed to save best score {} for {}: {}",
                        score,
                        difficulty.as_str(),
                        e
                    );
                }
            }
        }
    }
}

/// Drain queued writes in order; ends once the engine is dropped
async fn write_preferences<P: PreferencesStore>(
    prefs: Arc<P>,
    mut writes: mpsc::UnboundedReceiver<PrefsWrite>,
) {
    while let Some(write) = writes.recv().await {
        write.apply(&*prefs).await;
    }
}

struct Control {
    rng: DeckRng,
    next_episode: u32,
    flip_back: Option<JoinHandle<()>>,
}

impl Control {
    fn cancel_flip_back(&mut self) {
        if let Some(task) = self.flip_back.take() {
            task.abort();
        }
    }

    fn take_episode(&mut self) -> u32 {
        let episode = self.next_episode;
        self.next_episode = self.next_episode.wrapping_add(1);
        episode
    }
}

impl<P> Shared<P> {
    fn lock_control(&self) -> MutexGuard<'_, Control> {
        self.control.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<P: PreferencesStore> GameEngine<P> {
    /// Create an engine on the current tokio runtime
    ///
    /// Deals a first game at `config.initial_difficulty`. Call
    /// [`resume`](Self::resume) to switch to the difficulty saved by a previous
    /// session.
    pub fn new(config: EngineConfig, prefs: P) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| EngineError::NoRuntime)?;
        Self::with_runtime(config, prefs, runtime)
    }

    /// Create an engine that spawns its timers and persistence on `runtime`
    pub fn with_runtime(config: EngineConfig, prefs: P, runtime: Handle) -> Result<Self> {
        let pool = SymbolPool::new(config.symbols)?;
        let mut rng = config
            .seed
            .map(DeckRng::new)
            .unwrap_or_else(DeckRng::from_entropy);

        let difficulty = config.initial_difficulty;
        let cards = pool.deal(difficulty, &mut rng);
        let (state, _) = watch::channel(GameState::new(difficulty, cards, None, 1));

        let prefs = Arc::new(prefs);
        let (writes, queued) = mpsc::unbounded_channel();
        runtime.spawn(write_preferences(Arc::clone(&prefs), queued));

        let engine = Self {
            shared: Arc::new(Shared {
                flip_back_delay: config.flip_back_delay,
                pool,
                prefs,
                runtime,
                state,
                writes,
                control: Mutex::new(Control {
                    rng,
                    next_episode: 2,
                    flip_back: None,
                }),
            }),
        };
        engine.refresh_best_score(1, difficulty);
        Ok(engine)
    }

    /// Receiver that always yields the latest game snapshot
    ///
    /// Do not hold a `borrow()` of the receiver while calling into the engine.
    pub fn subscribe(&self) -> watch::Receiver<GameState> {
        self.shared.state.subscribe()
    }

    /// Copy of the current game
    pub fn snapshot(&self) -> GameState {
        self.shared.state.borrow().clone()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.shared.state.borrow().difficulty()
    }

    /// Shared handle to the preferences store
    pub fn preferences(&self) -> &Arc<P> {
        &self.shared.prefs
    }

    /// Deal a new game at `difficulty`
    ///
    /// Cancels a pending flip-back. The cached best score is kept when the
    /// difficulty is unchanged and refreshed from the store in the
    /// background; the chosen difficulty is saved in the background too.
    pub fn start_new_game(&self, difficulty: Difficulty) {
        let episode = {
            let mut control = self.shared.lock_control();
            control.cancel_flip_back();
            let episode = control.take_episode();
            let cards = self.shared.pool.deal(difficulty, &mut control.rng);

            self.shared.state.send_modify(|state| {
                let best_score = if state.difficulty() == difficulty {
                    state.best_score()
                } else {
                    None
                };
                *state = GameState::new(difficulty, cards, best_score, episode);
            });
            episode
        };
        log::debug!("episode {} started at {}", episode, difficulty.as_str());

        self.refresh_best_score(episode, difficulty);
        self.queue_write(PrefsWrite::Difficulty(difficulty));
    }

    /// Deal a new game at the current difficulty
    pub fn reset_game(&self) {
        let difficulty = self.difficulty();
        self.start_new_game(difficulty);
    }

    /// Turn a card face-up
    ///
    /// Silently ignored when two cards are already face-up, the game is
    /// complete, the id is unknown, or the card is already face-up or matched.
    pub fn flip_card(&self, card_id: CardId) {
        let mut control = self.shared.lock_control();

        let mut outcome = FlipOutcome::Ignored;
        let mut episode = 0;
        let mut difficulty = Difficulty::default();
        self.shared.state.send_if_modified(|state| {
            outcome = state.flip_card(card_id);
            episode = state.episode_id();
            difficulty = state.difficulty();
            outcome.has_update()
        });

        match outcome {
            FlipOutcome::Ignored | FlipOutcome::Flipped => {}
            FlipOutcome::Matched {
                completed,
                new_best,
            } => {
                if completed {
                    log::debug!("episode {} complete", episode);
                }
                if let Some(score) = new_best {
                    log::info!("new best score {} at {}", score, difficulty.as_str());
                    self.queue_write(PrefsWrite::BestScore(difficulty, score));
                }
            }
            FlipOutcome::Mismatched { pair } => {
                control.cancel_flip_back();
                control.flip_back = Some(self.schedule_flip_back(episode, pair));
            }
        }
    }

    /// Hide the "you won" notice; no-op when it is not showing
    pub fn dismiss_completion_notice(&self) {
        let _control = self.shared.lock_control();
        self.shared
            .state
            .send_if_modified(|state| state.dismiss_completion_notice());
    }

    /// Restore the difficulty saved by a previous session and deal a game at it
    ///
    /// Falls back to [`Difficulty::Medium`] when the store cannot be read.
    pub async fn resume(&self) -> Difficulty {
        let difficulty = match self.shared.prefs.selected_difficulty().await {
            Ok(difficulty) => difficulty,
            Err(e) => {
                log::warn!("failed to read saved difficulty: {}", e);
                Difficulty::default()
            }
        };
        self.start_new_game(difficulty);
        difficulty
    }

    /// Stored best score for every difficulty, smallest grid first
    ///
    /// Unreadable entries are reported as unset.
    pub async fn best_scores(&self) -> Vec<(Difficulty, Option<u32>)> {
        let mut scores = Vec::with_capacity(Difficulty::ALL.len());
        for difficulty in Difficulty::ALL {
            let best = match self.shared.prefs.best_score(difficulty).await {
                Ok(best) => best,
                Err(e) => {
                    log::warn!(
                        "failed to read best score for {}: {}",
                        difficulty.as_str(),
                        e
                    );
                    None
                }
            };
            scores.push((difficulty, best));
        }
        scores
    }

    /// Cancel the pending flip-back, if any
    pub fn shutdown(&self) {
        self.shared.lock_control().cancel_flip_back();
    }

    fn schedule_flip_back(&self, episode: u32, pair: [CardId; 2]) -> JoinHandle<()> {
        let shared: Weak<Shared<P>> = Arc::downgrade(&self.shared);
        let delay = self.shared.flip_back_delay;

        self.shared.runtime.spawn(async move {
            tokio::time::sleep(delay).await;

            let Some(shared) = shared.upgrade() else {
                return;
            };
            let _control = shared.lock_control();
            let resolved = shared.state.send_if_modified(|state| {
                state.episode_id() == episode && state.resolve_mismatch(pair)
            });
            if !resolved {
                log::debug!("stale flip-back for episode {} dropped", episode);
            }
        })
    }

    fn refresh_best_score(&self, episode: u32, difficulty: Difficulty) {
        let shared: Weak<Shared<P>> = Arc::downgrade(&self.shared);
        let prefs = Arc::clone(&self.shared.prefs);

        self.shared.runtime.spawn(async move {
            let stored = match prefs.best_score(difficulty).await {
                Ok(stored) => stored,
                Err(e) => {
                    log::warn!(
                        "failed to read best score for {}: {}",
                        difficulty.as_str(),
                        e
                    );
                    return;
                }
            };
            let Some(shared) = shared.upgrade() else {
                return;
            };
            shared.state.send_if_modified(|state| {
                state.episode_id() == episode && state.apply_stored_best_score(stored)
            });
        });
    }

    fn queue_write(&self, write: PrefsWrite) {
        if self.shared.writes.send(write).is_err() {
            log::warn!("preferences writer has stopped; write dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mind_pairs_prefs::{MemoryPreferences, PrefsError};
    use mind_pairs_core::types::GamePhase;

    /// Store whose every call fails
    struct BrokenPreferences;

    impl PreferencesStore for BrokenPreferences {
        async fn best_score(&self, _: Difficulty) -> mind_pairs_prefs::Result<Option<u32>> {
            Err(PrefsError::Unavailable("disk gone".to_string()))
        }

        async fn save_best_score(&self, _: Difficulty, _: u32) -> mind_pairs_prefs::Result<()> {
            Err(PrefsError::Unavailable("disk gone".to_string()))
        }

        async fn selected_difficulty(&self) -> mind_pairs_prefs::Result<Difficulty> {
            Err(PrefsError::Unavailable("disk gone".to_string()))
        }

        async fn save_difficulty(&self, _: Difficulty) -> mind_pairs_prefs::Result<()> {
            Err(PrefsError::Unavailable("disk gone".to_string()))
        }
    }

    fn config() -> EngineConfig {
        EngineConfig::default()
            .with_seed(2024)
            .with_initial_difficulty(Difficulty::Easy)
    }

    async fn settle() {
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
    }

    fn play_perfect<P: PreferencesStore>(engine: &GameEngine<P>) {
        for k in 0..engine.snapshot().total_pairs() {
            engine.flip_card(2 * k);
            engine.flip_card(2 * k + 1);
        }
    }

    #[test]
    fn test_new_outside_runtime_fails() {
        let result = GameEngine::new(config(), MemoryPreferences::new());
        assert!(matches!(result, Err(EngineError::NoRuntime)));
    }

    #[tokio::test]
    async fn test_new_rejects_small_pool() {
        let config = config().with_symbols(["a", "b", "c"]);
        let result = GameEngine::new(config, MemoryPreferences::new());
        assert!(matches!(result, Err(EngineError::Deck(_))));
    }

    #[tokio::test]
    async fn test_initial_game_uses_configured_difficulty() {
        let engine = GameEngine::new(config(), MemoryPreferences::new()).unwrap();
        let state = engine.snapshot();
        assert_eq!(state.difficulty(), Difficulty::Easy);
        assert_eq!(state.cards().len(), 8);
        assert_eq!(state.phase(), GamePhase::Playing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_game_cancels_pending_flip_back() {
        let engine = GameEngine::new(config(), MemoryPreferences::new()).unwrap();
        engine.flip_card(0);
        engine.flip_card(2);
        assert!(engine.snapshot().is_resolving());

        tokio::time::sleep(Duration::from_millis(600)).await;
        engine.start_new_game(Difficulty::Easy);
        engine.flip_card(0);
        engine.flip_card(2);
        let before = engine.snapshot();

        // Past the first deadline, before the second.
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(engine.snapshot(), before);

        tokio::time::sleep(Duration::from_millis(600)).await;
        let after = engine.snapshot();
        assert!(!after.is_resolving());
        assert!(!after.card(0).unwrap().is_flipped);
        assert!(!after.card(2).unwrap().is_flipped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_flip_back() {
        let engine = GameEngine::new(config(), MemoryPreferences::new()).unwrap();
        engine.flip_card(0);
        engine.flip_card(2);
        engine.shutdown();

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(engine.snapshot().is_resolving());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_engine_timer_is_noop() {
        let engine = GameEngine::new(config(), MemoryPreferences::new()).unwrap();
        let rx = engine.subscribe();
        engine.flip_card(0);
        engine.flip_card(2);
        drop(engine);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(rx.borrow().is_resolving());
    }

    #[tokio::test]
    async fn test_broken_store_keeps_game_playable() {
        let engine = GameEngine::new(config(), BrokenPreferences).unwrap();
        assert_eq!(engine.resume().await, Difficulty::Medium);
        settle().await;

        play_perfect(&engine);
        settle().await;

        let state = engine.snapshot();
        assert!(state.is_complete());
        assert_eq!(state.moves(), 6);
        assert_eq!(state.best_score(), Some(6));
        assert!(engine
            .best_scores()
            .await
            .iter()
            .all(|(_, best)| best.is_none()));
    }

    #[tokio::test]
    async fn test_dismiss_does_not_notify_when_idle() {
        let engine = GameEngine::new(config(), MemoryPreferences::new()).unwrap();
        settle().await;
        let mut rx = engine.subscribe();
        rx.borrow_and_update();

        engine.dismiss_completion_notice();
        assert!(!rx.has_changed().unwrap());

        engine.flip_card(99);
        assert!(!rx.has_changed().unwrap());

        engine.flip_card(0);
        assert!(rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_stored_best_score_is_loaded_for_new_game() {
        let prefs = MemoryPreferences::new();
        prefs.save_best_score(Difficulty::Hard, 11).await.unwrap();

        let engine = GameEngine::new(config(), prefs).unwrap();
        engine.start_new_game(Difficulty::Hard);
        settle().await;
        assert_eq!(engine.snapshot().best_score(), Some(11));

        engine.start_new_game(Difficulty::Medium);
        assert_eq!(engine.snapshot().best_score(), None);
    }
}
