#![allow(dead_code)]

use async_trait::async_trait;
use hangman_core::{
    GameConfig, GameEvent, GameEventHandler, GameSession, InMemoryStatsPort, RoundState,
    StatsPort, StatsPortError, StatsTracker, Word, WordSelection, apply_guess, start_round,
};
use hangman_types::PlayerStats;
use std::sync::{Arc, Mutex};

pub const TEST_MAX_MISSES: u32 = 4;

/// Creates a config over `words` with the default five stages
pub fn create_test_config(words: &[&str]) -> GameConfig {
    GameConfig {
        words: words.iter().map(|w| w.to_string()).collect(),
        ..GameConfig::default()
    }
}

pub fn create_round(word: &str) -> RoundState {
    start_round(Word::new(word).unwrap(), TEST_MAX_MISSES)
}

/// Applies each guess in order and returns the final round
pub fn play_guesses(round: RoundState, guesses: &[&str]) -> RoundState {
    guesses
        .iter()
        .fold(round, |round, guess| apply_guess(round, guess).round)
}

pub fn create_tracker(name: &str, port: Arc<dyn StatsPort>) -> StatsTracker {
    StatsTracker::new(PlayerStats::new(name), port)
}

/// Creates a session for "aydan" backed by a fresh in-memory port
pub fn create_test_session(words: &[&str]) -> (GameSession, Arc<InMemoryStatsPort>) {
    let port = Arc::new(InMemoryStatsPort::new());
    let session = GameSession::new(
        create_test_config(words),
        create_tracker("aydan", port.clone()),
    )
    .unwrap();
    (session, port)
}

pub fn create_random_config(words: &[&str]) -> GameConfig {
    GameConfig {
        selection: WordSelection::Random,
        ..create_test_config(words)
    }
}

/// Event collector for testing event emissions
#[derive(Clone)]
pub struct EventCollector {
    events: Arc<Mutex<Vec<GameEvent>>>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn get_events(&self) -> Vec<GameEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn count_matching(&self, check_fn: impl Fn(&GameEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| check_fn(e)).count()
    }
}

impl GameEventHandler for EventCollector {
    fn handle_event(&mut self, event: GameEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// A port whose store is always down
pub struct FailingStatsPort;

#[async_trait]
impl StatsPort for FailingStatsPort {
    async fn fetch_player(&self, _player_name: &str) -> Result<PlayerStats, StatsPortError> {
        Err(StatsPortError::Persistence("store unavailable".to_string()))
    }

    async fn create_player(&self, _player_name: &str) -> Result<PlayerStats, StatsPortError> {
        Err(StatsPortError::Persistence("store unavailable".to_string()))
    }

    async fn update_player(
        &self,
        _player_name: &str,
        _wins: u32,
        _losses: u32,
    ) -> Result<PlayerStats, StatsPortError> {
        Err(StatsPortError::Persistence("store unavailable".to_string()))
    }
}

/// Lets spawned publish tasks run until the port holds `expected`
pub async fn wait_for_stored_stats(port: &InMemoryStatsPort, expected: &PlayerStats) -> bool {
    for _ in 0..100 {
        if port.fetch_player(&expected.player_name).await.as_ref() == Ok(expected) {
            return true;
        }
        tokio::task::yield_now().await;
    }
    false
}
