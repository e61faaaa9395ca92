use hangman_types::{GuessOutcome, PlayerStats};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    RoundStarted {
        player_name: String,
        round_number: u32,
        word_length: usize,
    },
    GuessApplied {
        player_name: String,
        guess: String,
        outcome: GuessOutcome,
    },
    RoundWon {
        player_name: String,
        word: String,
        stats: PlayerStats,
    },
    RoundLost {
        player_name: String,
        word: String,
        stats: PlayerStats,
    },
}

impl GameEvent {
    pub fn player_name(&self) -> &str {
        match self {
            GameEvent::RoundStarted { player_name, .. } => player_name,
            GameEvent::GuessApplied { player_name, .. } => player_name,
            GameEvent::RoundWon { player_name, .. } => player_name,
            GameEvent::RoundLost { player_name, .. } => player_name,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, GameEvent::RoundWon { .. } | GameEvent::RoundLost { .. })
    }
}

/// Event handler trait for processing game events
pub trait GameEventHandler: Send + Sync {
    fn handle_event(&mut self, event: GameEvent);
}

/// Simple event bus for distributing game events
pub struct GameEventBus {
    handlers: Vec<Box<dyn GameEventHandler>>,
}

impl GameEventBus {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Box<dyn GameEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn publish(&mut self, event: GameEvent) {
        for handler in &mut self.handlers {
            handler.handle_event(event.clone());
        }
    }
}

impl Default for GameEventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes every event to the `tracing` log. Counts what it has seen.
#[derive(Debug, Default)]
pub struct LoggingEventHandler {
    handled: usize,
}

impl LoggingEventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handled(&self) -> usize {
        self.handled
    }
}

impl GameEventHandler for LoggingEventHandler {
    fn handle_event(&mut self, event: GameEvent) {
        self.handled += 1;
        match &event {
            GameEvent::RoundStarted {
                player_name,
                round_number,
                word_length,
            } => debug!(
                "{} started round {} ({} characters)",
                player_name, round_number, word_length
            ),
            GameEvent::GuessApplied {
                player_name,
                guess,
                outcome,
            } => debug!("{} guessed {:?}: {:?}", player_name, guess, outcome),
            GameEvent::RoundWon {
                player_name, word, ..
            } => info!("{} won on {:?}", player_name, word),
            GameEvent::RoundLost {
                player_name, word, ..
            } => info!("{} lost on {:?}", player_name, word),
        }
    }
}
