use hangman_types::{GuessOutcome, PlayerStats, TerminalOutcome, ViewModel};
use tracing::info;

use crate::{
    GameConfig, GameEvent, GameEventBus, GameEventHandler, HangmanError, PresentationAdapter,
    RoundState, StatsTracker, WordBank, apply_guess, start_round,
};

/// Result of one guess as seen by the UI
#[derive(Debug, Clone, PartialEq)]
pub struct SessionUpdate {
    pub outcome: GuessOutcome,
    /// Set on the guess that ended the round. The round stays frozen in its
    /// terminal state until [`GameSession::new_round`] is called.
    pub terminal: Option<TerminalOutcome>,
    pub view: ViewModel,
}

/// One player's game: word bank, current round and stats.
///
/// Sequencing contract: after a terminal update the caller shows the result
/// and then calls `new_round`. Stats are counted and published at the moment
/// of the terminal transition, exactly once per round.
pub struct GameSession {
    config: GameConfig,
    bank: WordBank,
    round: RoundState,
    tracker: StatsTracker,
    event_bus: GameEventBus,
    rounds_started: u32,
}

impl GameSession {
    pub fn new(config: GameConfig, tracker: StatsTracker) -> Result<Self, HangmanError> {
        let bank = config.word_bank()?;
        let round = start_round(bank.current().clone(), config.max_misses());

        let mut session = Self {
            config,
            bank,
            round,
            tracker,
            event_bus: GameEventBus::new(),
            rounds_started: 0,
        };
        session.announce_round();
        Ok(session)
    }

    pub fn add_event_handler(&mut self, handler: Box<dyn GameEventHandler>) {
        self.event_bus.add_handler(handler);
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn stats(&self) -> &PlayerStats {
        self.tracker.stats()
    }

    pub fn tracker(&self) -> &StatsTracker {
        &self.tracker
    }

    pub fn player_name(&self) -> &str {
        self.tracker.player_name()
    }

    pub fn rounds_started(&self) -> u32 {
        self.rounds_started
    }

    pub fn view(&self) -> ViewModel {
        PresentationAdapter::to_view_model(&self.round, self.tracker.stats(), &self.config.stages)
    }

    pub fn submit_guess(&mut self, raw: &str) -> SessionUpdate {
        let report = apply_guess(self.round.clone(), raw);
        self.round = report.round;

        self.event_bus.publish(GameEvent::GuessApplied {
            player_name: self.tracker.player_name().to_string(),
            guess: raw.to_string(),
            outcome: report.outcome,
        });

        if let Some(terminal) = report.terminal {
            self.finish_round(terminal);
        }

        SessionUpdate {
            outcome: report.outcome,
            terminal: report.terminal,
            view: self.view(),
        }
    }

    /// Move to the next word and start over. Also serves as "new game" in the
    /// middle of a round, which leaves the stats alone.
    pub fn new_round(&mut self) -> ViewModel {
        let word = self.bank.next(self.config.selection).clone();
        self.round = start_round(word, self.config.max_misses());
        self.announce_round();
        self.view()
    }

    fn finish_round(&mut self, terminal: TerminalOutcome) {
        let stats = self.tracker.record_outcome(terminal);
        self.tracker.publish();

        let player_name = stats.player_name.clone();
        let word = self.round.word().to_string();
        info!(
            "{} {:?} round {} on {:?} ({} wins, {} losses)",
            player_name, terminal, self.rounds_started, word, stats.wins, stats.losses
        );

        let event = match terminal {
            TerminalOutcome::Won => GameEvent::RoundWon {
                player_name,
                word,
                stats,
            },
            TerminalOutcome::Lost => GameEvent::RoundLost {
                player_name,
                word,
                stats,
            },
        };
        self.event_bus.publish(event);
    }

    fn announce_round(&mut self) {
        self.rounds_started += 1;
        self.event_bus.publish(GameEvent::RoundStarted {
            player_name: self.tracker.player_name().to_string(),
            round_number: self.rounds_started,
            word_length: self.round.word().as_str().len(),
        });
    }
}
