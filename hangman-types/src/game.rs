use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Classification of a raw guess against the current round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GuessOutcome {
    Invalid,          // Not exactly one letter a-z, or the round is already over
    DuplicateIgnored, // Letter was already guessed this round
    NewCorrect,
    NewIncorrect,
}

impl GuessOutcome {
    /// True when the guess changes the round
    pub fn is_accepted(&self) -> bool {
        matches!(self, GuessOutcome::NewCorrect | GuessOutcome::NewIncorrect)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum RoundOutcome {
    InProgress,
    Won,
    Lost,
}

impl RoundOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RoundOutcome::InProgress)
    }
}

/// The two ways a round can end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum TerminalOutcome {
    Won,
    Lost,
}

impl From<TerminalOutcome> for RoundOutcome {
    fn from(outcome: TerminalOutcome) -> Self {
        match outcome {
            TerminalOutcome::Won => RoundOutcome::Won,
            TerminalOutcome::Lost => RoundOutcome::Lost,
        }
    }
}

/// One position of the reveal mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum MaskCell {
    Revealed(char),
    Hidden,
    Space,
}

/// Everything the UI needs to draw the current round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ViewModel {
    pub player_name: String,
    pub picture_index: u32,
    pub picture: String,
    pub reveal_mask: Vec<MaskCell>,
    pub masked_word: String,
    pub missed_letters: Vec<char>,
    pub missed_display: String,
    pub misses_remaining: u32,
    pub outcome: RoundOutcome,
    pub wins: u32,
    pub losses: u32,
    pub win_percent: f64,
    pub win_percent_display: String,
    pub stats_display: String,
}
