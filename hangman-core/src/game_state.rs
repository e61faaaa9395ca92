use std::collections::HashSet;

use hangman_types::{GuessOutcome, RoundOutcome, TerminalOutcome};

use crate::{GuessValidator, Word};

/// One round of hangman on a single word.
///
/// Fields are private so the invariants hold for every value in circulation:
/// misses never exceed `max_misses`, `missed_letters` has no duplicates, and
/// once `outcome` is terminal the round never changes again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundState {
    word: Word,
    guessed_letters: HashSet<char>,
    missed_letters: Vec<char>,
    max_misses: u32,
    outcome: RoundOutcome,
}

impl RoundState {
    pub fn word(&self) -> &Word {
        &self.word
    }

    /// Lowercase letters guessed correctly so far
    pub fn guessed_letters(&self) -> &HashSet<char> {
        &self.guessed_letters
    }

    /// Lowercase wrong guesses in the order they were made
    pub fn missed_letters(&self) -> &[char] {
        &self.missed_letters
    }

    pub fn miss_count(&self) -> u32 {
        self.missed_letters.len() as u32
    }

    pub fn max_misses(&self) -> u32 {
        self.max_misses
    }

    pub fn misses_remaining(&self) -> u32 {
        self.max_misses - self.miss_count()
    }

    pub fn outcome(&self) -> RoundOutcome {
        self.outcome
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome.is_terminal()
    }

    /// True if `letter` was already tried, right or wrong
    pub fn has_guessed(&self, letter: char) -> bool {
        self.guessed_letters.contains(&letter) || self.missed_letters.contains(&letter)
    }

    fn is_solved(&self) -> bool {
        self.word
            .letters()
            .all(|letter| self.guessed_letters.contains(&letter))
    }
}

/// What happened when a guess was applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessReport {
    pub round: RoundState,
    pub outcome: GuessOutcome,
    /// Set only on the guess that ended the round
    pub terminal: Option<TerminalOutcome>,
}

/// Start a fresh round. A round always allows at least one miss.
pub fn start_round(word: Word, max_misses: u32) -> RoundState {
    RoundState {
        word,
        guessed_letters: HashSet::new(),
        missed_letters: Vec::new(),
        max_misses: max_misses.max(1),
        outcome: RoundOutcome::InProgress,
    }
}

/// Apply a raw guess to `round` and return the resulting round.
///
/// A finished round is frozen: it comes back unchanged with
/// [`GuessOutcome::Invalid`]. Invalid and duplicate guesses also leave the
/// round untouched.
pub fn apply_guess(mut round: RoundState, raw: &str) -> GuessReport {
    if round.is_terminal() {
        return GuessReport {
            round,
            outcome: GuessOutcome::Invalid,
            terminal: None,
        };
    }

    let (outcome, letter) = GuessValidator::classify_letter(raw, &round);
    let mut terminal = None;

    match (outcome, letter) {
        (GuessOutcome::NewCorrect, Some(letter)) => {
            round.guessed_letters.insert(letter);
            if round.is_solved() {
                round.outcome = RoundOutcome::Won;
                terminal = Some(TerminalOutcome::Won);
            }
        }
        (GuessOutcome::NewIncorrect, Some(letter)) => {
            round.missed_letters.push(letter);
            if round.miss_count() >= round.max_misses {
                round.outcome = RoundOutcome::Lost;
                terminal = Some(TerminalOutcome::Lost);
            }
        }
        _ => {}
    }

    GuessReport {
        round,
        outcome,
        terminal,
    }
}
