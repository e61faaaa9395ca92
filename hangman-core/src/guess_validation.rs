use hangman_types::GuessOutcome;

use crate::RoundState;

/// Classifies raw guesses. Pure: never touches the round.
pub struct GuessValidator;

impl GuessValidator {
    /// Trim and lowercase `raw`, returning the letter if exactly one `a`-`z`
    /// character remains
    pub fn normalize(raw: &str) -> Option<char> {
        let normalized = raw.trim().to_lowercase();
        let mut chars = normalized.chars();

        match (chars.next(), chars.next()) {
            (Some(letter), None) if letter.is_ascii_lowercase() => Some(letter),
            _ => None,
        }
    }

    pub fn classify(raw: &str, round: &RoundState) -> GuessOutcome {
        Self::classify_letter(raw, round).0
    }

    /// Classification together with the normalized letter, when there is one
    pub(crate) fn classify_letter(raw: &str, round: &RoundState) -> (GuessOutcome, Option<char>) {
        let Some(letter) = Self::normalize(raw) else {
            return (GuessOutcome::Invalid, None);
        };

        let outcome = if round.has_guessed(letter) {
            GuessOutcome::DuplicateIgnored
        } else if round.word().contains_letter(letter) {
            GuessOutcome::NewCorrect
        } else {
            GuessOutcome::NewIncorrect
        };

        (outcome, Some(letter))
    }
}
