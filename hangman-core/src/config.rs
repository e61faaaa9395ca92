use std::env;

use crate::{HangmanError, WordBank, WordSelection};

pub const DEFAULT_WORDS: [&str; 8] = [
    "Morehouse",
    "Spelman",
    "Basketball",
    "Table",
    "Museum",
    "Excellent",
    "Fun",
    "React",
];

/// Failure illustrations, one per miss count. The last one is the lost state.
pub const DEFAULT_STAGES: [&str; 5] = [
    "noose.png",
    "upperBody.png",
    "upperandlower.png",
    "1arm.png",
    "botharms.png",
];

#[derive(Debug, Clone)]
pub struct GameConfig {
    pub words: Vec<String>,
    pub stages: Vec<String>,
    pub selection: WordSelection,
}

impl GameConfig {
    pub fn new(
        words: Vec<String>,
        stages: Vec<String>,
        selection: WordSelection,
    ) -> Result<Self, HangmanError> {
        let config = Self {
            words,
            stages,
            selection,
        };
        config.validate()?;
        Ok(config)
    }

    /// Read `HANGMAN_WORDS`, `HANGMAN_STAGES` (both comma separated) and
    /// `HANGMAN_WORD_SELECTION`, falling back to the defaults
    pub fn from_env() -> Result<Self, HangmanError> {
        let words = env::var("HANGMAN_WORDS")
            .map(|value| split_list(&value))
            .unwrap_or_else(|_| to_owned_list(&DEFAULT_WORDS));
        let stages = env::var("HANGMAN_STAGES")
            .map(|value| split_list(&value))
            .unwrap_or_else(|_| to_owned_list(&DEFAULT_STAGES));
        let selection = match env::var("HANGMAN_WORD_SELECTION") {
            Ok(value) => value.parse()?,
            Err(_) => WordSelection::default(),
        };

        Self::new(words, stages, selection)
    }

    /// Wrong guesses allowed per round: one less than the stage count, since
    /// reaching the final stage means the round is lost
    pub fn max_misses(&self) -> u32 {
        self.stages.len().saturating_sub(1) as u32
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    pub fn word_bank(&self) -> Result<WordBank, HangmanError> {
        WordBank::new(&self.words)
    }

    fn validate(&self) -> Result<(), HangmanError> {
        if self.stages.len() < 2 {
            return Err(HangmanError::InvalidConfig(format!(
                "need at least 2 stages, got {}",
                self.stages.len()
            )));
        }
        self.word_bank().map(|_| ())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            words: to_owned_list(&DEFAULT_WORDS),
            stages: to_owned_list(&DEFAULT_STAGES),
            selection: WordSelection::Cyclic,
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}
