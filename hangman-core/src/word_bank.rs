use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::HangmanError;

/// A playable word: ASCII letters, optionally separated by spaces.
/// Case is preserved for display; comparisons are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Word(String);

impl Word {
    pub fn new(text: &str) -> Result<Self, HangmanError> {
        let text = text.trim();
        let has_letter = text.chars().any(|c| c.is_ascii_alphabetic());
        let well_formed = text.chars().all(|c| c.is_ascii_alphabetic() || c == ' ');

        if !has_letter || !well_formed {
            return Err(HangmanError::InvalidWord(text.to_string()));
        }

        Ok(Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-folded letters in order, separators skipped
    pub fn letters(&self) -> impl Iterator<Item = char> + '_ {
        self.0
            .chars()
            .filter(char::is_ascii_alphabetic)
            .map(|c| c.to_ascii_lowercase())
    }

    pub fn distinct_letters(&self) -> BTreeSet<char> {
        self.letters().collect()
    }

    /// `letter` must already be lowercase
    pub fn contains_letter(&self, letter: char) -> bool {
        self.letters().any(|c| c == letter)
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Word {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Word {
    type Err = HangmanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Word::new(s)
    }
}

/// How the bank picks the word for the next round
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WordSelection {
    #[default]
    Cyclic,
    Random,
}

impl FromStr for WordSelection {
    type Err = HangmanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cyclic" => Ok(WordSelection::Cyclic),
            "random" => Ok(WordSelection::Random),
            other => Err(HangmanError::InvalidConfig(format!(
                "unknown word selection {other:?}, expected \"cyclic\" or \"random\""
            ))),
        }
    }
}

/// Ordered list of candidate words with a cursor to the current one
#[derive(Debug, Clone)]
pub struct WordBank {
    words: Vec<Word>,
    current_index: usize,
}

impl WordBank {
    /// Build a bank from raw words. Fails on an empty list or any entry that
    /// is not a valid [`Word`], so a misconfigured bank is caught at startup.
    pub fn new<I, S>(words: I) -> Result<Self, HangmanError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|word| Word::new(word.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        if words.is_empty() {
            return Err(HangmanError::EmptyBank);
        }

        Ok(Self {
            words,
            current_index: 0,
        })
    }

    /// Create a bank from a newline separated list, skipping blank lines and
    /// `#` comments
    pub fn from_word_list(word_list: &str) -> Result<Self, HangmanError> {
        Self::new(
            word_list
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    pub fn current(&self) -> &Word {
        &self.words[self.current_index]
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Always false for a constructed bank
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Move to the next word, wrapping around at the end of the list
    pub fn advance(&mut self) -> &Word {
        self.current_index = (self.current_index + 1) % self.words.len();
        self.current()
    }

    /// Jump to a random word other than the current one. A single-word bank
    /// stays where it is.
    pub fn advance_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &Word {
        let len = self.words.len();
        if len > 1 {
            let offset = rng.random_range(1..len);
            self.current_index = (self.current_index + offset) % len;
        }
        self.current()
    }

    pub fn next(&mut self, selection: WordSelection) -> &Word {
        match selection {
            WordSelection::Cyclic => self.advance(),
            WordSelection::Random => self.advance_random(&mut rand::rng()),
        }
    }
}
