use thiserror::Error;

use crate::StatsPortError;

#[derive(Debug, Error)]
pub enum HangmanError {
    #[error("Word bank is empty")]
    EmptyBank,

    #[error("Invalid word: {0:?}")]
    InvalidWord(String),

    #[error("Invalid player name: {0:?}")]
    InvalidPlayerName(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Stats(#[from] StatsPortError),
}
