use std::io;

use thiserror::Error;

/// Reasons a submitted word is refused. The player is simply asked again.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuessError {
    #[error("Not enough letters! (need {expected}, got {actual})")]
    TooShort { expected: usize, actual: usize },
    #[error("Too many letters! (need {expected}, got {actual})")]
    TooLong { expected: usize, actual: usize },
    #[error("Only letters are allowed! ('{0}' is not a letter)")]
    InvalidCharacter(char),
    #[error("Not in word list: {0}")]
    NotInDictionary(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed saved state: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Guess(#[from] GuessError),
    #[error("no target word for day {offset} (word list has {len} entries)")]
    IndexOutOfRange { offset: i64, len: usize },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to load word list '{path}': {reason}")]
    WordList { path: String, reason: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
