//! Per-day persistence of submitted guesses.
//!
//! Each day's guesses live under their own key (see [`key_for`]) in a
//! [`KeyValueStore`]. At startup every other day's key is purged, then
//! today's history is loaded to restore the board.
//!
//! The stored value keeps the layout used by the browser version of the game:
//!
//! ```json
//! [{"word":{"guess":"cream","correct":false},
//!   "letters":[{"letter":"c","state":"correct"}, ...]}]
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::feedback::{Guess, LetterFeedback};

pub const KEY_PREFIX: &str = "WORDLE-";
const KEY_SUFFIX: &str = "-GUESS";
const APP_DIR_NAME: &str = "daily-wordle";

/// Guesses made on one day, oldest first.
pub type GuessHistory = Vec<Guess>;

/// Storage key for the guesses of `date`, e.g. `WORDLE-2024-03-09-GUESS`.
#[must_use]
pub fn key_for(date: NaiveDate) -> String {
    format!("{KEY_PREFIX}{}{KEY_SUFFIX}", date.format("%Y-%m-%d"))
}

/// Minimal string key-value capability the history needs.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn keys(&self) -> Result<Vec<String>, StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        (**self).keys()
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.entries.keys().cloned().collect())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// `<platform data dir>/daily-wordle`, if the platform has one.
    #[must_use]
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join(APP_DIR_NAME))
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json")
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct StoredWord {
    guess: String,
    correct: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct StoredLetter {
    letter: char,
    state: LetterFeedback,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct StoredGuess {
    word: StoredWord,
    letters: Vec<StoredLetter>,
}

impl From<&Guess> for StoredGuess {
    fn from(guess: &Guess) -> Self {
        Self {
            word: StoredWord {
                guess: guess.word().to_string(),
                correct: guess.is_correct(),
            },
            letters: guess
                .letters()
                .iter()
                .map(|&(letter, state)| StoredLetter { letter, state })
                .collect(),
        }
    }
}

impl StoredGuess {
    fn into_guess(self) -> Guess {
        let letters = self
            .letters
            .into_iter()
            .map(|l| (l.letter, l.state))
            .collect();
        Guess::from_parts(self.word.guess, letters, self.word.correct)
    }
}

/// Namespaced history of the day's guesses on top of a [`KeyValueStore`].
#[derive(Debug)]
pub struct GuessHistoryStore<S> {
    store: S,
    word_length: usize,
}

impl<S: KeyValueStore> GuessHistoryStore<S> {
    pub fn new(store: S, word_length: usize) -> Self {
        Self { store, word_length }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Remove every history key other than `current_key`. Returns how many
    /// were removed.
    pub fn purge_stale(&mut self, current_key: &str) -> Result<usize, StoreError> {
        let stale: Vec<String> = self
            .store
            .keys()?
            .into_iter()
            .filter(|key| key.starts_with(KEY_PREFIX) && key != current_key)
            .collect();
        for key in &stale {
            log::info!("Purging stale history '{key}'");
            self.store.remove(key)?;
        }
        Ok(stale.len())
    }

    /// Today's history. Missing, unreadable or malformed state is treated as
    /// no history at all.
    pub fn load(&self, key: &str) -> GuessHistory {
        self.read_entries(key)
            .into_iter()
            .filter(|entry| {
                let keep = entry.letters.len() == self.word_length
                    && entry.word.guess.chars().count() == self.word_length;
                if !keep {
                    log::warn!("Skipping saved guess '{}' with wrong length", entry.word.guess);
                }
                keep
            })
            .map(StoredGuess::into_guess)
            .collect()
    }

    /// Read-modify-write: re-serializes the whole sequence with `guess` last.
    /// Callers must not append to the same key concurrently.
    pub fn append(&mut self, key: &str, guess: &Guess) -> Result<(), StoreError> {
        let mut entries = self.read_entries(key);
        entries.push(StoredGuess::from(guess));
        let value = serde_json::to_string(&entries)?;
        self.store.set(key, &value)?;
        log::debug!("Saved guess '{}' under '{key}' ({} total)", guess.word(), entries.len());
        Ok(())
    }

    fn read_entries(&self, key: &str) -> Vec<StoredGuess> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                log::warn!("Could not read history '{key}': {e}");
                return Vec::new();
            }
        };
        match serde_json::from_str::<Option<Vec<StoredGuess>>>(&raw) {
            Ok(entries) => entries.unwrap_or_default(),
            Err(e) => {
                log::warn!("Ignoring malformed history '{key}': {e}");
                Vec::new()
            }
        }
    }
}
