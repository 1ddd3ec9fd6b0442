use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::config::WORD_LENGTH;
use crate::error::{Error, Result};

/// Daily answers, in the order they are played starting from the epoch.
pub const EMBEDDED_TARGETS: &str = include_str!("resources/targets.txt");
/// Extra words accepted as guesses but never chosen as answers.
pub const EMBEDDED_DICTIONARY: &str = include_str!("resources/dictionary.txt");

fn normalize(line: &str, length: usize) -> Option<String> {
    let word = line.trim().to_lowercase();
    (word.chars().count() == length && word.chars().all(|c| c.is_ascii_alphabetic()))
        .then_some(word)
}

/// Parse a newline-delimited list, keeping order and dropping lines that are
/// not `length` ASCII letters.
pub fn load_wordbank_from_str(data: &str, length: usize) -> Vec<String> {
    data.lines()
        .filter_map(|line| normalize(line, length))
        .collect()
}

pub fn load_wordbank_from_file<P: AsRef<Path>>(path: P, length: usize) -> io::Result<Vec<String>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut words = Vec::new();
    for line in reader.lines() {
        if let Some(word) = normalize(&line?, length) {
            words.push(word);
        }
    }
    Ok(words)
}

/// The ordered answer list and the set of accepted guesses.
#[derive(Clone, Debug)]
pub struct WordLists {
    targets: Vec<String>,
    dictionary: HashSet<String>,
}

impl WordLists {
    /// Every target is also accepted as a guess.
    #[must_use]
    pub fn new(targets: Vec<String>, dictionary: impl IntoIterator<Item = String>) -> Self {
        let mut dictionary: HashSet<String> = dictionary.into_iter().collect();
        dictionary.extend(targets.iter().cloned());
        Self {
            targets,
            dictionary,
        }
    }

    #[must_use]
    pub fn embedded() -> Self {
        Self::new(
            load_wordbank_from_str(EMBEDDED_TARGETS, WORD_LENGTH),
            load_wordbank_from_str(EMBEDDED_DICTIONARY, WORD_LENGTH),
        )
    }

    /// Load lists from files, falling back to the embedded ones for any path
    /// that is not given.
    pub fn load(
        targets_path: Option<&Path>,
        dictionary_path: Option<&Path>,
        length: usize,
    ) -> Result<Self> {
        let targets = match targets_path {
            Some(path) => read_list(path, length)?,
            None => load_wordbank_from_str(EMBEDDED_TARGETS, length),
        };
        let dictionary = match dictionary_path {
            Some(path) => read_list(path, length)?,
            None => load_wordbank_from_str(EMBEDDED_DICTIONARY, length),
        };
        if targets.is_empty() {
            return Err(Error::WordList {
                path: targets_path.map_or_else(
                    || "<embedded>".to_string(),
                    |p| p.display().to_string(),
                ),
                reason: format!("no {length}-letter words"),
            });
        }
        log::debug!(
            "Loaded {} target words and {} dictionary words",
            targets.len(),
            dictionary.len()
        );
        Ok(Self::new(targets, dictionary))
    }

    #[must_use]
    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    #[must_use]
    pub fn dictionary(&self) -> &HashSet<String> {
        &self.dictionary
    }
}

fn read_list(path: &Path, length: usize) -> Result<Vec<String>> {
    load_wordbank_from_file(path, length).map_err(|e| Error::WordList {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
