use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};

use crate::config::GameConfig;
use crate::error::{Error, GuessError, Result};
use crate::feedback::{
    FeedbackRule, Guess, LetterFeedback, evaluate_guess_with, is_win, keyboard_hints,
};
use crate::history::{GuessHistory, GuessHistoryStore, KeyValueStore, key_for};
use crate::wordbank::WordLists;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    InProgress,
    Won,
    Lost,
}

impl SessionState {
    #[must_use]
    pub fn is_over(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// The answer for `date`: the entry `date - epoch` days into `word_list`.
pub fn compute_target_word(date: NaiveDate, epoch: NaiveDate, word_list: &[String]) -> Result<&str> {
    let offset = (date - epoch).num_days();
    usize::try_from(offset)
        .ok()
        .and_then(|index| word_list.get(index))
        .map(String::as_str)
        .ok_or(Error::IndexOutOfRange {
            offset,
            len: word_list.len(),
        })
}

/// Check a lowercase candidate before it is scored.
pub fn validate_guess(
    candidate: &str,
    length: usize,
    dictionary: &HashSet<String>,
) -> Result<(), GuessError> {
    let actual = candidate.chars().count();
    if actual < length {
        return Err(GuessError::TooShort {
            expected: length,
            actual,
        });
    }
    if actual > length {
        return Err(GuessError::TooLong {
            expected: length,
            actual,
        });
    }
    if let Some(c) = candidate.chars().find(|c| !c.is_ascii_alphabetic()) {
        return Err(GuessError::InvalidCharacter(c));
    }
    if !dictionary.contains(candidate) {
        return Err(GuessError::NotInDictionary(candidate.to_string()));
    }
    Ok(())
}

#[must_use]
pub fn is_game_over(history: &[Guess], max_guesses: usize) -> bool {
    history.iter().any(is_win) || history.len() >= max_guesses
}

fn derive_state(history: &[Guess], max_guesses: usize) -> SessionState {
    if history.iter().any(is_win) {
        SessionState::Won
    } else if history.len() >= max_guesses {
        SessionState::Lost
    } else {
        SessionState::InProgress
    }
}

/// Score saved words against today's target. A different epoch or word list
/// can give the same date another answer, so stored letter states are ignored.
fn rescore(saved: GuessHistory, target: &str, rule: FeedbackRule) -> GuessHistory {
    saved
        .into_iter()
        .map(|old| {
            let guess = evaluate_guess_with(old.word(), target, rule);
            if guess != old {
                log::warn!("Saved guess {old} does not match today's answer, rescored as {guess}");
            }
            guess
        })
        .collect()
}

/// One day's game: the target, the guesses so far, and where they are saved.
#[derive(Debug)]
pub struct GameSession<'w, S> {
    config: GameConfig,
    date: NaiveDate,
    key: String,
    target: String,
    dictionary: &'w HashSet<String>,
    history: GuessHistory,
    store: GuessHistoryStore<S>,
    state: SessionState,
}

/// Purge other days, pick today's target and restore today's guesses.
pub fn start_session<'w, S: KeyValueStore>(
    config: &GameConfig,
    date: NaiveDate,
    words: &'w WordLists,
    store: S,
) -> Result<GameSession<'w, S>> {
    GameSession::start(config, date, words, store)
}

impl<'w, S: KeyValueStore> GameSession<'w, S> {
    pub fn start(
        config: &GameConfig,
        date: NaiveDate,
        words: &'w WordLists,
        store: S,
    ) -> Result<Self> {
        let target = compute_target_word(date, config.epoch, words.targets())?.to_string();
        let key = key_for(date);
        let mut store = GuessHistoryStore::new(store, config.word_length);

        if let Err(e) = store.purge_stale(&key) {
            log::warn!("Could not purge old history: {e}");
        }

        let mut history = store.load(&key);
        if history.len() > config.max_guesses {
            log::warn!(
                "Saved history has {} guesses, keeping the first {}",
                history.len(),
                config.max_guesses
            );
            history.truncate(config.max_guesses);
        }
        let history = rescore(history, &target, config.feedback_rule);
        let state = derive_state(&history, config.max_guesses);
        log::info!(
            "Started session for {date} with {} restored guesses ({state:?})",
            history.len()
        );

        Ok(Self {
            config: config.clone(),
            date,
            key,
            target,
            dictionary: words.dictionary(),
            history,
            store,
            state,
        })
    }

    /// Validate, score, save and record a guess.
    ///
    /// Once the game is won or lost, input is ignored and `Ok(None)` is
    /// returned. A rejected word leaves the session untouched.
    pub fn submit_guess(&mut self, candidate: &str) -> Result<Option<Guess>> {
        if self.state.is_over() {
            log::debug!("Ignoring guess '{candidate}': game is over ({:?})", self.state);
            return Ok(None);
        }

        let candidate = candidate.trim().to_lowercase();
        validate_guess(&candidate, self.config.word_length, self.dictionary)?;

        let guess = evaluate_guess_with(&candidate, &self.target, self.config.feedback_rule);
        self.store.append(&self.key, &guess)?;
        self.history.push(guess.clone());
        self.state = derive_state(&self.history, self.config.max_guesses);

        log::info!(
            "Guess {}/{}: {guess} -> {:?}",
            self.history.len(),
            self.config.max_guesses,
            self.state
        );
        Ok(Some(guess))
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        is_game_over(&self.history, self.config.max_guesses)
    }

    #[must_use]
    pub fn history(&self) -> &[Guess] {
        &self.history
    }

    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn remaining_guesses(&self) -> usize {
        self.config.max_guesses.saturating_sub(self.history.len())
    }

    #[must_use]
    pub fn keyboard_hints(&self) -> BTreeMap<char, LetterFeedback> {
        keyboard_hints(&self.history)
    }

    #[must_use]
    pub fn store(&self) -> &S {
        self.store.store()
    }

    pub fn into_store(self) -> S {
        self.store.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::evaluate_guess;
    use crate::history::MemoryStore;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 1, d).unwrap()
    }

    fn words() -> WordLists {
        let targets = ["crane", "slate", "eerie"].map(String::from).to_vec();
        let dictionary = ["cream", "dusty", "pious", "lumpy", "bight", "fjord", "world", "react"]
            .map(String::from)
            .to_vec();
        WordLists::new(targets, dictionary)
    }

    #[test]
    fn test_compute_target_word_is_deterministic() {
        let lists = words();
        let epoch = day(1);
        assert_eq!(compute_target_word(day(1), epoch, lists.targets()).unwrap(), "crane");
        assert_eq!(compute_target_word(day(2), epoch, lists.targets()).unwrap(), "slate");
        assert_eq!(
            compute_target_word(day(3), epoch, lists.targets()).unwrap(),
            compute_target_word(day(3), epoch, lists.targets()).unwrap()
        );
    }

    #[test]
    fn test_compute_target_word_out_of_range() {
        let lists = words();
        let err = compute_target_word(day(4), day(1), lists.targets()).unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange { offset: 3, len: 3 }));

        // Dates before the epoch have no word either.
        let err = compute_target_word(day(1), day(2), lists.targets()).unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange { offset: -1, len: 3 }));
    }

    #[test]
    fn test_validate_guess() {
        let lists = words();
        let dict = lists.dictionary();
        assert_eq!(validate_guess("cream", 5, dict), Ok(()));
        assert_eq!(validate_guess("crane", 5, dict), Ok(()));
        assert_eq!(
            validate_guess("cra", 5, dict),
            Err(GuessError::TooShort { expected: 5, actual: 3 })
        );
        assert_eq!(
            validate_guess("cranes", 5, dict),
            Err(GuessError::TooLong { expected: 5, actual: 6 })
        );
        assert_eq!(
            validate_guess("cr4ne", 5, dict),
            Err(GuessError::InvalidCharacter('4'))
        );
        assert_eq!(
            validate_guess("zzzzz", 5, dict),
            Err(GuessError::NotInDictionary("zzzzz".to_string()))
        );
    }

    #[test]
    fn test_is_game_over_after_six_misses() {
        let misses: Vec<Guess> = ["dusty", "pious", "lumpy", "bight", "fjord", "dusty"]
            .iter()
            .map(|w| evaluate_guess(w, "crane"))
            .collect();
        for n in 1..6 {
            assert!(!is_game_over(&misses[..n], 6), "over after {n} guesses");
        }
        assert!(is_game_over(&misses, 6));
        assert!(!is_game_over(&[], 6));
    }

    #[test]
    fn test_is_game_over_on_win() {
        let history = vec![evaluate_guess("dusty", "crane"), evaluate_guess("crane", "crane")];
        assert!(is_game_over(&history, 6));
    }

    #[test]
    fn test_winning_guess_transitions_to_won() {
        let lists = words();
        let mut session =
            start_session(&GameConfig { epoch: day(1), ..GameConfig::default() }, day(1), &lists, MemoryStore::new())
                .unwrap();
        assert_eq!(session.state(), SessionState::InProgress);

        let guess = session.submit_guess("CRANE").unwrap().unwrap();
        assert!(guess.is_correct());
        assert_eq!(session.state(), SessionState::Won);
        assert!(session.is_over());

        // Further input is ignored, not an error, and not saved.
        assert!(session.submit_guess("cream").unwrap().is_none());
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_six_misses_transition_to_lost() {
        let lists = words();
        let config = GameConfig { epoch: day(1), ..GameConfig::default() };
        let mut session = start_session(&config, day(1), &lists, MemoryStore::new()).unwrap();

        for (i, word) in ["dusty", "pious", "lumpy", "bight", "fjord", "world"].iter().enumerate() {
            assert_eq!(session.state(), SessionState::InProgress);
            assert_eq!(session.remaining_guesses(), 6 - i);
            session.submit_guess(word).unwrap().unwrap();
        }
        assert_eq!(session.state(), SessionState::Lost);
        assert_eq!(session.remaining_guesses(), 0);
        assert!(session.submit_guess("crane").unwrap().is_none());
        assert_eq!(session.target(), "crane");
    }

    #[test]
    fn test_rejected_guess_leaves_session_untouched() {
        let lists = words();
        let config = GameConfig { epoch: day(1), ..GameConfig::default() };
        let mut session = start_session(&config, day(1), &lists, MemoryStore::new()).unwrap();

        let err = session.submit_guess("zzzzz").unwrap_err();
        assert!(matches!(err, Error::Guess(GuessError::NotInDictionary(_))));
        let err = session.submit_guess("cr").unwrap_err();
        assert!(matches!(err, Error::Guess(GuessError::TooShort { .. })));

        assert!(session.history().is_empty());
        assert!(session.store().get(session.key()).unwrap().is_none());
    }

    #[test]
    fn test_restores_in_progress_game() {
        let lists = words();
        let config = GameConfig { epoch: day(1), ..GameConfig::default() };

        let mut session = start_session(&config, day(1), &lists, MemoryStore::new()).unwrap();
        for word in ["dusty", "cream", "react"] {
            session.submit_guess(word).unwrap();
        }
        let store = session.into_store();

        let restored = start_session(&config, day(1), &lists, store).unwrap();
        assert_eq!(restored.history().len(), 3);
        assert_eq!(restored.history()[1].word(), "cream");
        assert_eq!(restored.state(), SessionState::InProgress);
        assert_eq!(restored.remaining_guesses(), 3);
    }

    #[test]
    fn test_restores_directly_into_won() {
        let lists = words();
        let config = GameConfig { epoch: day(1), ..GameConfig::default() };
        let mut store = GuessHistoryStore::new(MemoryStore::new(), 5);
        store.append(&key_for(day(1)), &evaluate_guess("crane", "crane")).unwrap();

        let session = start_session(&config, day(1), &lists, store.into_inner()).unwrap();
        assert_eq!(session.state(), SessionState::Won);
    }

    #[test]
    fn test_restores_directly_into_lost() {
        let lists = words();
        let config = GameConfig { epoch: day(1), ..GameConfig::default() };
        let mut store = GuessHistoryStore::new(MemoryStore::new(), 5);
        for _ in 0..6 {
            store.append(&key_for(day(1)), &evaluate_guess("dusty", "crane")).unwrap();
        }

        let session = start_session(&config, day(1), &lists, store.into_inner()).unwrap();
        assert_eq!(session.state(), SessionState::Lost);
    }

    #[test]
    fn test_restart_with_another_epoch_rescores_saved_guesses() {
        let lists = words();
        let old = GameConfig { epoch: day(1), ..GameConfig::default() };
        let mut session = start_session(&old, day(2), &lists, MemoryStore::new()).unwrap();
        assert_eq!(session.target(), "slate");
        session.submit_guess("slate").unwrap();
        assert_eq!(session.state(), SessionState::Won);
        let store = session.into_store();

        // Same day, but now it is day zero and the answer is "crane".
        let new = GameConfig { epoch: day(2), ..GameConfig::default() };
        let restored = start_session(&new, day(2), &lists, store).unwrap();
        assert_eq!(restored.target(), "crane");
        assert_eq!(restored.state(), SessionState::InProgress);
        assert_eq!(restored.history().len(), 1);
        assert_eq!(restored.history()[0].pattern(), "XXGXG");
        assert!(!restored.history()[0].is_correct());
        assert_eq!(restored.remaining_guesses(), 5);
    }

    #[test]
    fn test_restore_ignores_stored_letter_states() {
        let lists = words();
        let config = GameConfig { epoch: day(1), ..GameConfig::default() };
        let letters: Vec<String> = "crane"
            .chars()
            .map(|c| format!(r#"{{"letter":"{c}","state":"wrong"}}"#))
            .collect();
        let raw = format!(
            r#"[{{"word":{{"guess":"crane","correct":true}},"letters":[{}]}}]"#,
            letters.join(",")
        );
        let mut store = MemoryStore::new();
        store.set(&key_for(day(1)), &raw).unwrap();

        let session = start_session(&config, day(1), &lists, store).unwrap();
        assert_eq!(session.state(), SessionState::Won);
        assert_eq!(session.history()[0].pattern(), "GGGGG");
    }

    #[test]
    fn test_start_purges_previous_days() {
        let lists = words();
        let config = GameConfig { epoch: day(1), ..GameConfig::default() };

        let mut yesterday = start_session(&config, day(1), &lists, MemoryStore::new()).unwrap();
        yesterday.submit_guess("dusty").unwrap();
        let store = yesterday.into_store();

        let today = start_session(&config, day(2), &lists, store).unwrap();
        assert_eq!(today.target(), "slate");
        assert!(today.history().is_empty());
        assert!(today.store().keys().unwrap().is_empty());
    }

    #[test]
    fn test_start_fails_past_end_of_word_list() {
        let lists = words();
        let config = GameConfig { epoch: day(1), ..GameConfig::default() };
        let err = start_session(&config, day(10), &lists, MemoryStore::new()).unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange { offset: 9, len: 3 }));
    }

    #[test]
    fn test_standard_rule_is_applied() {
        let lists = words();
        let config = GameConfig {
            epoch: day(1),
            feedback_rule: FeedbackRule::Standard,
            ..GameConfig::default()
        };
        // Target "crane" has one E, already matched by the last letter.
        let mut session = start_session(&config, day(1), &lists, MemoryStore::new()).unwrap();
        let guess = session.submit_guess("eerie").unwrap().unwrap();
        assert_eq!(guess.pattern(), "XXYXG");
    }

    #[test]
    fn test_keyboard_hints_follow_history() {
        let lists = words();
        let config = GameConfig { epoch: day(1), ..GameConfig::default() };
        let mut session = start_session(&config, day(1), &lists, MemoryStore::new()).unwrap();
        session.submit_guess("cream").unwrap();

        let hints = session.keyboard_hints();
        assert_eq!(hints[&'c'], LetterFeedback::Correct);
        assert_eq!(hints[&'m'], LetterFeedback::Wrong);
    }
}
