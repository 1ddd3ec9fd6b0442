use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::error::{Error, GuessError, Result};
use crate::feedback::{Guess, LetterFeedback};
use crate::history::KeyValueStore;
use crate::session::{GameSession, SessionState};
use crate::{debug_log, info_log};

/// User action from the interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    Guess(String),
    Exit,
}

/// What the interface shows before the first prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntroInfo {
    pub date: NaiveDate,
    pub word_length: usize,
    pub max_guesses: usize,
}

/// Trait for game UI interactions - allows different UI implementations (CLI, TUI)
pub trait GameInterface {
    fn display_intro(&mut self, info: &IntroInfo);
    /// Guesses already made today, replayed after a restart.
    fn display_restored(&mut self, history: &[Guess], hints: &BTreeMap<char, LetterFeedback>);
    /// `None` means nothing usable was entered and the loop should ask again.
    fn read_guess(&mut self) -> Option<UserAction>;
    fn display_guess(&mut self, guess: &Guess, hints: &BTreeMap<char, LetterFeedback>);
    fn display_rejection(&mut self, error: &GuessError);
    fn display_win(&mut self, guesses_used: usize, target: &str);
    fn display_loss(&mut self, target: &str);
    fn display_exit_message(&mut self);
}

/// Play `session` through `interface` until the game ends or the player quits.
///
/// Returns the state the session was left in. Rejected words are shown and
/// the player is asked again; only storage failures abort the loop.
pub fn game_loop<S, I>(session: &mut GameSession<'_, S>, interface: &mut I) -> Result<SessionState>
where
    S: KeyValueStore,
    I: GameInterface + ?Sized,
{
    interface.display_intro(&IntroInfo {
        date: session.date(),
        word_length: session.config().word_length,
        max_guesses: session.config().max_guesses,
    });
    if !session.history().is_empty() {
        info_log!("game_loop() - Restoring {} guesses", session.history().len());
        interface.display_restored(session.history(), &session.keyboard_hints());
    }

    loop {
        match session.state() {
            SessionState::Won => {
                interface.display_win(session.history().len(), session.target());
                return Ok(SessionState::Won);
            }
            SessionState::Lost => {
                interface.display_loss(session.target());
                return Ok(SessionState::Lost);
            }
            SessionState::InProgress => {}
        }

        let word = match interface.read_guess() {
            Some(UserAction::Guess(word)) => word,
            Some(UserAction::Exit) => {
                interface.display_exit_message();
                return Ok(session.state());
            }
            None => continue,
        };

        match session.submit_guess(&word) {
            Ok(Some(guess)) => interface.display_guess(&guess, &session.keyboard_hints()),
            Ok(None) => {
                debug_log!("game_loop() - Guess '{}' ignored", word);
            }
            Err(Error::Guess(e)) => {
                debug_log!("game_loop() - Guess '{}' rejected: {}", word, e);
                interface.display_rejection(&e);
            }
            Err(e) => return Err(e),
        }
    }
}
