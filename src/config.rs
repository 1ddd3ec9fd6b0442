use chrono::NaiveDate;

use crate::feedback::FeedbackRule;

pub const WORD_LENGTH: usize = 5;
pub const MAX_GUESSES: usize = 6;

/// Day zero of the target list: the first word is the answer on this date.
#[must_use]
pub fn default_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 1, 1).unwrap_or_default()
}

/// Rules of a session. Passed explicitly into `start_session`; nothing is
/// read from the environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub word_length: usize,
    pub max_guesses: usize,
    pub epoch: NaiveDate,
    pub feedback_rule: FeedbackRule,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            word_length: WORD_LENGTH,
            max_guesses: MAX_GUESSES,
            epoch: default_epoch(),
            feedback_rule: FeedbackRule::Simple,
        }
    }
}
