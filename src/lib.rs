// Library interface for daily-wordle
// The binary and the integration tests both drive the game through these modules

pub mod cli;
pub mod config;
pub mod error;
pub mod feedback;
pub mod game_state;
pub mod history;
pub mod logging;
pub mod session;
pub mod tui;
pub mod wordbank;

// Re-export commonly used items for easier testing
pub use config::GameConfig;
pub use error::{Error, GuessError, StoreError};
pub use feedback::{FeedbackRule, Guess, LetterFeedback, evaluate_guess, evaluate_guess_with, is_win};
pub use game_state::{GameInterface, UserAction, game_loop};
pub use history::{FileStore, GuessHistoryStore, KeyValueStore, MemoryStore, key_for};
pub use session::{
    GameSession, SessionState, compute_target_word, is_game_over, start_session, validate_guess,
};
pub use wordbank::{WordLists, load_wordbank_from_file, load_wordbank_from_str};
