use chrono::NaiveDate;
use clap::Parser;
use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::PathBuf;

use crate::config::{GameConfig, MAX_GUESSES, WORD_LENGTH, default_epoch};
use crate::error::GuessError;
use crate::feedback::{FeedbackRule, Guess, LetterFeedback};
use crate::game_state::{GameInterface, IntroInfo, UserAction};
use crate::history::FileStore;

const LOG_FILE_NAME: &str = "daily-wordle.log";

/// Daily Wordle: one five-letter word per day, six tries.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a newline-delimited list of daily answers
    #[arg(short = 't', long = "targets")]
    pub targets_path: Option<PathBuf>,

    /// Path to a newline-delimited list of extra accepted guesses
    #[arg(short = 'd', long = "dictionary")]
    pub dictionary_path: Option<PathBuf>,

    /// Play the puzzle of this date (YYYY-MM-DD) instead of today's
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Date whose answer is the first word of the list
    #[arg(long, default_value_t = default_epoch())]
    pub epoch: NaiveDate,

    /// Number of guesses allowed per day
    #[arg(long, default_value_t = MAX_GUESSES, value_parser = parse_max_guesses)]
    pub max_guesses: usize,

    /// Mark repeated letters yellow only as often as they occur in the answer
    #[arg(long)]
    pub standard_feedback: bool,

    /// Directory where the day's guesses are saved
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Use the line-based interface instead of the full-screen one
    #[arg(long)]
    pub plain: bool,

    /// Log debug output (RUST_LOG overrides)
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_max_guesses(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|e| format!("{e}"))?;
    if n == 0 {
        return Err("must allow at least one guess".to_string());
    }
    Ok(n)
}

impl Cli {
    #[must_use]
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            word_length: WORD_LENGTH,
            max_guesses: self.max_guesses,
            epoch: self.epoch,
            feedback_rule: if self.standard_feedback {
                FeedbackRule::Standard
            } else {
                FeedbackRule::Simple
            },
        }
    }

    /// `--data-dir`, or the platform data directory.
    #[must_use]
    pub fn data_dir(&self) -> Option<PathBuf> {
        self.data_dir.clone().or_else(FileStore::default_dir)
    }

    /// Where logs go while the full-screen interface owns the terminal.
    /// `None` in plain mode, where stderr is fine.
    #[must_use]
    pub fn log_file(&self) -> Option<PathBuf> {
        if self.plain {
            return None;
        }
        self.data_dir().map(|dir| dir.join(LOG_FILE_NAME))
    }
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

// UI Input/Output functions

/// `CREAM  G G Y Y X`
#[must_use]
pub fn format_guess(guess: &Guess) -> String {
    let letters: String = guess
        .letters()
        .iter()
        .map(|(c, _)| c.to_ascii_uppercase())
        .collect();
    let marks: Vec<String> = guess.feedback().map(|f| f.to_char().to_string()).collect();
    format!("{letters}  {}", marks.join(" "))
}

/// Letters grouped by the best feedback they have received.
#[must_use]
pub fn format_hints(hints: &BTreeMap<char, LetterFeedback>) -> String {
    let group = |wanted: LetterFeedback| -> String {
        hints
            .iter()
            .filter(|&(_, &state)| state == wanted)
            .map(|(c, _)| c.to_ascii_uppercase().to_string())
            .collect::<Vec<_>>()
            .join(" ")
    };
    format!(
        "In place: [{}]  Elsewhere: [{}]  Not in word: [{}]",
        group(LetterFeedback::Correct),
        group(LetterFeedback::WrongLocation),
        group(LetterFeedback::Wrong)
    )
}

pub fn display_intro(info: &IntroInfo) {
    println!(
        "Daily Wordle for {}: guess the {}-letter word in {} tries.",
        info.date, info.word_length, info.max_guesses
    );
    println!("Feedback: G=right spot, Y=wrong spot, X=not in word.");
}

pub fn display_restored(history: &[Guess], hints: &BTreeMap<char, LetterFeedback>) {
    println!("Restored {} guess(es) from earlier today:", history.len());
    for guess in history {
        println!("{}", format_guess(guess));
    }
    println!("{}", format_hints(hints));
}

pub fn display_guess(guess: &Guess, hints: &BTreeMap<char, LetterFeedback>) {
    println!("{}", format_guess(guess));
    println!("{}", format_hints(hints));
}

pub fn display_rejection(error: &GuessError) {
    println!("{error}");
}

pub fn display_win(guesses_used: usize, target: &str) {
    println!(
        "You win! {} in {guesses_used} {}.",
        target.to_uppercase(),
        if guesses_used == 1 { "guess" } else { "guesses" }
    );
}

pub fn display_loss(target: &str) {
    println!("Out of guesses. The word was {}.", target.to_uppercase());
}

pub fn display_exit_message() {
    println!("Exiting. Your progress is saved.");
}

pub fn read_guess<R: BufRead>(reader: &mut R, word_length: usize) -> Option<UserAction> {
    println!("\nEnter your guess ({word_length} letters, or 'exit' to quit):");
    let mut input = String::new();
    match reader.read_line(&mut input) {
        Ok(0) | Err(_) => return Some(UserAction::Exit),
        Ok(_) => {}
    }
    let input = input.trim().to_lowercase();

    match input.as_str() {
        "" => None,
        "exit" => Some(UserAction::Exit),
        _ => Some(UserAction::Guess(input)),
    }
}

/// CLI implementation of the GameInterface trait
/// This struct wraps a BufRead reader and implements the game interface for CLI interaction
pub struct CliInterface<R: BufRead> {
    reader: R,
    word_length: usize,
}

impl<R: BufRead> CliInterface<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            word_length: WORD_LENGTH,
        }
    }
}

impl<R: BufRead> GameInterface for CliInterface<R> {
    fn display_intro(&mut self, info: &IntroInfo) {
        self.word_length = info.word_length;
        display_intro(info);
    }

    fn display_restored(&mut self, history: &[Guess], hints: &BTreeMap<char, LetterFeedback>) {
        display_restored(history, hints);
    }

    fn read_guess(&mut self) -> Option<UserAction> {
        read_guess(&mut self.reader, self.word_length)
    }

    fn display_guess(&mut self, guess: &Guess, hints: &BTreeMap<char, LetterFeedback>) {
        display_guess(guess, hints);
    }

    fn display_rejection(&mut self, error: &GuessError) {
        display_rejection(error);
    }

    fn display_win(&mut self, guesses_used: usize, target: &str) {
        display_win(guesses_used, target);
    }

    fn display_loss(&mut self, target: &str) {
        display_loss(target);
    }

    fn display_exit_message(&mut self) {
        display_exit_message();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::{evaluate_guess, keyboard_hints};
    use std::io::Cursor;

    #[test]
    fn test_parse_cli_defaults() {
        let cli = Cli::try_parse_from(["daily-wordle"]).unwrap();
        assert_eq!(cli.targets_path, None);
        assert_eq!(cli.date, None);
        assert!(!cli.plain);
        assert_eq!(cli.game_config(), GameConfig::default());
    }

    #[test]
    fn test_parse_cli_with_options() {
        let cli = Cli::try_parse_from([
            "daily-wordle",
            "--targets",
            "answers.txt",
            "--date",
            "2024-03-09",
            "--epoch",
            "2024-01-01",
            "--max-guesses",
            "8",
            "--standard-feedback",
            "--data-dir",
            "/tmp/wordle",
            "--plain",
        ])
        .unwrap();

        assert_eq!(cli.targets_path, Some(PathBuf::from("answers.txt")));
        assert_eq!(cli.date, NaiveDate::from_ymd_opt(2024, 3, 9));
        assert_eq!(cli.data_dir(), Some(PathBuf::from("/tmp/wordle")));
        assert!(cli.plain);

        let config = cli.game_config();
        assert_eq!(config.max_guesses, 8);
        assert_eq!(config.epoch, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(config.feedback_rule, FeedbackRule::Standard);
    }

    #[test]
    fn test_log_file_only_for_full_screen() {
        let tui = Cli::try_parse_from(["daily-wordle", "--data-dir", "/tmp/wordle", "-v"]).unwrap();
        assert_eq!(tui.log_file(), Some(PathBuf::from("/tmp/wordle/daily-wordle.log")));

        let plain =
            Cli::try_parse_from(["daily-wordle", "--data-dir", "/tmp/wordle", "-v", "--plain"]).unwrap();
        assert_eq!(plain.log_file(), None);
    }

    #[test]
    fn test_parse_cli_rejects_bad_values() {
        assert!(Cli::try_parse_from(["daily-wordle", "--max-guesses", "0"]).is_err());
        assert!(Cli::try_parse_from(["daily-wordle", "--date", "09/03/2024"]).is_err());
    }

    #[test]
    fn test_format_guess() {
        let guess = evaluate_guess("cream", "crane");
        assert_eq!(format_guess(&guess), "CREAM  G G Y Y X");
    }

    #[test]
    fn test_format_hints() {
        let guess = evaluate_guess("cream", "crane");
        let hints = keyboard_hints([&guess]);
        assert_eq!(
            format_hints(&hints),
            "In place: [C R]  Elsewhere: [A E]  Not in word: [M]"
        );
    }

    #[test]
    fn test_read_guess_lowercases_and_trims() {
        let mut reader = Cursor::new("  CrAnE  \n");
        assert_eq!(
            read_guess(&mut reader, 5),
            Some(UserAction::Guess("crane".to_string()))
        );
    }

    #[test]
    fn test_read_guess_exit_case_insensitive() {
        let mut reader = Cursor::new("EXIT\n");
        assert_eq!(read_guess(&mut reader, 5), Some(UserAction::Exit));
    }

    #[test]
    fn test_read_guess_blank_line_asks_again() {
        let mut reader = Cursor::new("\n");
        assert_eq!(read_guess(&mut reader, 5), None);
    }

    #[test]
    fn test_read_guess_end_of_input_exits() {
        let mut reader = Cursor::new("");
        assert_eq!(read_guess(&mut reader, 5), Some(UserAction::Exit));
    }

    #[test]
    fn test_read_guess_passes_invalid_words_through() {
        // Validation belongs to the session, which reports why a word is refused.
        let mut reader = Cursor::new("cr4ne\n");
        assert_eq!(
            read_guess(&mut reader, 5),
            Some(UserAction::Guess("cr4ne".to_string()))
        );
    }
}
