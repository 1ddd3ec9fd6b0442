//! TUI (Terminal User Interface) module for Daily Wordle
//!
//! This module provides an interactive terminal interface using Ratatui.
//!
//! # Architecture
//! - `BoardState`: everything that is drawn, plus key handling. No terminal
//!   access, so it can be rendered into a test backend.
//! - `TuiInterface`: owns the terminal and implements `GameInterface`
//!
//! # State Machine
//! - `EnteringGuess` → (Enter) → back to `EnteringGuess` with a new row, or
//!   `GameOver` once the session is won or lost
//! - `GameOver` waits for any key and then leaves

use crate::error::GuessError;
use crate::feedback::{Guess, LetterFeedback};
use crate::game_state::{GameInterface, IntroInfo, UserAction};
use crate::{debug_log, info_log};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::collections::BTreeMap;
use std::io;
use std::time::Duration;

const EVENT_POLL_TIMEOUT_MS: u64 = 100;
const ROW_SPACING: u16 = 2;
const KEYBOARD_ROWS: [&str; 3] = ["qwertyuiop", "asdfghjkl", "zxcvbnm"];

// Style constants for consistent UI
const HEADER_STYLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
const ERROR_STYLE: Style = Style::new().fg(Color::Red);
const SUCCESS_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
const INFO_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum LetterState {
    Empty,
    Entered,
    Correct,       // Green
    WrongLocation, // Yellow
    Wrong,         // Gray
}

impl From<LetterFeedback> for LetterState {
    fn from(feedback: LetterFeedback) -> Self {
        match feedback {
            LetterFeedback::Correct => Self::Correct,
            LetterFeedback::WrongLocation => Self::WrongLocation,
            LetterFeedback::Wrong => Self::Wrong,
        }
    }
}

impl LetterState {
    fn colors(self) -> (Color, Color) {
        match self {
            Self::Empty | Self::Entered => (Color::DarkGray, Color::White),
            Self::Correct => (Color::Green, Color::Black),
            Self::WrongLocation => (Color::Yellow, Color::Black),
            Self::Wrong => (Color::Gray, Color::White),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct GuessRow {
    letters: Vec<char>,
    states: Vec<LetterState>,
}

impl GuessRow {
    fn from_guess(guess: &Guess) -> Self {
        Self {
            letters: guess
                .letters()
                .iter()
                .map(|(c, _)| c.to_ascii_uppercase())
                .collect(),
            states: guess.feedback().map(LetterState::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TuiState {
    EnteringGuess,
    GameOver,
}

/// Everything on screen, independent of the terminal.
#[derive(Debug)]
pub struct BoardState {
    word_length: usize,
    max_guesses: usize,
    title: String,
    rows: Vec<GuessRow>,
    current_input: String,
    hints: BTreeMap<char, LetterFeedback>,
    state: TuiState,
    message: String,
    error_message: String,
    status: String,
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            word_length: crate::config::WORD_LENGTH,
            max_guesses: crate::config::MAX_GUESSES,
            title: "DAILY WORDLE".to_string(),
            rows: Vec::new(),
            current_input: String::new(),
            hints: BTreeMap::new(),
            state: TuiState::EnteringGuess,
            message: String::new(),
            error_message: String::new(),
            status: "Ready to start".to_string(),
        }
    }
}

impl BoardState {
    fn has_modifier_keys(key: &KeyEvent) -> bool {
        key.modifiers.contains(KeyModifiers::ALT) || key.modifiers.contains(KeyModifiers::CONTROL)
    }

    /// Apply one key press. Returns an action when the game loop must act.
    fn handle_key(&mut self, key: KeyEvent) -> Option<UserAction> {
        // Only process Press events, ignore Release and Repeat to avoid double input
        if key.kind != KeyEventKind::Press {
            return None;
        }

        if self.state == TuiState::GameOver {
            debug_log!("handle_key() - Game over, any key leaves");
            return Some(UserAction::Exit);
        }

        match key.code {
            KeyCode::Char(c) if c.is_ascii_alphabetic() => {
                if Self::has_modifier_keys(&key) {
                    debug_log!("handle_key() - Ignoring character with modifier: {:?}", key.modifiers);
                } else if self.current_input.chars().count() < self.word_length {
                    self.error_message.clear();
                    self.current_input.push(c.to_ascii_lowercase());
                    debug_log!("handle_key() - Input now: '{}'", self.current_input);
                }
            }
            KeyCode::Char(c) if !c.is_control() => {
                self.error_message = format!("Only letters are allowed! ('{c}' is not a letter)");
            }
            KeyCode::Backspace | KeyCode::Delete => {
                self.error_message.clear();
                self.current_input.pop();
            }
            KeyCode::Enter => {
                info_log!("handle_key() - Submitting '{}'", self.current_input);
                return Some(UserAction::Guess(self.current_input.clone()));
            }
            KeyCode::Esc => {
                info_log!("handle_key() - ESC pressed, returning Exit");
                return Some(UserAction::Exit);
            }
            _ => {
                debug_log!("handle_key() - Ignoring key: {:?}", key.code);
            }
        }
        None
    }

    fn push_guess(&mut self, guess: &Guess, hints: &BTreeMap<char, LetterFeedback>) {
        self.rows.push(GuessRow::from_guess(guess));
        self.hints.clone_from(hints);
        self.current_input.clear();
        self.error_message.clear();
    }

    fn game_over(&mut self, message: String) {
        self.state = TuiState::GameOver;
        self.status = "Game over - press any key to leave".to_string();
        self.message = message;
    }

    fn should_show_current_input(&self) -> bool {
        self.state == TuiState::EnteringGuess && self.rows.len() < self.max_guesses
    }
}

/// Render the complete UI layout.
fn render_static(f: &mut Frame, board: &BoardState) {
    let board_height = u16::try_from(board.max_guesses)
        .unwrap_or(u16::MAX)
        .saturating_mul(ROW_SPACING)
        .saturating_add(2);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),            // Title
            Constraint::Length(board_height), // Game board
            Constraint::Length(5),            // Keyboard
            Constraint::Min(3),               // Messages (takes remaining space)
            Constraint::Length(3),            // Status line
            Constraint::Length(3),            // Instructions
        ])
        .split(f.area());

    render_title(f, chunks[0], &board.title);
    render_board(f, chunks[1], board);
    render_keyboard(f, chunks[2], &board.hints);
    render_messages(f, chunks[3], &board.message, &board.error_message);
    render_status(f, chunks[4], &board.status);
    render_instructions(f, chunks[5], board.state);
}

fn render_title(f: &mut Frame, area: Rect, title: &str) {
    let title = Paragraph::new(title.to_string())
        .style(HEADER_STYLE)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, area);
}

fn render_board(f: &mut Frame, area: Rect, board: &BoardState) {
    let block = Block::default().title("Guesses").borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    for (row_index, row) in board.rows.iter().enumerate() {
        let cells = row.letters.iter().copied().zip(row.states.iter().copied());
        render_row(f, inner, row_index, cells);
    }

    let mut next = board.rows.len();
    if board.should_show_current_input() {
        let cells = (0..board.word_length).map(|i| {
            let letter = board.current_input.chars().nth(i);
            let state = if letter.is_some() {
                LetterState::Entered
            } else {
                LetterState::Empty
            };
            (letter.map_or(' ', |c| c.to_ascii_uppercase()), state)
        });
        render_row(f, inner, next, cells);
        next += 1;
    }

    // Remaining empty rows
    for row_index in next..board.max_guesses {
        let cells = (0..board.word_length).map(|_| (' ', LetterState::Empty));
        render_row(f, inner, row_index, cells);
    }
}

#[allow(clippy::cast_possible_truncation)]
fn render_row<I>(f: &mut Frame, area: Rect, row_index: usize, cells: I)
where
    I: Iterator<Item = (char, LetterState)>,
{
    let y = area.y + (row_index as u16 * ROW_SPACING);
    if y >= area.y + area.height {
        return;
    }

    let mut spans = vec![Span::raw("  ")];
    for (letter, state) in cells {
        let (bg_color, fg_color) = state.colors();
        spans.push(Span::styled(
            format!(" {letter} "),
            Style::default().fg(fg_color).bg(bg_color),
        ));
        spans.push(Span::raw(" "));
    }

    let paragraph = Paragraph::new(Line::from(spans));
    f.render_widget(
        paragraph,
        Rect {
            x: area.x,
            y,
            width: area.width,
            height: 1,
        },
    );
}

fn render_keyboard(f: &mut Frame, area: Rect, hints: &BTreeMap<char, LetterFeedback>) {
    let lines: Vec<Line> = KEYBOARD_ROWS
        .iter()
        .enumerate()
        .map(|(indent, row)| {
            let mut spans = vec![Span::raw(" ".repeat(indent + 1))];
            for c in row.chars() {
                let state = hints.get(&c).copied().map_or(LetterState::Empty, LetterState::from);
                let (bg_color, fg_color) = state.colors();
                spans.push(Span::styled(
                    format!("{}", c.to_ascii_uppercase()),
                    Style::default().fg(fg_color).bg(bg_color),
                ));
                spans.push(Span::raw(" "));
            }
            Line::from(spans)
        })
        .collect();

    let paragraph =
        Paragraph::new(lines).block(Block::default().title("Keyboard").borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

fn render_messages(f: &mut Frame, area: Rect, message: &str, error_message: &str) {
    let mut lines = Vec::new();
    if !message.is_empty() {
        lines.push(Line::from(vec![Span::styled(message, SUCCESS_STYLE)]));
    }
    if !error_message.is_empty() {
        lines.push(Line::from(vec![Span::styled(error_message, ERROR_STYLE)]));
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().title("Information").borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_status(f: &mut Frame, area: Rect, status: &str) {
    let status_text = if status.is_empty() { "Ready" } else { status };
    let paragraph = Paragraph::new(status_text)
        .style(INFO_STYLE)
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(paragraph, area);
}

fn render_instructions(f: &mut Frame, area: Rect, state: TuiState) {
    let text = match state {
        TuiState::EnteringGuess => "Type your guess | ENTER: Submit | BACKSPACE: Delete | ESC: Quit",
        TuiState::GameOver => "Press any key to leave",
    };

    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

/// Main TUI interface component.
///
/// Owns the terminal; puts it in raw mode on creation and restores it on drop.
pub struct TuiInterface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    board: BoardState,
}

impl TuiInterface {
    pub fn new() -> Result<Self, io::Error> {
        info_log!("TuiInterface::new() - Initializing TUI");
        enable_raw_mode()?;
        let setup = || -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
            let mut stdout = io::stdout();
            execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
            Terminal::new(CrosstermBackend::new(stdout))
        };
        let terminal = match setup() {
            Ok(terminal) => terminal,
            Err(e) => {
                let _ = disable_raw_mode();
                return Err(e);
            }
        };
        info_log!("Terminal setup complete: raw mode, alternate screen, cursor hidden");

        Ok(Self {
            terminal,
            board: BoardState::default(),
        })
    }

    pub fn cleanup(&mut self) -> Result<(), io::Error> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }

    fn draw(&mut self) -> Result<(), io::Error> {
        let board = &self.board;
        self.terminal.draw(|f| render_static(f, board))?;
        Ok(())
    }

    /// Log and handle draw errors appropriately
    fn draw_or_log(&mut self) {
        if let Err(e) = self.draw() {
            debug_log!("Draw error: {}", e);
        }
    }

    /// Wait up to the poll timeout for one key press.
    fn next_key() -> Result<Option<KeyEvent>, io::Error> {
        if !event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) => Ok(Some(key)),
            other => {
                debug_log!("next_key() - Ignoring non-key event: {:?}", other);
                Ok(None)
            }
        }
    }

    /// Block until the board produces an action. Terminal failures quit.
    fn wait_for_action(&mut self) -> UserAction {
        loop {
            if self.draw().is_err() {
                info_log!("wait_for_action() - Draw failed, returning Exit");
                return UserAction::Exit;
            }
            match Self::next_key() {
                Ok(Some(key)) => {
                    if let Some(action) = self.board.handle_key(key) {
                        return action;
                    }
                }
                Ok(None) => {}
                Err(_e) => {
                    info_log!("wait_for_action() - Error handling input, returning Exit");
                    return UserAction::Exit;
                }
            }
        }
    }
}

impl GameInterface for TuiInterface {
    fn display_intro(&mut self, info: &IntroInfo) {
        self.board.word_length = info.word_length;
        self.board.max_guesses = info.max_guesses;
        self.board.title = format!("DAILY WORDLE - {}", info.date);
        self.board.status = format!(
            "Guess the {}-letter word in {} tries",
            info.word_length, info.max_guesses
        );
        self.draw_or_log();
    }

    fn display_restored(&mut self, history: &[Guess], hints: &BTreeMap<char, LetterFeedback>) {
        for guess in history {
            self.board.push_guess(guess, hints);
        }
        self.board.message = format!("Restored {} guess(es) from earlier today", history.len());
        self.draw_or_log();
    }

    fn read_guess(&mut self) -> Option<UserAction> {
        let remaining = self.board.max_guesses.saturating_sub(self.board.rows.len());
        self.board.status = format!("{remaining} guess(es) left");
        Some(self.wait_for_action())
    }

    fn display_guess(&mut self, guess: &Guess, hints: &BTreeMap<char, LetterFeedback>) {
        self.board.push_guess(guess, hints);
        self.board.message.clear();
        self.draw_or_log();
    }

    fn display_rejection(&mut self, error: &GuessError) {
        // Keep the typed letters so the player can fix them.
        self.board.error_message = error.to_string();
        self.draw_or_log();
    }

    fn display_win(&mut self, guesses_used: usize, target: &str) {
        self.board.game_over(format!(
            "You win! {} in {guesses_used}/{}",
            target.to_uppercase(),
            self.board.max_guesses
        ));
        self.wait_for_action();
    }

    fn display_loss(&mut self, target: &str) {
        self.board.game_over(format!("The word was {}", target.to_uppercase()));
        self.wait_for_action();
    }

    fn display_exit_message(&mut self) {
        self.board.message = "Exiting... your progress is saved".to_string();
        self.board.status = "Exiting application...".to_string();
        self.draw_or_log();
    }
}

impl Drop for TuiInterface {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
