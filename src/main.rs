use chrono::{Local, NaiveDate};
use daily_wordle::cli::{Cli, CliInterface, parse_cli};
use daily_wordle::error::Result;
use daily_wordle::logging::init_logger;
use daily_wordle::tui::TuiInterface;
use daily_wordle::{
    FileStore, GameConfig, KeyValueStore, MemoryStore, SessionState, WordLists, game_loop,
    start_session,
};
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = parse_cli();
    init_logger(cli.verbose, cli.log_file().as_deref());

    match run(&cli) {
        Ok(state) => {
            log::info!("Session ended: {state:?}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<SessionState> {
    let config = cli.game_config();
    let words = WordLists::load(
        cli.targets_path.as_deref(),
        cli.dictionary_path.as_deref(),
        config.word_length,
    )?;
    let date = cli.date.unwrap_or_else(|| Local::now().date_naive());

    match cli.data_dir() {
        Some(dir) => {
            let store = FileStore::open(&dir)?;
            log::debug!("Saving progress in {}", store.dir().display());
            play(cli, &config, date, &words, store)
        }
        None => {
            log::warn!("No data directory available; progress will not be saved");
            play(cli, &config, date, &words, MemoryStore::new())
        }
    }
}

fn play<S: KeyValueStore>(
    cli: &Cli,
    config: &GameConfig,
    date: NaiveDate,
    words: &WordLists,
    store: S,
) -> Result<SessionState> {
    let mut session = start_session(config, date, words, store)?;

    if !cli.plain {
        match TuiInterface::new() {
            Ok(mut tui) => return game_loop(&mut session, &mut tui),
            Err(e) => log::warn!("Could not start the full-screen interface ({e}); using plain mode"),
        }
    }

    let stdin = io::stdin();
    let mut interface = CliInterface::new(stdin.lock());
    game_loop(&mut session, &mut interface)
}
