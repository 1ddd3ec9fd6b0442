// Logger setup plus conditional logging macros - the macros are only active in debug builds

use env_logger::{Env, Target};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

/// Install `env_logger`, honouring `RUST_LOG`. Defaults to `warn`.
///
/// With `log_file` set, records are appended there instead of stderr so the
/// full-screen interface is not drawn over. If the file cannot be opened,
/// logging is switched off for the run.
pub fn init_logger(verbose: bool, log_file: Option<&Path>) {
    let default_level = if verbose { "debug" } else { "warn" };
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(default_level));

    match log_file.map(open_log_file) {
        Some(Ok(file)) => {
            builder.target(Target::Pipe(Box::new(file)));
        }
        Some(Err(e)) => {
            eprintln!("Logging disabled: {e}");
            builder.filter_level(log::LevelFilter::Off);
        }
        None => {
            builder.format_timestamp(None);
        }
    }
    let _ = builder.try_init();
}

/// Open `path` for appending, creating it and its directory if needed.
pub fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(debug_assertions)]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        log::debug!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {{}};
}

#[cfg(debug_assertions)]
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        log::info!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {{}};
}
