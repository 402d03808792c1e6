use std::io;

use thiserror::Error;

/// A configuration value that could not be used. Never fatal: the caller
/// falls back to the default.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{var}: {value:?} is not a number")]
    Invalid { var: &'static str, value: String },
    #[error("{var}: must be greater than zero")]
    NotPositive { var: &'static str },
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

pub type GameResult<T> = Result<T, GameError>;
