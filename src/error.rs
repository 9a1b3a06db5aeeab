use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnakeError {
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
    #[error("terminal is {}x{}, the game needs at least {}x{}", have.0, have.1, need.0, need.1)]
    TerminalTooSmall { need: (u16, u16), have: (u16, u16) },
    #[error("could not install logger: {0}")]
    Logger(#[from] log::SetLoggerError),
}

pub type Result<T> = std::result::Result<T, SnakeError>;
