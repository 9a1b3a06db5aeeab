pub mod board;
pub mod command;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod game;
pub mod snake;
pub mod term;

pub type BoardInt = i16;
pub type Coords = (BoardInt, BoardInt);
