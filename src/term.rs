use std::io::{self, stdout, Stdout, Write};
use std::time::Duration;

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::event::{poll, read, Event};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};

use log::error;

use crate::BoardInt;
use crate::board::Cell;
use crate::command::Command;
use crate::coordinator::{InputSource, Presenter};
use crate::error::{Result, SnakeError};
use crate::game::{GameState, SnakeGame};
use crate::snake::Direction::{self, *};

const SNAKE_BODY_CHAR: char = '█';
const FOOD_CHAR: char = '◆';
const DEAD_SNAKE_CHAR: char = 'X';
const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(50);

type ScreenPos = (u16, u16);

/// Owns the terminal while the game runs. Keeps a copy of what is on screen
/// so a frame only prints the characters that changed. The terminal is put
/// back on drop if `restore` was never reached.
pub struct TermManager {
    width: u16,
    height: u16,
    board_width: u16,
    board_height: u16,
    stdout: Stdout,
    screen: Vec<char>,
    active: bool,
}

impl TermManager {
    /// Fails if the terminal can't fit a board of the given size, its border
    /// and the status line.
    pub fn new(board_width: BoardInt, board_height: BoardInt) -> Result<Self> {
        let (width, height) = terminal::size()?;
        let (board_width, board_height) = (board_width as u16, board_height as u16);
        check_size((width, height), frame_size(board_width, board_height))?;

        let screen = vec![' '; width as usize * height as usize];
        Ok(TermManager {
            width,
            height,
            board_width,
            board_height,
            stdout: stdout(),
            screen,
            active: false,
        })
    }

    pub fn setup(&mut self) -> io::Result<()> {
        self.active = true;
        execute!(self.stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)?;
        self.clear()?;
        self.draw_borders()
    }

    /// Leaves raw mode and the alternate screen. Does nothing unless `setup`
    /// was called since the last restore.
    pub fn restore(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }

        self.active = false;
        terminal::disable_raw_mode()?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
    }

    pub fn clear(&mut self) -> io::Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All))?;
        self.screen = vec![' '; self.width as usize * self.height as usize];
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn draw_borders(&mut self) -> io::Result<()> {
        let (end_x, end_y) = (self.board_width, self.board_height);

        for x in 0..=end_x {
            let ch = if x == 0 || x == end_x {'+'} else {'-'};
            self.print_at((x, 0), ch)?;
            self.print_at((x, end_y), ch)?;
        }

        for y in 1..end_y {
            self.print_at((0, y), '|')?;
            self.print_at((end_x, y), '|')?;
        }

        self.flush()
    }

    fn print_at(&mut self, pos: ScreenPos, ch: char) -> io::Result<()> {
        let i = self.width as usize * pos.1 as usize + pos.0 as usize;

        if self.screen[i] != ch {
            queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))?;
            self.screen[i] = ch;
        }

        Ok(())
    }

    fn print_line(&mut self, y: u16, text: &str) -> io::Result<()> {
        let mut chars = text.chars();

        for x in 0..self.width {
            self.print_at((x, y), chars.next().unwrap_or(' '))?;
        }

        Ok(())
    }
}

impl Drop for TermManager {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            error!("could not restore the terminal: {}", e);
        }
    }
}

impl Presenter for TermManager {
    fn render<R>(&mut self, game: &SnakeGame<R>) -> io::Result<()> {
        let (max_x, max_y) = game.playable_size();
        let dead = game.crash().is_some();
        let head = game.head();

        for y in 0..max_y {
            for x in 0..max_x {
                let ch = match game.board().get((x, y)) {
                    None => ' ',
                    Some(Cell::Food) => FOOD_CHAR,
                    Some(Cell::Snake) if dead => DEAD_SNAKE_CHAR,
                    Some(Cell::Snake) if (x, y) == head => head_char(game.heading()),
                    Some(Cell::Snake) => SNAKE_BODY_CHAR,
                };
                self.print_at((x as u16 + 1, y as u16 + 1), ch)?;
            }
        }

        let status = status_line(game);
        self.print_line(self.board_height + 1, &status)?;
        self.flush()
    }
}

/// Reads key presses from the terminal, waiting a short while at most per call.
pub struct TerminalInput {
    poll_interval: Duration,
}

impl TerminalInput {
    pub fn new() -> Self {
        TerminalInput { poll_interval: INPUT_POLL_INTERVAL }
    }
}

impl Default for TerminalInput {
    fn default() -> Self {
        TerminalInput::new()
    }
}

impl InputSource for TerminalInput {
    fn next_command(&mut self) -> io::Result<Option<Command>> {
        if !poll(self.poll_interval)? {
            return Ok(None);
        }

        match read()? {
            Event::Key(ev) => Ok(Command::from_key_event(ev)),
            _ => Ok(None),
        }
    }
}

fn check_size(have: (u16, u16), need: (u16, u16)) -> Result<()> {
    if have.0 < need.0 || have.1 < need.1 {
        return Err(SnakeError::TerminalTooSmall { need, have });
    }

    Ok(())
}

/// Columns and rows needed for the bordered board plus the status line.
pub fn frame_size(board_width: u16, board_height: u16) -> (u16, u16) {
    (board_width + 1, board_height + 2)
}

pub fn status_line<R>(game: &SnakeGame<R>) -> String {
    match game.state() {
        GameState::GameOver(crash) => format!("GAME OVER ({}). 'R' to replay", crash),
        GameState::Paused => format!("Size: {} (PAUSED)", game.len()),
        GameState::Playing => format!("Size: {}", game.len()),
    }
}

fn head_char(dir: Direction) -> char {
    match dir {
        Up => '^',
        Down => 'v',
        Left => '<',
        Right => '>',
    }
}
