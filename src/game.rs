use log::{debug, info, warn};
use rand::rngs::ThreadRng;
use rand::Rng;
use thiserror::Error;

use crate::{BoardInt, Coords};
use crate::board::{Board, Cell};
use crate::snake::{Snake, Direction::{self, *}};

pub const BOARD_WIDTH: BoardInt = 30;
pub const BOARD_HEIGHT: BoardInt = 30;
pub const INITIAL_SNAKE_LENGTH: usize = 3;
pub const FOOD_PLACEMENT_ATTEMPTS: usize = 100;

/// Why a game ended. The display form is the cause tag shown to the player.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Crash {
    #[error("reversal")]
    Reversal,
    #[error("wall")]
    Wall,
    #[error("self-collision")]
    SelfCollision,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Paused,
    GameOver(Crash),
}

#[derive(Debug, PartialEq, Eq)]
pub enum MoveResult {
    /// `old_tail` is `None` when the snake ate and grew.
    Moved { new_head: Coords, old_head: Coords, old_tail: Option<Coords> },
    Crashed(Crash),
    /// The game was not playing, nothing happened.
    Idle,
}

pub struct SnakeGame<R = ThreadRng> {
    width: BoardInt,
    height: BoardInt,
    board: Board,
    snake: Snake,
    heading: Direction,
    state: GameState,
    food: Option<Coords>,
    rng: R,
}

impl SnakeGame<ThreadRng> {
    pub fn new() -> Self {
        SnakeGame::with_rng(rand::thread_rng())
    }
}

impl Default for SnakeGame<ThreadRng> {
    fn default() -> Self {
        SnakeGame::new()
    }
}

impl<R: Rng> SnakeGame<R> {
    pub fn with_rng(rng: R) -> Self {
        let mut game = SnakeGame {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            board: Board::new(BOARD_WIDTH, BOARD_HEIGHT),
            snake: Snake::new(),
            heading: Right,
            state: GameState::Playing,
            food: None,
            rng,
        };
        game.reset();
        game
    }

    /// Puts a fresh three-segment snake in the middle of the board, heading
    /// right, with one piece of food somewhere else.
    pub fn reset(&mut self) {
        self.board.clear();
        self.snake.clear();
        self.heading = Right;
        self.food = None;

        let (cx, cy) = (self.width / 2, self.height / 2);
        for x in cx - 1..=cx + 1 {
            self.plant(x, cy);
        }

        self.place_food();
        self.state = GameState::Playing;

        debug!("game reset, head at {:?}", self.snake.head());
    }

    /// Changes the heading unless `dir` would run the head straight into the
    /// neck. Returns whether the new heading was taken.
    pub fn request_direction(&mut self, dir: Direction) -> bool {
        if dir.apply(self.snake.head()) == self.snake.at(1) {
            debug!("ignored reversal towards {:?}", dir);
            return false;
        }

        self.heading = dir;
        true
    }

    /// Advances the snake by one cell. Nothing is mutated unless the move is
    /// legal, and a crash ends the game.
    pub fn step(&mut self) -> MoveResult {
        if self.state != GameState::Playing {
            return MoveResult::Idle;
        }

        let old_head = self.snake.head();
        let new_head = self.heading.apply(old_head);

        if let Err(crash) = self.check_move(new_head) {
            self.state = GameState::GameOver(crash);
            info!("game over: {} with {} segments", crash, self.snake.len());
            return MoveResult::Crashed(crash);
        }

        let old_tail = match self.board.get(new_head) {
            Some(Cell::Food) => {
                self.food = None;
                None
            },
            _ => {
                let tail = self.snake.pop_back();
                self.board.remove(tail);
                Some(tail)
            },
        };

        self.plant(new_head.0, new_head.1);

        // Also retries a placement that ran out of attempts on an earlier step
        if self.food.is_none() {
            self.place_food();
        }

        MoveResult::Moved { new_head, old_head, old_tail }
    }

    /// Flips between playing and paused. A finished game stays finished.
    pub fn toggle_pause(&mut self) -> GameState {
        self.state = match self.state {
            GameState::Playing => GameState::Paused,
            GameState::Paused => GameState::Playing,
            over @ GameState::GameOver(_) => over,
        };

        self.state
    }

    ///////////////////////////////////////////////////////////////////////////

    fn check_move(&self, next: Coords) -> Result<(), Crash> {
        if next == self.snake.at(1) {
            return Err(Crash::Reversal);
        }

        let (x, y) = next;
        if x < 0 || y < 0 || x >= self.width - 1 || y >= self.height - 1 {
            return Err(Crash::Wall);
        }

        if self.board.get(next) == Some(Cell::Snake) {
            return Err(Crash::SelfCollision);
        }

        Ok(())
    }

    fn plant(&mut self, x: BoardInt, y: BoardInt) {
        self.snake.push_front((x, y));
        self.board.set((x, y), Cell::Snake);
    }

    fn place_food(&mut self) -> bool {
        let (max_x, max_y) = self.playable_size();

        for _ in 0..FOOD_PLACEMENT_ATTEMPTS {
            let pos = (self.rng.gen_range(0..max_x), self.rng.gen_range(0..max_y));

            if self.board.get(pos).is_none() {
                self.board.set(pos, Cell::Food);
                self.food = Some(pos);
                debug!("food placed at {:?}", pos);
                return true;
            }
        }

        warn!("no free cell found for food after {} attempts", FOOD_PLACEMENT_ATTEMPTS);
        false
    }
}

impl<R> SnakeGame<R> {
    /// Size of the rectangle the head may occupy, starting at the origin.
    /// Food is only ever placed inside it.
    pub fn playable_size(&self) -> (BoardInt, BoardInt) {
        (self.width - 1, self.height - 1)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Every occupied cell with its kind.
    pub fn cells(&self) -> impl Iterator<Item = (Coords, Cell)> + '_ {
        self.board.iter()
    }

    pub fn body(&self) -> impl Iterator<Item = &Coords> {
        self.snake.iter()
    }

    pub fn head(&self) -> Coords {
        self.snake.head()
    }

    pub fn len(&self) -> usize {
        self.snake.len()
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn food(&self) -> Option<Coords> {
        self.food
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn crash(&self) -> Option<Crash> {
        match self.state {
            GameState::GameOver(crash) => Some(crash),
            _ => None,
        }
    }
}
