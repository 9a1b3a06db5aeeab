use std::collections::VecDeque;

use crate::{BoardInt, Coords};
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn offset(self) -> (BoardInt, BoardInt) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    /// The position one cell away from `pos` along this direction.
    pub fn apply(self, pos: Coords) -> Coords {
        let (dx, dy) = self.offset();
        (pos.0 + dx, pos.1 + dy)
    }

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }
}

/// The body segments, head first.
#[derive(Default)]
pub struct Snake {
    body: VecDeque<Coords>,
}

impl Snake {
    pub fn new() -> Self {
        Snake { body: VecDeque::new() }
    }

    pub fn push_front(&mut self, pos: Coords) {
        self.body.push_front(pos);
    }

    pub fn pop_back(&mut self) -> Coords {
        self.body.pop_back().expect("popped the tail of an empty snake")
    }

    /// Segment `index` counted from the head (0 = head, 1 = neck).
    pub fn at(&self, index: usize) -> Coords {
        self.body[index]
    }

    pub fn head(&self) -> Coords {
        self.at(0)
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn clear(&mut self) {
        self.body.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Coords> {
        self.body.iter()
    }
}
