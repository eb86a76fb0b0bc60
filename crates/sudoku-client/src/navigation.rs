//! Selection cursor and the keyboard/pointer protocol that drives it.

use crate::board::Board;
use crate::grid::{Position, SIZE};

/// Arrow direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// (row, col) delta for one step
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Down => (1, 0),
            Direction::Up => (-1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// Currently selected cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pos: Position,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Position {
        self.pos
    }

    /// Step one cell, wrapping around each axis independently
    pub fn step(&mut self, direction: Direction) {
        let (dr, dc) = direction.delta();
        let n = SIZE as i32;
        let row = (self.pos.row as i32 + dr + n) % n;
        let col = (self.pos.col as i32 + dc + n) % n;
        self.pos = Position::new(row as usize, col as usize);
    }

    pub fn select(&mut self, pos: Position) {
        self.pos = pos;
    }
}

/// Keys understood by the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Move(Direction),
    Digit(u8),
}

impl NavKey {
    /// Map a typed character to a digit key
    pub fn from_char(c: char) -> Option<NavKey> {
        c.to_digit(10).map(|d| NavKey::Digit(d as u8))
    }
}

/// Grid interaction state: owns the selection and applies input to a board
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    selection: Selection,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> Position {
        self.selection.position()
    }

    /// Apply a key; returns true if the board or the selection changed
    ///
    /// Movement is always allowed. Digits are dropped while the board is
    /// disabled.
    pub fn handle_key(&mut self, key: NavKey, board: &mut Board) -> bool {
        match key {
            NavKey::Move(direction) => {
                self.selection.step(direction);
                true
            }
            NavKey::Digit(digit) => {
                if board.is_disabled() {
                    return false;
                }
                board.set(self.selection.position(), digit);
                true
            }
        }
    }

    /// Pointer activation of a cell
    ///
    /// Activating the already-selected cell cycles its value; activating any
    /// other cell only moves the selection. Cells are inert while the board
    /// is disabled.
    pub fn activate(&mut self, pos: Position, board: &mut Board) -> bool {
        if board.is_disabled() {
            return false;
        }
        if self.selection.position() == pos {
            board.advance_at(pos);
        }
        self.selection.select(pos);
        true
    }

    /// Row/column highlight for the selection, shown only while no solution is on the board
    pub fn is_highlighted(&self, pos: Position, board: &Board) -> bool {
        if board.has_solution() {
            return false;
        }
        let sel = self.selection.position();
        pos.row == sel.row || pos.col == sel.col
    }
}
