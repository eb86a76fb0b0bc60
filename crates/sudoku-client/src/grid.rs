//! Fixed-size 9x9 digit grid.
//!
//! A [`Grid`] is a plain value: every edit produces a new grid and leaves the
//! previous one untouched, so anything holding an older copy can detect a
//! change by comparing values.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Side length of the board
pub const SIZE: usize = 9;

/// Number of cells on the board
pub const CELLS: usize = SIZE * SIZE;

/// A cell coordinate, both axes in `0..9`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        debug_assert!(row < SIZE && col < SIZE, "position out of range: ({row}, {col})");
        Self { row, col }
    }

    /// Iterate over all 81 positions in row-major order
    pub fn all() -> impl Iterator<Item = Position> {
        (0..CELLS).map(|i| Position::new(i / SIZE, i % SIZE))
    }
}

/// Errors produced when building a grid from external data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("mission must contain 81 digits, got {0}")]
    MissionLength(usize),
    #[error("invalid character {found:?} at offset {index} in mission")]
    MissionCharacter { index: usize, found: char },
    #[error("grid must have 9 rows, got {0}")]
    RowCount(usize),
    #[error("row {row} must have 9 cells, got {len}")]
    RowLength { row: usize, len: usize },
    #[error("value {value} at ({row}, {col}) is not a digit 0-9")]
    ValueOutOfRange { row: usize, col: usize, value: u8 },
}

/// A 9x9 matrix of digits where 0 marks an empty cell
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct Grid([[u8; SIZE]; SIZE]);

impl Grid {
    /// The all-zero grid
    pub const EMPTY: Grid = Grid([[0; SIZE]; SIZE]);

    /// Build a grid from rows, checking every value is a digit
    pub fn from_rows(rows: [[u8; SIZE]; SIZE]) -> Result<Self, GridError> {
        for (row, cells) in rows.iter().enumerate() {
            for (col, &value) in cells.iter().enumerate() {
                if value > 9 {
                    return Err(GridError::ValueOutOfRange { row, col, value });
                }
            }
        }
        Ok(Self(rows))
    }

    /// Parse a row-major 81-character digit string ("mission")
    ///
    /// Row `i` is taken from characters `[9i, 9i + 9)`. Surrounding
    /// whitespace is ignored; any other non-digit is rejected.
    pub fn from_mission(mission: &str) -> Result<Self, GridError> {
        let mission = mission.trim();
        let len = mission.chars().count();
        if len != CELLS {
            return Err(GridError::MissionLength(len));
        }

        let mut rows = [[0u8; SIZE]; SIZE];
        for (index, ch) in mission.chars().enumerate() {
            let digit = ch
                .to_digit(10)
                .ok_or(GridError::MissionCharacter { index, found: ch })?;
            rows[index / SIZE][index % SIZE] = digit as u8;
        }
        Ok(Self(rows))
    }

    /// Flatten back into the 81-character mission form
    pub fn to_mission(&self) -> String {
        self.0
            .iter()
            .flatten()
            .map(|&d| char::from(b'0' + d))
            .collect()
    }

    pub fn get(&self, pos: Position) -> u8 {
        self.0[pos.row][pos.col]
    }

    /// Return a copy of this grid with one cell replaced
    pub fn with_value(&self, pos: Position, value: u8) -> Grid {
        assert!(value <= 9, "cell value out of range: {value}");
        let mut next = *self;
        next.0[pos.row][pos.col] = value;
        next
    }

    pub fn row(&self, row: usize) -> &[u8; SIZE] {
        &self.0[row]
    }

    /// Whether every cell is zero
    pub fn is_empty(&self) -> bool {
        self.0.iter().flatten().all(|&d| d == 0)
    }

    /// Count of non-zero cells
    pub fn filled_count(&self) -> usize {
        self.0.iter().flatten().filter(|&&d| d != 0).count()
    }
}

impl TryFrom<Vec<Vec<u8>>> for Grid {
    type Error = GridError;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        if rows.len() != SIZE {
            return Err(GridError::RowCount(rows.len()));
        }
        let mut out = [[0u8; SIZE]; SIZE];
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != SIZE {
                return Err(GridError::RowLength {
                    row,
                    len: cells.len(),
                });
            }
            out[row].copy_from_slice(cells);
        }
        Grid::from_rows(out)
    }
}

impl From<Grid> for Vec<Vec<u8>> {
    fn from(grid: Grid) -> Self {
        grid.0.iter().map(|row| row.to_vec()).collect()
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grid({})", self.to_mission())
    }
}
