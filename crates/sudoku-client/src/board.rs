use crate::grid::{Grid, Position};
use tracing::debug;

/// The board state: user entries, the service-provided fill, and the
/// disabled latch that freezes editing once a solve has been started.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    /// Digits typed or imported by the user (0 = blank)
    entered: Grid,
    /// Fill returned by the solving service, shown where `entered` is blank
    solution: Grid,
    /// Editing latch
    disabled: bool,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entered(&self) -> &Grid {
        &self.entered
    }

    pub fn solution(&self) -> &Grid {
        &self.solution
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub(crate) fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Value to show at a position: the entry if present, otherwise the solution
    pub fn displayed(&self, pos: Position) -> u8 {
        match self.entered.get(pos) {
            0 => self.solution.get(pos),
            v => v,
        }
    }

    /// A cell is locked when the user supplied a value for it
    pub fn is_locked(&self, pos: Position) -> bool {
        self.entered.get(pos) != 0
    }

    /// Whether a solution is currently rendered on the board
    pub fn has_solution(&self) -> bool {
        !self.solution.is_empty()
    }

    /// Replace the entered value at a position
    pub fn set(&mut self, pos: Position, value: u8) {
        self.entered = self.entered.with_value(pos, value);
        debug!(row = pos.row, col = pos.col, value, "cell set");
    }

    /// Cycle the entered value at a position through 0..=9
    pub fn advance_at(&mut self, pos: Position) {
        let next = (self.entered.get(pos) + 1) % 10;
        self.set(pos, next);
    }

    /// Blank both grids and release the latch
    pub fn clear(&mut self) {
        self.entered = Grid::EMPTY;
        self.solution = Grid::EMPTY;
        self.disabled = false;
    }

    pub fn apply_solution(&mut self, solution: Grid) {
        self.solution = solution;
    }

    /// Drop the displayed solution but keep the user's entries
    pub fn reset_solution(&mut self) {
        self.solution = Grid::EMPTY;
        self.disabled = false;
    }

    /// Install a freshly imported puzzle
    pub fn load_entered(&mut self, entered: Grid) {
        self.solution = Grid::EMPTY;
        self.entered = entered;
        self.disabled = false;
    }
}
