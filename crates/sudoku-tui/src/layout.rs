//! Screen geometry shared by the renderer and mouse hit-testing.

use sudoku_client::{Algorithm, Difficulty, Position};

/// Grid is 37 columns wide: 9 cells of 3 chars plus 10 borders
pub const GRID_WIDTH: u16 = 37;
/// Grid is 19 rows tall: 9 cell rows plus 10 separators
pub const GRID_HEIGHT: u16 = 19;

const BUTTON_WIDTH: u16 = 8;
const CHOOSER_WIDTH: u16 = 7;
const ALERT_WIDTH: u16 = 44;
const ALERT_TEXT_WIDTH: usize = 38;

/// Rectangle in terminal cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

impl Rect {
    pub fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.x + self.w && y >= self.y && y < self.y + self.h
    }
}

/// The four action buttons under the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Solve,
    Import,
    Reset,
    Clear,
}

impl Control {
    pub const ALL: [Control; 4] = [Control::Solve, Control::Import, Control::Reset, Control::Clear];

    pub fn label(&self) -> &'static str {
        match self {
            Control::Solve => "Solve",
            Control::Import => "Import",
            Control::Reset => "Reset",
            Control::Clear => "Clear",
        }
    }
}

/// What a mouse click landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Cell(Position),
    Control(Control),
    Dropdown,
    MenuItem(usize),
    Difficulty(usize),
    AlertClose,
}

/// Modal box geometry for a given message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertLayout {
    pub frame: Rect,
    pub lines: Vec<String>,
    pub close: Rect,
}

/// Positions of every widget for one terminal size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub width: u16,
    pub height: u16,
    pub title_y: u16,
    pub dropdown: Rect,
    pub menu: Rect,
    pub difficulty: Vec<Rect>,
    pub grid_x: u16,
    pub grid_y: u16,
    pub controls: [Rect; 4],
    pub help_y: u16,
    pub status_y: u16,
}

impl Layout {
    pub fn new(width: u16, height: u16) -> Self {
        let x = width.saturating_sub(GRID_WIDTH) / 2;
        // title, gap, dropdown, chooser, gap, grid, gap, controls, gap, help x2, status
        let content_height = 1 + 1 + 1 + 1 + 1 + GRID_HEIGHT + 1 + 1 + 1 + 2 + 1;
        let top = if height > content_height + 2 { 1 } else { 0 };

        let title_y = top;
        let dropdown = Rect::new(x, top + 2, GRID_WIDTH, 1);
        let menu = Rect::new(x, dropdown.y + 1, GRID_WIDTH, Algorithm::all().len() as u16);

        let chooser_y = dropdown.y + 1;
        let difficulty = (0..Difficulty::all().len() as u16)
            .map(|i| Rect::new(x + 1 + i * CHOOSER_WIDTH, chooser_y, CHOOSER_WIDTH, 1))
            .collect();

        let grid_x = x;
        let grid_y = chooser_y + 2;

        let controls_y = grid_y + GRID_HEIGHT + 1;
        let step = BUTTON_WIDTH + 1;
        let controls = [0u16, 1, 2, 3].map(|i| Rect::new(x + 1 + i * step, controls_y, BUTTON_WIDTH, 1));

        Self {
            width,
            height,
            title_y,
            dropdown,
            menu,
            difficulty,
            grid_x,
            grid_y,
            controls,
            help_y: controls_y + 2,
            status_y: controls_y + 4,
        }
    }

    /// Top-left of the 3-character text slot for a cell
    pub fn cell_origin(&self, pos: Position) -> (u16, u16) {
        (
            self.grid_x + 1 + pos.col as u16 * 4,
            self.grid_y + 1 + pos.row as u16 * 2,
        )
    }

    /// Cell under a point, ignoring borders
    pub fn cell_at(&self, x: u16, y: u16) -> Option<Position> {
        let dx = x.checked_sub(self.grid_x)?;
        let dy = y.checked_sub(self.grid_y)?;
        if dx % 4 == 0 || dy % 2 == 0 {
            return None;
        }
        let (row, col) = ((dy / 2) as usize, (dx / 4) as usize);
        (row < 9 && col < 9).then(|| Position::new(row, col))
    }

    pub fn control_rect(&self, control: Control) -> Rect {
        let idx = Control::ALL.iter().position(|c| *c == control).unwrap_or(0);
        self.controls[idx]
    }

    /// Resolve a click. The open menu sits above everything but the modal.
    pub fn hit(&self, x: u16, y: u16, menu_open: bool) -> Option<Hit> {
        if menu_open && self.menu.contains(x, y) {
            return Some(Hit::MenuItem((y - self.menu.y) as usize));
        }
        if self.dropdown.contains(x, y) {
            return Some(Hit::Dropdown);
        }
        if let Some(i) = self.difficulty.iter().position(|r| r.contains(x, y)) {
            return Some(Hit::Difficulty(i));
        }
        if let Some(i) = self.controls.iter().position(|r| r.contains(x, y)) {
            return Some(Hit::Control(Control::ALL[i]));
        }
        self.cell_at(x, y).map(Hit::Cell)
    }

    /// Geometry of the alert modal for a message
    pub fn alert(&self, message: &str) -> AlertLayout {
        let lines = wrap_text(message, ALERT_TEXT_WIDTH);
        // border, title, gap, lines, gap, button, border
        let h = lines.len() as u16 + 6;
        let x = self.width.saturating_sub(ALERT_WIDTH) / 2;
        let y = self.height.saturating_sub(h) / 2;
        let close = Rect::new(x + 3, y + h - 2, 9, 1);
        AlertLayout {
            frame: Rect::new(x, y, ALERT_WIDTH, h),
            lines,
            close,
        }
    }

    /// Whether a click lands on the modal's Close button
    pub fn alert_hit(&self, message: &str, x: u16, y: u16) -> Option<Hit> {
        self.alert(message).close.contains(x, y).then_some(Hit::AlertClose)
    }
}

/// Greedy word wrap
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.len() + 1 + word.len() <= max_width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_round_trip() {
        let layout = Layout::new(100, 40);
        for pos in Position::all() {
            let (x, y) = layout.cell_origin(pos);
            assert_eq!(layout.cell_at(x, y), Some(pos));
            assert_eq!(layout.cell_at(x + 2, y), Some(pos));
        }
    }

    #[test]
    fn test_borders_are_not_cells() {
        let layout = Layout::new(100, 40);
        assert_eq!(layout.cell_at(layout.grid_x, layout.grid_y + 1), None);
        assert_eq!(layout.cell_at(layout.grid_x + 1, layout.grid_y), None);
        assert_eq!(layout.cell_at(layout.grid_x + GRID_WIDTH, layout.grid_y + 1), None);
        assert_eq!(layout.cell_at(0, 0), None);
    }

    #[test]
    fn test_controls_hit() {
        let layout = Layout::new(100, 40);
        for control in Control::ALL {
            let r = layout.control_rect(control);
            assert_eq!(layout.hit(r.x + 1, r.y, false), Some(Hit::Control(control)));
        }
    }

    #[test]
    fn test_menu_covers_grid_when_open() {
        let layout = Layout::new(100, 40);
        let y = layout.menu.y + 1;
        let x = layout.menu.x + 5;
        assert_eq!(layout.hit(x, y, true), Some(Hit::MenuItem(1)));
        assert_ne!(layout.hit(x, y, false), Some(Hit::MenuItem(1)));
    }

    #[test]
    fn test_dropdown_and_chooser_hit() {
        let layout = Layout::new(100, 40);
        assert_eq!(
            layout.hit(layout.dropdown.x + 3, layout.dropdown.y, false),
            Some(Hit::Dropdown)
        );
        let third = layout.difficulty[2];
        assert_eq!(layout.hit(third.x, third.y, false), Some(Hit::Difficulty(2)));
    }

    #[test]
    fn test_alert_close_button() {
        let layout = Layout::new(100, 40);
        let alert = layout.alert("No solution found :(");
        assert_eq!(alert.lines, vec!["No solution found :(".to_string()]);
        assert_eq!(
            layout.alert_hit("No solution found :(", alert.close.x, alert.close.y),
            Some(Hit::AlertClose)
        );
        assert_eq!(layout.alert_hit("No solution found :(", 0, 0), None);
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("a bb ccc", 4), vec!["a bb", "ccc"]);
        assert_eq!(wrap_text("", 10), vec![String::new()]);
    }

    #[test]
    fn test_small_terminal_does_not_underflow() {
        let layout = Layout::new(10, 5);
        assert_eq!(layout.grid_x, 0);
        let alert = layout.alert("The fetching was unsuccessful");
        assert_eq!(alert.frame.x, 0);
    }
}
