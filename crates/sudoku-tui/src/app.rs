use crate::layout::{Control, Hit, Layout};
use crate::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use std::sync::Arc;
use std::time::Duration;
use sudoku_client::{
    Algorithm, Context, Difficulty, Direction, NavKey, Navigator, Operation, Orchestrator,
    PuzzleService,
};
use tracing::debug;

pub const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Result of handling an input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Continue,
    Quit,
}

/// Algorithm dropdown state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dropdown {
    pub open: bool,
    pub highlighted: usize,
}

/// The solver screen
pub struct App {
    pub orchestrator: Orchestrator,
    pub navigator: Navigator,
    pub dropdown: Dropdown,
    pub theme: Theme,
    pub layout: Layout,
    spinner_frame: usize,
}

impl App {
    pub fn new(
        service: Arc<dyn PuzzleService>,
        algorithm: Algorithm,
        difficulty: Difficulty,
    ) -> Self {
        let mut orchestrator = Orchestrator::new(service, Context::new());
        orchestrator.set_algorithm(algorithm);
        orchestrator.set_difficulty(difficulty);

        Self {
            orchestrator,
            navigator: Navigator::new(),
            dropdown: Dropdown::default(),
            theme: Theme::dark(),
            layout: Layout::new(80, 40),
            spinner_frame: 0,
        }
    }

    /// Faster ticks while a request is out so the spinner moves and results land promptly
    pub fn get_tick_rate(&self) -> Duration {
        if self.orchestrator.is_pending() {
            Duration::from_millis(33)
        } else {
            Duration::from_millis(100)
        }
    }

    pub fn set_viewport(&mut self, width: u16, height: u16) {
        if self.layout.width != width || self.layout.height != height {
            self.layout = Layout::new(width, height);
        }
    }

    /// Apply finished requests and advance the spinner
    pub fn tick(&mut self) {
        if let Some(outcome) = self.orchestrator.poll() {
            debug!(?outcome, "request applied");
        }
        if self.orchestrator.operations().is_busy() {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER.len();
        }
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER[self.spinner_frame]
    }

    /// Whether a control currently accepts activation
    pub fn control_enabled(&self, control: Control) -> bool {
        match control {
            Control::Solve => self.orchestrator.can_solve(),
            Control::Import => self.orchestrator.can_import(),
            Control::Reset | Control::Clear => !self.orchestrator.operations().is_busy(),
        }
    }

    /// Whether a control's request is the one in flight
    pub fn control_busy(&self, control: Control) -> bool {
        let ops = self.orchestrator.operations();
        match control {
            Control::Solve => ops.is_busy_with(Operation::Solve),
            Control::Import => ops.is_busy_with(Operation::Import),
            Control::Reset | Control::Clear => false,
        }
    }

    pub fn is_highlighted(&self, pos: sudoku_client::Position) -> bool {
        self.navigator.is_highlighted(pos, self.orchestrator.board())
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        // Open alert takes all input until dismissed
        if self.orchestrator.alerts().scroll_locked() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.orchestrator.alerts().close();
            }
            return AppAction::Continue;
        }

        if self.dropdown.open {
            self.handle_dropdown_key(key);
            return AppAction::Continue;
        }

        self.handle_board_key(key)
    }

    fn handle_board_key(&mut self, key: KeyEvent) -> AppAction {
        // Bare letters only; Ctrl/Alt chords are not commands
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER)
        {
            return AppAction::Continue;
        }

        let nav = match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(NavKey::Move(Direction::Up)),
            KeyCode::Down | KeyCode::Char('j') => Some(NavKey::Move(Direction::Down)),
            KeyCode::Left | KeyCode::Char('h') => Some(NavKey::Move(Direction::Left)),
            KeyCode::Right | KeyCode::Char('l') => Some(NavKey::Move(Direction::Right)),
            KeyCode::Char(c) => NavKey::from_char(c),
            _ => None,
        };
        if let Some(nav) = nav {
            self.navigator
                .handle_key(nav, self.orchestrator.board_mut());
            return AppAction::Continue;
        }

        match key.code {
            KeyCode::Char('q') => return AppAction::Quit,
            KeyCode::Char('s') => self.activate_control(Control::Solve),
            KeyCode::Char('i') => self.activate_control(Control::Import),
            KeyCode::Char('r') => self.activate_control(Control::Reset),
            KeyCode::Char('c') => self.activate_control(Control::Clear),
            KeyCode::Char('a') => self.open_dropdown(),
            KeyCode::Char('d') => self.cycle_difficulty(1),
            KeyCode::Char('D') => self.cycle_difficulty(-1),
            _ => {}
        }

        AppAction::Continue
    }

    fn handle_dropdown_key(&mut self, key: KeyEvent) {
        let count = Algorithm::all().len();
        match key.code {
            KeyCode::Esc | KeyCode::Char('a') | KeyCode::Char('q') => {
                self.dropdown.open = false;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if self.dropdown.highlighted > 0 {
                    self.dropdown.highlighted -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.dropdown.highlighted + 1 < count {
                    self.dropdown.highlighted += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.choose_algorithm(self.dropdown.highlighted),
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> AppAction {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return AppAction::Continue;
        }
        let (x, y) = (mouse.column, mouse.row);

        if self.orchestrator.alerts().scroll_locked() {
            let alert = self.orchestrator.alerts().snapshot();
            if self.layout.alert_hit(&alert.message, x, y) == Some(Hit::AlertClose) {
                self.orchestrator.alerts().close();
            }
            return AppAction::Continue;
        }

        let hit = self.layout.hit(x, y, self.dropdown.open);
        if self.dropdown.open {
            match hit {
                Some(Hit::MenuItem(i)) => self.choose_algorithm(i),
                _ => self.dropdown.open = false,
            }
            return AppAction::Continue;
        }

        match hit {
            Some(Hit::Cell(pos)) => {
                self.navigator
                    .activate(pos, self.orchestrator.board_mut());
            }
            Some(Hit::Control(control)) => self.activate_control(control),
            Some(Hit::Dropdown) => self.open_dropdown(),
            Some(Hit::Difficulty(i)) => {
                if let Some(d) = Difficulty::all().get(i) {
                    self.orchestrator.set_difficulty(*d);
                }
            }
            Some(Hit::MenuItem(_)) | Some(Hit::AlertClose) | None => {}
        }

        AppAction::Continue
    }

    fn activate_control(&mut self, control: Control) {
        if !self.control_enabled(control) {
            debug!(control = control.label(), "control disabled, ignoring");
            return;
        }
        match control {
            Control::Solve => {
                self.orchestrator.solve();
            }
            Control::Import => {
                self.orchestrator.import();
            }
            Control::Reset => self.orchestrator.reset(),
            Control::Clear => self.orchestrator.clear(),
        }
    }

    fn open_dropdown(&mut self) {
        let current = self.orchestrator.algorithm();
        self.dropdown = Dropdown {
            open: true,
            highlighted: Algorithm::all()
                .iter()
                .position(|a| *a == current)
                .unwrap_or(0),
        };
    }

    fn choose_algorithm(&mut self, index: usize) {
        if let Some(algorithm) = Algorithm::all().get(index) {
            self.orchestrator.set_algorithm(*algorithm);
        }
        self.dropdown.open = false;
    }

    fn cycle_difficulty(&mut self, step: isize) {
        let levels = Difficulty::all();
        let idx = levels
            .iter()
            .position(|d| *d == self.orchestrator.difficulty())
            .unwrap_or(0) as isize;
        let next = (idx + step).rem_euclid(levels.len() as isize) as usize;
        self.orchestrator.set_difficulty(levels[next]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sudoku_client::{Grid, MockService, Position, ServiceError};

    const MISSION: &str =
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079";

    fn app_with(service: MockService) -> (App, Arc<MockService>) {
        let service = Arc::new(service);
        let mut app = App::new(service.clone(), Algorithm::Backtracking, Difficulty::Easy);
        app.set_viewport(100, 40);
        (app, service)
    }

    fn press(app: &mut App, code: KeyCode) -> AppAction {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn click(app: &mut App, x: u16, y: u16) -> AppAction {
        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: x,
            row: y,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_arrow_keys_and_digits() {
        let (mut app, _) = app_with(MockService::new());
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.navigator.selection(), Position::new(8, 8));

        press(&mut app, KeyCode::Char('7'));
        assert_eq!(app.orchestrator.board().entered().get(Position::new(8, 8)), 7);

        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.navigator.selection(), Position::new(8, 0));
    }

    #[test]
    fn test_modified_letters_are_not_commands() {
        let (mut app, service) = app_with(MockService::new().with_mission(MISSION));
        press(&mut app, KeyCode::Char('5'));

        for modifiers in [KeyModifiers::CONTROL, KeyModifiers::ALT] {
            for c in ['s', 'i', 'r', 'c', 'q', 'a', '7'] {
                let action = app.handle_key(KeyEvent::new(KeyCode::Char(c), modifiers));
                assert_eq!(action, AppAction::Continue);
            }
        }

        assert!(!app.orchestrator.is_pending());
        assert!(service.solve_requests().is_empty());
        assert!(service.mission_requests().is_empty());
        assert!(!app.dropdown.open);
        assert_eq!(app.orchestrator.board().entered().get(Position::new(0, 0)), 5);

        // Shift still reaches the board keys
        app.handle_key(KeyEvent::new(KeyCode::Char('D'), KeyModifiers::SHIFT));
        assert_eq!(app.orchestrator.difficulty(), Difficulty::Extreme);
    }

    #[test]
    fn test_quit() {
        let (mut app, _) = app_with(MockService::new());
        assert_eq!(press(&mut app, KeyCode::Char('q')), AppAction::Quit);
    }

    #[test]
    fn test_solve_flow_through_keys() {
        let solution = Grid::from_mission(&"1".repeat(81)).unwrap();
        let (mut app, service) = app_with(MockService::new().with_solution(solution));

        press(&mut app, KeyCode::Char('s'));
        assert!(app.orchestrator.board().is_disabled());
        assert_eq!(app.get_tick_rate(), Duration::from_millis(33));

        app.orchestrator.wait();
        assert_eq!(service.solve_requests().len(), 1);
        assert!(app.orchestrator.board().has_solution());
        // Highlight is suppressed once a solution is shown
        assert!(!app.is_highlighted(Position::new(0, 1)));

        // Solve stays disabled until reset
        assert!(!app.control_enabled(Control::Solve));
        press(&mut app, KeyCode::Char('r'));
        assert!(app.control_enabled(Control::Solve));
        assert!(!app.orchestrator.board().has_solution());
    }

    #[test]
    fn test_controls_gated_while_busy() {
        let (mut app, service) = app_with(MockService::new().with_mission(MISSION));
        let gate = service.hold();

        press(&mut app, KeyCode::Char('5'));
        press(&mut app, KeyCode::Char('i'));
        assert!(app.control_busy(Control::Import));
        assert!(!app.control_enabled(Control::Solve));
        assert!(!app.control_enabled(Control::Clear));

        // Clear is ignored while the import is out
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.orchestrator.board().entered().get(Position::new(0, 0)), 5);

        gate.send(()).unwrap();
        app.orchestrator.wait();
        assert!(app.control_enabled(Control::Clear));
        assert_eq!(app.orchestrator.board().entered().to_mission(), MISSION);
    }

    #[test]
    fn test_alert_swallows_input_until_closed() {
        let (mut app, _) = app_with(
            MockService::new().with_solve_error(ServiceError::Network("down".to_string())),
        );
        press(&mut app, KeyCode::Char('s'));
        app.orchestrator.wait();
        assert!(app.orchestrator.alerts().is_open());

        assert!(app.orchestrator.alerts().scroll_locked());
        press(&mut app, KeyCode::Down);
        assert_eq!(press(&mut app, KeyCode::Char('q')), AppAction::Continue);
        assert_eq!(app.navigator.selection(), Position::new(0, 0));

        press(&mut app, KeyCode::Esc);
        assert!(!app.orchestrator.alerts().is_open());
    }

    #[test]
    fn test_alert_closed_by_click() {
        let (mut app, _) = app_with(MockService::new());
        press(&mut app, KeyCode::Char('s'));
        app.orchestrator.wait();

        let alert = app.orchestrator.alerts().snapshot();
        assert_eq!(alert.title, "No solution");
        let close = app.layout.alert(&alert.message).close;

        click(&mut app, 0, 0);
        assert!(app.orchestrator.alerts().is_open());
        click(&mut app, close.x + 1, close.y);
        assert!(!app.orchestrator.alerts().is_open());
    }

    #[test]
    fn test_dropdown_by_keyboard() {
        let (mut app, _) = app_with(MockService::new());
        press(&mut app, KeyCode::Char('a'));
        assert!(app.dropdown.open);

        // Digits do not reach the board while the list is open
        press(&mut app, KeyCode::Char('4'));
        assert!(app.orchestrator.board().entered().is_empty());

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert!(!app.dropdown.open);
        assert_eq!(app.orchestrator.algorithm(), Algorithm::TabuSearch);
    }

    #[test]
    fn test_dropdown_by_mouse() {
        let (mut app, _) = app_with(MockService::new());
        let dropdown = app.layout.dropdown;
        click(&mut app, dropdown.x + 2, dropdown.y);
        assert!(app.dropdown.open);

        let menu = app.layout.menu;
        click(&mut app, menu.x + 2, menu.y + 1);
        assert_eq!(app.orchestrator.algorithm(), Algorithm::Evolutionary);
        assert!(!app.dropdown.open);

        // Clicking elsewhere closes without choosing
        click(&mut app, dropdown.x + 2, dropdown.y);
        click(&mut app, 0, 0);
        assert!(!app.dropdown.open);
        assert_eq!(app.orchestrator.algorithm(), Algorithm::Evolutionary);
    }

    #[test]
    fn test_cell_click_selects_then_advances() {
        let (mut app, _) = app_with(MockService::new());
        let pos = Position::new(2, 3);
        let (x, y) = app.layout.cell_origin(pos);

        click(&mut app, x, y);
        assert_eq!(app.navigator.selection(), pos);
        assert_eq!(app.orchestrator.board().entered().get(pos), 0);

        click(&mut app, x + 1, y);
        assert_eq!(app.orchestrator.board().entered().get(pos), 1);
    }

    #[test]
    fn test_difficulty_keys_and_clicks() {
        let (mut app, service) = app_with(MockService::new().with_mission(MISSION));
        press(&mut app, KeyCode::Char('D'));
        assert_eq!(app.orchestrator.difficulty(), Difficulty::Extreme);
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.orchestrator.difficulty(), Difficulty::Easy);

        let hard = app.layout.difficulty[2];
        click(&mut app, hard.x, hard.y);
        assert_eq!(app.orchestrator.difficulty(), Difficulty::Hard);

        let import = app.layout.control_rect(Control::Import);
        click(&mut app, import.x, import.y);
        app.orchestrator.wait();
        assert_eq!(service.mission_requests(), vec![Difficulty::Hard]);
    }

    #[test]
    fn test_spinner_advances_only_while_busy() {
        let (mut app, service) = app_with(MockService::new());
        app.tick();
        assert_eq!(app.spinner(), SPINNER[0]);

        let gate = service.hold();
        press(&mut app, KeyCode::Char('s'));
        app.tick();
        assert_eq!(app.spinner(), SPINNER[1]);

        gate.send(()).unwrap();
        app.orchestrator.wait();
        assert_eq!(app.get_tick_rate(), Duration::from_millis(100));
    }
}
