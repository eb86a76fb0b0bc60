use crate::app::App;
use crate::layout::{Control, Rect};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Color, Print, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};
use sudoku_client::{Algorithm, Difficulty, Position};

const TITLE: &str = "Sudoku solver";

pub fn render<W: Write>(out: &mut W, app: &App) -> io::Result<()> {
    execute!(
        out,
        Hide,
        SetBackgroundColor(app.theme.bg),
        Clear(ClearType::All)
    )?;

    render_header(out, app)?;
    render_grid(out, app)?;
    render_controls(out, app)?;
    render_help(out, app)?;
    render_status(out, app)?;

    if app.dropdown.open {
        render_dropdown_menu(out, app)?;
    }

    if app.orchestrator.alerts().is_open() {
        render_alert(out, app)?;
    }

    execute!(out, Show)?;
    Ok(())
}

fn render_header<W: Write>(out: &mut W, app: &App) -> io::Result<()> {
    let theme = &app.theme;
    let layout = &app.layout;
    let title_x = layout.grid_x + (layout.dropdown.w.saturating_sub(TITLE.len() as u16)) / 2;

    execute!(
        out,
        MoveTo(title_x, layout.title_y),
        SetForegroundColor(theme.fg),
        SetBackgroundColor(theme.bg),
        Print(TITLE)
    )?;

    // Algorithm dropdown
    let arrow = if app.dropdown.open { "^" } else { "v" };
    execute!(
        out,
        MoveTo(layout.dropdown.x, layout.dropdown.y),
        SetForegroundColor(theme.fg),
        SetBackgroundColor(theme.button_bg),
        Print(format!(" {:<33} {} ", app.orchestrator.algorithm().name(), arrow))
    )?;

    // Difficulty chooser
    let current = app.orchestrator.difficulty();
    for (rect, difficulty) in layout.difficulty.iter().zip(Difficulty::all()) {
        let (fg, bg) = if *difficulty == current {
            (Color::White, theme.accent)
        } else {
            (theme.info, theme.button_bg)
        };
        execute!(
            out,
            MoveTo(rect.x, rect.y),
            SetForegroundColor(fg),
            SetBackgroundColor(bg),
            Print(format!("{:^7}", difficulty.label()))
        )?;
    }

    Ok(())
}

fn render_grid<W: Write>(out: &mut W, app: &App) -> io::Result<()> {
    let theme = &app.theme;
    let (x, y) = (app.layout.grid_x, app.layout.grid_y);

    // +===+===+ ... thick at box edges, +---+ between rows of a box
    execute!(
        out,
        SetBackgroundColor(theme.bg),
        MoveTo(x, y),
        SetForegroundColor(theme.box_border),
        Print("+===+===+===+===+===+===+===+===+===+")
    )?;

    for row in 0..9 {
        let cell_y = y + 1 + row as u16 * 2;
        execute!(out, MoveTo(x, cell_y))?;

        for col in 0..9 {
            if col % 3 == 0 {
                execute!(
                    out,
                    SetBackgroundColor(theme.bg),
                    SetForegroundColor(theme.box_border),
                    Print("║")
                )?;
            } else {
                execute!(
                    out,
                    SetBackgroundColor(theme.bg),
                    SetForegroundColor(theme.border),
                    Print("│")
                )?;
            }
            render_cell(out, app, Position::new(row, col))?;
        }
        execute!(
            out,
            SetBackgroundColor(theme.bg),
            SetForegroundColor(theme.box_border),
            Print("║")
        )?;

        let (color, line) = if (row + 1) % 3 == 0 {
            (theme.box_border, "+===+===+===+===+===+===+===+===+===+")
        } else {
            (theme.border, "+---+---+---+---+---+---+---+---+---+")
        };
        execute!(
            out,
            MoveTo(x, cell_y + 1),
            SetForegroundColor(color),
            Print(line)
        )?;
    }

    Ok(())
}

fn render_cell<W: Write>(out: &mut W, app: &App, pos: Position) -> io::Result<()> {
    let theme = &app.theme;
    let board = app.orchestrator.board();

    let bg = if pos == app.navigator.selection() {
        theme.selected_bg
    } else if app.is_highlighted(pos) {
        theme.highlight_bg
    } else {
        theme.bg
    };

    let value = board.displayed(pos);
    let (fg, text) = if value == 0 {
        (theme.empty, " · ".to_string())
    } else if board.is_locked(pos) {
        (theme.entered, format!(" {} ", value))
    } else {
        (theme.solved, format!(" {} ", value))
    };

    execute!(
        out,
        SetBackgroundColor(bg),
        SetForegroundColor(fg),
        Print(text)
    )
}

fn render_controls<W: Write>(out: &mut W, app: &App) -> io::Result<()> {
    let theme = &app.theme;

    for control in Control::ALL {
        let rect = app.layout.control_rect(control);
        let (fg, text) = if app.control_busy(control) {
            (theme.accent, app.spinner())
        } else if app.control_enabled(control) {
            (theme.fg, control.label())
        } else {
            (theme.disabled, control.label())
        };

        execute!(
            out,
            MoveTo(rect.x, rect.y),
            SetForegroundColor(fg),
            SetBackgroundColor(theme.button_bg),
            Print(format!("{:^8}", text))
        )?;
    }

    Ok(())
}

fn render_help<W: Write>(out: &mut W, app: &App) -> io::Result<()> {
    let theme = &app.theme;
    let keys = [
        ("hjkl/Arrows", "Move"),
        ("1-9/0", "Set/Erase"),
        ("s i r c", "Solve Import Reset Clear"),
        ("a d/D q", "Algorithm Difficulty Quit"),
    ];

    for (i, (key, desc)) in keys.iter().enumerate() {
        let x = app.layout.grid_x + (i as u16 % 2) * 20;
        let y = app.layout.help_y + i as u16 / 2;
        execute!(
            out,
            MoveTo(x, y),
            SetBackgroundColor(theme.bg),
            SetForegroundColor(theme.key),
            Print(key),
            SetForegroundColor(theme.info),
            Print(format!(" {}", desc))
        )?;
    }

    Ok(())
}

fn render_status<W: Write>(out: &mut W, app: &App) -> io::Result<()> {
    let theme = &app.theme;
    let orch = &app.orchestrator;
    let active: Vec<&str> = orch
        .operations()
        .active()
        .into_iter()
        .map(|op| op.tag())
        .collect();
    let busy = if active.is_empty() {
        "idle".to_string()
    } else {
        active.join(", ")
    };

    execute!(
        out,
        MoveTo(app.layout.grid_x, app.layout.status_y),
        SetBackgroundColor(theme.bg),
        SetForegroundColor(theme.info),
        Print(format!("{} backend | {}", orch.backend_name(), busy))
    )
}

fn render_dropdown_menu<W: Write>(out: &mut W, app: &App) -> io::Result<()> {
    let theme = &app.theme;
    let menu = app.layout.menu;
    let current = app.orchestrator.algorithm();

    for (i, algorithm) in Algorithm::all().iter().enumerate() {
        let (fg, bg) = if i == app.dropdown.highlighted {
            (Color::Black, theme.key)
        } else {
            (theme.fg, theme.modal_bg)
        };
        let marker = if *algorithm == current { "*" } else { " " };
        execute!(
            out,
            MoveTo(menu.x, menu.y + i as u16),
            SetForegroundColor(fg),
            SetBackgroundColor(bg),
            Print(format!("{}{:<35} ", marker, algorithm.name()))
        )?;
    }

    Ok(())
}

fn render_alert<W: Write>(out: &mut W, app: &App) -> io::Result<()> {
    let theme = &app.theme;
    let alert = app.orchestrator.alerts().snapshot();
    let geometry = app.layout.alert(&alert.message);
    let Rect { x, y, w, h } = geometry.frame;
    let inner = w as usize - 2;

    execute!(out, SetBackgroundColor(theme.modal_bg), SetForegroundColor(theme.border))?;
    execute!(out, MoveTo(x, y), Print(format!("┌{}┐", "─".repeat(inner))))?;
    for row in 1..h - 1 {
        execute!(out, MoveTo(x, y + row), Print(format!("│{}│", " ".repeat(inner))))?;
    }
    execute!(out, MoveTo(x, y + h - 1), Print(format!("└{}┘", "─".repeat(inner))))?;

    execute!(
        out,
        MoveTo(x + 3, y + 1),
        SetForegroundColor(theme.error),
        Print(&alert.title)
    )?;
    for (i, line) in geometry.lines.iter().enumerate() {
        execute!(
            out,
            MoveTo(x + 3, y + 3 + i as u16),
            SetForegroundColor(theme.fg),
            Print(line)
        )?;
    }

    let close = geometry.close;
    execute!(
        out,
        MoveTo(close.x, close.y),
        SetForegroundColor(Color::Black),
        SetBackgroundColor(theme.key),
        Print(format!("{:^9}", "Close"))
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use sudoku_client::{MockService, ServiceError};

    fn rendered(app: &App) -> String {
        let mut buf = Vec::new();
        render(&mut buf, app).unwrap();
        String::from_utf8_lossy(&buf).into_owned()
    }

    #[test]
    fn test_render_main_screen() {
        let mut app = App::new(
            Arc::new(MockService::new()),
            Algorithm::Evolutionary,
            Difficulty::Medium,
        );
        app.set_viewport(100, 40);

        let screen = rendered(&app);
        assert!(screen.contains("Sudoku solver"));
        assert!(screen.contains("Evolutionary"));
        assert!(screen.contains("Import"));
        assert!(!screen.contains("Close"));
    }

    #[test]
    fn test_render_alert_and_menu() {
        let service =
            MockService::new().with_solve_error(ServiceError::Network("refused".to_string()));
        let mut app = App::new(Arc::new(service), Algorithm::Backtracking, Difficulty::Easy);
        app.set_viewport(100, 40);
        app.dropdown.open = true;

        app.orchestrator.solve();
        app.orchestrator.wait();

        let screen = rendered(&app);
        assert!(screen.contains("The fetching was unsuccessful"));
        assert!(screen.contains("Close"));
        assert!(screen.contains("Tabu search"));
    }

    #[test]
    fn test_render_tiny_terminal() {
        let mut app = App::new(
            Arc::new(MockService::new()),
            Algorithm::Backtracking,
            Difficulty::Easy,
        );
        app.set_viewport(20, 10);
        app.orchestrator.alerts().alert("No solution", "No solution found :(");
        assert!(!rendered(&app).is_empty());
    }
}
