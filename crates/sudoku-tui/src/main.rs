mod app;
mod config;
mod error;
mod layout;
mod logging;
mod render;
mod terminal;
mod theme;

use app::{App, AppAction};
use clap::Parser;
use config::{Cli, Settings};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use error::AppError;
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;
use sudoku_client::HttpPuzzleService;
use terminal::TerminalSession;
use tracing::info;

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    let settings = Settings::from_cli(&cli)?;
    logging::init(&settings)?;

    info!(
        backend = %settings.service.backend_url,
        import = %settings.service.import_url,
        algorithm = %settings.algorithm,
        difficulty = %settings.difficulty,
        "starting"
    );

    let service = HttpPuzzleService::new(&settings.service)?;
    let mut app = App::new(Arc::new(service), settings.algorithm, settings.difficulty);

    let mut session = TerminalSession::enter()?;
    let result = run_app(&mut session, &mut app);
    drop(session);

    info!("exiting");
    result
}

fn run_app(session: &mut TerminalSession, app: &mut App) -> Result<(), AppError> {
    let mut last_tick = Instant::now();

    loop {
        let tick_rate = app.get_tick_rate();

        let (width, height) = crossterm::terminal::size()?;
        app.set_viewport(width, height);
        let stdout = session.stdout();
        render::render(stdout, app)?;
        stdout.flush()?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            let action = match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if key.modifiers.contains(KeyModifiers::CONTROL)
                        && key.code == KeyCode::Char('c')
                    {
                        break;
                    }
                    app.handle_key(key)
                }
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => AppAction::Continue,
            };
            if action == AppAction::Quit {
                break;
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}
