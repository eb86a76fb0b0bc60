use crossterm::{
    cursor::Show,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Stdout};

/// Raw mode, alternate screen and mouse capture for as long as this lives.
/// Dropping it puts the terminal back, including on error paths.
pub struct TerminalSession {
    stdout: Stdout,
}

impl TerminalSession {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut session = Self {
            stdout: io::stdout(),
        };
        execute!(session.stdout, EnterAlternateScreen, EnableMouseCapture)?;
        Ok(session)
    }

    pub fn stdout(&mut self) -> &mut Stdout {
        &mut self.stdout
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = execute!(self.stdout, DisableMouseCapture, LeaveAlternateScreen, Show);
        let _ = disable_raw_mode();
    }
}
