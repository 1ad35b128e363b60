pub mod panels;

use std::time::Duration;

use anyhow::Result;
use crossterm::event::Event;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::{DefaultTerminal, Frame};

use crate::input::{self, Command};
use crate::session::{Console, SessionView};

use panels::{KeybindBar, NotesPanel, PixelCanvas, StatusBar};

/// Terminal shell. Owns the ratatui terminal for the whole session.
pub struct TerminalConsole {
    terminal: DefaultTerminal,
}

impl TerminalConsole {
    pub fn new() -> Self {
        Self {
            terminal: ratatui::init(),
        }
    }

    /// Hand the terminal back. Call once the session loop has finished.
    pub fn shutdown(self) {
        ratatui::restore();
    }
}

impl Console for TerminalConsole {
    fn present(&mut self, view: &SessionView<'_>) -> Result<()> {
        self.terminal.draw(|frame| render(frame, view))?;
        Ok(())
    }

    fn poll_command(&mut self, timeout: Duration) -> Result<Option<Command>> {
        if crossterm::event::poll(timeout)? {
            if let Event::Key(key) = crossterm::event::read()? {
                return Ok(input::parse_key(&key.code));
            }
        }
        Ok(None)
    }
}

pub fn render(frame: &mut Frame, view: &SessionView<'_>) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(8),    // chart
            Constraint::Length(7), // session log
            Constraint::Length(1), // keybinds
        ])
        .split(frame.area());

    frame.render_widget(StatusBar { view }, outer[0]);
    frame.render_widget(PixelCanvas::new(view.frame), outer[1]);
    frame.render_widget(NotesPanel::new(view.notes), outer[2]);
    frame.render_widget(KeybindBar, outer[3]);
}
