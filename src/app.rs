use std::io::Write;
use std::path::PathBuf;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::widgets::ListState;
use tracing::debug;

use crate::registry::{Registry, ServerRecord};
use crate::selection::Selection;
use crate::terminal::Terminal;
use crate::ui;

pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");

/// What the event loop should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
    Connect(ServerRecord),
}

/// Owns the loaded servers and the current selection.
pub struct App {
    registry: Registry,
    selection: Selection,
    // kept across frames for the list's scroll offset
    list_state: ListState,
    config_path: PathBuf,
}

impl App {
    pub fn new(registry: Registry, config_path: PathBuf) -> Self {
        App {
            selection: Selection::new(registry.len()),
            list_state: ListState::default(),
            registry,
            config_path,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected(&self) -> Option<&ServerRecord> {
        self.selection.index().and_then(|i| self.registry.get(i))
    }

    /// Draw and handle keys until the user quits or picks a server.
    pub fn run(
        &mut self,
        terminal: &mut Terminal<impl Write>,
    ) -> anyhow::Result<Option<ServerRecord>> {
        loop {
            self.draw(terminal)?;
            let action = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                _ => Action::Continue,
            };
            match action {
                Action::Continue => {}
                Action::Quit => {
                    terminal.clear()?;
                    return Ok(None);
                }
                Action::Connect(record) => {
                    terminal.clear()?;
                    return Ok(Some(record));
                }
            }
        }
    }

    pub fn draw(&mut self, terminal: &mut Terminal<impl Write>) -> anyhow::Result<()> {
        terminal.draw(|f| {
            ui::render(
                f,
                &self.registry,
                &self.selection,
                &mut self.list_state,
                &self.config_path,
            )
        })?;
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
            KeyCode::Down | KeyCode::Char('j') => {
                self.selection.next();
                debug!("highlight {:?}", self.selection.index());
                Action::Continue
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selection.previous();
                debug!("highlight {:?}", self.selection.index());
                Action::Continue
            }
            KeyCode::Enter => {
                let activated = self
                    .selection
                    .index()
                    .and_then(|i| self.selection.activate(i))
                    .and_then(|i| self.registry.get(i));
                match activated {
                    Some(record) => Action::Connect(record.clone()),
                    None => Action::Continue,
                }
            }
            _ => Action::Continue,
        }
    }
}
