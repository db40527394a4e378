//! TUI Application - terminal lifecycle and run loop

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use super::controller::Controller;
use super::events::{handle_key_event, poll_event};
use super::theme::Theme;
use super::ui;
use crate::service::Backend;

/// TUI Application
pub struct TuiApp {
    controller: Controller,
    theme: Theme,
}

impl TuiApp {
    pub fn new(backend: Backend) -> Self {
        Self {
            controller: Controller::new(backend),
            theme: Theme::new(),
        }
    }

    /// Run the application until the user quits
    pub async fn run(mut self) -> anyhow::Result<()> {
        let mut terminal = self.setup_terminal()?;

        // Mount: one-shot session init plus the initial catalog load.
        self.controller.init_session();
        self.controller.load_all_books();

        let result = self.main_loop(&mut terminal).await;

        self.restore_terminal(&mut terminal)?;
        result
    }

    /// Setup terminal for TUI
    fn setup_terminal(&self) -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(terminal)
    }

    /// Restore terminal to normal state
    fn restore_terminal(
        &self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> anyhow::Result<()> {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
        Ok(())
    }

    /// Main event loop
    async fn main_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> anyhow::Result<()> {
        let tick_rate = Duration::from_millis(50);

        loop {
            let now = Instant::now();
            self.controller.tick(now);

            terminal.draw(|frame| ui::render(frame, self.controller.state(), &self.theme))?;

            if let Some(key) = poll_event(tick_rate)? {
                let action = handle_key_event(key);
                self.controller.handle(action, Instant::now());
            }

            // Let spawned service tasks make progress between polls.
            tokio::task::yield_now().await;

            if self.controller.should_quit() {
                break;
            }
        }

        Ok(())
    }
}
