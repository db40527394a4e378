//! Event Handling - Keyboard input processing
//!
//! Translates raw key events into [`Action`]s. The search box is always
//! focused: printable characters edit the query, control keys drive
//! navigation and the favorite/recommendation flow.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;

/// Actions that can be triggered by user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Append a character to the search query
    Input(char),
    /// Delete the last character of the search query
    Backspace,
    /// Reset the query and refresh the unfiltered list
    ClearSearch,
    /// Close the recommendation panel if open, otherwise clear the search
    Dismiss,
    /// Toggle favorite on the selected book
    ToggleFavorite,
    SelectPrev,
    SelectNext,
    /// Reload the full catalog
    Refresh,
    None,
}

/// Map a key event to an action
pub fn handle_key_event(key: KeyEvent) -> Action {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
        // Quit: Ctrl+C or Ctrl+Q
        KeyCode::Char('c') | KeyCode::Char('q') if ctrl => Action::Quit,

        // Catalog refresh / search clear
        KeyCode::Char('r') if ctrl => Action::Refresh,
        KeyCode::Char('u') if ctrl => Action::ClearSearch,

        // Panel dismissal / search clear
        KeyCode::Esc => Action::Dismiss,

        // List navigation + favorite toggle
        KeyCode::Up => Action::SelectPrev,
        KeyCode::Down => Action::SelectNext,
        KeyCode::Enter => Action::ToggleFavorite,

        // Query editing
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Char(c) if !ctrl && !alt => Action::Input(c),

        _ => Action::None,
    }
}

/// Poll for keyboard events with timeout
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<KeyEvent>> {
    if event::poll(timeout)? {
        if let Event::Key(key) = event::read()? {
            return Ok(Some(key));
        }
    }
    Ok(None)
}
