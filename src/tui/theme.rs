//! Bookshelf Theme - Visual Design System
//!
//! Warm paper/amber palette with teal accents.

use ratatui::style::{Color, Modifier, Style};

use super::state::Severity;

/// Bookshelf color palette
pub struct Theme {
    // Primary palette
    pub amber: Color,
    pub teal: Color,
    pub paper: Color,
    pub ink: Color,

    // Status colors
    pub success_green: Color,
    pub warning_orange: Color,
    pub error_red: Color,

    // Dimmed
    pub dim_gray: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            amber: Color::Rgb(255, 191, 0),       // #FFBF00
            teal: Color::Rgb(0, 153, 153),        // #009999
            paper: Color::Rgb(230, 237, 243),     // #E6EDF3
            ink: Color::Rgb(13, 17, 23),          // #0D1117
            success_green: Color::Rgb(63, 185, 80), // #3FB950
            warning_orange: Color::Rgb(210, 153, 34), // #D29922
            error_red: Color::Rgb(248, 81, 73),   // #F85149
            dim_gray: Color::Rgb(110, 118, 129),  // #6E7681
        }
    }
}

impl Theme {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(&self) -> Style {
        Style::default().fg(self.amber).add_modifier(Modifier::BOLD)
    }

    pub fn accent(&self) -> Style {
        Style::default().fg(self.teal)
    }

    pub fn text(&self) -> Style {
        Style::default().fg(self.paper)
    }

    pub fn dimmed(&self) -> Style {
        Style::default().fg(self.dim_gray)
    }

    pub fn highlight(&self) -> Style {
        Style::default()
            .fg(self.ink)
            .bg(self.amber)
            .add_modifier(Modifier::BOLD)
    }

    pub fn favorite(&self) -> Style {
        Style::default().fg(self.error_red)
    }

    pub fn success(&self) -> Style {
        Style::default().fg(self.success_green)
    }

    pub fn warning(&self) -> Style {
        Style::default().fg(self.warning_orange)
    }

    pub fn error(&self) -> Style {
        Style::default().fg(self.error_red).add_modifier(Modifier::BOLD)
    }

    /// Style for a toast of the given severity
    pub fn severity(&self, severity: Severity) -> Style {
        match severity {
            Severity::Info => self.accent(),
            Severity::Success => self.success(),
            Severity::Warning => self.warning(),
            Severity::Error => self.error(),
        }
    }
}
