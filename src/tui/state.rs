//! AppState - Domain Layer
//!
//! Central mutable UI state owned by the controller. All mutations funnel
//! through the controller's named operations; rendering reads this state and
//! nothing else.

use std::collections::{HashSet, VecDeque};
use std::time::{Duration, Instant};

use crate::catalog::Book;
use crate::service::SessionInfo;

/// How long a toast stays on screen
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

/// Most toasts kept at once
pub const MAX_NOTIFICATIONS: usize = 8;

// ─────────────────────────────────────────────────────────────────────────────
// Core State
// ─────────────────────────────────────────────────────────────────────────────

/// Main application state
#[derive(Debug, Default)]
pub struct AppState {
    /// Current book list snapshot; replaced wholesale, never merged
    pub books: Vec<Book>,

    /// Ids marked favorite, independent of any list snapshot
    pub favorites: HashSet<String>,

    /// Credentials for the agent; absent until (and unless) init succeeds
    pub session: Option<SessionInfo>,

    /// Current search term, mutated on every keystroke
    pub query: String,

    /// Selected row in the book list
    pub selected: usize,

    /// A catalog load or search is in flight
    pub list_loading: bool,

    /// A recommendation request is in flight
    pub rec_loading: bool,

    pub recommendations: RecommendationView,

    pub notifications: VecDeque<Notification>,

    pub should_quit: bool,
}

impl AppState {
    /// Book currently under the cursor
    pub fn selected_book(&self) -> Option<&Book> {
        self.books.get(self.selected)
    }

    /// Clamp the selection to the current list length
    pub fn clamp_selection(&mut self) {
        if self.books.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.books.len() {
            self.selected = self.books.len() - 1;
        }
    }

    /// Push a toast, newest first, dropping the oldest past the cap
    pub fn notify(
        &mut self,
        title: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
    ) {
        self.notifications.push_front(Notification {
            title: title.into(),
            message: message.into(),
            severity,
            raised_at: Instant::now(),
        });
        if self.notifications.len() > MAX_NOTIFICATIONS {
            self.notifications.pop_back();
        }
    }

    /// Drop toasts older than their TTL
    pub fn prune_notifications(&mut self, now: Instant) {
        self.notifications
            .retain(|n| now.duration_since(n.raised_at) < NOTIFICATION_TTL);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Recommendation View
// ─────────────────────────────────────────────────────────────────────────────

/// Transient presentation state for the agent's answer.
///
/// Exactly one view is active at a time; opening a new one replaces any
/// prior one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecommendationView {
    pub visible: bool,
    /// Name of the book the recommendation is for
    pub selected_book: String,
    pub text: String,
}

impl RecommendationView {
    /// Fully reset: no history is retained
    pub fn close(&mut self) {
        *self = Self::default();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Notifications
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub severity: Severity,
    pub raised_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Info => "ℹ",
            Self::Success => "✓",
            Self::Warning => "⚠",
            Self::Error => "✗",
        }
    }
}
