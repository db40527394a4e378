//! TUI Module - Book Browser
//!
//! Architecture:
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         UI LAYER (ui.rs)                            │
//! │  Pure rendering. No business logic. Reads AppState.                 │
//! └─────────────────────────────────────────────────────────────────────┘
//!                               ▲
//!                               │ &AppState
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                 DOMAIN LAYER (controller.rs, state.rs)              │
//! │  Named operations mutate AppState; completions routed by sequence.  │
//! └─────────────────────────────────────────────────────────────────────┘
//!                               ▲
//!                               │ Completion channel
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    SERVICE LAYER (service/)                         │
//! │  CatalogService + SessionService + RecommendationService.           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

mod app;
pub mod controller;
pub mod debounce;
mod events;
pub mod state;
mod theme;
mod ui;

pub use app::TuiApp;
pub use controller::{Completion, Controller, EMPTY_RECOMMENDATION, SEARCH_DEBOUNCE};
pub use debounce::Debouncer;
pub use events::Action;
pub use state::{AppState, RecommendationView, Severity};

use crate::service::Backend;

/// Run the book browser against the given backend
pub async fn run(backend: Backend) -> anyhow::Result<()> {
    let app = TuiApp::new(backend);
    app.run().await
}
