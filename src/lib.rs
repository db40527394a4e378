//! Libri - terminal book catalog browser with AI-powered recommendations

pub mod catalog;
pub mod config;
pub mod error;
pub mod service;
pub mod tui;

pub use catalog::{format_price, Book, BookRecord};
pub use config::LibriConfig;
pub use error::{FixSuggestion, LibriError, Result};
pub use service::{Backend, SessionInfo};
