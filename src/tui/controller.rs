//! Controller - orchestrates services and owns all state mutations
//!
//! Every user-visible operation is a named method here: catalog load,
//! debounced search, favorite toggling, session initialization and the
//! recommendation flow. Service calls are spawned tasks; their completions
//! come back through an internal channel and are applied on the event loop
//! by [`Controller::tick`], so state is only ever mutated from one place.
//!
//! Each list-producing request (load or search) and each recommendation
//! request carries a sequence number from a monotonic per-kind counter. A
//! completion whose number is not the latest issued for its kind is
//! discarded, so a slow early response can never overwrite a newer one.
//! Completions that arrive after the controller is dropped die with the
//! channel and are never applied.

use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use super::debounce::Debouncer;
use super::events::Action;
use super::state::{AppState, RecommendationView, Severity};
use crate::catalog::{self, Book, BookRecord};
use crate::error::LibriError;
use crate::service::{Backend, SessionInfo};

/// Quiet window between the last keystroke and the search call
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Shown when the agent answers with an empty reply
pub const EMPTY_RECOMMENDATION: &str = "No recommendations available.";

/// Result of a spawned service call, tagged with its request sequence
#[derive(Debug)]
pub enum Completion {
    CatalogLoaded {
        seq: u64,
        result: Result<Vec<BookRecord>, LibriError>,
    },
    SearchCompleted {
        seq: u64,
        result: Result<Vec<BookRecord>, LibriError>,
    },
    SessionReady(Result<SessionInfo, LibriError>),
    RecommendationReady {
        seq: u64,
        book_name: String,
        result: Result<String, LibriError>,
    },
}

pub struct Controller {
    state: AppState,
    backend: Backend,
    debouncer: Debouncer,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    /// Latest issued sequence for list-producing requests (load and search)
    list_seq: u64,
    /// Latest issued sequence for recommendation requests
    rec_seq: u64,
}

impl Controller {
    pub fn new(backend: Backend) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state: AppState::default(),
            backend,
            debouncer: Debouncer::new(SEARCH_DEBOUNCE),
            tx,
            rx,
            list_seq: 0,
            rec_seq: 0,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn should_quit(&self) -> bool {
        self.state.should_quit
    }

    // ─────────────────────────────────────────────────────────────────────
    // Event-loop entry points
    // ─────────────────────────────────────────────────────────────────────

    /// Dispatch a user action to the matching operation
    pub fn handle(&mut self, action: Action, now: Instant) {
        match action {
            Action::Quit => self.state.should_quit = true,
            Action::Input(c) => {
                let mut text = self.state.query.clone();
                text.push(c);
                self.on_search_input(text, now);
            }
            Action::Backspace => {
                let mut text = self.state.query.clone();
                text.pop();
                self.on_search_input(text, now);
            }
            Action::ClearSearch => self.clear_search(),
            Action::Dismiss => {
                if self.state.recommendations.visible {
                    self.close_recommendations();
                } else {
                    self.clear_search();
                }
            }
            Action::ToggleFavorite => {
                if let Some(book) = self.state.selected_book() {
                    let id = book.id.clone();
                    self.toggle_favorite(&id);
                }
            }
            Action::SelectPrev => {
                self.state.selected = self.state.selected.saturating_sub(1);
            }
            Action::SelectNext => {
                self.state.selected = self.state.selected.saturating_add(1);
                self.state.clamp_selection();
            }
            Action::Refresh => self.load_all_books(),
            Action::None => {}
        }
    }

    /// Apply pending completions, fire a due debounced search, expire toasts
    pub fn tick(&mut self, now: Instant) {
        while let Ok(completion) = self.rx.try_recv() {
            self.apply(completion);
        }
        if self.debouncer.fire(now) {
            self.perform_search();
        }
        self.state.prune_notifications(now);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Catalog loader
    // ─────────────────────────────────────────────────────────────────────

    /// Load the unfiltered catalog.
    ///
    /// Loaded books always start unfavorited, even for ids currently in the
    /// favorite set; only search results resynchronize the flag. Documented
    /// behavior, kept as-is.
    pub fn load_all_books(&mut self) {
        self.list_seq += 1;
        let seq = self.list_seq;
        self.state.list_loading = true;

        let service = self.backend.catalog.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = service.fetch_all().await;
            let _ = tx.send(Completion::CatalogLoaded { seq, result });
        });
    }

    // ─────────────────────────────────────────────────────────────────────
    // Search
    // ─────────────────────────────────────────────────────────────────────

    /// Record a new query and (re)arm the debounce window
    pub fn on_search_input(&mut self, text: String, now: Instant) {
        self.state.query = text;
        self.debouncer.schedule(now);
    }

    /// Issue the search for the current query immediately.
    ///
    /// An empty query is still sent; the backend returns the unfiltered
    /// catalog for it.
    pub fn perform_search(&mut self) {
        self.list_seq += 1;
        let seq = self.list_seq;
        self.state.list_loading = true;

        let term = self.state.query.clone();
        let service = self.backend.catalog.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = service.search(&term).await;
            let _ = tx.send(Completion::SearchCompleted { seq, result });
        });
    }

    /// Reset the query and refresh the unfiltered list
    pub fn clear_search(&mut self) {
        self.state.query.clear();
        self.debouncer.cancel();
        self.perform_search();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Favorites
    // ─────────────────────────────────────────────────────────────────────

    /// Flip a book's favorite flag and keep the favorite set in step.
    ///
    /// Unknown ids are ignored. Favoriting also kicks off a recommendation
    /// request; the flag commits regardless of how that request ends.
    pub fn toggle_favorite(&mut self, book_id: &str) {
        let Some(book) = self.state.books.iter().find(|b| b.id == book_id) else {
            return;
        };
        let now_favorite = !book.is_favorite;
        let book = book.clone();

        self.state.books = catalog::with_favorite(&self.state.books, book_id, now_favorite);

        if now_favorite {
            self.state.favorites.insert(book_id.to_string());
            self.state.notify(
                "Favorites",
                format!("Added \"{}\" to favorites", book.name),
                Severity::Success,
            );
            self.request_recommendations(&book);
        } else {
            self.state.favorites.remove(book_id);
            self.state.notify(
                "Favorites",
                format!("Removed \"{}\" from favorites", book.name),
                Severity::Success,
            );
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Session
    // ─────────────────────────────────────────────────────────────────────

    /// One-shot session initialization, run at mount; never retried
    pub fn init_session(&mut self) {
        let service = self.backend.session.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = service.init_session().await;
            let _ = tx.send(Completion::SessionReady(result));
        });
    }

    // ─────────────────────────────────────────────────────────────────────
    // Recommendations
    // ─────────────────────────────────────────────────────────────────────

    /// Ask the agent for recommendations for `book`.
    ///
    /// Requires a session; without one this only raises an error toast.
    pub fn request_recommendations(&mut self, book: &Book) {
        let Some(session) = self.state.session.clone() else {
            self.state.notify(
                "Recommendations",
                "Recommendation service not initialized",
                Severity::Error,
            );
            return;
        };

        self.rec_seq += 1;
        let seq = self.rec_seq;
        self.state.rec_loading = true;
        self.state.recommendations.selected_book = book.name.clone();

        let prompt = recommendation_prompt(book);
        let book_name = book.name.clone();
        let service = self.backend.agent.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = service.invoke(&session, &prompt).await;
            let _ = tx.send(Completion::RecommendationReady {
                seq,
                book_name,
                result,
            });
        });
    }

    /// Dismiss the recommendation panel, clearing all of its state
    pub fn close_recommendations(&mut self) {
        self.state.recommendations.close();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Completion routing
    // ─────────────────────────────────────────────────────────────────────

    /// Apply a finished service call to the state.
    ///
    /// Stale completions (sequence older than the latest issued for their
    /// kind) are dropped without touching anything, including the loading
    /// flags, which belong to the newest request.
    pub fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::CatalogLoaded { seq, result } => {
                if seq != self.list_seq {
                    tracing::debug!(seq, latest = self.list_seq, "discarding stale catalog load");
                    return;
                }
                self.state.list_loading = false;
                match result {
                    Ok(records) => {
                        self.state.books = catalog::from_loaded(records);
                        self.state.clamp_selection();
                    }
                    Err(error) => {
                        tracing::error!(%error, "catalog load failed");
                        self.state
                            .notify("Catalog", "Failed to load books", Severity::Error);
                    }
                }
            }
            Completion::SearchCompleted { seq, result } => {
                if seq != self.list_seq {
                    tracing::debug!(seq, latest = self.list_seq, "discarding stale search");
                    return;
                }
                self.state.list_loading = false;
                match result {
                    Ok(records) => {
                        self.state.books = catalog::from_search(records, &self.state.favorites);
                        self.state.clamp_selection();
                    }
                    Err(error) => {
                        tracing::error!(%error, "search failed");
                        self.state
                            .notify("Search", "Failed to search books", Severity::Error);
                    }
                }
            }
            Completion::SessionReady(result) => match result {
                Ok(info) => {
                    tracing::debug!(session_id = %info.session_id, "session ready");
                    self.state.session = Some(info);
                }
                Err(error) => {
                    tracing::warn!(%error, "session initialization failed");
                    self.state.notify(
                        "Session",
                        "Failed to initialize recommendation service",
                        Severity::Warning,
                    );
                }
            },
            Completion::RecommendationReady {
                seq,
                book_name,
                result,
            } => {
                if seq != self.rec_seq {
                    tracing::debug!(seq, latest = self.rec_seq, "discarding stale recommendation");
                    return;
                }
                self.state.rec_loading = false;
                match result {
                    Ok(text) => {
                        let text = if text.trim().is_empty() {
                            EMPTY_RECOMMENDATION.to_string()
                        } else {
                            text
                        };
                        self.state.recommendations = RecommendationView {
                            visible: true,
                            selected_book: book_name,
                            text,
                        };
                    }
                    Err(error) => {
                        tracing::error!(%error, "agent invocation failed");
                        self.state.notify(
                            "Recommendations",
                            "Failed to get book recommendations",
                            Severity::Error,
                        );
                    }
                }
            }
        }
    }
}

/// Natural-language prompt sent to the agent for one book
fn recommendation_prompt(book: &Book) -> String {
    format!(
        "Suggest three books similar to \"{}\", a {} book written in {}. \
         Give a short list with one sentence on why each fits.",
        book.name, book.genre, book.language
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BookRecord;
    use crate::service::{Backend, SessionInfo};

    fn record(id: &str, name: &str) -> BookRecord {
        BookRecord {
            id: id.to_string(),
            name: name.to_string(),
            price: Some(10.0),
            language: "English".to_string(),
            genre: "SciFi".to_string(),
        }
    }

    fn session() -> SessionInfo {
        SessionInfo {
            access_token: "t".into(),
            session_id: "s".into(),
        }
    }

    #[tokio::test]
    async fn test_stale_search_completion_is_discarded() {
        let mut controller = Controller::new(Backend::mock());
        controller.perform_search(); // seq 1
        controller.perform_search(); // seq 2

        // A late response for seq 1 must not replace anything.
        controller.apply(Completion::SearchCompleted {
            seq: 1,
            result: Ok(vec![record("9", "Stale")]),
        });
        assert!(controller.state().books.is_empty());
        assert!(controller.state().list_loading);

        controller.apply(Completion::SearchCompleted {
            seq: 2,
            result: Ok(vec![record("1", "Fresh")]),
        });
        assert_eq!(controller.state().books[0].name, "Fresh");
        assert!(!controller.state().list_loading);
    }

    #[tokio::test]
    async fn test_stale_load_after_search_is_discarded() {
        let mut controller = Controller::new(Backend::mock());
        controller.load_all_books(); // seq 1
        controller.perform_search(); // seq 2

        controller.apply(Completion::CatalogLoaded {
            seq: 1,
            result: Ok(vec![record("9", "Old load")]),
        });
        assert!(controller.state().books.is_empty());
    }

    #[tokio::test]
    async fn test_search_failure_keeps_previous_list() {
        let mut controller = Controller::new(Backend::mock());
        controller.perform_search();
        controller.apply(Completion::SearchCompleted {
            seq: 1,
            result: Ok(vec![record("1", "Dune")]),
        });

        controller.perform_search();
        controller.apply(Completion::SearchCompleted {
            seq: 2,
            result: Err(LibriError::Api {
                service: "catalog",
                status: 500,
                body: "boom".into(),
            }),
        });

        assert_eq!(controller.state().books[0].name, "Dune");
        assert!(!controller.state().list_loading);
        let errors: Vec<_> = controller
            .state()
            .notifications
            .iter()
            .filter(|n| n.severity == Severity::Error)
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Failed to search books");
    }

    #[tokio::test]
    async fn test_toggle_favorite_unknown_id_is_noop() {
        let mut controller = Controller::new(Backend::mock());
        controller.toggle_favorite("missing");
        assert!(controller.state().favorites.is_empty());
        assert!(controller.state().notifications.is_empty());
    }

    #[tokio::test]
    async fn test_favorite_without_session_raises_error_and_no_view() {
        let mut controller = Controller::new(Backend::mock());
        controller.perform_search();
        controller.apply(Completion::SearchCompleted {
            seq: 1,
            result: Ok(vec![record("1", "Dune")]),
        });

        controller.toggle_favorite("1");

        // favorite committed regardless
        assert!(controller.state().favorites.contains("1"));
        assert!(controller.state().books[0].is_favorite);
        assert!(!controller.state().recommendations.visible);
        assert!(controller
            .state()
            .notifications
            .iter()
            .any(|n| n.message == "Recommendation service not initialized"));
    }

    #[tokio::test]
    async fn test_empty_agent_reply_gets_placeholder() {
        let mut controller = Controller::new(Backend::mock());
        controller.apply(Completion::SessionReady(Ok(session())));
        controller.rec_seq = 1;
        controller.apply(Completion::RecommendationReady {
            seq: 1,
            book_name: "Dune".into(),
            result: Ok("  ".into()),
        });

        assert!(controller.state().recommendations.visible);
        assert_eq!(controller.state().recommendations.text, EMPTY_RECOMMENDATION);
    }

    #[tokio::test]
    async fn test_rapid_retoggle_newest_recommendation_wins() {
        let mut controller = Controller::new(Backend::mock());
        controller.apply(Completion::SessionReady(Ok(session())));
        controller.perform_search();
        controller.apply(Completion::SearchCompleted {
            seq: 1,
            result: Ok(vec![record("1", "Dune"), record("2", "Solaris")]),
        });

        controller.toggle_favorite("1"); // rec seq 1
        controller.toggle_favorite("2"); // rec seq 2

        controller.apply(Completion::RecommendationReady {
            seq: 1,
            book_name: "Dune".into(),
            result: Ok("old".into()),
        });
        assert!(!controller.state().recommendations.visible);

        controller.apply(Completion::RecommendationReady {
            seq: 2,
            book_name: "Solaris".into(),
            result: Ok("new".into()),
        });
        assert_eq!(controller.state().recommendations.selected_book, "Solaris");
        assert_eq!(controller.state().recommendations.text, "new");
    }

    #[test]
    fn test_prompt_embeds_name_language_genre() {
        let book = Book::from_record(record("1", "Dune"), false);
        let prompt = recommendation_prompt(&book);
        assert!(prompt.contains("Dune"));
        assert!(prompt.contains("English"));
        assert!(prompt.contains("SciFi"));
    }
}
