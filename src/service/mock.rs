//! Mock services for testing and offline demo
//!
//! Return configurable data without making real network calls. The same
//! types back the `--mock` demo mode and the test suite: failures, latency
//! and canned replies are all injectable, and every request is recorded for
//! assertions.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::{CatalogService, RecommendationService, SessionInfo, SessionService};
use crate::catalog::BookRecord;
use crate::error::{LibriError, Result};

fn service_failure(service: &'static str) -> LibriError {
    LibriError::Api {
        service,
        status: 500,
        body: "mock failure".to_string(),
    }
}

/// Seeded catalog used by the offline demo
pub fn demo_catalog() -> Vec<BookRecord> {
    let entries: [(&str, &str, Option<f64>, &str, &str); 6] = [
        ("1", "Dune", Some(15.0), "English", "SciFi"),
        ("2", "The Left Hand of Darkness", Some(12.5), "English", "SciFi"),
        ("3", "Solaris", Some(9.99), "Polish", "SciFi"),
        ("4", "The Name of the Rose", Some(18.0), "Italian", "Mystery"),
        ("5", "Pedro Páramo", None, "Spanish", "Fiction"),
        ("6", "The Master and Margarita", Some(11.25), "Russian", "Fantasy"),
    ];
    entries
        .into_iter()
        .map(|(id, name, price, language, genre)| BookRecord {
            id: id.to_string(),
            name: name.to_string(),
            price,
            language: language.to_string(),
            genre: genre.to_string(),
        })
        .collect()
}

// ============================================================================
// CATALOG
// ============================================================================

/// In-memory catalog with substring search
pub struct MockCatalog {
    books: Arc<Mutex<Vec<BookRecord>>>,
    fail: Arc<Mutex<bool>>,
    latency: Option<Duration>,
    /// Search terms received, in call order (for assertions)
    searches: Arc<Mutex<Vec<String>>>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::with_books(Vec::new())
    }

    pub fn with_books(books: Vec<BookRecord>) -> Self {
        Self {
            books: Arc::new(Mutex::new(books)),
            fail: Arc::new(Mutex::new(false)),
            latency: None,
            searches: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Delay every call by `latency` before answering
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make every subsequent call fail (or succeed again)
    pub fn set_fail(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    /// Replace the seeded catalog
    pub fn set_books(&self, books: Vec<BookRecord>) {
        *self.books.lock().unwrap() = books;
    }

    /// All search terms received so far
    pub fn recorded_searches(&self) -> Vec<String> {
        self.searches.lock().unwrap().clone()
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogService for MockCatalog {
    async fn fetch_all(&self) -> Result<Vec<BookRecord>> {
        self.simulate_latency().await;
        if *self.fail.lock().unwrap() {
            return Err(service_failure("catalog"));
        }
        Ok(self.books.lock().unwrap().clone())
    }

    async fn search(&self, term: &str) -> Result<Vec<BookRecord>> {
        self.searches.lock().unwrap().push(term.to_string());
        self.simulate_latency().await;
        if *self.fail.lock().unwrap() {
            return Err(service_failure("catalog"));
        }

        let books = self.books.lock().unwrap();
        if term.is_empty() {
            // Empty term means "no filter", matching the backend contract.
            return Ok(books.clone());
        }
        let needle = term.to_lowercase();
        Ok(books
            .iter()
            .filter(|b| b.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }
}

// ============================================================================
// SESSION
// ============================================================================

/// Session service double issuing a fixed credential pair
pub struct MockSession {
    fail: Arc<Mutex<bool>>,
    session: SessionInfo,
}

impl MockSession {
    pub fn new() -> Self {
        Self {
            fail: Arc::new(Mutex::new(false)),
            session: SessionInfo {
                access_token: "mock-access-token".to_string(),
                session_id: "mock-session-id".to_string(),
            },
        }
    }

    pub fn failing() -> Self {
        let s = Self::new();
        *s.fail.lock().unwrap() = true;
        s
    }

    pub fn set_fail(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }
}

impl Default for MockSession {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionService for MockSession {
    async fn init_session(&self) -> Result<SessionInfo> {
        if *self.fail.lock().unwrap() {
            return Err(service_failure("session"));
        }
        Ok(self.session.clone())
    }
}

// ============================================================================
// AGENT
// ============================================================================

/// Agent double with a FIFO reply queue
pub struct MockAgent {
    /// Queue of replies to return (FIFO)
    replies: Arc<Mutex<Vec<String>>>,
    /// Default reply when the queue is empty
    default_reply: String,
    fail: Arc<Mutex<bool>>,
    latency: Option<Duration>,
    /// Messages received, in call order (for assertions)
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockAgent {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(Vec::new())),
            default_reply:
                "Readers who liked this also enjoyed exploring nearby shelves.".to_string(),
            fail: Arc::new(Mutex::new(false)),
            latency: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create with a queue of replies
    pub fn with_replies(replies: Vec<String>) -> Self {
        let agent = Self::new();
        *agent.replies.lock().unwrap() = replies;
        agent
    }

    /// Set the default reply used when the queue is empty
    pub fn with_default(mut self, reply: impl Into<String>) -> Self {
        self.default_reply = reply.into();
        self
    }

    /// Delay every call by `latency` before answering
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn set_fail(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    /// Add a reply to the queue
    pub fn queue_reply(&self, reply: impl Into<String>) {
        self.replies.lock().unwrap().push(reply.into());
    }

    /// All messages received so far
    pub fn recorded_requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// The last message received
    pub fn last_request(&self) -> Option<String> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl Default for MockAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecommendationService for MockAgent {
    async fn invoke(&self, _session: &SessionInfo, message: &str) -> Result<String> {
        self.requests.lock().unwrap().push(message.to_string());
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if *self.fail.lock().unwrap() {
            return Err(service_failure("agent"));
        }

        let mut queue = self.replies.lock().unwrap();
        if queue.is_empty() {
            Ok(self.default_reply.clone())
        } else {
            Ok(queue.remove(0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> SessionInfo {
        SessionInfo {
            access_token: "t".into(),
            session_id: "s".into(),
        }
    }

    #[tokio::test]
    async fn test_catalog_empty_term_returns_everything() {
        let catalog = MockCatalog::with_books(demo_catalog());
        let all = catalog.search("").await.unwrap();
        assert_eq!(all.len(), demo_catalog().len());
    }

    #[tokio::test]
    async fn test_catalog_search_filters_by_name() {
        let catalog = MockCatalog::with_books(demo_catalog());
        let hits = catalog.search("dune").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Dune");
    }

    #[tokio::test]
    async fn test_catalog_records_search_terms() {
        let catalog = MockCatalog::new();
        catalog.search("one").await.unwrap();
        catalog.search("two").await.unwrap();
        assert_eq!(catalog.recorded_searches(), vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_catalog_latency_delays_replies() {
        let catalog =
            MockCatalog::with_books(demo_catalog()).with_latency(Duration::from_millis(30));
        let start = std::time::Instant::now();
        catalog.fetch_all().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[tokio::test]
    async fn test_catalog_failure_toggle() {
        let catalog = MockCatalog::with_books(demo_catalog());
        catalog.set_fail(true);
        assert!(catalog.fetch_all().await.is_err());
        catalog.set_fail(false);
        assert!(catalog.fetch_all().await.is_ok());
    }

    #[tokio::test]
    async fn test_session_failing_constructor() {
        let session = MockSession::failing();
        assert!(session.init_session().await.is_err());
    }

    #[tokio::test]
    async fn test_agent_queued_replies_then_default() {
        let agent = MockAgent::with_replies(vec!["First".into(), "Second".into()])
            .with_default("Fallback");

        assert_eq!(agent.invoke(&session(), "a").await.unwrap(), "First");
        assert_eq!(agent.invoke(&session(), "b").await.unwrap(), "Second");
        assert_eq!(agent.invoke(&session(), "c").await.unwrap(), "Fallback");
    }

    #[tokio::test]
    async fn test_agent_records_requests() {
        let agent = MockAgent::new();
        agent.invoke(&session(), "recommend Dune").await.unwrap();
        assert_eq!(agent.last_request().as_deref(), Some("recommend Dune"));
    }
}
