//! # Service Abstraction Layer
//!
//! Traits and implementations for the three remote collaborators:
//!
//! - [`CatalogService`] - book catalog fetch and search
//! - [`SessionService`] - one-shot session initialization
//! - [`RecommendationService`] - conversational agent invocation
//!
//! ## Available Backends
//!
//! | Backend | Use Case | Features |
//! |---------|----------|----------|
//! | `http`  | Production | JSON over HTTP, bearer auth |
//! | `mock`  | Testing / offline demo | Seeded catalog, configurable failures |
//!
//! The HTTP clients live in [`http`], the configurable in-memory doubles in
//! [`mock`]. A [`Backend`] bundles one implementation of each trait behind
//! `Arc<dyn _>` so the controller never knows which it is talking to.

pub mod http;
pub mod mock;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::catalog::BookRecord;
use crate::config::LibriConfig;
use crate::error::Result;

pub use http::{HttpCatalogService, HttpRecommendationService, HttpSessionService};
pub use mock::{demo_catalog, MockAgent, MockCatalog, MockSession};

// ============================================================================
// WIRE TYPES
// ============================================================================

/// Opaque credential bundle returned by the session service
///
/// Required before any recommendation request; obtained once per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub access_token: String,
    pub session_id: String,
}

// ============================================================================
// SERVICE TRAITS
// ============================================================================

/// Book catalog: unfiltered fetch plus term search.
///
/// An empty search term means "no filter" and returns the full catalog.
#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<BookRecord>>;
    async fn search(&self, term: &str) -> Result<Vec<BookRecord>>;
}

/// Session issuance, called once at startup
#[async_trait]
pub trait SessionService: Send + Sync {
    async fn init_session(&self) -> Result<SessionInfo>;
}

/// Conversational agent invocation
///
/// Returns the agent's recommendation text, which may be empty.
#[async_trait]
pub trait RecommendationService: Send + Sync {
    async fn invoke(&self, session: &SessionInfo, message: &str) -> Result<String>;
}

// ============================================================================
// BACKEND BUNDLE
// ============================================================================

/// One implementation of each service, shared by clone
#[derive(Clone)]
pub struct Backend {
    pub catalog: Arc<dyn CatalogService>,
    pub session: Arc<dyn SessionService>,
    pub agent: Arc<dyn RecommendationService>,
}

impl Backend {
    /// Production backend: HTTP clients against the configured endpoints
    pub fn http(config: &LibriConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::new();
        let api_key = config.api_key().map(str::to_string);

        Ok(Self {
            catalog: Arc::new(HttpCatalogService::new(
                client.clone(),
                config.catalog_url(),
            )),
            session: Arc::new(HttpSessionService::new(
                client.clone(),
                config.session_url(),
                api_key.clone(),
            )),
            agent: Arc::new(HttpRecommendationService::new(
                client,
                config.agent_url(),
                api_key,
            )),
        })
    }

    /// Offline backend: seeded in-memory catalog, deterministic agent
    pub fn mock() -> Self {
        Self {
            catalog: Arc::new(MockCatalog::with_books(demo_catalog())),
            session: Arc::new(MockSession::new()),
            agent: Arc::new(MockAgent::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Endpoints, LibriConfig};

    #[test]
    fn test_session_info_wire_shape() {
        let json = r#"{"accessToken":"tok-1","sessionId":"sess-1"}"#;
        let info: SessionInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.access_token, "tok-1");
        assert_eq!(info.session_id, "sess-1");

        let back = serde_json::to_string(&info).unwrap();
        assert!(back.contains("accessToken"));
        assert!(back.contains("sessionId"));
    }

    #[test]
    fn test_http_backend_rejects_bad_endpoint() {
        let config = LibriConfig {
            endpoints: Endpoints {
                catalog_url: Some("::garbage::".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(Backend::http(&config).is_err());
    }

    #[tokio::test]
    async fn test_mock_backend_serves_seeded_catalog() {
        let backend = Backend::mock();
        let books = backend.catalog.fetch_all().await.unwrap();
        assert!(!books.is_empty());

        let session = backend.session.init_session().await.unwrap();
        let reply = backend
            .agent
            .invoke(&session, "recommend something")
            .await
            .unwrap();
        assert!(!reply.is_empty());
    }
}
