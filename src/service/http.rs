//! HTTP implementations of the service contracts
//!
//! JSON over HTTP via `reqwest`. Endpoint layout:
//!
//! - `GET  {catalog}/books` - full catalog
//! - `GET  {catalog}/books/search?searchTerm=...` - filtered catalog
//! - `POST {session}/session` - session initialization
//! - `POST {agent}/agent/invoke` - agent invocation
//!
//! The session and agent services accept an optional bearer API key.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{CatalogService, RecommendationService, SessionInfo, SessionService};
use crate::catalog::BookRecord;
use crate::error::{LibriError, Result};

/// Convert a non-success response into an [`LibriError::Api`]
async fn error_for_status(service: &'static str, response: reqwest::Response) -> LibriError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    tracing::error!(service, status, body = %body, "service request failed");
    LibriError::Api {
        service,
        status,
        body,
    }
}

// ============================================================================
// CATALOG
// ============================================================================

/// Catalog client for fetch and search
pub struct HttpCatalogService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCatalogService {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl CatalogService for HttpCatalogService {
    async fn fetch_all(&self) -> Result<Vec<BookRecord>> {
        let url = format!("{}/books", self.base_url);
        tracing::debug!(service = "catalog", %url, "fetching full catalog");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(error_for_status("catalog", response).await);
        }

        let records: Vec<BookRecord> = response.json().await?;
        tracing::debug!(service = "catalog", count = records.len(), "catalog received");
        Ok(records)
    }

    async fn search(&self, term: &str) -> Result<Vec<BookRecord>> {
        let url = format!("{}/books/search", self.base_url);
        tracing::debug!(service = "catalog", %url, term, "searching catalog");

        // An empty term is still sent: the backend treats it as "no filter".
        let response = self
            .client
            .get(&url)
            .query(&[("searchTerm", term)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(error_for_status("catalog", response).await);
        }

        let records: Vec<BookRecord> = response.json().await?;
        tracing::debug!(service = "catalog", count = records.len(), "search results received");
        Ok(records)
    }
}

// ============================================================================
// SESSION
// ============================================================================

/// Session initialization client
pub struct HttpSessionService {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpSessionService {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl SessionService for HttpSessionService {
    async fn init_session(&self) -> Result<SessionInfo> {
        let url = format!("{}/session", self.base_url);
        tracing::debug!(service = "session", %url, "initializing session");

        let mut request = self.client.post(&url);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(error_for_status("session", response).await);
        }

        let info: SessionInfo = response.json().await?;
        if info.access_token.is_empty() || info.session_id.is_empty() {
            return Err(LibriError::MalformedResponse {
                service: "session",
                reason: "empty accessToken or sessionId".to_string(),
            });
        }

        tracing::debug!(service = "session", session_id = %info.session_id, "session established");
        Ok(info)
    }
}

// ============================================================================
// AGENT
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AgentRequest<'a> {
    access_token: &'a str,
    session_id: &'a str,
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct AgentResponse {
    #[serde(default)]
    response: Option<String>,
}

/// Conversational agent client
pub struct HttpRecommendationService {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpRecommendationService {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl RecommendationService for HttpRecommendationService {
    async fn invoke(&self, session: &SessionInfo, message: &str) -> Result<String> {
        let url = format!("{}/agent/invoke", self.base_url);
        let payload = AgentRequest {
            access_token: &session.access_token,
            session_id: &session.session_id,
            message,
        };

        tracing::debug!(
            service = "agent",
            %url,
            session_id = %session.session_id,
            message_len = message.len(),
            "invoking agent"
        );

        let mut request = self.client.post(&url).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(error_for_status("agent", response).await);
        }

        // A missing or null `response` field counts as an empty reply; the
        // caller decides what to show for it.
        let reply: AgentResponse = response.json().await?;
        let text = reply.response.unwrap_or_default();
        tracing::debug!(service = "agent", reply_len = text.len(), "agent reply received");
        Ok(text)
    }
}
