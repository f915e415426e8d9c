use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};
use wikibot_core::{DEFAULT_ENDPOINT, QueryClient, TransportError, Turn};

use crate::wire::QueryRequest;

/// `QueryClient` that posts to a JSON HTTP endpoint.
///
/// Single attempt per call, transport default timeout.
pub struct HttpQueryClient {
    client: Client,
    endpoint: String,
}

impl HttpQueryClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        info!("Creating HttpQueryClient for {endpoint}");
        Self {
            client: Client::new(),
            endpoint,
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn try_send(&self, request: &QueryRequest<'_>) -> Result<String, TransportError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let body = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| TransportError::MalformedResponse(e.to_string()))?;

        body["response"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                TransportError::MalformedResponse("missing string field `response`".to_string())
            })
    }
}

impl Default for HttpQueryClient {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

#[async_trait]
impl QueryClient for HttpQueryClient {
    async fn send(&self, query: &str, history: &[Turn]) -> Result<String, TransportError> {
        let request = QueryRequest::new(query, history);

        info!(
            "Sending query to {}: {} prior turns",
            self.endpoint,
            history.len()
        );

        match self.try_send(&request).await {
            Ok(reply) => {
                debug!("Received reply ({} chars)", reply.chars().count());
                Ok(reply)
            }
            Err(e) => {
                warn!("Query to {} failed: {e}", self.endpoint);
                Err(e)
            }
        }
    }
}
