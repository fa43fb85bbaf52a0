//! Specification parser client
//!
//! Talks to the language-model service that turns free text into partial
//! specifications. The engine tolerates this collaborator being absent,
//! empty, or broken: every failure path falls back to the local keyword
//! parser.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::domain::request::Specifications;

/// Client for the specification parsing service.
#[derive(Clone)]
pub struct ParserClient {
    client: Client,
    base_url: String,
    token: String,
}

/// Error response from the parser service.
#[derive(Debug, Deserialize)]
struct ParserErrorResponse {
    message: String,
}

impl ParserClient {
    /// Create a new parser service client.
    pub fn new(base_url: &str, token: &str, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        tracing::info!(base_url = base_url, "Spec parser client initialized");

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// Parse free text into a partial specification.
    ///
    /// The existing specification is sent along so the model can interpret
    /// relative phrasing ("make it thicker") against what's already chosen.
    #[instrument(skip(self, text, existing))]
    pub async fn parse(
        &self,
        text: &str,
        existing: &Specifications,
    ) -> Result<Specifications> {
        #[derive(Serialize)]
        struct Request<'a> {
            text: &'a str,
            existing: &'a Specifications,
        }

        #[derive(Deserialize)]
        struct Response {
            specifications: Specifications,
        }

        let url = format!("{}/v1/specs/parse", self.base_url);

        debug!(url = %url, "Parser service request");

        let response = self
            .client
            .post(&url)
            .header("X-Internal-Token", &self.token)
            .json(&Request { text, existing })
            .send()
            .await
            .context("Parser service unavailable")?;

        let status = response.status();

        if status.is_success() {
            let parsed: Response = response
                .json()
                .await
                .context("Invalid parser service response")?;
            Ok(parsed.specifications)
        } else {
            let message = response
                .json::<ParserErrorResponse>()
                .await
                .map(|e| e.message)
                .unwrap_or_else(|_| format!("parser service error: {status}"));

            warn!(status = %status, message = %message, "Parser service error");
            Err(anyhow::anyhow!(message))
        }
    }

    /// Check parser service health.
    pub async fn health_check(&self) -> Result<()> {
        let url = format!("{}/health", self.base_url);

        self.client
            .get(&url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .context("Parser service health check failed")?
            .error_for_status()
            .context("Parser service unhealthy")?;

        Ok(())
    }
}
