use anyhow::{Context, Result};
use std::env;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            "staging" => Self::Staging,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }

    #[allow(dead_code)]
    pub fn is_prod(&self) -> bool {
        matches!(self, Self::Prod)
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,
    pub server_addr: String,

    // CORS
    pub cors_allow_origins: Vec<String>,

    // Specification parser service (optional: keyword fallback covers its
    // absence)
    pub parser_service_url: Option<String>,
    pub parser_service_token: String,
    pub parser_service_timeout_seconds: u64,

    // Price catalog service (optional: bills go out unpriced without it)
    pub pricing_service_url: Option<String>,
    pub pricing_service_token: String,
    pub pricing_service_timeout_seconds: u64,

    // Per-job deadline for BOM/CPM generation
    pub generation_timeout_seconds: u64,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let env = Environment::from_str(&env::var("ENV").unwrap_or_else(|_| "dev".to_string()));
        let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        // CORS
        let cors_allow_origins = env::var("CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        // Specification parser service
        let parser_service_url = optional_base_url("PARSER_SERVICE_URL")?;
        let parser_service_token = env::var("PARSER_SERVICE_TOKEN").unwrap_or_default();
        let parser_service_timeout_seconds = env::var("PARSER_SERVICE_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30); // LLM parse of one chat message

        // Price catalog service
        let pricing_service_url = optional_base_url("PRICING_SERVICE_URL")?;
        let pricing_service_token = env::var("PRICING_SERVICE_TOKEN").unwrap_or_default();
        let pricing_service_timeout_seconds = env::var("PRICING_SERVICE_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        let generation_timeout_seconds = env::var("GENERATION_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(120); // 2 minutes default per deliverable

        Ok(Settings {
            env,
            server_addr,
            cors_allow_origins,
            parser_service_url,
            parser_service_token,
            parser_service_timeout_seconds,
            pricing_service_url,
            pricing_service_token,
            pricing_service_timeout_seconds,
            generation_timeout_seconds,
        })
    }
}

/// Read an optional collaborator base URL, rejecting unparseable values
/// instead of failing later on the first request.
fn optional_base_url(var: &str) -> Result<Option<String>> {
    match env::var(var) {
        Ok(raw) if !raw.trim().is_empty() => {
            Url::parse(raw.trim()).with_context(|| format!("{var} must be a valid URL"))?;
            Ok(Some(raw.trim().to_string()))
        }
        _ => Ok(None),
    }
}
