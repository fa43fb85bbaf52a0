//! Unit-price catalog client
//!
//! Looks up unit costs for bill-of-materials lines. Enrichment is best
//! effort: a line the catalog doesn't know, or a transport failure, leaves
//! that line unpriced without failing the bill.

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Client for the price catalog service.
#[derive(Clone)]
pub struct PricingClient {
    client: Client,
    base_url: String,
    token: String,
}

/// One catalog entry.
#[derive(Debug, Clone, Deserialize)]
pub struct UnitPrice {
    pub unit_cost: Decimal,
    pub unit: String,
}

impl PricingClient {
    /// Create a new price catalog client.
    pub fn new(base_url: &str, token: &str, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        tracing::info!(base_url = base_url, "Pricing client initialized");

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// Look up the unit price for a material by name.
    ///
    /// `Ok(None)` means the catalog doesn't carry the item; `Err` means the
    /// lookup itself failed.
    pub async fn unit_price(&self, material_name: &str) -> Result<Option<UnitPrice>> {
        let url = format!("{}/v1/prices", self.base_url);

        debug!(material = material_name, "Price lookup");

        let response = self
            .client
            .get(&url)
            .query(&[("name", material_name)])
            .header("X-Internal-Token", &self.token)
            .send()
            .await
            .context("Pricing service unavailable")?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let price: UnitPrice = response
                    .json()
                    .await
                    .context("Invalid pricing service response")?;
                Ok(Some(price))
            }
            status => Err(anyhow::anyhow!("pricing service error: {status}")),
        }
    }
}
