//! Bill-of-materials assembly
//!
//! Folds every committed calculation (one per estimated target area) into a
//! single bill, then best-effort enriches it with catalog prices. The bill
//! is the deliverable; enrichment is a sub-channel that reports counters
//! and never fails the job.

use std::sync::Arc;

use anyhow::{bail, Result};
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, instrument, warn};

use crate::domain::calculation::MaterialCalculation;
use crate::domain::generation::{BillOfMaterials, BomLine, EnrichmentProgress};
use crate::services::pricing::PricingClient;

/// Input for one bill: all calculations the conversation has produced,
/// committed areas first.
#[derive(Debug, Clone)]
pub struct BomRequest {
    pub project_name: String,
    pub calculations: Vec<MaterialCalculation>,
}

/// Observer for the nested price-enrichment counters.
pub type EnrichmentSink = Arc<dyn Fn(EnrichmentProgress) + Send + Sync>;

/// Assemble and price the bill.
#[instrument(skip_all, fields(project = %input.project_name, areas = input.calculations.len()))]
pub async fn generate(
    input: BomRequest,
    pricing: Option<PricingClient>,
    on_enrichment: Option<EnrichmentSink>,
) -> Result<BillOfMaterials> {
    if input.calculations.is_empty() {
        bail!("no completed estimate to bill; finish an estimate first");
    }

    let mut lines = merge_lines(&input.calculations);

    if let Some(pricing) = pricing {
        enrich(&mut lines, &pricing, on_enrichment).await;
    }

    let priced: Vec<Decimal> = lines.iter().filter_map(|l| l.total_cost).collect();
    let subtotal = if priced.is_empty() {
        None
    } else {
        Some(priced.iter().copied().sum())
    };

    Ok(BillOfMaterials {
        project_name: input.project_name,
        lines,
        subtotal,
        generated_at: Utc::now(),
    })
}

/// Same-named lines from different areas add together when their units
/// agree; mismatched units stay as separate lines.
fn merge_lines(calculations: &[MaterialCalculation]) -> Vec<BomLine> {
    let mut lines: Vec<BomLine> = Vec::new();

    for calculation in calculations {
        for material in &calculation.materials {
            if let Some(existing) = lines
                .iter_mut()
                .find(|l| l.name == material.name && l.unit == material.unit)
            {
                existing.quantity += material.quantity;
            } else {
                lines.push(BomLine {
                    name: material.name.clone(),
                    quantity: material.quantity,
                    unit: material.unit.clone(),
                    trade: material.trade.clone(),
                    unit_cost: None,
                    total_cost: None,
                });
            }
        }
    }

    lines
}

/// Price each line against the catalog, tolerating per-line failures and
/// reporting running counters on the sub-channel.
async fn enrich(
    lines: &mut [BomLine],
    pricing: &PricingClient,
    on_enrichment: Option<EnrichmentSink>,
) {
    let total = lines.len();
    let mut successful = 0usize;

    for line in lines.iter_mut() {
        match pricing.unit_price(&line.name).await {
            Ok(Some(price)) => {
                let quantity = Decimal::from_f64_retain(line.quantity).unwrap_or(Decimal::ZERO);
                line.unit_cost = Some(price.unit_cost);
                line.total_cost = Some(price.unit_cost * quantity);
                successful += 1;
            }
            Ok(None) => {
                debug!(material = %line.name, "No catalog price");
            }
            Err(e) => {
                warn!(material = %line.name, error = %e, "Price lookup failed");
            }
        }

        if let Some(sink) = &on_enrichment {
            sink(EnrichmentProgress::new(successful, total));
        }
    }

    debug!(successful, total, "Price enrichment finished");
}
