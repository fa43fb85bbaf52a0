//! Critical-path schedule generation
//!
//! Derives construction tasks from the estimated trades, sequences them
//! with a fixed precedence table, and runs the classic forward/backward
//! pass to find earliest/latest dates, slack, and the critical path.

use anyhow::{bail, Result};
use chrono::Utc;
use tracing::{debug, instrument};

use crate::domain::calculation::MaterialCalculation;
use crate::domain::generation::{CpmSchedule, CpmTask};

/// Input for one schedule: the same calculations the bill is built from.
#[derive(Debug, Clone)]
pub struct CpmRequest {
    pub calculations: Vec<MaterialCalculation>,
}

/// Trade precedence: each entry depends on the nearest earlier entry of the
/// same chain that is actually present. Wall and floor chains run in
/// parallel.
const WALL_CHAIN: &[&str] = &["framing", "insulation", "drywall", "paint"];
const FLOOR_CHAIN: &[&str] = &["floor_prep", "floor_finish"];

/// Crew productivity per day, in each trade's material unit.
fn daily_rate(trade: &str) -> f64 {
    match trade {
        "framing" => 30.0,
        "insulation" => 20.0,
        "drywall" => 25.0,
        "paint" => 8.0,
        "floor_prep" => 4.0,
        "floor_finish" => 3.0,
        _ => 10.0,
    }
}

fn display_name(trade: &str) -> &'static str {
    match trade {
        "framing" => "Frame walls",
        "insulation" => "Install insulation",
        "drywall" => "Hang and finish drywall",
        "paint" => "Prime and paint",
        "floor_prep" => "Prepare floor substrate",
        "floor_finish" => "Install floor finish",
        _ => "General work",
    }
}

/// Build the critical-path schedule.
#[instrument(skip_all, fields(areas = input.calculations.len()))]
pub fn generate(input: &CpmRequest) -> Result<CpmSchedule> {
    if input.calculations.is_empty() {
        bail!("no completed estimate to schedule; finish an estimate first");
    }

    // Total material quantity per trade across all areas.
    let mut trade_quantities: Vec<(String, f64)> = Vec::new();
    for calculation in &input.calculations {
        for line in &calculation.materials {
            if let Some(entry) = trade_quantities.iter_mut().find(|(t, _)| *t == line.trade) {
                entry.1 += line.quantity;
            } else {
                trade_quantities.push((line.trade.clone(), line.quantity));
            }
        }
    }

    let mut tasks = Vec::new();
    for chain in [WALL_CHAIN, FLOOR_CHAIN] {
        let mut previous: Option<String> = None;
        for trade in chain {
            let Some((_, quantity)) = trade_quantities.iter().find(|(t, _)| t == trade) else {
                continue;
            };

            let id = format!("task-{trade}");
            let duration_days = (quantity / daily_rate(trade)).ceil().max(1.0);

            tasks.push(CpmTask {
                id: id.clone(),
                name: display_name(trade).to_string(),
                trade: trade.to_string(),
                duration_days,
                depends_on: previous.iter().cloned().collect(),
                earliest_start: 0.0,
                earliest_finish: 0.0,
                latest_start: 0.0,
                latest_finish: 0.0,
                slack_days: 0.0,
                critical: false,
            });

            previous = Some(id);
        }
    }

    if tasks.is_empty() {
        bail!("estimate contains no schedulable trades");
    }

    solve(&mut tasks);

    let project_duration_days = tasks
        .iter()
        .map(|t| t.earliest_finish)
        .fold(0.0, f64::max);
    let critical_path = tasks
        .iter()
        .filter(|t| t.critical)
        .map(|t| t.id.clone())
        .collect();

    debug!(
        tasks = tasks.len(),
        duration_days = project_duration_days,
        "Schedule computed"
    );

    Ok(CpmSchedule {
        tasks,
        project_duration_days,
        critical_path,
        generated_at: Utc::now(),
    })
}

/// Forward pass (earliest dates), backward pass (latest dates), then slack.
/// Tasks are already in precedence order within each chain.
fn solve(tasks: &mut [CpmTask]) {
    for i in 0..tasks.len() {
        let earliest_start = tasks[i]
            .depends_on
            .iter()
            .filter_map(|dep| tasks.iter().find(|t| t.id == *dep))
            .map(|t| t.earliest_finish)
            .fold(0.0, f64::max);
        tasks[i].earliest_start = earliest_start;
        tasks[i].earliest_finish = earliest_start + tasks[i].duration_days;
    }

    let project_finish = tasks.iter().map(|t| t.earliest_finish).fold(0.0, f64::max);

    for i in (0..tasks.len()).rev() {
        let id = tasks[i].id.clone();
        let latest_finish = tasks
            .iter()
            .filter(|t| t.depends_on.contains(&id))
            .map(|t| t.latest_start)
            .fold(f64::INFINITY, f64::min);
        let latest_finish = if latest_finish.is_finite() {
            latest_finish
        } else {
            project_finish
        };

        tasks[i].latest_finish = latest_finish;
        tasks[i].latest_start = latest_finish - tasks[i].duration_days;
        tasks[i].slack_days = tasks[i].latest_start - tasks[i].earliest_start;
        tasks[i].critical = tasks[i].slack_days.abs() < 1e-9;
    }
}
