//! Refinement comparison
//!
//! Structured diff between two successive calculations for the same target,
//! used to render "what changed" instead of repeating the full estimate.

use crate::domain::calculation::{
    CalculationTotals, MaterialCalculation, MaterialChange, MaterialLine,
};

/// Diff two calculations line by line.
///
/// Unions material names across both sides; a name absent on one side
/// counts as quantity zero there. Fresh additions carry no percentage
/// (previous quantity was zero). Zero-difference lines are omitted, so an
/// empty result means no material changed.
pub fn compare(previous: &MaterialCalculation, next: &MaterialCalculation) -> Vec<MaterialChange> {
    let mut changes = Vec::new();

    let find = |lines: &[MaterialLine], name: &str| -> Option<MaterialLine> {
        lines.iter().find(|l| l.name == name).cloned()
    };

    // Previous-side names first (keeps estimate ordering), then new-only.
    for prev_line in &previous.materials {
        let new_quantity = find(&next.materials, &prev_line.name)
            .map(|l| l.quantity)
            .unwrap_or(0.0);
        push_change(&mut changes, prev_line, prev_line.quantity, new_quantity);
    }

    for next_line in &next.materials {
        if find(&previous.materials, &next_line.name).is_none() {
            push_change(&mut changes, next_line, 0.0, next_line.quantity);
        }
    }

    changes
}

fn push_change(
    changes: &mut Vec<MaterialChange>,
    template: &MaterialLine,
    previous_quantity: f64,
    new_quantity: f64,
) {
    let difference = new_quantity - previous_quantity;
    if difference == 0.0 {
        return;
    }

    let percentage_change = if previous_quantity == 0.0 {
        None
    } else {
        Some(difference / previous_quantity * 100.0)
    };

    changes.push(MaterialChange {
        material_name: template.name.clone(),
        unit: template.unit.clone(),
        previous_quantity,
        new_quantity,
        difference,
        percentage_change,
    });
}

/// A diff is only meaningful when both calculations describe the same
/// target: same totals discriminant and numerically equal scalar. A new
/// area's first estimate is shown in full instead.
pub fn same_target(previous: &MaterialCalculation, next: &MaterialCalculation) -> bool {
    match (previous.totals, next.totals) {
        (
            CalculationTotals::Wall { total_length: a },
            CalculationTotals::Wall { total_length: b },
        ) => a == b,
        (
            CalculationTotals::Floor { total_area: a },
            CalculationTotals::Floor { total_area: b },
        ) => a == b,
        _ => false,
    }
}
