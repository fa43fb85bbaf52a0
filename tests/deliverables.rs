mod common;

use common::{context, mixed_canvas, wall_canvas};
use planboard_backend::services::bom::{self, BomRequest};
use planboard_backend::services::cpm::{self, CpmRequest};
use planboard_backend::services::DialogueEngine;

/// Drive a conversation to completion and return its committed
/// calculations.
async fn estimated_context(
    messages: &[&str],
    canvas: &planboard_backend::domain::canvas::CanvasSnapshot,
) -> planboard_backend::domain::dialogue::DialogueContext {
    let engine = DialogueEngine::new(None);
    let mut ctx = context();
    for message in messages {
        engine.process_message(&mut ctx, message, None, canvas).await;
    }
    ctx
}

#[tokio::test]
async fn bill_requires_a_completed_estimate() {
    let input = BomRequest {
        project_name: "Empty".to_string(),
        calculations: Vec::new(),
    };

    let result = bom::generate(input, None, None).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn bill_accumulates_across_target_areas() {
    let canvas = mixed_canvas(&[10.0, 15.0], 20.0);
    let ctx = estimated_context(
        &[
            "estimate the walls with lumber studs at 16\" on center",
            "now do the floor in epoxy",
        ],
        &canvas,
    )
    .await;

    assert!(ctx.accumulate_bom);
    let calculations = ctx.calculations_for_bom();
    assert_eq!(calculations.len(), 2);

    let input = BomRequest {
        project_name: "Workshop".to_string(),
        calculations,
    };
    let bill = bom::generate(input, None, None).await.expect("bill");

    // Lines from both areas land in one bill.
    assert!(bill.lines.iter().any(|l| l.name.contains("studs")));
    assert!(bill.lines.iter().any(|l| l.name.contains("epoxy")));
    // Unpriced without a catalog.
    assert!(bill.subtotal.is_none());
    assert!(bill.lines.iter().all(|l| l.unit_cost.is_none()));
}

#[tokio::test]
async fn same_material_lines_sum_when_units_agree() {
    let canvas = wall_canvas(&[10.0]);
    let ctx = estimated_context(&["walls, lumber studs at 16\" spacing"], &canvas).await;

    let one = ctx.calculations_for_bom().remove(0);
    let doubled = BomRequest {
        project_name: "Two rooms".to_string(),
        calculations: vec![one.clone(), one.clone()],
    };

    let bill = bom::generate(doubled, None, None).await.expect("bill");
    let studs = bill
        .lines
        .iter()
        .find(|l| l.name.contains("studs"))
        .expect("stud line");
    let single = one
        .materials
        .iter()
        .find(|l| l.name.contains("studs"))
        .expect("stud line");
    assert_eq!(studs.quantity, single.quantity * 2.0);
}

#[tokio::test]
async fn schedule_requires_a_completed_estimate() {
    let result = cpm::generate(&CpmRequest {
        calculations: Vec::new(),
    });
    assert!(result.is_err());
}

#[tokio::test]
async fn wall_schedule_follows_the_trade_chain() {
    let canvas = wall_canvas(&[32.0]);
    let ctx = estimated_context(&["walls with metal studs at 16\" on center"], &canvas).await;

    let schedule = cpm::generate(&CpmRequest {
        calculations: ctx.calculations_for_bom(),
    })
    .expect("schedule");

    let ids: Vec<&str> = schedule.tasks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["task-framing", "task-drywall", "task-paint"]);

    // Single chain: every task is critical with zero slack.
    assert!(schedule.tasks.iter().all(|t| t.critical));
    assert!(schedule.tasks.iter().all(|t| t.slack_days == 0.0));
    assert_eq!(schedule.critical_path, ids);

    // Chained precedence: each task starts when its predecessor ends.
    for pair in schedule.tasks.windows(2) {
        assert_eq!(pair[1].depends_on, vec![pair[0].id.clone()]);
        assert_eq!(pair[1].earliest_start, pair[0].earliest_finish);
    }

    let total: f64 = schedule.tasks.iter().map(|t| t.duration_days).sum();
    assert_eq!(schedule.project_duration_days, total);
}

#[tokio::test]
async fn parallel_chains_leave_slack_off_the_critical_path() {
    // Walls dominate the duration; the short floor chain gains slack.
    let canvas = mixed_canvas(&[120.0, 140.0], 10.0);
    let ctx = estimated_context(
        &[
            "estimate the walls with lumber studs at 16\" on center",
            "now do the floor in epoxy",
        ],
        &canvas,
    )
    .await;

    let schedule = cpm::generate(&CpmRequest {
        calculations: ctx.calculations_for_bom(),
    })
    .expect("schedule");

    let wall_tasks: Vec<_> = schedule
        .tasks
        .iter()
        .filter(|t| ["framing", "drywall", "paint"].contains(&t.trade.as_str()))
        .collect();
    let floor_tasks: Vec<_> = schedule
        .tasks
        .iter()
        .filter(|t| t.trade.starts_with("floor"))
        .collect();

    assert!(!wall_tasks.is_empty());
    assert!(!floor_tasks.is_empty());
    assert!(wall_tasks.iter().all(|t| t.critical));
    assert!(floor_tasks.iter().all(|t| !t.critical && t.slack_days > 0.0));
}
