//! Deadline calculator and status evaluator tests.

use chrono::{DateTime, Duration, TimeZone, Utc};
use deskops_core::{
    policy::PolicyTable,
    sla_config::SlaConfiguration,
    status::calculate_sla_metrics,
    SlaEngine, SlaStatus, TicketSnapshot,
};

fn created() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 4, 9, 0, 0).unwrap()
}

fn after_hours(h: f64) -> DateTime<Utc> {
    created() + Duration::milliseconds((h * 3_600_000.0).round() as i64)
}

fn ticket_with_budget(hours: f64) -> TicketSnapshot {
    TicketSnapshot::new("t-1", "medium", "medium", created()).with_resolution_hours(hours)
}

/// A 48h budget is never breached at 47h and always breached at 49h.
#[test]
fn breach_is_monotonic_around_deadline() {
    let table = PolicyTable::builtin();
    let ticket = ticket_with_budget(48.0);

    let before = calculate_sla_metrics(&ticket, None, &table, after_hours(47.0));
    assert_ne!(before.sla_status, SlaStatus::Breached);

    let after = calculate_sla_metrics(&ticket, None, &table, after_hours(49.0));
    assert_eq!(after.sla_status, SlaStatus::Breached);
    assert_eq!(after.time_remaining, 0, "remaining time never goes negative");
    assert_eq!(after.percent_time_elapsed, 100.0, "elapsed percent is clamped");
}

/// Exactly at the deadline there is no time left, so the ticket is breached.
#[test]
fn deadline_instant_counts_as_breach() {
    let table = PolicyTable::builtin();
    let ticket = ticket_with_budget(48.0);
    let metrics = calculate_sla_metrics(&ticket, None, &table, after_hours(48.0));
    assert_eq!(metrics.sla_status, SlaStatus::Breached);
}

/// 80% of a 10h budget is at-risk; 79% is still on track.
#[test]
fn at_risk_threshold_is_eighty_percent() {
    let table = PolicyTable::builtin();
    let ticket = ticket_with_budget(10.0);

    let at_eight = calculate_sla_metrics(&ticket, None, &table, after_hours(8.0));
    assert_eq!(at_eight.sla_status, SlaStatus::AtRisk);

    let at_seven_nine = calculate_sla_metrics(&ticket, None, &table, after_hours(7.9));
    assert_eq!(at_seven_nine.sla_status, SlaStatus::OnTrack);
}

/// A partially elapsed minute still counts as remaining.
#[test]
fn time_remaining_rounds_down_to_whole_minutes() {
    let table = PolicyTable::builtin();
    let ticket = ticket_with_budget(1.0);
    let now = created() + Duration::seconds(30);

    let metrics = calculate_sla_metrics(&ticket, None, &table, now);
    assert_eq!(metrics.time_remaining, 59);
    assert_eq!(metrics.sla_breach_at, created() + Duration::hours(1));
}

/// Before creation (clock skew) the percentage clamps to zero.
#[test]
fn elapsed_percent_clamps_at_zero() {
    let table = PolicyTable::builtin();
    let ticket = ticket_with_budget(10.0);
    let metrics = calculate_sla_metrics(&ticket, None, &table, created() - Duration::hours(1));
    assert_eq!(metrics.percent_time_elapsed, 0.0);
    assert_eq!(metrics.sla_status, SlaStatus::OnTrack);
}

/// ticket override > explicit configuration > policy table.
#[test]
fn budget_precedence_is_ticket_then_config_then_policy() {
    let table = PolicyTable::builtin();
    let config = SlaConfiguration::new(3.0, 30.0);
    let now = created();

    let plain = TicketSnapshot::new("t-p", "urgent", "critical", created());
    let from_policy = calculate_sla_metrics(&plain, None, &table, now);
    assert_eq!(from_policy.response_time_hours, 0.25);
    assert_eq!(from_policy.resolution_time_hours, 4.0);

    let from_config = calculate_sla_metrics(&plain, Some(&config), &table, now);
    assert_eq!(from_config.response_time_hours, 3.0);
    assert_eq!(from_config.resolution_time_hours, 30.0);

    let overridden = plain.clone().with_response_hours(1.5).with_resolution_hours(12.0);
    let from_ticket = calculate_sla_metrics(&overridden, Some(&config), &table, now);
    assert_eq!(from_ticket.response_time_hours, 1.5);
    assert_eq!(from_ticket.resolution_time_hours, 12.0);
    assert_eq!(from_ticket.sla_breach_at, created() + Duration::hours(12));
}

/// A zero override reads as unset, not as an already-expired budget.
#[test]
fn zero_override_falls_through() {
    let table = PolicyTable::builtin();
    let ticket = TicketSnapshot::new("t-z", "medium", "medium", created()).with_resolution_hours(0.0);
    let metrics = calculate_sla_metrics(&ticket, None, &table, after_hours(1.0));
    assert_eq!(metrics.resolution_time_hours, 48.0);
    assert_eq!(metrics.sla_status, SlaStatus::OnTrack);
}

#[test]
fn response_breach_tracks_first_response() {
    let table = PolicyTable::builtin();
    // medium-medium: 8h response budget.
    let waiting = TicketSnapshot::new("t-r", "medium", "medium", created());

    let early = calculate_sla_metrics(&waiting, None, &table, after_hours(7.0));
    assert!(!early.response_breached);

    let late = calculate_sla_metrics(&waiting, None, &table, after_hours(9.0));
    assert!(late.response_breached);

    let answered = waiting.clone().with_first_response(after_hours(2.0));
    let answered_metrics = calculate_sla_metrics(&answered, None, &table, after_hours(9.0));
    assert!(!answered_metrics.response_breached);

    let answered_late = waiting.with_first_response(after_hours(8.5));
    let late_metrics = calculate_sla_metrics(&answered_late, None, &table, after_hours(9.0));
    assert!(late_metrics.response_breached);
}

/// Same inputs, same answer: evaluation holds no state.
#[test]
fn evaluation_is_idempotent() {
    let engine = SlaEngine::build_test();
    let ticket = TicketSnapshot::new("t-i", "high", "high", created());
    let now = after_hours(20.0);

    let first = engine.metrics(&ticket, None, now);
    let second = engine.metrics(&ticket, None, now);
    assert_eq!(first, second);
    assert_eq!(first.sla_status, SlaStatus::AtRisk);
}
