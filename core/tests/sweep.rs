//! Engine sweep tests: one pinned instant, events derived from stored state.

use chrono::{DateTime, Duration, TimeZone, Utc};
use deskops_core::{
    clock::{EvaluationPass, FixedClock},
    engine::select_config,
    event::SlaEvent,
    policy::EscalationRule,
    sla_config::SlaConfiguration,
    SlaEngine, SlaStatus, TicketSnapshot,
};

fn created() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 4, 9, 0, 0).unwrap()
}

fn open_tickets() -> Vec<TicketSnapshot> {
    vec![
        // urgent-critical, 4h budget: breached at 5h, ladder 0.5h / 2h.
        TicketSnapshot::new("t-urgent", "urgent", "critical", created())
            .with_sla_status(SlaStatus::AtRisk)
            .with_escalation_level(1),
        // medium-medium, 48h budget: on track at 5h, no escalation yet.
        TicketSnapshot::new("t-medium", "medium", "medium", created())
            .with_sla_status(SlaStatus::OnTrack),
        // Resolved before the pass: skipped.
        TicketSnapshot::new("t-closed", "high", "high", created())
            .with_resolved(created() + Duration::hours(1)),
    ]
}

#[test]
fn sweep_emits_transitions_and_escalations() {
    let _ = env_logger::builder().is_test(true).try_init();

    let engine = SlaEngine::build_test();
    let clock = FixedClock::new(created() + Duration::hours(5));
    let pass = EvaluationPass::begin(&clock);

    let outcome = engine.sweep(&open_tickets(), &[], &pass);

    assert_eq!(outcome.evaluated_at, pass.now);
    assert_eq!(outcome.evaluations.len(), 2);
    assert_eq!(outcome.skipped_resolved, 1);

    let kinds: Vec<(&str, &str)> = outcome
        .events
        .iter()
        .map(|e| (e.ticket_id(), e.kind()))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("t-urgent", "ticket_evaluated"),
            ("t-urgent", "sla_status_changed"),
            ("t-urgent", "sla_breached"),
            ("t-urgent", "escalation_triggered"),
            ("t-medium", "ticket_evaluated"),
        ]
    );

    let escalations: Vec<_> = outcome.escalations().collect();
    assert_eq!(escalations.len(), 1);
    assert_eq!(escalations[0].0, "t-urgent");
    assert_eq!(escalations[0].1.escalation_level, 2);

    let breach = outcome
        .events
        .iter()
        .find_map(|e| match e {
            SlaEvent::SlaBreached { minutes_overdue, .. } => Some(*minutes_overdue),
            _ => None,
        })
        .expect("breach event");
    assert_eq!(breach, 60);
}

/// Re-running the same pass on the same snapshots yields the same events.
#[test]
fn sweep_is_deterministic_for_a_pass() {
    let engine = SlaEngine::build_test();
    let pass = EvaluationPass::at(created() + Duration::hours(30));
    let tickets = open_tickets();

    let a = engine.sweep(&tickets, &[], &pass);
    let b = engine.sweep(&tickets, &[], &pass);
    assert_eq!(a, b);
}

/// A ticket whose stored status already matches emits no transition.
#[test]
fn unchanged_status_emits_no_transition() {
    let engine = SlaEngine::build_test();
    let ticket = TicketSnapshot::new("t-steady", "low", "low", created())
        .with_sla_status(SlaStatus::OnTrack);
    let pass = EvaluationPass::at(created() + Duration::hours(1));

    let outcome = engine.sweep(&[ticket], &[], &pass);
    assert_eq!(outcome.events.len(), 1);
    assert_eq!(outcome.events[0].kind(), "ticket_evaluated");
}

#[test]
fn most_specific_configuration_is_selected() {
    let generic = SlaConfiguration::new(10.0, 100.0).named("org default");
    let priority_only = SlaConfiguration {
        priority: Some("urgent".into()),
        ..SlaConfiguration::new(2.0, 20.0).named("urgent anything")
    };
    let exact = SlaConfiguration::new(1.0, 6.0)
        .named("urgent critical")
        .for_pair("urgent", "critical");
    let configs = vec![generic, priority_only, exact];

    let urgent_critical = TicketSnapshot::new("a", "urgent", "critical", created());
    let urgent_low = TicketSnapshot::new("b", "urgent", "low", created());
    let medium = TicketSnapshot::new("c", "medium", "medium", created());

    let name = |t: &TicketSnapshot| select_config(&configs, t).and_then(|c| c.name.clone());
    assert_eq!(name(&urgent_critical).as_deref(), Some("urgent critical"));
    assert_eq!(name(&urgent_low).as_deref(), Some("urgent anything"));
    assert_eq!(name(&medium).as_deref(), Some("org default"));
    assert!(select_config(&[], &medium).is_none());
}

/// The sweep applies the selected configuration's budget and ladder.
#[test]
fn sweep_uses_selected_configuration() {
    let engine = SlaEngine::build_test();
    let config = SlaConfiguration::new(1.0, 6.0)
        .for_pair("medium", "medium")
        .with_escalation_rules(vec![EscalationRule::new(1, 3.0, "team_lead")])
        .unwrap();
    let ticket = TicketSnapshot::new("t-cfg", "medium", "medium", created());
    let pass = EvaluationPass::at(created() + Duration::hours(5));

    let outcome = engine.sweep(&[ticket], &[config], &pass);
    let eval = &outcome.evaluations[0];
    assert_eq!(eval.metrics.resolution_time_hours, 6.0);
    assert_eq!(eval.metrics.sla_status, SlaStatus::AtRisk);
    assert_eq!(eval.time_remaining_display, "1h 0m");
    let decision = eval.escalation.as_ref().expect("escalation due");
    assert_eq!(decision.assign_to_role, "team_lead");
}
