//! The SLA engine facade.
//!
//! EVALUATION ORDER (per ticket, fixed):
//!   1. Deadline calculator   (budgets and absolute deadlines)
//!   2. Status evaluator      (breach / at-risk / on-track)
//!   3. Escalation evaluator  (next ladder step, if due)
//!   4. Actual-time calculator
//!
//! RULES:
//!   - `now` is an argument everywhere. The engine never reads a clock.
//!   - Nothing here mutates a ticket. Sweeps return events and decisions;
//!     the owning system persists them.
//!   - Unknown priorities and impacts degrade to the default policy.

use crate::{
    actual::{calculate_actual_times, ActualTimes},
    clock::EvaluationPass,
    config::EngineConfig,
    deadline::compute_budget,
    error::SlaResult,
    escalation::{check_escalation_needed, EscalationDecision},
    event::SlaEvent,
    format::format_time_remaining,
    policy::PolicyTable,
    report::{ReportAccumulator, SlaReport},
    sla_config::SlaConfiguration,
    status::{evaluate_budget, SlaMetrics, SlaStatus},
    ticket::TicketSnapshot,
    types::{millis_between, TicketId, Timestamp, MS_PER_MINUTE},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketEvaluation {
    pub ticket_id: TicketId,
    pub evaluated_at: Timestamp,
    pub metrics: SlaMetrics,
    pub escalation: Option<EscalationDecision>,
    pub actual: ActualTimes,
    pub time_remaining_display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepOutcome {
    pub pass_id: String,
    pub evaluated_at: Timestamp,
    pub evaluations: Vec<TicketEvaluation>,
    pub events: Vec<SlaEvent>,
    pub skipped_resolved: usize,
}

impl SweepOutcome {
    pub fn escalations(&self) -> impl Iterator<Item = (&str, &EscalationDecision)> {
        self.evaluations
            .iter()
            .filter_map(|e| e.escalation.as_ref().map(|d| (e.ticket_id.as_str(), d)))
    }
}

#[derive(Debug, Clone, Default)]
pub struct SlaEngine {
    config: EngineConfig,
}

impl SlaEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Engine over the policy file in `data_dir`.
    pub fn build(data_dir: &str) -> SlaResult<Self> {
        Ok(Self::new(EngineConfig::load(data_dir)?))
    }

    /// Engine over the builtin policy table.
    pub fn build_test() -> Self {
        Self::new(EngineConfig::default_test())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn policies(&self) -> &PolicyTable {
        &self.config.policies
    }

    pub fn metrics(
        &self,
        ticket: &TicketSnapshot,
        config: Option<&SlaConfiguration>,
        now: Timestamp,
    ) -> SlaMetrics {
        let budget = compute_budget(ticket, config, &self.config.policies);
        evaluate_budget(ticket, &budget, now, self.config.at_risk_threshold_pct)
    }

    pub fn escalation(
        &self,
        ticket: &TicketSnapshot,
        config: Option<&SlaConfiguration>,
        now: Timestamp,
    ) -> Option<EscalationDecision> {
        check_escalation_needed(ticket, config, &self.config.policies, now)
    }

    /// All four calculations for one ticket at one instant.
    pub fn evaluate(
        &self,
        ticket: &TicketSnapshot,
        config: Option<&SlaConfiguration>,
        now: Timestamp,
    ) -> TicketEvaluation {
        let metrics = self.metrics(ticket, config, now);
        let escalation = self.escalation(ticket, config, now);
        let actual = calculate_actual_times(ticket);
        log::debug!(
            "ticket {} at {now}: {} ({:.1}% elapsed, {} min left)",
            ticket.ticket_id,
            metrics.sla_status,
            metrics.percent_time_elapsed,
            metrics.time_remaining,
        );
        TicketEvaluation {
            ticket_id: ticket.ticket_id.clone(),
            evaluated_at: now,
            time_remaining_display: format_time_remaining(metrics.time_remaining),
            metrics,
            escalation,
            actual,
        }
    }

    /// Evaluate every open ticket at the pass instant.
    ///
    /// Tickets resolved at or before the pass are skipped. Status changes
    /// are detected against each ticket's stored status.
    pub fn sweep(
        &self,
        tickets: &[TicketSnapshot],
        configs: &[SlaConfiguration],
        pass: &EvaluationPass,
    ) -> SweepOutcome {
        let now = pass.now;
        let mut evaluations = Vec::new();
        let mut events = Vec::new();
        let mut skipped_resolved = 0;

        for ticket in tickets {
            if ticket.is_resolved_at(now) {
                skipped_resolved += 1;
                continue;
            }

            let eval = self.evaluate(ticket, select_config(configs, ticket), now);
            let status = eval.metrics.sla_status;

            events.push(SlaEvent::TicketEvaluated {
                at: now,
                ticket_id: ticket.ticket_id.clone(),
                status,
                time_remaining: eval.metrics.time_remaining,
                percent_time_elapsed: eval.metrics.percent_time_elapsed,
            });

            if ticket.sla_status != Some(status) {
                events.push(SlaEvent::SlaStatusChanged {
                    at: now,
                    ticket_id: ticket.ticket_id.clone(),
                    from: ticket.sla_status,
                    to: status,
                });
                if status == SlaStatus::Breached {
                    let breached_at = eval.metrics.sla_breach_at;
                    events.push(SlaEvent::SlaBreached {
                        at: now,
                        ticket_id: ticket.ticket_id.clone(),
                        breached_at,
                        minutes_overdue: millis_between(breached_at, now)
                            .div_euclid(MS_PER_MINUTE)
                            .max(0),
                    });
                }
            }

            if let Some(decision) = &eval.escalation {
                events.push(SlaEvent::EscalationTriggered {
                    at: now,
                    ticket_id: ticket.ticket_id.clone(),
                    from_level: ticket.escalation_level,
                    to_level: decision.escalation_level,
                    assign_to_role: decision.assign_to_role.clone(),
                    reason: decision.reason.clone(),
                });
            }

            evaluations.push(eval);
        }

        let outcome = SweepOutcome {
            pass_id: pass.pass_id.clone(),
            evaluated_at: now,
            evaluations,
            events,
            skipped_resolved,
        };
        log::info!(
            "{} at {now}: evaluated={} skipped_resolved={} escalations={} events={}",
            outcome.pass_id,
            outcome.evaluations.len(),
            outcome.skipped_resolved,
            outcome.escalations().count(),
            outcome.events.len(),
        );
        outcome
    }

    /// Compliance report with statuses evaluated fresh instead of read from
    /// storage. Resolved tickets are judged at their resolution instant.
    pub fn report_at(
        &self,
        tickets: &[TicketSnapshot],
        configs: &[SlaConfiguration],
        now: Timestamp,
    ) -> SlaReport {
        let mut acc = ReportAccumulator::new();
        for ticket in tickets {
            let at = match ticket.resolved_at {
                Some(resolved) if resolved < now => resolved,
                _ => now,
            };
            let status = self.metrics(ticket, select_config(configs, ticket), at).sla_status;
            acc.add(Some(status), calculate_actual_times(ticket));
        }
        acc.finish()
    }
}

/// The most specific configuration that applies to `ticket`. Ties go to the
/// earliest in `configs`.
pub fn select_config<'a>(
    configs: &'a [SlaConfiguration],
    ticket: &TicketSnapshot,
) -> Option<&'a SlaConfiguration> {
    let specificity =
        |c: &SlaConfiguration| c.priority.is_some() as u8 + c.business_impact.is_some() as u8;

    let mut best: Option<&SlaConfiguration> = None;
    for config in configs.iter().filter(|c| c.applies_to(ticket)) {
        if best.map_or(true, |b| specificity(config) > specificity(b)) {
            best = Some(config);
        }
    }
    best
}
