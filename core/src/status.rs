//! Status evaluator: classifies a ticket's SLA health at a given instant.
//!
//! Breach is authoritative: it is decided from the remaining time alone,
//! before the elapsed percentage is even consulted. The percentage is
//! informational and clamped to [0, 100].

use crate::{
    deadline::{compute_budget, SlaBudget},
    policy::PolicyTable,
    sla_config::SlaConfiguration,
    ticket::TicketSnapshot,
    types::{hours_to_millis, millis_between, Timestamp, MS_PER_MINUTE},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Elapsed share of the resolution budget at which a ticket turns at-risk.
pub const AT_RISK_THRESHOLD_PCT: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlaStatus {
    OnTrack,
    AtRisk,
    Breached,
}

impl SlaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlaStatus::OnTrack => "on_track",
            SlaStatus::AtRisk => "at_risk",
            SlaStatus::Breached => "breached",
        }
    }
}

impl fmt::Display for SlaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived on every call; never stored by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlaMetrics {
    pub response_time_hours: f64,
    pub resolution_time_hours: f64,
    pub response_due_at: Timestamp,
    pub sla_breach_at: Timestamp,
    pub sla_status: SlaStatus,
    /// Whole minutes until breach, floored, never negative.
    pub time_remaining: i64,
    pub percent_time_elapsed: f64,
    /// First response missing past its due time, or recorded late.
    pub response_breached: bool,
}

/// Metrics with the default at-risk threshold.
pub fn calculate_sla_metrics(
    ticket: &TicketSnapshot,
    config: Option<&SlaConfiguration>,
    table: &PolicyTable,
    now: Timestamp,
) -> SlaMetrics {
    let budget = compute_budget(ticket, config, table);
    evaluate_budget(ticket, &budget, now, AT_RISK_THRESHOLD_PCT)
}

/// Classify `ticket` against an already computed budget.
pub fn evaluate_budget(
    ticket: &TicketSnapshot,
    budget: &SlaBudget,
    now: Timestamp,
    at_risk_threshold_pct: f64,
) -> SlaMetrics {
    let time_remaining_ms = millis_between(now, budget.sla_breach_at);
    let time_remaining = time_remaining_ms.div_euclid(MS_PER_MINUTE).max(0);

    let elapsed_ms = millis_between(ticket.created_at, now);
    let budget_ms = hours_to_millis(budget.resolution_time_hours);
    let percent_time_elapsed = if budget_ms <= 0 {
        100.0
    } else {
        (elapsed_ms as f64 * 100.0 / budget_ms as f64).clamp(0.0, 100.0)
    };

    let sla_status = classify(time_remaining_ms, percent_time_elapsed, at_risk_threshold_pct);

    let response_breached = match ticket.first_response_at {
        Some(at) => at > budget.response_due_at,
        None => now >= budget.response_due_at,
    };

    SlaMetrics {
        response_time_hours: budget.response_time_hours,
        resolution_time_hours: budget.resolution_time_hours,
        response_due_at: budget.response_due_at,
        sla_breach_at: budget.sla_breach_at,
        sla_status,
        time_remaining,
        percent_time_elapsed,
        response_breached,
    }
}

fn classify(time_remaining_ms: i64, percent_time_elapsed: f64, at_risk_threshold_pct: f64) -> SlaStatus {
    if time_remaining_ms <= 0 {
        SlaStatus::Breached
    } else if percent_time_elapsed >= at_risk_threshold_pct {
        SlaStatus::AtRisk
    } else {
        SlaStatus::OnTrack
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breach_wins_over_percentage() {
        assert_eq!(classify(0, 100.0, 80.0), SlaStatus::Breached);
        assert_eq!(classify(-1, 50.0, 80.0), SlaStatus::Breached);
        assert_eq!(classify(1, 100.0, 80.0), SlaStatus::AtRisk);
        assert_eq!(classify(1, 79.99, 80.0), SlaStatus::OnTrack);
    }
}
