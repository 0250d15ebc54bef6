//! Deadline calculator: effective hour budgets and absolute deadlines.
//!
//! Precedence, per budget: ticket override > explicit configuration >
//! policy table. Overrides that are zero, negative or not finite count as
//! unset, so a blank field in upstream data never produces an instant breach.

use crate::{
    policy::PolicyTable,
    sla_config::SlaConfiguration,
    ticket::TicketSnapshot,
    types::{add_hours, Timestamp},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlaBudget {
    pub response_time_hours: f64,
    pub resolution_time_hours: f64,
    pub response_due_at: Timestamp,
    pub sla_breach_at: Timestamp,
}

pub fn compute_budget(
    ticket: &TicketSnapshot,
    config: Option<&SlaConfiguration>,
    table: &PolicyTable,
) -> SlaBudget {
    let policy = || table.lookup(&ticket.priority, &ticket.business_impact);

    let response_time_hours = usable(ticket.response_time_hours)
        .or_else(|| config.and_then(|c| usable(Some(c.response_time_hours))))
        .unwrap_or_else(|| policy().response_time_hours);

    let resolution_time_hours = usable(ticket.resolution_time_hours)
        .or_else(|| config.and_then(|c| usable(Some(c.resolution_time_hours))))
        .unwrap_or_else(|| policy().resolution_time_hours);

    SlaBudget {
        response_time_hours,
        resolution_time_hours,
        response_due_at: add_hours(ticket.created_at, response_time_hours),
        sla_breach_at: add_hours(ticket.created_at, resolution_time_hours),
    }
}

fn usable(hours: Option<f64>) -> Option<f64> {
    hours.filter(|h| h.is_finite() && *h > 0.0)
}
