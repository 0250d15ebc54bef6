//! Events emitted by an evaluation sweep.
//!
//! The engine never persists or delivers these. The owning system decides
//! what to store and whom to notify.

use crate::{
    status::SlaStatus,
    types::{TicketId, Timestamp},
};
use serde::{Deserialize, Serialize};

/// Variants are only ever added, never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SlaEvent {
    TicketEvaluated {
        at: Timestamp,
        ticket_id: TicketId,
        status: SlaStatus,
        time_remaining: i64,
        percent_time_elapsed: f64,
    },
    SlaStatusChanged {
        at: Timestamp,
        ticket_id: TicketId,
        from: Option<SlaStatus>,
        to: SlaStatus,
    },
    SlaBreached {
        at: Timestamp,
        ticket_id: TicketId,
        breached_at: Timestamp,
        minutes_overdue: i64,
    },
    EscalationTriggered {
        at: Timestamp,
        ticket_id: TicketId,
        from_level: u32,
        to_level: u32,
        assign_to_role: String,
        reason: String,
    },
}

impl SlaEvent {
    /// Stable name for log lines and downstream routing.
    pub fn kind(&self) -> &'static str {
        match self {
            SlaEvent::TicketEvaluated { .. }     => "ticket_evaluated",
            SlaEvent::SlaStatusChanged { .. }    => "sla_status_changed",
            SlaEvent::SlaBreached { .. }         => "sla_breached",
            SlaEvent::EscalationTriggered { .. } => "escalation_triggered",
        }
    }

    pub fn ticket_id(&self) -> &str {
        match self {
            SlaEvent::TicketEvaluated { ticket_id, .. }
            | SlaEvent::SlaStatusChanged { ticket_id, .. }
            | SlaEvent::SlaBreached { ticket_id, .. }
            | SlaEvent::EscalationTriggered { ticket_id, .. } => ticket_id,
        }
    }
}
