//! Escalation evaluator: decides whether a ticket moves up its ladder now.
//!
//! Rules are walked in ascending level and the FIRST rule above the
//! ticket's current level whose trigger has passed wins. Escalation
//! therefore proceeds one step per check even when several thresholds were
//! crossed since the last one; no intermediate level is ever skipped.

use crate::{
    policy::{EscalationRule, PolicyTable},
    sla_config::SlaConfiguration,
    ticket::TicketSnapshot,
    types::{millis_between, Timestamp, MS_PER_HOUR},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscalationDecision {
    pub needs_escalation: bool,
    pub escalation_level: u32,
    pub reason: String,
    pub assign_to_role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notify_users: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<String>,
}

/// `None` means no escalation is due; it is not an error.
pub fn check_escalation_needed(
    ticket: &TicketSnapshot,
    config: Option<&SlaConfiguration>,
    table: &PolicyTable,
    now: Timestamp,
) -> Option<EscalationDecision> {
    if ticket.is_resolved_at(now) {
        return None;
    }

    let rules: &[EscalationRule] = match config.and_then(|c| c.escalation_rules.as_deref()) {
        Some(rules) => rules,
        None => table
            .lookup(&ticket.priority, &ticket.business_impact)
            .escalation_rules
            .as_slice(),
    };

    let hours_elapsed = millis_between(ticket.created_at, now) as f64 / MS_PER_HOUR;
    let rule = first_qualifying_rule(rules, ticket.escalation_level, hours_elapsed)?;

    let decision = EscalationDecision {
        needs_escalation: true,
        escalation_level: rule.level,
        reason: format!("{hours_elapsed:.1} hours without resolution"),
        assign_to_role: rule.assign_to_role.clone(),
        rule_name: rule.name.clone(),
        notify_users: rule.notify_users.clone(),
        actions: rule.actions.clone(),
    };
    log::debug!(
        "ticket {} escalates {} -> {} ({})",
        ticket.ticket_id,
        ticket.escalation_level,
        decision.escalation_level,
        decision.reason,
    );
    Some(decision)
}

/// Lowest-level rule above `current_level` whose trigger has passed.
/// Does not assume `rules` arrive sorted.
pub fn first_qualifying_rule(
    rules: &[EscalationRule],
    current_level: u32,
    hours_elapsed: f64,
) -> Option<&EscalationRule> {
    let mut ordered: Vec<&EscalationRule> = rules.iter().collect();
    ordered.sort_by_key(|r| r.level);
    ordered
        .into_iter()
        .find(|r| r.level > current_level && hours_elapsed >= r.trigger_after_hours)
}
