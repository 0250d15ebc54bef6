//! Explicit SLA configuration: an organisation-level override that sits
//! between a ticket's own overrides and the policy table.

use crate::{
    error::SlaResult,
    policy::{validate_rules, EscalationRule},
    rules_codec::{decode_rules, encode_rules},
    ticket::{BusinessImpact, Priority, TicketSnapshot},
};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlaConfiguration {
    #[serde(default)]
    pub name: Option<String>,
    /// Restrict to one priority. `None` matches every ticket.
    #[serde(default)]
    pub priority: Option<Priority>,
    /// Restrict to one business impact. `None` matches every ticket.
    #[serde(default)]
    pub business_impact: Option<BusinessImpact>,
    pub response_time_hours: f64,
    pub resolution_time_hours: f64,
    /// `None` = use the policy table's ladder for the ticket. Validated and
    /// sorted by level on every way in.
    #[serde(default, deserialize_with = "validated_rules")]
    pub escalation_rules: Option<Vec<EscalationRule>>,
}

impl SlaConfiguration {
    pub fn new(response_time_hours: f64, resolution_time_hours: f64) -> Self {
        Self {
            name: None,
            priority: None,
            business_impact: None,
            response_time_hours,
            resolution_time_hours,
            escalation_rules: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn for_pair(
        mut self,
        priority: impl Into<Priority>,
        business_impact: impl Into<BusinessImpact>,
    ) -> Self {
        self.priority = Some(priority.into());
        self.business_impact = Some(business_impact.into());
        self
    }

    pub fn with_escalation_rules(mut self, mut rules: Vec<EscalationRule>) -> SlaResult<Self> {
        validate_rules(self.label(), &mut rules)?;
        self.escalation_rules = Some(rules);
        Ok(self)
    }

    fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("configuration escalation rules")
    }

    /// Build from a stored row whose rule ladder is JSON text.
    pub fn from_stored(
        name: Option<String>,
        response_time_hours: f64,
        resolution_time_hours: f64,
        escalation_rules_json: Option<&str>,
    ) -> SlaResult<Self> {
        let escalation_rules = match escalation_rules_json {
            Some(raw) => decode_rules(raw)?,
            None => None,
        };
        Ok(Self {
            name,
            priority: None,
            business_impact: None,
            response_time_hours,
            resolution_time_hours,
            escalation_rules,
        })
    }

    /// The rule ladder as JSON text for storage. `None` when no ladder is set.
    pub fn stored_rules(&self) -> SlaResult<Option<String>> {
        self.escalation_rules
            .as_deref()
            .map(encode_rules)
            .transpose()
    }

    pub fn applies_to(&self, ticket: &TicketSnapshot) -> bool {
        self.priority.as_ref().map_or(true, |p| *p == ticket.priority)
            && self
                .business_impact
                .as_ref()
                .map_or(true, |b| *b == ticket.business_impact)
    }
}

fn validated_rules<'de, D>(deserializer: D) -> Result<Option<Vec<EscalationRule>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(mut rules) = Option::<Vec<EscalationRule>>::deserialize(deserializer)? else {
        return Ok(None);
    };
    validate_rules("configuration escalation rules", &mut rules).map_err(serde::de::Error::custom)?;
    Ok(Some(rules))
}
