//! The ticket snapshot the engine consumes.
//!
//! Tickets are owned by the surrounding ticketing system. The engine only
//! ever reads a snapshot; it never writes back. Priority and business impact
//! arrive as free text from legacy data, so both enums keep unknown values
//! verbatim instead of rejecting them.

use crate::{
    impact::calculate_business_impact,
    status::SlaStatus,
    types::{TicketId, Timestamp},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

const PRIORITY_TOKENS: [&str; 4] = ["low", "medium", "high", "urgent"];
const IMPACT_TOKENS: [&str; 4] = ["low", "medium", "high", "critical"];

/// The canonical token `raw` spells, ignoring case and surrounding whitespace.
fn canonical_token(raw: &str, tokens: &[&'static str]) -> Option<&'static str> {
    let folded = raw.trim();
    tokens.iter().copied().find(|t| t.eq_ignore_ascii_case(folded))
}

/// Equality and hashing go through the canonical token, so an `Other` that
/// spells a known value (`Other("Urgent")`) is the same key as `Urgent`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
    /// Anything the canonical set does not know. Falls back to defaults.
    Other(String),
}

impl Priority {
    /// Case-insensitive, whitespace-tolerant. Never fails.
    pub fn parse(raw: &str) -> Self {
        match canonical_token(raw, &PRIORITY_TOKENS) {
            Some("low") => Priority::Low,
            Some("medium") => Priority::Medium,
            Some("high") => Priority::High,
            Some("urgent") => Priority::Urgent,
            _ => Priority::Other(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
            Priority::Other(raw) => raw,
        }
    }

    /// The same value with a canonical `Other` folded into its variant.
    pub fn canonical(&self) -> Self {
        Self::parse(self.key())
    }

    fn key(&self) -> &str {
        match self {
            Priority::Other(raw) => canonical_token(raw, &PRIORITY_TOKENS).unwrap_or(raw),
            known => known.as_str(),
        }
    }
}

impl PartialEq for Priority {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Priority {}

impl Hash for Priority {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl From<String> for Priority {
    fn from(raw: String) -> Self {
        Priority::parse(&raw)
    }
}

impl From<&str> for Priority {
    fn from(raw: &str) -> Self {
        Priority::parse(raw)
    }
}

impl From<Priority> for String {
    fn from(p: Priority) -> Self {
        p.as_str().to_string()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BusinessImpact {
    Low,
    Medium,
    High,
    Critical,
    Other(String),
}

impl BusinessImpact {
    pub fn parse(raw: &str) -> Self {
        match canonical_token(raw, &IMPACT_TOKENS) {
            Some("low") => BusinessImpact::Low,
            Some("medium") => BusinessImpact::Medium,
            Some("high") => BusinessImpact::High,
            Some("critical") => BusinessImpact::Critical,
            _ => BusinessImpact::Other(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            BusinessImpact::Low => "low",
            BusinessImpact::Medium => "medium",
            BusinessImpact::High => "high",
            BusinessImpact::Critical => "critical",
            BusinessImpact::Other(raw) => raw,
        }
    }

    pub fn canonical(&self) -> Self {
        Self::parse(self.key())
    }

    fn key(&self) -> &str {
        match self {
            BusinessImpact::Other(raw) => canonical_token(raw, &IMPACT_TOKENS).unwrap_or(raw),
            known => known.as_str(),
        }
    }
}

impl PartialEq for BusinessImpact {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for BusinessImpact {}

impl Hash for BusinessImpact {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl From<String> for BusinessImpact {
    fn from(raw: String) -> Self {
        BusinessImpact::parse(&raw)
    }
}

impl From<&str> for BusinessImpact {
    fn from(raw: &str) -> Self {
        BusinessImpact::parse(raw)
    }
}

impl From<BusinessImpact> for String {
    fn from(b: BusinessImpact) -> Self {
        b.as_str().to_string()
    }
}

impl fmt::Display for BusinessImpact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketSnapshot {
    pub ticket_id: TicketId,
    pub priority: Priority,
    pub business_impact: BusinessImpact,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub client_tier: Option<String>,
    pub created_at: Timestamp,
    #[serde(default)]
    pub first_response_at: Option<Timestamp>,
    #[serde(default)]
    pub resolved_at: Option<Timestamp>,
    /// Per-ticket override of the policy response budget.
    #[serde(default)]
    pub response_time_hours: Option<f64>,
    /// Per-ticket override of the policy resolution budget.
    #[serde(default)]
    pub resolution_time_hours: Option<f64>,
    /// Highest escalation level already applied. 0 = never escalated.
    #[serde(default)]
    pub escalation_level: u32,
    /// Last status the owning system persisted, if any.
    #[serde(default)]
    pub sla_status: Option<SlaStatus>,
}

impl TicketSnapshot {
    pub fn new(
        ticket_id: impl Into<TicketId>,
        priority: impl Into<Priority>,
        business_impact: impl Into<BusinessImpact>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            ticket_id: ticket_id.into(),
            priority: priority.into(),
            business_impact: business_impact.into(),
            category: None,
            client_tier: None,
            created_at,
            first_response_at: None,
            resolved_at: None,
            response_time_hours: None,
            resolution_time_hours: None,
            escalation_level: 0,
            sla_status: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_client_tier(mut self, tier: impl Into<String>) -> Self {
        self.client_tier = Some(tier.into());
        self
    }

    pub fn with_first_response(mut self, at: Timestamp) -> Self {
        self.first_response_at = Some(at);
        self
    }

    pub fn with_resolved(mut self, at: Timestamp) -> Self {
        self.resolved_at = Some(at);
        self
    }

    pub fn with_response_hours(mut self, hours: f64) -> Self {
        self.response_time_hours = Some(hours);
        self
    }

    pub fn with_resolution_hours(mut self, hours: f64) -> Self {
        self.resolution_time_hours = Some(hours);
        self
    }

    pub fn with_escalation_level(mut self, level: u32) -> Self {
        self.escalation_level = level;
        self
    }

    pub fn with_sla_status(mut self, status: SlaStatus) -> Self {
        self.sla_status = Some(status);
        self
    }

    /// Impact derived from the ticket's category, tier and priority, as
    /// assigned when a ticket is filed.
    pub fn derived_business_impact(&self) -> BusinessImpact {
        calculate_business_impact(
            self.category.as_deref().unwrap_or_default(),
            &self.priority,
            self.client_tier.as_deref(),
        )
    }

    /// Replace `business_impact` with the derived one.
    pub fn with_derived_business_impact(mut self) -> Self {
        self.business_impact = self.derived_business_impact();
        self
    }

    /// True once `resolved_at` exists and is not after `now`.
    pub fn is_resolved_at(&self, now: Timestamp) -> bool {
        self.resolved_at.is_some_and(|at| at <= now)
    }
}
