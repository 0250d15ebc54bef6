//! SLA policy table: (priority, business impact) → hour budgets + escalation ladder.
//!
//! The table is data, not branching. Lookup is total: any pair the table
//! does not hold resolves to the default entry (medium-medium unless a
//! loaded configuration says otherwise). Unknown or legacy values never
//! produce an error here.

use crate::{
    error::{SlaError, SlaResult},
    ticket::{BusinessImpact, Priority},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscalationRule {
    pub level: u32,
    #[serde(alias = "triggerAfterHours")]
    pub trigger_after_hours: f64,
    #[serde(alias = "assignToRole")]
    pub assign_to_role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, alias = "notifyUsers", skip_serializing_if = "Vec::is_empty")]
    pub notify_users: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<String>,
}

impl EscalationRule {
    pub fn new(level: u32, trigger_after_hours: f64, assign_to_role: impl Into<String>) -> Self {
        Self {
            level,
            trigger_after_hours,
            assign_to_role: assign_to_role.into(),
            name: None,
            notify_users: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlaPolicy {
    pub response_time_hours: f64,
    pub resolution_time_hours: f64,
    #[serde(default)]
    pub escalation_rules: Vec<EscalationRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PolicyKey {
    pub priority: Priority,
    pub business_impact: BusinessImpact,
}

impl PolicyKey {
    pub fn new(priority: impl Into<Priority>, business_impact: impl Into<BusinessImpact>) -> Self {
        Self {
            priority: priority.into(),
            business_impact: business_impact.into(),
        }
    }

    /// Parse `"{priority}-{businessImpact}"`. Splits on the last '-'.
    pub fn parse(raw: &str) -> Option<Self> {
        let (p, b) = raw.rsplit_once('-')?;
        if p.trim().is_empty() || b.trim().is_empty() {
            return None;
        }
        Some(Self::new(p, b))
    }

    pub fn medium_medium() -> Self {
        Self::new(Priority::Medium, BusinessImpact::Medium)
    }
}

impl fmt::Display for PolicyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.priority, self.business_impact)
    }
}

#[derive(Debug, Clone)]
pub struct PolicyTable {
    entries: HashMap<PolicyKey, SlaPolicy>,
    default_key: PolicyKey,
}

impl PolicyTable {
    /// An empty table whose only entry is the default.
    pub fn with_default(default_key: PolicyKey, default_policy: SlaPolicy) -> SlaResult<Self> {
        let mut table = Self {
            entries: HashMap::new(),
            default_key: default_key.clone(),
        };
        table.insert(default_key, default_policy)?;
        Ok(table)
    }

    /// The six canonical entries.
    pub fn builtin() -> Self {
        let entries = [
            (
                PolicyKey::new(Priority::Urgent, BusinessImpact::Critical),
                builtin_policy(0.25, 4.0, &[(1, 0.5, "manager"), (2, 2.0, "director")]),
            ),
            (
                PolicyKey::new(Priority::Urgent, BusinessImpact::High),
                builtin_policy(0.5, 8.0, &[(1, 1.0, "manager"), (2, 4.0, "director")]),
            ),
            (
                PolicyKey::new(Priority::High, BusinessImpact::Critical),
                builtin_policy(1.0, 8.0, &[(1, 2.0, "manager"), (2, 6.0, "director")]),
            ),
            (
                PolicyKey::new(Priority::High, BusinessImpact::High),
                builtin_policy(2.0, 24.0, &[(1, 8.0, "manager"), (2, 16.0, "director")]),
            ),
            (
                PolicyKey::medium_medium(),
                builtin_policy(8.0, 48.0, &[(1, 24.0, "manager")]),
            ),
            (
                PolicyKey::new(Priority::Low, BusinessImpact::Low),
                builtin_policy(24.0, 120.0, &[(1, 72.0, "manager")]),
            ),
        ]
        .into_iter()
        .collect();

        Self {
            entries,
            default_key: PolicyKey::medium_medium(),
        }
    }

    /// Validate and add (or replace) an entry. Rules are stored sorted by level.
    pub fn insert(&mut self, key: PolicyKey, mut policy: SlaPolicy) -> SlaResult<()> {
        let label = key.to_string();
        validate_hours(&label, "response_time_hours", policy.response_time_hours)?;
        validate_hours(&label, "resolution_time_hours", policy.resolution_time_hours)?;
        validate_rules(&label, &mut policy.escalation_rules)?;
        self.entries.insert(key, policy);
        Ok(())
    }

    /// Total lookup. Falls back to the default entry for any pair not held.
    pub fn lookup(&self, priority: &Priority, business_impact: &BusinessImpact) -> &SlaPolicy {
        let key = PolicyKey::new(priority.clone(), business_impact.clone());
        match self.entries.get(&key) {
            Some(policy) => policy,
            None => {
                log::debug!("no SLA policy for '{key}', using '{}'", self.default_key);
                self.default_policy()
            }
        }
    }

    pub fn get(&self, key: &PolicyKey) -> Option<&SlaPolicy> {
        self.entries.get(key)
    }

    pub fn default_key(&self) -> &PolicyKey {
        &self.default_key
    }

    pub fn default_policy(&self) -> &SlaPolicy {
        // with_default() and builtin() both guarantee the default entry exists,
        // and nothing removes entries.
        &self.entries[&self.default_key]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in stable display order.
    pub fn keys(&self) -> Vec<&PolicyKey> {
        let mut keys: Vec<_> = self.entries.keys().collect();
        keys.sort_by_key(|k| k.to_string());
        keys
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_policy(response: f64, resolution: f64, rules: &[(u32, f64, &str)]) -> SlaPolicy {
    SlaPolicy {
        response_time_hours: response,
        resolution_time_hours: resolution,
        escalation_rules: rules
            .iter()
            .map(|&(level, after, role)| EscalationRule::new(level, after, role))
            .collect(),
    }
}

fn validate_hours(key: &str, field: &str, hours: f64) -> SlaResult<()> {
    if !hours.is_finite() || hours <= 0.0 {
        return Err(SlaError::InvalidPolicy {
            key: key.to_string(),
            reason: format!("{field} must be a positive number of hours, got {hours}"),
        });
    }
    Ok(())
}

/// Sort `rules` by level, then reject ladders that cannot be walked one
/// step at a time: level 0, duplicate levels, negative or non-finite
/// triggers, and triggers that decrease as the level rises.
pub fn validate_rules(key: &str, rules: &mut [EscalationRule]) -> SlaResult<()> {
    rules.sort_by_key(|r| r.level);

    let invalid = |reason: String| SlaError::InvalidPolicy {
        key: key.to_string(),
        reason,
    };

    let mut prev: Option<&EscalationRule> = None;
    for rule in rules.iter() {
        if rule.level == 0 {
            return Err(invalid("escalation levels start at 1".into()));
        }
        if !rule.trigger_after_hours.is_finite() || rule.trigger_after_hours < 0.0 {
            return Err(invalid(format!(
                "level {} has invalid trigger_after_hours {}",
                rule.level, rule.trigger_after_hours
            )));
        }
        if let Some(p) = prev {
            if p.level == rule.level {
                return Err(invalid(format!("duplicate escalation level {}", rule.level)));
            }
            if rule.trigger_after_hours < p.trigger_after_hours {
                return Err(invalid(format!(
                    "level {} triggers at {}h, before level {} at {}h",
                    rule.level, rule.trigger_after_hours, p.level, p.trigger_after_hours
                )));
            }
        }
        prev = Some(rule);
    }
    Ok(())
}
