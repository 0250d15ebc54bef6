//! Engine configuration: the policy table and evaluation thresholds.
//!
//! Production loads `{data_dir}/sla/sla_policies.json`. Tests use
//! `EngineConfig::default_test()`, which carries the builtin table.
//! Every policy is validated on load; a malformed ladder is rejected here
//! rather than discovered during evaluation.

use crate::{
    error::{SlaError, SlaResult},
    policy::{PolicyKey, PolicyTable, SlaPolicy},
    status::AT_RISK_THRESHOLD_PCT,
    ticket::{BusinessImpact, Priority},
};
use serde::Deserialize;
use std::collections::HashSet;

pub const POLICY_FILE: &str = "sla/sla_policies.json";

#[derive(Debug, Clone, Deserialize)]
struct PolicyEntry {
    priority: Priority,
    business_impact: BusinessImpact,
    #[serde(flatten)]
    policy: SlaPolicy,
}

#[derive(Debug, Clone, Deserialize)]
struct PolicyFile {
    #[serde(default = "default_threshold")]
    at_risk_threshold_pct: f64,
    #[serde(default)]
    default_key: Option<String>,
    policies: Vec<PolicyEntry>,
}

fn default_threshold() -> f64 {
    AT_RISK_THRESHOLD_PCT
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Percent of the resolution budget after which a ticket is at risk.
    pub at_risk_threshold_pct: f64,
    pub policies: PolicyTable,
}

impl EngineConfig {
    /// Load from the data/ directory.
    pub fn load(data_dir: &str) -> SlaResult<Self> {
        let path = format!("{data_dir}/{POLICY_FILE}");
        let content = std::fs::read_to_string(&path).map_err(|e| SlaError::Config {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        let config = Self::from_json(&content)?;
        log::info!(
            "loaded {} SLA policies from {path} (default '{}', at-risk at {}%)",
            config.policies.len(),
            config.policies.default_key(),
            config.at_risk_threshold_pct,
        );
        Ok(config)
    }

    pub fn from_json(content: &str) -> SlaResult<Self> {
        let file: PolicyFile = serde_json::from_str(content)?;

        let threshold = file.at_risk_threshold_pct;
        if !(threshold > 0.0 && threshold <= 100.0) {
            return Err(SlaError::InvalidPolicy {
                key: "at_risk_threshold_pct".into(),
                reason: format!("must be in (0, 100], got {threshold}"),
            });
        }

        let default_key = match file.default_key.as_deref() {
            Some(raw) => PolicyKey::parse(raw).ok_or_else(|| SlaError::InvalidPolicy {
                key: raw.to_string(),
                reason: "default_key must look like '{priority}-{business_impact}'".into(),
            })?,
            None => PolicyKey::medium_medium(),
        };

        let mut seen = HashSet::new();
        let mut default_policy = None;
        let mut others = Vec::with_capacity(file.policies.len());
        for entry in file.policies {
            let key = PolicyKey::new(entry.priority, entry.business_impact);
            if !seen.insert(key.clone()) {
                return Err(SlaError::InvalidPolicy {
                    key: key.to_string(),
                    reason: "defined more than once".into(),
                });
            }
            if key == default_key {
                default_policy = Some(entry.policy);
            } else {
                others.push((key, entry.policy));
            }
        }

        let default_policy = default_policy.ok_or_else(|| SlaError::InvalidPolicy {
            key: default_key.to_string(),
            reason: "default policy is not defined in the file".into(),
        })?;

        let mut policies = PolicyTable::with_default(default_key, default_policy)?;
        for (key, policy) in others {
            policies.insert(key, policy)?;
        }

        Ok(Self {
            at_risk_threshold_pct: threshold,
            policies,
        })
    }

    /// Config with the builtin table, for unit tests.
    pub fn default_test() -> Self {
        Self {
            at_risk_threshold_pct: AT_RISK_THRESHOLD_PCT,
            policies: PolicyTable::builtin(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::default_test()
    }
}
