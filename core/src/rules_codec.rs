//! Escalation-rule lists as stored text.
//!
//! Configuration rows keep their escalation ladder as a JSON array in a
//! single text column. This is the one place that text is parsed or
//! produced; everything past the boundary works on `Vec<EscalationRule>`.
//! Both snake_case and the legacy camelCase field names are accepted.

use crate::{
    error::SlaResult,
    policy::{validate_rules, EscalationRule},
};

/// Decode a stored rule list.
///
/// Blank text and JSON `null` mean "no list stored" and yield `None`, so the
/// caller falls back to the policy table. An empty array is a real list
/// that never escalates.
pub fn decode_rules(raw: &str) -> SlaResult<Option<Vec<EscalationRule>>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let Some(mut rules) = serde_json::from_str::<Option<Vec<EscalationRule>>>(trimmed)? else {
        return Ok(None);
    };
    validate_rules("stored escalation rules", &mut rules)?;
    Ok(Some(rules))
}

/// Encode a rule list for storage, sorted by level.
pub fn encode_rules(rules: &[EscalationRule]) -> SlaResult<String> {
    let mut sorted = rules.to_vec();
    sorted.sort_by_key(|r| r.level);
    Ok(serde_json::to_string(&sorted)?)
}
