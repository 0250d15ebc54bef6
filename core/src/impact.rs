//! Business-impact classification for newly filed tickets.
//!
//! Order is fixed: category override, then client-tier override, then the
//! plain priority mapping.

use crate::ticket::{BusinessImpact, Priority};

/// Categories that are critical whatever the reporter picked.
pub const CRITICAL_CATEGORIES: [&str; 3] = ["security", "data_loss", "system_down"];

pub const ENTERPRISE_TIER: &str = "enterprise";

pub fn calculate_business_impact(
    category: &str,
    priority: &Priority,
    client_tier: Option<&str>,
) -> BusinessImpact {
    let category = category.trim().to_ascii_lowercase();
    if CRITICAL_CATEGORIES.contains(&category.as_str()) {
        return BusinessImpact::Critical;
    }

    let priority = priority.canonical();
    let enterprise = client_tier.is_some_and(|t| t.trim().eq_ignore_ascii_case(ENTERPRISE_TIER));
    if enterprise {
        match &priority {
            Priority::Urgent => return BusinessImpact::Critical,
            Priority::High => return BusinessImpact::High,
            _ => {}
        }
    }

    match priority {
        Priority::Urgent => BusinessImpact::High,
        Priority::High => BusinessImpact::Medium,
        Priority::Medium => BusinessImpact::Medium,
        Priority::Low => BusinessImpact::Low,
        Priority::Other(_) => BusinessImpact::Medium,
    }
}
