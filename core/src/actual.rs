//! Actual response/resolution times, in whole minutes from creation.

use crate::{
    ticket::TicketSnapshot,
    types::{millis_between, Timestamp, MS_PER_MINUTE},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActualTimes {
    pub actual_response_minutes: Option<i64>,
    pub actual_resolution_minutes: Option<i64>,
}

/// Each value stays `None` until its timestamp is recorded. No estimation.
pub fn calculate_actual_times(ticket: &TicketSnapshot) -> ActualTimes {
    let since_created = |at: Timestamp| {
        if at < ticket.created_at {
            log::warn!(
                "ticket {} has a timestamp {at} before its creation {}",
                ticket.ticket_id,
                ticket.created_at
            );
        }
        millis_between(ticket.created_at, at).div_euclid(MS_PER_MINUTE)
    };

    ActualTimes {
        actual_response_minutes: ticket.first_response_at.map(since_created),
        actual_resolution_minutes: ticket.resolved_at.map(since_created),
    }
}
