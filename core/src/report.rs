//! Reporting aggregator: compliance statistics over a ticket set.
//!
//! Averages use only tickets that have the actual value; a ticket with no
//! response yet is excluded from the response average, not counted as zero.
//! Every ratio yields 0 for an empty denominator.

use crate::{
    actual::{calculate_actual_times, ActualTimes},
    status::SlaStatus,
    ticket::TicketSnapshot,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SlaReport {
    pub total_tickets: usize,
    pub on_track: usize,
    pub at_risk: usize,
    pub breached: usize,
    pub sla_compliance_rate: f64,
    pub avg_response_time_hours: f64,
    pub avg_resolution_time_hours: f64,
    pub responded_tickets: usize,
    pub resolved_tickets: usize,
}

/// Display form, as handed to dashboards: percentages and hours as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlaReportSummary {
    pub total_tickets: usize,
    pub on_track: usize,
    pub at_risk: usize,
    pub breached: usize,
    pub sla_compliance_rate: String,
    pub avg_response_time_hours: String,
    pub avg_resolution_time_hours: String,
}

impl SlaReport {
    pub fn summary(&self) -> SlaReportSummary {
        let sla_compliance_rate = if self.total_tickets == 0 {
            "0".to_string()
        } else {
            format!("{:.1}", self.sla_compliance_rate)
        };
        SlaReportSummary {
            total_tickets: self.total_tickets,
            on_track: self.on_track,
            at_risk: self.at_risk,
            breached: self.breached,
            sla_compliance_rate,
            avg_response_time_hours: format!("{:.1}", self.avg_response_time_hours),
            avg_resolution_time_hours: format!("{:.1}", self.avg_resolution_time_hours),
        }
    }
}

/// Running totals. Shared by the stored-status report and the engine's
/// evaluate-now report.
#[derive(Debug, Clone, Default)]
pub struct ReportAccumulator {
    total: usize,
    on_track: usize,
    at_risk: usize,
    breached: usize,
    response_minutes_sum: i64,
    responded: usize,
    resolution_minutes_sum: i64,
    resolved: usize,
}

impl ReportAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A ticket with no status still counts toward the total.
    pub fn add(&mut self, status: Option<SlaStatus>, actual: ActualTimes) {
        self.total += 1;
        match status {
            Some(SlaStatus::OnTrack) => self.on_track += 1,
            Some(SlaStatus::AtRisk) => self.at_risk += 1,
            Some(SlaStatus::Breached) => self.breached += 1,
            None => {}
        }
        if let Some(m) = actual.actual_response_minutes {
            self.response_minutes_sum += m;
            self.responded += 1;
        }
        if let Some(m) = actual.actual_resolution_minutes {
            self.resolution_minutes_sum += m;
            self.resolved += 1;
        }
    }

    pub fn finish(&self) -> SlaReport {
        SlaReport {
            total_tickets: self.total,
            on_track: self.on_track,
            at_risk: self.at_risk,
            breached: self.breached,
            sla_compliance_rate: ratio(self.on_track as f64 * 100.0, self.total),
            avg_response_time_hours: ratio(self.response_minutes_sum as f64 / 60.0, self.responded),
            avg_resolution_time_hours: ratio(
                self.resolution_minutes_sum as f64 / 60.0,
                self.resolved,
            ),
            responded_tickets: self.responded,
            resolved_tickets: self.resolved,
        }
    }
}

/// Report over each ticket's stored status.
pub fn generate_sla_report(tickets: &[TicketSnapshot]) -> SlaReport {
    let mut acc = ReportAccumulator::new();
    for ticket in tickets {
        acc.add(ticket.sla_status, calculate_actual_times(ticket));
    }
    acc.finish()
}

fn ratio(numerator: f64, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator / denominator as f64
    }
}
