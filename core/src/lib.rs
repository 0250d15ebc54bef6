//! Support-ticket SLA and escalation engine.
//!
//! Pure, synchronous evaluation over ticket snapshots: hour budgets from a
//! priority × business-impact policy table, breach/at-risk classification,
//! one-step-at-a-time escalation, and compliance reporting. `now` is always
//! supplied by the caller.

pub mod actual;
pub mod clock;
pub mod config;
pub mod deadline;
pub mod engine;
pub mod error;
pub mod escalation;
pub mod event;
pub mod format;
pub mod impact;
pub mod policy;
pub mod report;
pub mod rules_codec;
pub mod sla_config;
pub mod status;
pub mod ticket;
pub mod types;

pub use engine::SlaEngine;
pub use error::{SlaError, SlaResult};
pub use status::{SlaMetrics, SlaStatus};
pub use ticket::{BusinessImpact, Priority, TicketSnapshot};
