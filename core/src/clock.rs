//! Evaluation clock: the single source of "now" for an evaluation pass.
//!
//! RULE: Nothing below the engine facade reads the system clock.
//! Callers capture `now` once per pass and thread it through every
//! calculation so metrics and escalation checks never see torn reads.

use crate::types::Timestamp;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall clock. Only the runner and long-lived callers use this.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// A clock that only moves when told to. Used by tests and replay tooling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FixedClock {
    at: Timestamp,
}

impl FixedClock {
    pub fn new(at: Timestamp) -> Self {
        Self { at }
    }

    /// Move forward by `by`. Returns the new instant.
    pub fn advance(&mut self, by: Duration) -> Timestamp {
        self.at += by;
        self.at
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.at
    }
}

/// One sweep over a ticket set, pinned to a single instant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvaluationPass {
    pub pass_id: String,
    pub now: Timestamp,
}

impl EvaluationPass {
    /// Capture `now` from `clock` exactly once.
    pub fn begin(clock: &dyn Clock) -> Self {
        Self::at(clock.now())
    }

    pub fn at(now: Timestamp) -> Self {
        Self {
            pass_id: format!("pass-{}", Uuid::new_v4().simple()),
            now,
        }
    }
}
