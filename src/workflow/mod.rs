//! Workflow services
//!
//! Each service owns no state of its own: callers hand in the in-memory record
//! (`&mut Case`, `&mut Document`) or board, and the service runs
//! authorize → check preconditions → persist → replace the in-memory value.
//! A record is only changed after the backend has accepted the write.

mod case;
mod document;
mod role_board;

#[cfg(test)]
mod tests;

use std::sync::Mutex;

use chrono::{DateTime, Duration, FixedOffset, Offset, Utc};

pub use case::CaseWorkflow;
pub use document::DocumentWorkflow;
pub use role_board::{BoardSet, RoleBoard};

use crate::errors::CaseflowError;

/// Source of "now" for submission stamps and due dates
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall clock in a fixed office timezone
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn new(offset: FixedOffset) -> Self {
        SystemClock { offset }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        SystemClock {
            offset: Utc.fix(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}

/// Manually driven clock
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<FixedOffset>>,
}

impl FixedClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        FixedClock {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<FixedOffset>) {
        *self.now.lock().unwrap_or_else(|p| p.into_inner()) = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|p| p.into_inner());
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        *self.now.lock().unwrap_or_else(|p| p.into_inner())
    }
}

/// Normalize a store error to the transport category
pub(crate) fn as_transport(error: CaseflowError) -> CaseflowError {
    match error {
        CaseflowError::TransportFailure(_) => error,
        other => CaseflowError::TransportFailure(other.to_string()),
    }
}
