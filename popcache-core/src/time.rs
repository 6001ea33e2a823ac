//! Time source used for stamping and judging stored responses.
//!
//! The orchestrator reads the clock through [`TimeProvider`] so that both
//! `stored_at` and the freshness check use the same notion of "now". Tests
//! swap in a controllable provider instead of sleeping.

use std::fmt::Debug;

use chrono::{DateTime, Utc};

/// Source of the current wall-clock time.
pub trait TimeProvider: Debug + Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// [`TimeProvider`] backed by the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    #[inline]
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
