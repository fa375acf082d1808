use chrono::{Datelike, Utc};

/// Source of the "current month" used by the live detector.
///
/// Kept behind a trait so the classification is deterministic under test
/// instead of depending on the wall clock.
pub trait Clock: Send + Sync {
    /// Calendar month, 1-12.
    fn current_month(&self) -> u32;
}

/// Wall-clock months, the production implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_month(&self) -> u32 {
        Utc::now().month()
    }
}

/// A clock pinned to one month, for tests and offline analysis.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u32);

impl Clock for FixedClock {
    fn current_month(&self) -> u32 {
        self.0
    }
}
