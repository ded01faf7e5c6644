//! Time source for `fn.now`, `fn.nowMillis` and `fn.nowSeconds`.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

/// Supplies the current time to the engine. Swapped for [`FixedClock`] in tests.
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now(&self) -> DateTime<Local>;
}

/// Wall clock in the process time zone.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Always returns the same instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<Local>);

impl FixedClock {
    /// Builds a clock at the given local wall time. Ambiguous or skipped local times
    /// (DST transitions) resolve to the earliest valid instant, or the UTC reading.
    pub fn at_local(naive: NaiveDateTime) -> Self {
        let instant = Local
            .from_local_datetime(&naive)
            .earliest()
            .unwrap_or_else(|| Local.from_utc_datetime(&naive));
        Self(instant)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}
