//! Wall-clock abstraction
//!
//! Usage keys are derived from the local wall clock, so every component that
//! buckets or ages counters reads time through [`Clock`].

use std::fmt::Debug;

use chrono::{Local, NaiveDateTime};

/// Source of the current local time
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> NaiveDateTime;
}

/// Clock backed by the system's local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
