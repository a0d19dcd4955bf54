//! Primary-provider usage accounting
//!
//! Counters of successful primary calls bucketed by day and minute, the quota
//! policy that gates new calls, and the snapshot reported to clients.

mod quota;
mod record;
mod repository;
mod stats;

pub use quota::{
    can_proceed, can_proceed_with_pending, compute_wait_seconds, seconds_until_next_minute,
    wait_hint, Admission, QuotaDenial, QuotaPolicy,
};
pub use record::{
    day_key, minute_key, UsageRecord, DAILY_RETENTION_DAYS, MINUTE_RETENTION_HOURS,
};
pub use repository::UsageStore;
pub use stats::{UsageStats, WindowStats};
