//! Usage record entity
//!
//! Counts successful primary-provider calls in day and minute buckets keyed by
//! the local wall clock.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Key format for daily buckets
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Key format for minute buckets
pub const MINUTE_KEY_FORMAT: &str = "%Y-%m-%d-%H-%M";

/// How long daily buckets are retained
pub const DAILY_RETENTION_DAYS: i64 = 7;

/// How long minute buckets are retained
pub const MINUTE_RETENTION_HOURS: i64 = 2;

/// Bucket key for the day containing `now`
pub fn day_key(now: NaiveDateTime) -> String {
    now.format(DAY_KEY_FORMAT).to_string()
}

/// Bucket key for the minute containing `now`
pub fn minute_key(now: NaiveDateTime) -> String {
    now.format(MINUTE_KEY_FORMAT).to_string()
}

/// Persisted usage counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    #[serde(default)]
    pub daily_usage: BTreeMap<String, u32>,
    #[serde(default)]
    pub minute_usage: BTreeMap<String, u32>,
    /// Informational only; never consulted for admission
    #[serde(default)]
    pub last_reset: Option<NaiveDateTime>,
}

impl UsageRecord {
    /// Create an empty record stamped with `now`
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            daily_usage: BTreeMap::new(),
            minute_usage: BTreeMap::new(),
            last_reset: Some(now),
        }
    }

    /// Calls recorded for the day containing `now`
    pub fn daily_count(&self, now: NaiveDateTime) -> u32 {
        self.daily_usage.get(&day_key(now)).copied().unwrap_or(0)
    }

    /// Calls recorded for the minute containing `now`
    pub fn minute_count(&self, now: NaiveDateTime) -> u32 {
        self.minute_usage.get(&minute_key(now)).copied().unwrap_or(0)
    }

    /// Record one successful call: bump both buckets, then drop stale entries
    pub fn record(&mut self, now: NaiveDateTime) {
        let daily = self.daily_usage.entry(day_key(now)).or_insert(0);
        *daily = daily.saturating_add(1);

        let minute = self.minute_usage.entry(minute_key(now)).or_insert(0);
        *minute = minute.saturating_add(1);

        self.prune(now);
    }

    /// Remove buckets that fell outside the retention horizon.
    ///
    /// Keys that do not parse in their bucket format are removed as well.
    pub fn prune(&mut self, now: NaiveDateTime) {
        let daily_cutoff = now - Duration::days(DAILY_RETENTION_DAYS);
        self.daily_usage.retain(|key, _| {
            NaiveDate::parse_from_str(key, DAY_KEY_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .is_some_and(|start| start >= daily_cutoff)
        });

        let minute_cutoff = now - Duration::hours(MINUTE_RETENTION_HOURS);
        self.minute_usage.retain(|key, _| {
            NaiveDateTime::parse_from_str(key, MINUTE_KEY_FORMAT)
                .is_ok_and(|start| start >= minute_cutoff)
        });
    }

    pub fn is_empty(&self) -> bool {
        self.daily_usage.is_empty() && self.minute_usage.is_empty()
    }
}
