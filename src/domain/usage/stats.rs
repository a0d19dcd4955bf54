//! Read-only usage snapshot

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::quota::QuotaPolicy;
use super::record::UsageRecord;

/// Usage of a single quota window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowStats {
    pub used: u32,
    pub limit: u32,
    /// `limit - used`, not clamped at zero
    pub remaining: i64,
    pub percentage: f64,
}

impl WindowStats {
    pub fn new(used: u32, limit: u32) -> Self {
        let percentage = if limit == 0 {
            100.0
        } else {
            100.0 * f64::from(used) / f64::from(limit)
        };

        Self {
            used,
            limit,
            remaining: i64::from(limit) - i64::from(used),
            percentage,
        }
    }
}

/// Daily and per-minute usage at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageStats {
    pub daily: WindowStats,
    pub minute: WindowStats,
}

impl UsageStats {
    pub fn from_record(record: &UsageRecord, now: NaiveDateTime, policy: &QuotaPolicy) -> Self {
        Self {
            daily: WindowStats::new(record.daily_count(now), policy.daily_limit),
            minute: WindowStats::new(record.minute_count(now), policy.minute_limit),
        }
    }
}
