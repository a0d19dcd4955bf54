//! Quota policy and admission decisions
//!
//! Admission is evaluated against the persisted counters. The daily window is
//! always checked before the minute window, so an exhausted daily quota
//! reports the daily reason even when the minute quota is also exhausted.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use super::record::UsageRecord;

const DEFAULT_DAILY_LIMIT: u32 = 1500;
const DEFAULT_MINUTE_LIMIT: u32 = 15;

const NANOS_PER_SECOND: u64 = 1_000_000_000;
const NANOS_PER_MINUTE: u64 = 60 * NANOS_PER_SECOND;

/// Daily and per-minute ceilings for the primary provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaPolicy {
    #[serde(default = "default_daily_limit")]
    pub daily_limit: u32,
    #[serde(default = "default_minute_limit")]
    pub minute_limit: u32,
}

fn default_daily_limit() -> u32 {
    DEFAULT_DAILY_LIMIT
}

fn default_minute_limit() -> u32 {
    DEFAULT_MINUTE_LIMIT
}

impl Default for QuotaPolicy {
    fn default() -> Self {
        Self {
            daily_limit: DEFAULT_DAILY_LIMIT,
            minute_limit: DEFAULT_MINUTE_LIMIT,
        }
    }
}

impl QuotaPolicy {
    pub fn new(daily_limit: u32, minute_limit: u32) -> Self {
        Self {
            daily_limit,
            minute_limit,
        }
    }
}

/// Which window refused admission
///
/// `used` is the recorded count for the window. `in_flight` counts admitted
/// calls that have not completed; they are included in the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "window", rename_all = "snake_case")]
pub enum QuotaDenial {
    DailyLimit {
        used: u32,
        limit: u32,
        #[serde(default, skip_serializing_if = "is_zero")]
        in_flight: u32,
    },
    RateLimit {
        used: u32,
        limit: u32,
        #[serde(default, skip_serializing_if = "is_zero")]
        in_flight: u32,
    },
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

impl QuotaDenial {
    /// Label used for logs and metrics
    pub fn window(&self) -> &'static str {
        match self {
            Self::DailyLimit { .. } => "daily",
            Self::RateLimit { .. } => "minute",
        }
    }
}

impl std::fmt::Display for QuotaDenial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DailyLimit {
                used,
                limit,
                in_flight,
            } => write!(
                f,
                "Daily limit reached ({}). Resets at midnight.",
                usage_label(*used, *limit, *in_flight)
            ),
            Self::RateLimit {
                used,
                limit,
                in_flight,
            } => write!(
                f,
                "Rate limit reached ({}). Wait 1 minute.",
                usage_label(*used, *limit, *in_flight)
            ),
        }
    }
}

fn usage_label(used: u32, limit: u32, in_flight: u32) -> String {
    if in_flight == 0 {
        format!("{}/{}", used, limit)
    } else {
        format!("{}/{}, {} in flight", used, limit, in_flight)
    }
}

/// Outcome of an admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allowed,
    Denied(QuotaDenial),
}

impl Admission {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    pub fn denial(&self) -> Option<QuotaDenial> {
        match self {
            Self::Allowed => None,
            Self::Denied(denial) => Some(*denial),
        }
    }
}

/// Decide whether a primary call is permitted at `now`
pub fn can_proceed(record: &UsageRecord, now: NaiveDateTime, policy: &QuotaPolicy) -> Admission {
    can_proceed_with_pending(record, now, policy, 0)
}

/// Admission check that also counts `pending` calls that were admitted but
/// have not completed yet
pub fn can_proceed_with_pending(
    record: &UsageRecord,
    now: NaiveDateTime,
    policy: &QuotaPolicy,
    pending: u32,
) -> Admission {
    let daily_used = record.daily_count(now);

    if daily_used.saturating_add(pending) >= policy.daily_limit {
        return Admission::Denied(QuotaDenial::DailyLimit {
            used: daily_used,
            limit: policy.daily_limit,
            in_flight: pending,
        });
    }

    let minute_used = record.minute_count(now);

    if minute_used.saturating_add(pending) >= policy.minute_limit {
        return Admission::Denied(QuotaDenial::RateLimit {
            used: minute_used,
            limit: policy.minute_limit,
            in_flight: pending,
        });
    }

    Admission::Allowed
}

/// Seconds a caller should wait before retrying.
///
/// Only a per-minute denial yields a wait; a daily denial would mean waiting
/// until midnight and returns `None`, as does an allowed call.
pub fn compute_wait_seconds(
    record: &UsageRecord,
    now: NaiveDateTime,
    policy: &QuotaPolicy,
) -> Option<u64> {
    wait_hint(&can_proceed(record, now, policy), now)
}

/// Wait hint for an already computed admission
pub fn wait_hint(admission: &Admission, now: NaiveDateTime) -> Option<u64> {
    match admission {
        Admission::Denied(QuotaDenial::RateLimit { .. }) => Some(seconds_until_next_minute(now)),
        _ => None,
    }
}

/// Whole seconds until the next minute boundary, rounded up (1..=60)
pub fn seconds_until_next_minute(now: NaiveDateTime) -> u64 {
    let elapsed = u64::from(now.second()) * NANOS_PER_SECOND
        + u64::from(now.nanosecond()).min(NANOS_PER_SECOND - 1);
    let remaining = NANOS_PER_MINUTE.saturating_sub(elapsed);

    remaining.div_ceil(NANOS_PER_SECOND).max(1)
}
