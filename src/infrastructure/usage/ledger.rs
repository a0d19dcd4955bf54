//! Shared usage ledger
//!
//! Owns the in-memory [`UsageRecord`], persists it after every recorded call
//! and hands out admission permits for primary-provider calls.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::domain::clock::Clock;
use crate::domain::usage::{
    can_proceed, can_proceed_with_pending, wait_hint, Admission, QuotaDenial, QuotaPolicy,
    UsageRecord, UsageStats, UsageStore,
};
use crate::infrastructure::observability::{record_admission_denied, record_daily_usage};

/// Reservation for one admitted primary call.
///
/// While held it counts against both quota windows. Dropping it without
/// [`UsageLedger::commit`] releases the reservation and records nothing.
#[derive(Debug)]
pub struct AdmissionPermit {
    in_flight: Arc<AtomicU32>,
    released: bool,
}

impl AdmissionPermit {
    fn acquire(in_flight: &Arc<AtomicU32>) -> Self {
        in_flight.fetch_add(1, Ordering::AcqRel);

        Self {
            in_flight: Arc::clone(in_flight),
            released: false,
        }
    }

    fn release(&mut self) {
        if !self.released {
            self.in_flight.fetch_sub(1, Ordering::AcqRel);
            self.released = true;
        }
    }
}

impl Drop for AdmissionPermit {
    fn drop(&mut self) {
        self.release();
    }
}

/// Admission refused by the quota policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmissionDenied {
    pub denial: QuotaDenial,
    /// Seconds until the minute window reopens; `None` for daily denials
    pub retry_after_seconds: Option<u64>,
}

impl std::fmt::Display for AdmissionDenied {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.denial)
    }
}

#[derive(Debug)]
pub struct UsageLedger {
    record: Mutex<UsageRecord>,
    store: Arc<dyn UsageStore>,
    policy: QuotaPolicy,
    clock: Arc<dyn Clock>,
    in_flight: Arc<AtomicU32>,
}

impl UsageLedger {
    /// Load the ledger from `store`.
    ///
    /// A missing or unreadable record starts a fresh one; startup never fails
    /// because of usage state.
    pub fn load(store: Arc<dyn UsageStore>, policy: QuotaPolicy, clock: Arc<dyn Clock>) -> Self {
        let now = clock.now();

        let record = match store.load() {
            Ok(Some(record)) => {
                debug!(
                    daily = record.daily_count(now),
                    minute = record.minute_count(now),
                    "Loaded usage record"
                );
                record
            }
            Ok(None) => {
                info!("No usage record found, starting fresh");
                UsageRecord::new(now)
            }
            Err(e) => {
                warn!(error = %e, "Usage record unreadable, starting fresh");
                UsageRecord::new(now)
            }
        };

        record_daily_usage(record.daily_count(now));

        Self {
            record: Mutex::new(record),
            store,
            policy,
            clock,
            in_flight: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn policy(&self) -> &QuotaPolicy {
        &self.policy
    }

    /// Admit one primary call, reserving a slot until the permit is dropped
    /// or committed
    pub async fn admit(&self) -> Result<AdmissionPermit, AdmissionDenied> {
        let record = self.record.lock().await;
        let now = self.clock.now();
        let pending = self.in_flight.load(Ordering::Acquire);

        let admission = can_proceed_with_pending(&record, now, &self.policy, pending);

        match admission {
            Admission::Allowed => Ok(AdmissionPermit::acquire(&self.in_flight)),
            Admission::Denied(denial) => {
                debug!(window = denial.window(), pending, "Primary call denied");
                record_admission_denied(denial.window());

                Err(AdmissionDenied {
                    denial,
                    retry_after_seconds: wait_hint(&admission, now),
                })
            }
        }
    }

    /// Admission decision against recorded usage only, without reserving
    pub async fn check(&self) -> Admission {
        let record = self.record.lock().await;
        can_proceed(&record, self.clock.now(), &self.policy)
    }

    /// Record the admitted call as a success and release its reservation.
    ///
    /// The reservation is released under the record lock, so a concurrent
    /// admission never counts the call both as recorded and as in flight.
    pub async fn commit(&self, mut permit: AdmissionPermit) -> UsageStats {
        let mut record = self.record.lock().await;
        let stats = self.record_locked(&mut record);
        permit.release();
        stats
    }

    /// Record one successful primary call and persist the record.
    ///
    /// A persistence failure is logged; the in-memory count stays updated.
    pub async fn record_success(&self) -> UsageStats {
        let mut record = self.record.lock().await;
        self.record_locked(&mut record)
    }

    fn record_locked(&self, record: &mut UsageRecord) -> UsageStats {
        let now = self.clock.now();

        record.record(now);

        if let Err(e) = self.store.save(record) {
            error!(error = %e, "Failed to persist usage record");
        }

        let stats = UsageStats::from_record(record, now, &self.policy);
        record_daily_usage(stats.daily.used);

        stats
    }

    pub async fn snapshot(&self) -> UsageStats {
        let record = self.record.lock().await;
        UsageStats::from_record(&record, self.clock.now(), &self.policy)
    }

    /// Calls admitted but not yet committed or dropped
    pub fn in_flight(&self) -> u32 {
        self.in_flight.load(Ordering::Acquire)
    }
}
