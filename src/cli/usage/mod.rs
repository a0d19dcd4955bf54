//! Usage command - prints the persisted usage snapshot

use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::Args;
use serde::Serialize;
use tracing::warn;

use crate::config::AppConfig;
use crate::domain::clock::{Clock, SystemClock};
use crate::domain::usage::{
    can_proceed, compute_wait_seconds, QuotaPolicy, UsageRecord, UsageStats, UsageStore,
};
use crate::infrastructure::logging;
use crate::infrastructure::usage::FileUsageStore;

#[derive(Args, Debug, Default)]
pub struct UsageArgs {
    /// Usage file to read instead of the configured one
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct UsageReport {
    pub file: PathBuf,
    pub usage: UsageStats,
    pub can_proceed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_seconds: Option<u64>,
}

pub async fn run(args: UsageArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let (config, load_error) = AppConfig::load_or_default();
    logging::init_stderr_logging(&config.logging);

    if let Some(e) = load_error {
        warn!(error = %e, "Failed to load configuration, using defaults");
    }

    let path = args.file.unwrap_or(config.storage.usage_file);

    let store = FileUsageStore::new(path.clone());
    let record = load_record(&store);

    let report = build_report(path, record, SystemClock.now(), &config.quota);
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

/// Stored record, or `None` when it is missing or unreadable
fn load_record(store: &dyn UsageStore) -> Option<UsageRecord> {
    store.load().unwrap_or_else(|e| {
        warn!(error = %e, "Usage record unreadable, reporting empty usage");
        None
    })
}

fn build_report(
    file: PathBuf,
    record: Option<UsageRecord>,
    now: NaiveDateTime,
    policy: &QuotaPolicy,
) -> UsageReport {
    let record = record.unwrap_or_else(|| UsageRecord::new(now));
    let admission = can_proceed(&record, now, policy);

    UsageReport {
        file,
        usage: UsageStats::from_record(&record, now, policy),
        can_proceed: admission.is_allowed(),
        reason: admission.denial().map(|denial| denial.to_string()),
        retry_after_seconds: compute_wait_seconds(&record, now, policy),
    }
}
