//! FishCast API
//!
//! Fishing spot image analysis backed by a quota-limited primary vision
//! provider with automatic fallback to a secondary provider, plus a catch log
//! and a solunar fishing forecast.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::{Clock, SystemClock};
use infrastructure::{
    catch::FileCatchRepository,
    forecast::SolunarForecastService,
    usage::{FileUsageStore, UsageLedger},
    vision::{ProviderRouter, VisionProviderFactory},
};
use tracing::info;

/// Create the application state from the default configuration
pub fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default())
}

/// Create the application state with custom configuration
pub fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    info!(path = %config.storage.usage_file.display(), "Loading usage ledger");
    let usage_store = Arc::new(FileUsageStore::new(config.storage.usage_file.clone()));
    let ledger = Arc::new(UsageLedger::load(usage_store, config.quota, clock.clone()));

    let primary = VisionProviderFactory::create_primary(&config.providers)?;
    let secondary = VisionProviderFactory::create_secondary(&config.providers)?;
    let router = Arc::new(ProviderRouter::new(primary, secondary, ledger));

    info!(path = %config.storage.catches_file.display(), "Opening catch log");
    let catches = Arc::new(FileCatchRepository::open(config.storage.catches_file.clone())?);

    let forecast = Arc::new(SolunarForecastService::new(clock));

    Ok(AppState::new(
        router,
        catches,
        forecast,
        config.upload.max_bytes,
    ))
}
