use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::moon::MoonPhase;

/// Forecast lookup input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub location: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// A period of expected fish activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedingWindow {
    pub label: String,
    /// Local time, `HH:MM`
    pub start: String,
    pub end: String,
}

/// Fishing forecast for one location and day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub date: NaiveDate,
    pub moon_phase: MoonPhase,
    /// Illuminated fraction of the moon, in percent
    pub moon_illumination: f64,
    /// 1 (poor) to 10 (excellent)
    pub rating: u8,
    pub best_times: Vec<FeedingWindow>,
    pub summary: String,
}
