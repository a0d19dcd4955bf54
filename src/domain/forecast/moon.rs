//! Lunar phase arithmetic for solunar fishing forecasts

use std::f64::consts::PI;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Mean length of a lunar cycle in days
pub const SYNODIC_MONTH_DAYS: f64 = 29.530_588_853;

/// Phase boundaries as a fraction of the synodic month
const PHASE_BOUNDARIES: [(f64, MoonPhase); 8] = [
    (1.0 / 16.0, MoonPhase::NewMoon),
    (3.0 / 16.0, MoonPhase::WaxingCrescent),
    (5.0 / 16.0, MoonPhase::FirstQuarter),
    (7.0 / 16.0, MoonPhase::WaxingGibbous),
    (9.0 / 16.0, MoonPhase::FullMoon),
    (11.0 / 16.0, MoonPhase::WaningGibbous),
    (13.0 / 16.0, MoonPhase::LastQuarter),
    (15.0 / 16.0, MoonPhase::WaningCrescent),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoonPhase {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhase {
    /// Solunar activity score for the phase; strongest around new and full moon
    pub fn activity_rating(&self) -> u8 {
        match self {
            Self::NewMoon | Self::FullMoon => 9,
            Self::WaxingGibbous | Self::WaningGibbous => 7,
            Self::WaxingCrescent | Self::WaningCrescent => 6,
            Self::FirstQuarter | Self::LastQuarter => 5,
        }
    }
}

impl std::fmt::Display for MoonPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::NewMoon => "New moon",
            Self::WaxingCrescent => "Waxing crescent",
            Self::FirstQuarter => "First quarter",
            Self::WaxingGibbous => "Waxing gibbous",
            Self::FullMoon => "Full moon",
            Self::WaningGibbous => "Waning gibbous",
            Self::LastQuarter => "Last quarter",
            Self::WaningCrescent => "Waning crescent",
        };
        write!(f, "{}", name)
    }
}

/// Reference new moon: 2000-01-06 18:14 UTC
fn reference_new_moon() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2000, 1, 6)
        .and_then(|d| d.and_hms_opt(18, 14, 0))
        .unwrap_or_default()
}

/// Days since the most recent new moon (0 ≤ age < synodic month)
pub fn moon_age_days(at: NaiveDateTime) -> f64 {
    let elapsed = (at - reference_new_moon()).num_seconds() as f64 / 86_400.0;
    elapsed.rem_euclid(SYNODIC_MONTH_DAYS)
}

pub fn moon_phase(at: NaiveDateTime) -> MoonPhase {
    let fraction = moon_age_days(at) / SYNODIC_MONTH_DAYS;

    PHASE_BOUNDARIES
        .iter()
        .find(|(upper, _)| fraction < *upper)
        .map(|(_, phase)| *phase)
        .unwrap_or(MoonPhase::NewMoon)
}

/// Illuminated fraction in percent
pub fn moon_illumination(at: NaiveDateTime) -> f64 {
    let angle = 2.0 * PI * moon_age_days(at) / SYNODIC_MONTH_DAYS;
    (1.0 - angle.cos()) / 2.0 * 100.0
}

/// Approximate hour of the moon's upper transit.
///
/// The moon crosses the meridian around noon at new moon and drifts later by
/// roughly 50 minutes a day.
pub fn moon_transit_hour(at: NaiveDateTime) -> f64 {
    (12.0 + 24.0 * moon_age_days(at) / SYNODIC_MONTH_DAYS).rem_euclid(24.0)
}
