//! Offline solunar forecast
//!
//! Ratings and feeding windows are derived from the moon's phase and
//! approximate transit time for the current local date. No network lookups.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::clock::Clock;
use crate::domain::forecast::{
    moon_illumination, moon_phase, moon_transit_hour, validate_forecast_request, FeedingWindow,
    Forecast, ForecastRequest, ForecastService,
};
use crate::domain::DomainError;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Fixed low-light feeding periods, in minutes after midnight
const DAWN_WINDOW: (i64, i64) = (5 * 60 + 30, 8 * 60);
const DUSK_WINDOW: (i64, i64) = (18 * 60, 20 * 60 + 30);

/// Half-width of a major period centred on the moon's transit
const MAJOR_HALF_WIDTH: i64 = 60;

const MAX_RATING: u8 = 10;

#[derive(Debug)]
pub struct SolunarForecastService {
    clock: Arc<dyn Clock>,
}

impl SolunarForecastService {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

#[async_trait]
impl ForecastService for SolunarForecastService {
    async fn forecast(&self, request: &ForecastRequest) -> Result<Forecast, DomainError> {
        validate_forecast_request(request).map_err(|e| DomainError::validation(e.to_string()))?;

        let now = self.clock.now();
        let phase = moon_phase(now);
        let illumination = moon_illumination(now);

        let overhead = (moon_transit_hour(now) * 60.0).round() as i64;
        let underfoot = overhead + MINUTES_PER_DAY / 2;

        let majors = [
            ("Major: moon overhead", overhead),
            ("Major: moon underfoot", underfoot),
        ];

        let mut rating = phase.activity_rating();
        if majors
            .iter()
            .any(|(_, centre)| overlaps_low_light(*centre))
        {
            rating = (rating + 1).min(MAX_RATING);
        }

        let mut windows: Vec<(i64, FeedingWindow)> = majors
            .iter()
            .map(|(label, centre)| {
                let start = centre - MAJOR_HALF_WIDTH;
                (
                    start.rem_euclid(MINUTES_PER_DAY),
                    window(label, start, centre + MAJOR_HALF_WIDTH),
                )
            })
            .collect();
        windows.push((DAWN_WINDOW.0, window("Dawn feeding", DAWN_WINDOW.0, DAWN_WINDOW.1)));
        windows.push((DUSK_WINDOW.0, window("Dusk feeding", DUSK_WINDOW.0, DUSK_WINDOW.1)));
        windows.sort_by_key(|(start, _)| *start);

        let best_times: Vec<FeedingWindow> = windows.into_iter().map(|(_, w)| w).collect();

        let summary = format!(
            "{} ({:.0}% illuminated). Outlook for {}: {}. Fish the major periods around {} and {}.",
            phase,
            illumination,
            request.location.trim(),
            outlook(rating),
            format_minutes(overhead),
            format_minutes(underfoot),
        );

        debug!(location = %request.location, %phase, rating, "Forecast computed");

        Ok(Forecast {
            location: request.location.trim().to_string(),
            latitude: request.latitude,
            longitude: request.longitude,
            date: now.date(),
            moon_phase: phase,
            moon_illumination: (illumination * 10.0).round() / 10.0,
            rating,
            best_times,
            summary,
        })
    }
}

fn outlook(rating: u8) -> &'static str {
    match rating {
        8.. => "excellent",
        6..=7 => "good",
        _ => "fair",
    }
}

/// Whether a major period centred at `centre` touches dawn or dusk
fn overlaps_low_light(centre: i64) -> bool {
    let centre = centre.rem_euclid(MINUTES_PER_DAY);
    let (start, end) = (centre - MAJOR_HALF_WIDTH, centre + MAJOR_HALF_WIDTH);

    [DAWN_WINDOW, DUSK_WINDOW]
        .iter()
        .any(|(low, high)| start < *high && end > *low)
}

fn window(label: &str, start: i64, end: i64) -> FeedingWindow {
    FeedingWindow {
        label: label.to_string(),
        start: format_minutes(start),
        end: format_minutes(end),
    }
}

/// `HH:MM` for minutes after midnight, wrapping across days
fn format_minutes(minutes: i64) -> String {
    let minutes = minutes.rem_euclid(MINUTES_PER_DAY);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::mock::FixedClock;
    use crate::domain::forecast::MoonPhase;

    fn request(location: &str) -> ForecastRequest {
        ForecastRequest {
            location: location.to_string(),
            latitude: Some(45.0),
            longitude: Some(-93.0),
        }
    }

    #[test]
    fn test_format_minutes_wraps() {
        assert_eq!(format_minutes(0), "00:00");
        assert_eq!(format_minutes(25 * 60 + 5), "01:05");
        assert_eq!(format_minutes(-30), "23:30");
    }

    #[test]
    fn test_outlook_bands() {
        assert_eq!(outlook(10), "excellent");
        assert_eq!(outlook(8), "excellent");
        assert_eq!(outlook(6), "good");
        assert_eq!(outlook(5), "fair");
    }

    #[tokio::test]
    async fn test_forecast_is_deterministic() {
        let service = SolunarForecastService::new(Arc::new(FixedClock::at(2024, 6, 1, 9, 0, 0)));

        let first = service.forecast(&request("Lake Minnetonka")).await.unwrap();
        let second = service.forecast(&request("Lake Minnetonka")).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.best_times.len(), 4);
        assert!((1..=10).contains(&first.rating));
        assert_eq!(first.latitude, Some(45.0));
    }

    #[tokio::test]
    async fn test_full_moon_rates_high() {
        let service = SolunarForecastService::new(Arc::new(FixedClock::at(2000, 1, 21, 12, 0, 0)));

        let forecast = service.forecast(&request("Bay")).await.unwrap();

        assert_eq!(forecast.moon_phase, MoonPhase::FullMoon);
        assert!(forecast.rating >= 9);
        assert!(forecast.summary.contains("excellent"));
    }

    #[tokio::test]
    async fn test_windows_sorted_by_start() {
        let service = SolunarForecastService::new(Arc::new(FixedClock::at(2024, 3, 10, 12, 0, 0)));

        let forecast = service.forecast(&request("Creek")).await.unwrap();
        let starts: Vec<&str> = forecast.best_times.iter().map(|w| w.start.as_str()).collect();
        let mut sorted = starts.clone();
        sorted.sort();

        assert_eq!(starts, sorted);
    }

    #[tokio::test]
    async fn test_rejects_invalid_request() {
        let service = SolunarForecastService::new(Arc::new(FixedClock::at(2024, 6, 1, 9, 0, 0)));
        let mut invalid = request("Lake");
        invalid.latitude = Some(120.0);

        let result = service.forecast(&invalid).await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }
}
