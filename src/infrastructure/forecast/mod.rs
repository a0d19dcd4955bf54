//! Forecast service implementations

mod solunar;

pub use solunar::SolunarForecastService;
