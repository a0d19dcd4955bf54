//! Observability infrastructure - Prometheus metrics

mod config;
mod metrics;

pub use config::MetricsConfig;
pub use metrics::{
    create_metrics_router, init_metrics, record_admission_denied, record_daily_usage,
    record_fallback, record_http_request, record_provider_call, PrometheusMetrics,
};
