use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::middleware::{logging_middleware, metrics_middleware};
use super::state::AppState;
use super::{analyze, catches, forecast, health, index, usage};
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Room for multipart boundaries and headers on top of the image itself
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        .route("/", get(index::index))
        .route("/health", get(health::health_check))
        .route("/analyze-smart", post(analyze::analyze_smart))
        .route("/analyze-gemini", post(analyze::analyze_primary))
        .route("/analyze-hf", post(analyze::analyze_secondary))
        .route("/usage-stats", get(usage::usage_stats))
        .route(
            "/catches",
            get(catches::list_catches).post(catches::log_catch),
        )
        .route("/forecast", post(forecast::forecast))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Application router plus the Prometheus endpoint when metrics are enabled
pub fn create_router_with_metrics(
    state: AppState,
    metrics: Option<PrometheusMetrics>,
    metrics_path: &str,
) -> Router {
    let router = create_router(state);

    match metrics {
        Some(metrics) => router.merge(create_metrics_router(metrics, metrics_path)),
        None => router,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::domain::clock::mock::FixedClock;
    use crate::domain::usage::QuotaPolicy;
    use crate::domain::vision::mock::MockVisionProvider;
    use crate::domain::vision::VisionError;
    use crate::infrastructure::catch::InMemoryCatchRepository;
    use crate::infrastructure::forecast::SolunarForecastService;
    use crate::infrastructure::usage::{InMemoryUsageStore, UsageLedger};
    use crate::infrastructure::vision::ProviderRouter;

    const BOUNDARY: &str = "fishcast-test-boundary";

    struct TestApp {
        app: Router,
        primary: Arc<MockVisionProvider>,
        secondary: Arc<MockVisionProvider>,
        ledger: Arc<UsageLedger>,
    }

    fn test_app(
        primary: MockVisionProvider,
        secondary: MockVisionProvider,
        policy: QuotaPolicy,
    ) -> TestApp {
        let clock = Arc::new(FixedClock::at(2024, 6, 1, 7, 15, 0));
        let ledger = Arc::new(UsageLedger::load(
            Arc::new(InMemoryUsageStore::new()),
            policy,
            clock.clone(),
        ));
        let primary = Arc::new(primary);
        let secondary = Arc::new(secondary);
        let router = Arc::new(ProviderRouter::new(
            primary.clone(),
            secondary.clone(),
            ledger.clone(),
        ));

        let state = AppState::new(
            router,
            Arc::new(InMemoryCatchRepository::new()),
            Arc::new(SolunarForecastService::new(clock)),
            1024,
        );

        TestApp {
            app: create_router(state),
            primary,
            secondary,
            ledger,
        }
    }

    fn default_app() -> TestApp {
        test_app(
            MockVisionProvider::new("Google Gemini").with_response("Cast along the drop-off"),
            MockVisionProvider::new("Hugging Face").with_response("Caption advice"),
            QuotaPolicy::default(),
        )
    }

    fn upload(uri: &str, content_type: &str, bytes: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"spot.jpg\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let t = default_app();

        let response = t.app.oneshot(get("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["service"], "FishCast API");
    }

    #[tokio::test]
    async fn test_smart_success_increments_usage() {
        let t = default_app();

        let response = t
            .app
            .clone()
            .oneshot(upload("/analyze-smart", "image/jpeg", b"\xff\xd8\xff"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["provider"], "Google Gemini");
        assert_eq!(json["filename"], "spot.jpg");
        assert_eq!(json["recommendation"], "Cast along the drop-off");
        assert_eq!(json["usage"]["daily"]["used"], 1);

        let stats = body_json(t.app.oneshot(get("/usage-stats")).await.unwrap()).await;
        assert_eq!(stats["success"], true);
        assert_eq!(stats["usage"]["daily"]["used"], 1);
        assert_eq!(stats["usage"]["minute"]["used"], 1);
        assert_eq!(stats["usage"]["daily"]["limit"], 1500);
    }

    #[tokio::test]
    async fn test_non_image_rejected_before_providers() {
        let t = default_app();

        let response = t
            .app
            .oneshot(upload("/analyze-smart", "text/plain", b"hello"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "File must be an image");
        assert_eq!(t.primary.call_count(), 0);
        assert_eq!(t.secondary.call_count(), 0);
    }

    #[tokio::test]
    async fn test_oversized_image_rejected() {
        let t = default_app();

        let response = t
            .app
            .oneshot(upload("/analyze-hf", "image/png", &[0u8; 2048]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(t.secondary.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_file_field() {
        let t = default_app();
        let body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nhello\r\n--{BOUNDARY}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .uri("/analyze-gemini")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = t.app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "No image file provided");
    }

    #[tokio::test]
    async fn test_smart_quota_signal_falls_back_without_recording() {
        let t = test_app(
            MockVisionProvider::new("Google Gemini").with_error(VisionError::quota_exhausted(
                "Google Gemini",
                "Resource has been exhausted",
                None,
            )),
            MockVisionProvider::new("Hugging Face").with_response("Caption advice"),
            QuotaPolicy::default(),
        );

        let response = t
            .app
            .oneshot(upload("/analyze-smart", "image/jpeg", b"img"))
            .await
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["provider"], "Hugging Face (Fallback)");
        assert!(json["notice"].is_string());
        assert_eq!(t.ledger.snapshot().await.daily.used, 0);
    }

    #[tokio::test]
    async fn test_primary_route_at_daily_limit() {
        let t = test_app(
            MockVisionProvider::new("Google Gemini").with_response("unused"),
            MockVisionProvider::new("Hugging Face").with_response("unused"),
            QuotaPolicy::new(1, 15),
        );
        t.ledger.record_success().await;

        let response = t
            .app
            .oneshot(upload("/analyze-gemini", "image/jpeg", b"img"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["provider"], "Google Gemini");
        assert_eq!(json["error"], "quota_exhausted");
        assert_eq!(
            json["recommendation"],
            "Usage limit reached: Daily limit reached (1/1). Resets at midnight."
        );
        assert_eq!(t.primary.call_count(), 0);
    }

    #[tokio::test]
    async fn test_secondary_failure_reports_success_false() {
        let t = test_app(
            MockVisionProvider::new("Google Gemini").with_response("unused"),
            MockVisionProvider::new("Hugging Face").with_error(VisionError::unavailable(
                "Hugging Face",
                503,
                "Model is loading",
                Some(20),
            )),
            QuotaPolicy::default(),
        );

        let response = t
            .app
            .oneshot(upload("/analyze-hf", "image/webp", b"img"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["provider"], "Hugging Face");
        assert_eq!(json["retry_after_seconds"], 20);
    }

    #[tokio::test]
    async fn test_log_and_list_catches() {
        let t = default_app();
        let catch = serde_json::json!({
            "species": "Largemouth Bass",
            "bait": "Texas rig",
            "location": "North cove",
            "date": "2024-06-01",
            "time": "06:10"
        });

        let response = t
            .app
            .clone()
            .oneshot(json_request("POST", "/catches", catch))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Catch logged successfully! Total catches: 1");

        let list = body_json(t.app.oneshot(get("/catches")).await.unwrap()).await;
        assert_eq!(list.as_array().unwrap().len(), 1);
        assert_eq!(list[0]["species"], "Largemouth Bass");
        assert_eq!(list[0]["id"], 1);
    }

    #[tokio::test]
    async fn test_invalid_catch_rejected() {
        let t = default_app();
        let catch = serde_json::json!({
            "species": "",
            "bait": "Worm",
            "location": "Dock",
            "date": "2024-06-01",
            "time": "06:10"
        });

        let response = t
            .app
            .oneshot(json_request("POST", "/catches", catch))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["param"], "species");
    }

    #[tokio::test]
    async fn test_forecast() {
        let t = default_app();

        let response = t
            .app
            .oneshot(json_request(
                "POST",
                "/forecast",
                serde_json::json!({"location": "Lake Tahoe", "latitude": 39.1}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["location"], "Lake Tahoe");
        assert_eq!(json["date"], "2024-06-01");
        assert!(json["best_times"].as_array().is_some());
    }

    #[tokio::test]
    async fn test_forecast_invalid_coordinates() {
        let t = default_app();

        let response = t
            .app
            .oneshot(json_request(
                "POST",
                "/forecast",
                serde_json::json!({"location": "Nowhere", "longitude": 500.0}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_index_page() {
        let t = default_app();

        let response = t.app.oneshot(get("/")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("FishCast API"));
        assert!(html.contains("0/1500"));
    }

    #[tokio::test]
    async fn test_request_id_echoed() {
        let t = default_app();
        let request = Request::builder()
            .uri("/health")
            .header("x-request-id", "abc-123")
            .body(Body::empty())
            .unwrap();

        let response = t.app.oneshot(request).await.unwrap();

        assert_eq!(response.headers()["x-request-id"], "abc-123");
    }
}
