use axum::extract::State;
use axum::response::Html;

use super::health::SERVICE_NAME;
use super::state::AppState;

const ENDPOINTS: [(&str, &str, &str); 8] = [
    ("POST", "/analyze-smart", "Analyze a fishing spot image, falling back when quota is exhausted"),
    ("POST", "/analyze-gemini", "Analyze with the primary provider only"),
    ("POST", "/analyze-hf", "Analyze with the secondary provider only"),
    ("GET", "/usage-stats", "Primary provider usage for today and this minute"),
    ("POST", "/catches", "Log a catch"),
    ("GET", "/catches", "List logged catches"),
    ("POST", "/forecast", "Solunar fishing forecast for a location"),
    ("GET", "/health", "Service health"),
];

/// `GET /`: landing page with the endpoint list and today's usage
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let usage = state.ledger().snapshot().await;

    let rows: String = ENDPOINTS
        .iter()
        .map(|(method, path, description)| {
            format!("<li><code>{} {}</code> {}</li>", method, path, description)
        })
        .collect();

    Html(format!(
        "<!DOCTYPE html>
<html>
<head><title>{name}</title></head>
<body>
<h1>{name}</h1>
<p>AI fishing spot analysis. Today's {primary} usage: {used}/{limit} ({percentage:.1}%).</p>
<ul>{rows}</ul>
</body>
</html>",
        name = SERVICE_NAME,
        primary = state.router.primary_name(),
        used = usage.daily.used,
        limit = usage.daily.limit,
        percentage = usage.daily.percentage,
        rows = rows,
    ))
}
