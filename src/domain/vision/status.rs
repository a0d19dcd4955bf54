//! Structured classification of provider HTTP responses
//!
//! Quota and rate-limit rejections are recognised from the status code and
//! the structured error body, never from free-text messages.

use serde_json::Value;

/// Google RPC status reported when a quota bucket is empty
const RESOURCE_EXHAUSTED: &str = "RESOURCE_EXHAUSTED";

const QUOTA_FAILURE_TYPE: &str = "type.googleapis.com/google.rpc.QuotaFailure";
const RETRY_INFO_TYPE: &str = "type.googleapis.com/google.rpc.RetryInfo";

/// Classified provider response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderStatus {
    Success,
    /// Long-window quota (e.g. per day) exhausted
    QuotaExceeded,
    /// Short-window rate limit hit
    RateLimited,
    BadRequest,
    Unknown,
}

impl ProviderStatus {
    pub fn classify(status: u16, body: &Value) -> Self {
        if (200..300).contains(&status) {
            return Self::Success;
        }

        let exhausted = error_status(body) == Some(RESOURCE_EXHAUSTED);

        if exhausted && has_daily_quota_violation(body) {
            return Self::QuotaExceeded;
        }

        if status == 429 || exhausted {
            return Self::RateLimited;
        }

        if (400..500).contains(&status) {
            return Self::BadRequest;
        }

        Self::Unknown
    }

    /// Whether the response means "stop calling this provider for now"
    pub fn is_quota_signal(&self) -> bool {
        matches!(self, Self::QuotaExceeded | Self::RateLimited)
    }
}

/// `error.status` of a Google-style error body
pub fn error_status(body: &Value) -> Option<&str> {
    body.get("error")?.get("status")?.as_str()
}

/// Human-readable detail from an error body, falling back to the raw body
pub fn error_detail(body: &Value) -> String {
    match body.get("error") {
        Some(Value::String(message)) => message.clone(),
        Some(error) => error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string()),
        None => match body {
            Value::Null => "Unknown error".to_string(),
            Value::String(text) if text.is_empty() => "Unknown error".to_string(),
            Value::String(text) => text.clone(),
            other => other.to_string(),
        },
    }
}

/// Retry delay advertised through a `RetryInfo` detail, in whole seconds
pub fn retry_delay_seconds(body: &Value) -> Option<u64> {
    error_details(body)
        .filter(|detail| detail_type(detail) == Some(RETRY_INFO_TYPE))
        .filter_map(|detail| detail.get("retryDelay")?.as_str())
        .find_map(parse_duration_seconds)
}

fn has_daily_quota_violation(body: &Value) -> bool {
    error_details(body)
        .filter(|detail| detail_type(detail) == Some(QUOTA_FAILURE_TYPE))
        .filter_map(|detail| detail.get("violations")?.as_array())
        .flatten()
        .filter_map(|violation| violation.get("quotaId")?.as_str())
        .any(|quota_id| quota_id.contains("PerDay"))
}

fn error_details(body: &Value) -> impl Iterator<Item = &Value> {
    body.get("error")
        .and_then(|error| error.get("details"))
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

fn detail_type(detail: &Value) -> Option<&str> {
    detail.get("@type")?.as_str()
}

/// Parse a protobuf duration such as `"34s"` or `"1.5s"`, rounding up
fn parse_duration_seconds(raw: &str) -> Option<u64> {
    let seconds: f64 = raw.strip_suffix('s')?.parse().ok()?;

    if seconds.is_sign_negative() || !seconds.is_finite() {
        return None;
    }

    Some(seconds.ceil() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn exhausted_body(quota_id: &str) -> Value {
        json!({
            "error": {
                "code": 429,
                "message": "You exceeded your current quota",
                "status": "RESOURCE_EXHAUSTED",
                "details": [
                    {
                        "@type": "type.googleapis.com/google.rpc.QuotaFailure",
                        "violations": [{ "quotaId": quota_id }]
                    },
                    {
                        "@type": "type.googleapis.com/google.rpc.RetryInfo",
                        "retryDelay": "34s"
                    }
                ]
            }
        })
    }

    #[test]
    fn test_success() {
        assert_eq!(ProviderStatus::classify(200, &json!({})), ProviderStatus::Success);
    }

    #[test]
    fn test_daily_quota_exceeded() {
        let body = exhausted_body("GenerateRequestsPerDayPerProjectPerModel-FreeTier");
        let status = ProviderStatus::classify(429, &body);

        assert_eq!(status, ProviderStatus::QuotaExceeded);
        assert!(status.is_quota_signal());
    }

    #[test]
    fn test_per_minute_exhaustion_is_rate_limit() {
        let body = exhausted_body("GenerateRequestsPerMinutePerProjectPerModel-FreeTier");
        assert_eq!(ProviderStatus::classify(429, &body), ProviderStatus::RateLimited);
    }

    #[test]
    fn test_bare_429_is_rate_limit() {
        assert_eq!(
            ProviderStatus::classify(429, &Value::Null),
            ProviderStatus::RateLimited
        );
    }

    #[test]
    fn test_message_text_alone_is_not_a_quota_signal() {
        let body = json!({ "error": { "message": "Usage limit reached", "status": "INVALID_ARGUMENT" } });

        assert_eq!(ProviderStatus::classify(400, &body), ProviderStatus::BadRequest);
    }

    #[test]
    fn test_server_error_is_unknown() {
        let status = ProviderStatus::classify(500, &json!({}));

        assert_eq!(status, ProviderStatus::Unknown);
        assert!(!status.is_quota_signal());
    }

    #[test]
    fn test_retry_delay() {
        let body = exhausted_body("GenerateRequestsPerMinutePerProjectPerModel-FreeTier");
        assert_eq!(retry_delay_seconds(&body), Some(34));
        assert_eq!(parse_duration_seconds("1.2s"), Some(2));
        assert_eq!(parse_duration_seconds("soon"), None);
    }

    #[test]
    fn test_error_detail() {
        assert_eq!(
            error_detail(&json!({ "error": { "message": "Bad image" } })),
            "Bad image"
        );
        assert_eq!(error_detail(&json!({ "error": "Model is loading" })), "Model is loading");
        assert_eq!(error_detail(&Value::Null), "Unknown error");
        assert_eq!(error_detail(&json!("gateway timeout")), "gateway timeout");
    }
}
