//! Shared HTTP client and auth utilities.

use std::sync::OnceLock;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::error::ChatError;

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to build HTTP client")
    })
}

/// Build default headers for a Bearer-token API.
pub fn bearer_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(val) = HeaderValue::from_str(&format!("Bearer {api_key}")) {
        headers.insert(AUTHORIZATION, val);
    }
    headers
}

/// Map a non-200 HTTP status to an error.
pub fn status_to_error(status: u16, body: &str) -> ChatError {
    match status {
        401 | 403 => ChatError::Authentication(body.to_string()),
        429 => ChatError::RateLimited {
            retry_after_ms: extract_retry_after(body),
        },
        _ => ChatError::api(status, body),
    }
}

fn extract_retry_after(body: &str) -> Option<u64> {
    // Groq reports retry_after in seconds inside the JSON error body
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("retry_after"))
                .and_then(|r| r.as_f64())
                .map(|s| (s * 1000.0) as u64)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_statuses_map_to_authentication() {
        assert!(matches!(
            status_to_error(401, "bad key"),
            ChatError::Authentication(_)
        ));
        assert!(matches!(
            status_to_error(403, "forbidden"),
            ChatError::Authentication(_)
        ));
    }

    #[test]
    fn rate_limit_parses_retry_after() {
        let body = r#"{"error":{"message":"rate limit","retry_after":2.5}}"#;
        match status_to_error(429, body) {
            ChatError::RateLimited { retry_after_ms } => {
                assert_eq!(retry_after_ms, Some(2500));
            }
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[test]
    fn rate_limit_without_hint_has_no_delay() {
        match status_to_error(429, "too many requests") {
            ChatError::RateLimited { retry_after_ms } => assert_eq!(retry_after_ms, None),
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[test]
    fn other_statuses_map_to_api_error() {
        assert!(matches!(
            status_to_error(500, "boom"),
            ChatError::Api { status: 500, .. }
        ));
    }

    #[test]
    fn bearer_headers_carry_token_and_content_type() {
        let headers = bearer_headers("gsk_test");
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[AUTHORIZATION], "Bearer gsk_test");
    }
}
