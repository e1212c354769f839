//! HTTP utilities for GCP REST API calls

use reqwest::{Client, StatusCode};
use serde_json::Value;

/// Maximum length of response body to keep in error messages
const MAX_ERROR_BODY_LENGTH: usize = 200;

/// Classification of a failed provider call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 401/403 - missing or insufficient credentials
    Auth,
    /// 404 - project, region, or collection does not exist
    NotFound,
    /// 429 - quota or rate limit
    RateLimited,
    /// Connection, TLS, or body-read failure before a status was obtained
    Transport,
    /// Anything else (4xx/5xx we do not special-case, malformed JSON)
    Unknown,
}

impl ApiErrorKind {
    fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            401 | 403 => ApiErrorKind::Auth,
            404 => ApiErrorKind::NotFound,
            429 => ApiErrorKind::RateLimited,
            _ => ApiErrorKind::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ApiErrorKind::Auth => "auth",
            ApiErrorKind::NotFound => "not-found",
            ApiErrorKind::RateLimited => "rate-limited",
            ApiErrorKind::Transport => "transport",
            ApiErrorKind::Unknown => "unknown",
        }
    }
}

/// Error from a single GCP API call, carrying a structured kind so callers
/// can decide skip-vs-abort without parsing message strings.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message} [{}]", .kind.as_str())]
pub struct ApiError {
    pub kind: ApiErrorKind,
    /// HTTP status of the failed response, absent for transport failures.
    /// Callers branching on a specific answer (e.g. 409 on create) match on
    /// this, never on the message text.
    pub status: Option<u16>,
    pub message: String,
}

impl ApiError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Transport,
            status: None,
            message: message.into(),
        }
    }

    fn from_response(status: StatusCode, body: &str) -> Self {
        Self {
            kind: ApiErrorKind::from_status(status),
            status: Some(status.as_u16()),
            message: format!("API request failed: {} - {}", status, sanitize_body(body)),
        }
    }
}

/// Truncate long error bodies and strip non-printable characters before they
/// end up in logs.
fn sanitize_body(body: &str) -> String {
    let truncated = if body.len() > MAX_ERROR_BODY_LENGTH {
        // Back up to a char boundary; byte-slicing mid-character panics
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!(
            "{}... [truncated, {} bytes total]",
            &body[..end],
            body.len()
        )
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// HTTP client wrapper for GCP API calls
#[derive(Clone)]
pub struct GcpHttpClient {
    client: Client,
}

impl GcpHttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(concat!("netcensus/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Make a GET request to a GCP API
    pub async fn get(&self, url: &str, token: &str) -> Result<Value, ApiError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ApiError::transport(format!("Failed to send request: {e}")))?;

        Self::read_json(response).await
    }

    /// Make a POST request with a JSON body
    pub async fn post(&self, url: &str, token: &str, body: Option<&Value>) -> Result<Value, ApiError> {
        tracing::debug!("POST {}", url);

        let mut request = self.client.post(url).bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::transport(format!("Failed to send request: {e}")))?;

        Self::read_json(response).await
    }

    /// Make a POST request with a raw text body and explicit content type.
    /// Used for Cloud Storage media uploads.
    pub async fn post_text(
        &self,
        url: &str,
        token: &str,
        content_type: &str,
        body: String,
    ) -> Result<Value, ApiError> {
        tracing::debug!("POST {} ({})", url, content_type);

        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| ApiError::transport(format!("Failed to send request: {e}")))?;

        Self::read_json(response).await
    }

    /// Make a DELETE request to a GCP API
    pub async fn delete(&self, url: &str, token: &str) -> Result<Value, ApiError> {
        tracing::debug!("DELETE {}", url);

        let response = self
            .client
            .delete(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ApiError::transport(format!("Failed to send request: {e}")))?;

        Self::read_json(response).await
    }

    async fn read_json(response: reqwest::Response) -> Result<Value, ApiError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::transport(format!("Failed to read response body: {e}")))?;

        if !status.is_success() {
            let err = ApiError::from_response(status, &body);
            tracing::debug!("API error: {}", err);
            return Err(err);
        }

        if body.is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(|e| ApiError {
            kind: ApiErrorKind::Unknown,
            status: Some(status.as_u16()),
            message: format!("Failed to parse response JSON: {e}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        assert_eq!(ApiErrorKind::from_status(StatusCode::UNAUTHORIZED), ApiErrorKind::Auth);
        assert_eq!(ApiErrorKind::from_status(StatusCode::FORBIDDEN), ApiErrorKind::Auth);
        assert_eq!(ApiErrorKind::from_status(StatusCode::NOT_FOUND), ApiErrorKind::NotFound);
        assert_eq!(
            ApiErrorKind::from_status(StatusCode::TOO_MANY_REQUESTS),
            ApiErrorKind::RateLimited
        );
        assert_eq!(
            ApiErrorKind::from_status(StatusCode::INTERNAL_SERVER_ERROR),
            ApiErrorKind::Unknown
        );
    }

    #[test]
    fn sanitize_truncates_long_bodies() {
        let body = "x".repeat(500);
        let sanitized = sanitize_body(&body);
        assert!(sanitized.contains("truncated, 500 bytes total"));
        assert!(sanitized.len() < body.len());
    }

    #[test]
    fn sanitize_truncates_multibyte_bodies_on_char_boundary() {
        // 100 euro signs = 300 bytes; byte 200 falls inside a character
        let body = "\u{20ac}".repeat(100);
        let sanitized = sanitize_body(&body);
        assert!(sanitized.contains("truncated, 300 bytes total"));
    }

    #[test]
    fn sanitize_strips_control_characters() {
        assert_eq!(sanitize_body("bad\x07body\n"), "badbody");
    }

    #[test]
    fn error_display_includes_kind() {
        let err = ApiError {
            kind: ApiErrorKind::RateLimited,
            status: Some(429),
            message: "API request failed: 429".to_string(),
        };
        assert_eq!(err.to_string(), "API request failed: 429 [rate-limited]");
    }

    #[test]
    fn response_errors_carry_status_but_transport_does_not() {
        let err = ApiError::from_response(StatusCode::CONFLICT, "descriptor exists");
        assert_eq!(err.status, Some(409));
        assert!(ApiError::transport("connection refused").status.is_none());
    }
}
