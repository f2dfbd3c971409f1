//! HTTP utilities for Runscope REST API calls

use super::error::{Result, RunscopeError};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("rscope/", env!("CARGO_PKG_VERSION"));

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
pub fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Raw response: status plus the body text, not yet checked or decoded
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: String,
}

/// HTTP client wrapper for Runscope API calls
#[derive(Debug, Clone)]
pub struct RunscopeHttpClient {
    client: Client,
}

impl RunscopeHttpClient {
    /// Create a new HTTP client with the default timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }

    /// Wrap an already configured reqwest client (custom proxies, TLS roots...)
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    pub async fn get(&self, url: &str, token: &str) -> Result<HttpResponse> {
        tracing::debug!("GET {}", url);
        self.send(self.client.get(url).bearer_auth(token)).await
    }

    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        token: &str,
        body: &T,
    ) -> Result<HttpResponse> {
        tracing::debug!("POST {}", url);
        let request = self.client.post(url).bearer_auth(token);
        self.send(with_json_body(request, body)?).await
    }

    /// POST an `application/x-www-form-urlencoded` body
    pub async fn post_form<T: Serialize + ?Sized>(
        &self,
        url: &str,
        token: &str,
        form: &T,
    ) -> Result<HttpResponse> {
        tracing::debug!("POST {} (form)", url);
        self.send(self.client.post(url).bearer_auth(token).form(form))
            .await
    }

    pub async fn put_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        token: &str,
        body: &T,
    ) -> Result<HttpResponse> {
        tracing::debug!("PUT {}", url);
        let request = self.client.put(url).bearer_auth(token);
        self.send(with_json_body(request, body)?).await
    }

    pub async fn delete(&self, url: &str, token: &str) -> Result<HttpResponse> {
        tracing::debug!("DELETE {}", url);
        self.send(self.client.delete(url).bearer_auth(token)).await
    }

    async fn send(&self, request: RequestBuilder) -> Result<HttpResponse> {
        let response = request.header(ACCEPT, "application/json").send().await?;

        let status = response.status();
        let body = response.text().await?;

        Ok(HttpResponse { status, body })
    }
}

/// Encode the body up front so encoding failures surface as `Encode`
/// rather than as an opaque builder error at send time
fn with_json_body<T: Serialize + ?Sized>(
    request: RequestBuilder,
    body: &T,
) -> Result<RequestBuilder> {
    let bytes = serde_json::to_vec(body).map_err(RunscopeError::Encode)?;
    Ok(request.header(CONTENT_TYPE, "application/json").body(bytes))
}

/// Turn a non-2xx/3xx response into an `Api` error, passing successful bodies through
pub fn ensure_success(
    response: HttpResponse,
    action: &'static str,
    resource_type: &str,
    resource_name: &str,
) -> Result<String> {
    if response.status.as_u16() < 300 {
        return Ok(response.body);
    }

    // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
    tracing::error!(
        "API error: {} {} {} - {}",
        response.status,
        action,
        resource_type,
        sanitize_for_log(&response.body)
    );

    Err(RunscopeError::Api {
        action,
        resource_type: resource_type.to_string(),
        resource_name: resource_name.to_string(),
        status: response.status.as_u16(),
        message: error_message(response.status, &response.body),
    })
}

/// Pull the human readable message out of an error envelope
///
/// The API reports failures as `{"error": {"status": 404, "message": "..."}}`,
/// older endpoints use `{"error": "..."}`. Anything else falls back to the
/// sanitized body, then to the canonical status reason.
pub fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        let error = value.get("error");
        let message = error
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
            .or_else(|| error.and_then(Value::as_str));
        if let Some(message) = message {
            return message.to_string();
        }
    }

    if !body.trim().is_empty() {
        return sanitize_for_log(body.trim());
    }

    status
        .canonical_reason()
        .unwrap_or("unknown status")
        .to_string()
}

/// Format a Runscope API error for display
/// Security: Sanitizes error messages to avoid leaking sensitive API details
pub fn format_api_error(error: &RunscopeError) -> String {
    match error.status() {
        Some(401) => return "Authentication failed. Check your Runscope access token.".to_string(),
        Some(403) => return "Permission denied. The token lacks access to this resource.".to_string(),
        Some(404) => return "Resource not found.".to_string(),
        Some(409) => return "Resource conflict. The resource may already exist.".to_string(),
        Some(429) => return "Rate limit exceeded. Please try again later.".to_string(),
        Some(400) | Some(422) => return "Invalid request. Check your parameters.".to_string(),
        Some(status) if status >= 500 => {
            return "Runscope service temporarily unavailable. Please try again.".to_string()
        }
        _ => {}
    }

    if let RunscopeError::Transport(_) = error {
        return "Request failed. Check your network connection and try again.".to_string();
    }

    let error_str = error.to_string();
    let sanitized = error_str
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .take(80)
        .collect::<String>();

    if sanitized.len() < error_str.len() {
        format!("{}...", sanitized)
    } else {
        sanitized
    }
}
