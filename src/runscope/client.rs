//! Runscope Client
//!
//! Main client for the Runscope API. Holds the base URL and credentials and
//! exposes the generic create/read/update/delete helpers every resource
//! module goes through.

use super::auth::AccessToken;
use super::error::{Result, RunscopeError};
use super::http::{ensure_success, RunscopeHttpClient};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// Default Runscope API endpoint
pub const DEFAULT_API_URL: &str = "https://api.runscope.com";

/// `meta` block of the response envelope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// `error` block of the response envelope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Response envelope wrapping every Runscope payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub meta: Option<Meta>,
    #[serde(default)]
    pub error: Option<ErrorBody>,
}

/// Main Runscope client
#[derive(Debug, Clone)]
pub struct RunscopeClient {
    pub http: RunscopeHttpClient,
    api_url: Url,
    token: AccessToken,
}

impl RunscopeClient {
    /// Create a client against `api_url` with a fresh HTTP client
    pub fn new(api_url: &str, token: AccessToken) -> Result<Self> {
        Self::with_http(api_url, token, RunscopeHttpClient::new()?)
    }

    pub fn with_http(api_url: &str, token: AccessToken, http: RunscopeHttpClient) -> Result<Self> {
        let api_url = Url::parse(api_url.trim_end_matches('/'))?;
        if api_url.cannot_be_a_base() {
            return Err(RunscopeError::Config(format!(
                "API URL cannot be used as a base: {api_url}"
            )));
        }

        Ok(Self {
            http,
            api_url,
            token,
        })
    }

    pub fn api_url(&self) -> &str {
        self.api_url.as_str().trim_end_matches('/')
    }

    /// Build the absolute URL for an API path such as `/buckets/abc`
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.api_url(), endpoint)
    }

    // =========================================================================
    // Generic resource helpers
    // =========================================================================

    /// POST `resource` as JSON to `endpoint`
    pub async fn create_resource<T: Serialize + ?Sized>(
        &self,
        resource: &T,
        resource_type: &str,
        resource_name: &str,
        endpoint: &str,
    ) -> Result<ApiResponse> {
        tracing::debug!("request: POST {} {:?}", resource_type, resource_name);
        let response = self
            .http
            .post_json(&self.url(endpoint), self.token.secret(), resource)
            .await?;
        let body = ensure_success(response, "creating", resource_type, resource_name)?;
        parse_envelope(&body, resource_type)
    }

    /// POST `form` url-encoded to `endpoint`
    pub async fn create_form_resource<T: Serialize + ?Sized>(
        &self,
        form: &T,
        resource_type: &str,
        resource_name: &str,
        endpoint: &str,
    ) -> Result<ApiResponse> {
        tracing::debug!("request: POST {} {:?} (form)", resource_type, resource_name);
        let response = self
            .http
            .post_form(&self.url(endpoint), self.token.secret(), form)
            .await?;
        let body = ensure_success(response, "creating", resource_type, resource_name)?;
        parse_envelope(&body, resource_type)
    }

    pub async fn read_resource(
        &self,
        resource_type: &str,
        resource_name: &str,
        endpoint: &str,
    ) -> Result<ApiResponse> {
        tracing::debug!("request: GET {} {:?}", resource_type, resource_name);
        let response = self.http.get(&self.url(endpoint), self.token.secret()).await?;
        let body = ensure_success(response, "reading", resource_type, resource_name)?;
        parse_envelope(&body, resource_type)
    }

    /// PUT `resource` as JSON to `endpoint`
    pub async fn update_resource<T: Serialize + ?Sized>(
        &self,
        resource: &T,
        resource_type: &str,
        resource_name: &str,
        endpoint: &str,
    ) -> Result<ApiResponse> {
        tracing::debug!("request: PUT {} {:?}", resource_type, resource_name);
        let response = self
            .http
            .put_json(&self.url(endpoint), self.token.secret(), resource)
            .await?;
        let body = ensure_success(response, "updating", resource_type, resource_name)?;
        parse_envelope(&body, resource_type)
    }

    /// DELETE `endpoint`; the response body is ignored
    pub async fn delete_resource(
        &self,
        resource_type: &str,
        resource_name: &str,
        endpoint: &str,
    ) -> Result<()> {
        tracing::debug!("request: DELETE {} {:?}", resource_type, resource_name);
        let response = self
            .http
            .delete(&self.url(endpoint), self.token.secret())
            .await?;
        ensure_success(response, "deleting", resource_type, resource_name)?;
        Ok(())
    }
}

/// Parse a successful body into the response envelope. An empty body
/// (204 No Content) yields an envelope with `null` data.
fn parse_envelope(body: &str, resource_type: &str) -> Result<ApiResponse> {
    if body.trim().is_empty() {
        return Ok(ApiResponse::default());
    }

    serde_json::from_str(body).map_err(|source| RunscopeError::Decode {
        resource_type: resource_type.to_string(),
        source,
    })
}

/// Decode the envelope's `data` payload into a typed record
pub fn decode<T: DeserializeOwned>(data: Value, resource_type: &str) -> Result<T> {
    serde_json::from_value(data).map_err(|source| RunscopeError::Decode {
        resource_type: resource_type.to_string(),
        source,
    })
}

/// Reject empty identifiers before they turn into a malformed path
pub(crate) fn require<'a>(value: &'a str, what: &'static str) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(RunscopeError::MissingIdentifier(what));
    }
    Ok(value)
}
