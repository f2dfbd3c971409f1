//! Runscope Authentication
//!
//! Runscope authenticates with a personal or application OAuth access token
//! sent as a bearer token. This module holds the token and reads defaults
//! from the environment.

use super::error::{Result, RunscopeError};
use std::fmt;

/// Environment variable holding the access token
pub const TOKEN_ENV: &str = "RUNSCOPE_ACCESS_TOKEN";
/// Environment variable overriding the API URL
pub const API_URL_ENV: &str = "RUNSCOPE_API_URL";
/// Environment variable holding the default team UUID
pub const TEAM_ENV: &str = "RUNSCOPE_TEAM_ID";
/// Environment variable holding the default bucket key
pub const BUCKET_ENV: &str = "RUNSCOPE_BUCKET_KEY";

/// Bearer token for API calls
/// Security: Debug output is redacted so the token never reaches logs
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Validate and wrap a token
    /// Tokens must be non-empty and contain no whitespace
    pub fn new(token: &str) -> Result<Self> {
        let token = token.trim();
        if !validate_token(token) {
            return Err(RunscopeError::Config(
                "access token must be non-empty and contain no whitespace".to_string(),
            ));
        }
        Ok(Self(token.to_string()))
    }

    /// Read the token from `RUNSCOPE_ACCESS_TOKEN`
    pub fn from_env() -> Result<Self> {
        match std::env::var(TOKEN_ENV) {
            Ok(token) => Self::new(&token),
            Err(_) => Err(RunscopeError::Config(format!("{TOKEN_ENV} is not set"))),
        }
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

fn validate_token(token: &str) -> bool {
    !token.is_empty() && !token.chars().any(|c| c.is_whitespace() || c.is_control())
}

/// Validate a bucket key or UUID-like identifier
/// Identifiers are ASCII alphanumerics plus `-` and `_`
pub fn validate_identifier(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn identifier_from_env(var: &str) -> Option<String> {
    let value = std::env::var(var).ok()?;
    let value = value.trim();
    if validate_identifier(value) {
        return Some(value.to_string());
    }
    tracing::warn!("Invalid identifier format in {}", var);
    None
}

/// Read the default team from the environment
pub fn get_default_team() -> Option<String> {
    identifier_from_env(TEAM_ENV)
}

/// Read the default bucket from the environment
pub fn get_default_bucket() -> Option<String> {
    identifier_from_env(BUCKET_ENV)
}

/// Read an API URL override from the environment
pub fn get_default_api_url() -> Option<String> {
    let value = std::env::var(API_URL_ENV).ok()?;
    let value = value.trim();
    if url::Url::parse(value).is_ok() {
        return Some(value.to_string());
    }
    tracing::warn!("Invalid URL in {}", API_URL_ENV);
    None
}
