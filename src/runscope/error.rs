//! Error type shared by every Runscope API call

use thiserror::Error;

/// Errors returned by the Runscope client
#[derive(Debug, Error)]
pub enum RunscopeError {
    /// The request never produced an HTTP response (DNS, TLS, connection reset...)
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a status of 300 or above
    #[error("Status: {status} Error {action} {resource_type}: {resource_name}, error: {message}")]
    Api {
        action: &'static str,
        resource_type: String,
        resource_name: String,
        status: u16,
        message: String,
    },

    /// The response body did not match the expected record shape
    #[error("failed to decode {resource_type}: {source}")]
    Decode {
        resource_type: String,
        #[source]
        source: serde_json::Error,
    },

    /// The request payload could not be encoded as JSON
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// A parent identifier needed to build the endpoint path was empty
    #[error("missing {0}")]
    MissingIdentifier(&'static str),

    #[error("invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("configuration error: {0}")]
    Config(String),
}

impl RunscopeError {
    /// HTTP status of an API error, if this is one
    pub fn status(&self) -> Option<u16> {
        match self {
            RunscopeError::Api { status, .. } => Some(*status),
            RunscopeError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True when the API reported that the resource does not exist
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Result alias used throughout the client
pub type Result<T> = std::result::Result<T, RunscopeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message_names_resource() {
        let err = RunscopeError::Api {
            action: "reading",
            resource_type: "environment".to_string(),
            resource_name: "env-1".to_string(),
            status: 404,
            message: "Not Found".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "Status: 404 Error reading environment: env-1, error: Not Found"
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn test_missing_identifier_has_no_status() {
        let err = RunscopeError::MissingIdentifier("bucket key");
        assert_eq!(err.status(), None);
        assert_eq!(err.to_string(), "missing bucket key");
    }
}
