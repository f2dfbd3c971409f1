//! Configuration Management
//!
//! Handles persistent configuration storage for rscope.

use crate::runscope::auth::{self, AccessToken};
use crate::runscope::client::DEFAULT_API_URL;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// API base URL override
    #[serde(default)]
    pub api_url: Option<String>,
    /// Access token
    #[serde(default)]
    pub access_token: Option<String>,
    /// Default team UUID
    #[serde(default)]
    pub team_id: Option<String>,
    /// Default bucket key
    #[serde(default)]
    pub bucket_key: Option<String>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("rscope").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from `path`, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;

        Ok(())
    }

    /// Get effective API URL (CLI > env > config > default)
    pub fn effective_api_url(&self) -> String {
        auth::get_default_api_url()
            .or_else(|| self.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    /// Get effective access token (CLI > env > config)
    pub fn effective_token(&self) -> Result<AccessToken> {
        if let Ok(token) = AccessToken::from_env() {
            return Ok(token);
        }

        let token = self.access_token.as_deref().with_context(|| {
            format!(
                "No access token configured. Set {} or run 'rscope config set-token'",
                auth::TOKEN_ENV
            )
        })?;
        AccessToken::new(token).context("Invalid access token in config")
    }

    /// Get effective team (CLI > env > config)
    pub fn effective_team(&self) -> Option<String> {
        auth::get_default_team().or_else(|| self.team_id.clone())
    }

    /// Get effective bucket (CLI > env > config)
    pub fn effective_bucket(&self) -> Option<String> {
        auth::get_default_bucket().or_else(|| self.bucket_key.clone())
    }

    /// Set token and save
    pub fn set_token(&mut self, token: &str) -> Result<()> {
        let token = AccessToken::new(token)?;
        self.access_token = Some(token.secret().to_string());
        self.save()
    }

    /// Set team and save
    pub fn set_team(&mut self, team_id: &str) -> Result<()> {
        anyhow::ensure!(auth::validate_identifier(team_id), "Invalid team id: {team_id}");
        self.team_id = Some(team_id.to_string());
        self.save()
    }

    /// Set bucket and save
    pub fn set_bucket(&mut self, bucket_key: &str) -> Result<()> {
        anyhow::ensure!(
            auth::validate_identifier(bucket_key),
            "Invalid bucket key: {bucket_key}"
        );
        self.bucket_key = Some(bucket_key.to_string());
        self.save()
    }

    /// Set API URL and save
    pub fn set_api_url(&mut self, api_url: &str) -> Result<()> {
        url::Url::parse(api_url).with_context(|| format!("Invalid API URL: {api_url}"))?;
        self.api_url = Some(api_url.to_string());
        self.save()
    }

    /// Copy with the access token masked, for display
    pub fn redacted(&self) -> Self {
        Self {
            access_token: self.access_token.as_ref().map(|_| "***".to_string()),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("rscope-config-test-{}-{}", std::process::id(), name))
            .join("config.json")
    }

    #[test]
    fn test_missing_file_is_default() {
        let config = Config::load_from(&temp_path("missing"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_path("roundtrip");
        let config = Config {
            api_url: Some("http://localhost:9000".to_string()),
            access_token: Some("abc".to_string()),
            team_id: Some("team-1".to_string()),
            bucket_key: None,
        };

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path), config);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_corrupt_file_is_default() {
        let path = temp_path("corrupt");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();

        assert_eq!(Config::load_from(&path), Config::default());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_redacted_hides_token() {
        let config = Config {
            access_token: Some("secret".to_string()),
            ..Config::default()
        };
        assert_eq!(config.redacted().access_token.as_deref(), Some("***"));
        assert_eq!(Config::default().redacted().access_token, None);
    }
}
