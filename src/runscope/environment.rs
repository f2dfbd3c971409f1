//! Runscope Environments
//!
//! Shared environments belong to a bucket, test environments to a single
//! test. Both use the same record.

use super::bucket::Bucket;
use super::client::{decode, require, RunscopeClient};
use super::endpoints;
use super::error::Result;
use super::test::Test;
use super::{nullable, timestamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Shared or test-specific environment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(default)]
    pub preserve_cookies: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "nullable::deserialize",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub initial_variables: BTreeMap<String, String>,
    #[serde(
        default,
        deserialize_with = "nullable::deserialize",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub integrations: Vec<EnvironmentIntegration>,
    #[serde(
        default,
        deserialize_with = "nullable::deserialize",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub regions: Vec<String>,
    #[serde(default)]
    pub verify_ssl: bool,
    #[serde(default, with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub retry_on_failure: bool,
    #[serde(
        default,
        deserialize_with = "nullable::deserialize",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub remote_agents: Vec<LocalMachine>,
    #[serde(
        default,
        deserialize_with = "nullable::deserialize",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub webhooks: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_environment_id: Option<String>,
    #[serde(rename = "emails", default, skip_serializing_if = "Option::is_none")]
    pub email_settings: Option<EmailSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_certificate: Option<String>,
    #[serde(
        default,
        deserialize_with = "nullable::deserialize",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub headers: BTreeMap<String, Vec<String>>,
}

/// How test failures trigger email notifications
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailSettings {
    #[serde(default)]
    pub notify_all: bool,
    /// `all`, `failures`, `threshold` or `switch`
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub notify_on: String,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub notify_threshold: i64,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub recipients: Vec<Contact>,
}

/// A third-party integration enabled on an environment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentIntegration {
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub integration_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Remote agent an environment can run on instead of hosted regions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalMachine {
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub uuid: String,
}

/// Notification recipient or resource author
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    fn id(&self) -> Result<&str> {
        require(self.id.as_deref().unwrap_or_default(), "environment id")
    }

    fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&serde_json::to_string(self).unwrap_or_default())
    }
}

impl RunscopeClient {
    /// Create a shared environment in `bucket`
    pub async fn create_shared_environment(
        &self,
        environment: &Environment,
        bucket: &Bucket,
    ) -> Result<Environment> {
        let endpoint = endpoints::shared_environments(bucket.key()?);
        self.create_environment(environment, &endpoint).await
    }

    /// Create an environment scoped to `test`
    pub async fn create_test_environment(
        &self,
        environment: &Environment,
        test: &Test,
    ) -> Result<Environment> {
        let endpoint = endpoints::test_environments(test.bucket_key()?, test.id()?);
        self.create_environment(environment, &endpoint).await
    }

    /// List the shared environments of `bucket`
    pub async fn list_shared_environments(&self, bucket: &Bucket) -> Result<Vec<Environment>> {
        let key = bucket.key()?;
        self.list_environments(key, &endpoints::shared_environments(key))
            .await
    }

    /// List the environments of `test` in `bucket`
    pub async fn list_test_environments(
        &self,
        bucket: &Bucket,
        test: &Test,
    ) -> Result<Vec<Environment>> {
        let key = bucket.key()?;
        self.list_environments(key, &endpoints::test_environments(key, test.id()?))
            .await
    }

    pub async fn read_shared_environment(
        &self,
        environment: &Environment,
        bucket: &Bucket,
    ) -> Result<Environment> {
        let id = environment.id()?;
        let endpoint = endpoints::shared_environment(bucket.key()?, id);
        self.read_environment(id, &endpoint).await
    }

    pub async fn read_test_environment(
        &self,
        environment: &Environment,
        test: &Test,
    ) -> Result<Environment> {
        let id = environment.id()?;
        let endpoint = endpoints::test_environment(test.bucket_key()?, test.id()?, id);
        self.read_environment(id, &endpoint).await
    }

    pub async fn update_shared_environment(
        &self,
        environment: &Environment,
        bucket: &Bucket,
    ) -> Result<Environment> {
        let endpoint = endpoints::shared_environment(bucket.key()?, environment.id()?);
        self.update_environment(environment, &endpoint).await
    }

    pub async fn update_test_environment(
        &self,
        environment: &Environment,
        test: &Test,
    ) -> Result<Environment> {
        let endpoint =
            endpoints::test_environment(test.bucket_key()?, test.id()?, environment.id()?);
        self.update_environment(environment, &endpoint).await
    }

    /// Delete a shared environment
    pub async fn delete_environment(&self, environment: &Environment, bucket: &Bucket) -> Result<()> {
        let id = environment.id()?;
        self.delete_resource(
            "environment",
            id,
            &endpoints::shared_environment(bucket.key()?, id),
        )
        .await
    }

    pub async fn delete_test_environment(
        &self,
        environment: &Environment,
        test: &Test,
    ) -> Result<()> {
        let id = environment.id()?;
        self.delete_resource(
            "environment",
            id,
            &endpoints::test_environment(test.bucket_key()?, test.id()?, id),
        )
        .await
    }

    async fn create_environment(
        &self,
        environment: &Environment,
        endpoint: &str,
    ) -> Result<Environment> {
        let response = self
            .create_resource(environment, "environment", environment.display_name(), endpoint)
            .await?;
        decode(response.data, "environment")
    }

    async fn list_environments(&self, bucket_key: &str, endpoint: &str) -> Result<Vec<Environment>> {
        let response = self.read_resource("environments", bucket_key, endpoint).await?;
        decode::<Option<Vec<Environment>>>(response.data, "environments")
            .map(Option::unwrap_or_default)
    }

    async fn read_environment(&self, id: &str, endpoint: &str) -> Result<Environment> {
        let response = self.read_resource("environment", id, endpoint).await?;
        decode(response.data, "environment")
    }

    async fn update_environment(
        &self,
        environment: &Environment,
        endpoint: &str,
    ) -> Result<Environment> {
        let id = environment.id.as_deref().unwrap_or_default();
        let response = self
            .update_resource(environment, "environment", id, endpoint)
            .await?;
        decode(response.data, "environment")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_environment_keeps_unmarked_booleans() {
        let value = serde_json::to_value(Environment::new()).unwrap();
        assert_eq!(
            value,
            json!({
                "preserve_cookies": false,
                "verify_ssl": false,
                "retry_on_failure": false
            })
        );
    }

    #[test]
    fn test_empty_string_is_not_absent() {
        let env = Environment {
            script: Some(String::new()),
            ..Environment::new()
        };
        let value = serde_json::to_value(&env).unwrap();
        assert_eq!(value["script"], "");
        assert!(value.get("name").is_none());
    }

    #[test]
    fn test_decode_api_payload() {
        let payload = json!({
            "id": "7d3d3d8c-2ed2-4a5b-9d31-0b2c1c59f1d4",
            "name": "Staging",
            "script": "",
            "preserve_cookies": true,
            "test_id": null,
            "initial_variables": {"base_url": "https://staging.example.com"},
            "integrations": [
                {"id": "i-1", "integration_type": "slack", "description": "#alerts"}
            ],
            "regions": ["us1", "eu1"],
            "verify_ssl": true,
            "exported_at": 1465317467,
            "retry_on_failure": false,
            "remote_agents": [{"name": "agent-1", "uuid": "a-1"}],
            "webhooks": null,
            "parent_environment_id": null,
            "emails": {
                "notify_all": false,
                "notify_on": "failures",
                "notify_threshold": 2,
                "recipients": [{"id": "c-1", "name": "Ops", "email": "ops@example.com"}]
            },
            "client_certificate": null,
            "headers": {"X-Env": ["staging"]}
        });

        let env: Environment = serde_json::from_value(payload).unwrap();
        assert_eq!(env.name.as_deref(), Some("Staging"));
        assert_eq!(env.script.as_deref(), Some(""));
        assert_eq!(env.test_id, None);
        assert!(env.preserve_cookies);
        assert_eq!(env.initial_variables["base_url"], "https://staging.example.com");
        assert_eq!(env.integrations[0].integration_type, "slack");
        assert_eq!(env.regions, vec!["us1", "eu1"]);
        assert_eq!(env.exported_at.unwrap().timestamp(), 1465317467);
        assert_eq!(env.remote_agents[0].uuid, "a-1");
        assert!(env.webhooks.is_empty());
        let emails = env.email_settings.unwrap();
        assert_eq!(emails.notify_threshold, 2);
        assert_eq!(emails.recipients[0].email.as_deref(), Some("ops@example.com"));
        assert_eq!(env.headers["X-Env"], vec!["staging"]);
    }

    #[test]
    fn test_nested_records_tolerate_missing_fields() {
        let env: Environment = serde_json::from_value(json!({
            "integrations": [{"id": "i-1", "description": "x"}],
            "remote_agents": [{"uuid": "a"}, {"name": null, "uuid": null}]
        }))
        .unwrap();

        assert_eq!(
            env.integrations,
            vec![EnvironmentIntegration {
                id: "i-1".to_string(),
                integration_type: String::new(),
                description: Some("x".to_string()),
            }]
        );
        assert_eq!(
            env.remote_agents,
            vec![
                LocalMachine {
                    name: String::new(),
                    uuid: "a".to_string(),
                },
                LocalMachine::default(),
            ]
        );
    }

    #[test]
    fn test_email_settings_always_encoded() {
        let settings = EmailSettings::default();
        assert_eq!(
            serde_json::to_value(&settings).unwrap(),
            json!({"notify_all": false, "notify_on": "", "notify_threshold": 0, "recipients": []})
        );
    }

    #[test]
    fn test_display_is_json() {
        let env = Environment {
            name: Some("prod".to_string()),
            ..Environment::new()
        };
        let parsed: Environment = serde_json::from_str(&env.to_string()).unwrap();
        assert_eq!(parsed, env);
    }
}
