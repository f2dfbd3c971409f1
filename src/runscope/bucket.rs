//! Runscope Buckets
//!
//! Buckets group tests and shared environments. They are keyed by a short
//! alphanumeric bucket key rather than a UUID.

use super::client::{decode, require, RunscopeClient};
use super::endpoints;
use super::error::{Result, RunscopeError};
use super::nullable;
use serde::{Deserialize, Serialize};

/// Bucket information
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub key: String,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub name: String,
    #[serde(default)]
    pub default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tests_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collections_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_url: Option<String>,
    #[serde(default)]
    pub verify_ssl: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<Team>,
}

/// Team owning buckets and integrations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Team {
    #[serde(alias = "uuid", default, deserialize_with = "nullable::deserialize")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub name: String,
}

/// Form body for bucket creation; the API does not accept JSON here
#[derive(Serialize)]
struct NewBucketForm<'a> {
    name: &'a str,
    team_uuid: &'a str,
}

impl Bucket {
    /// A bucket handle for an existing key, e.g. one taken from the command line
    pub fn with_key(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ..Self::default()
        }
    }

    pub(crate) fn key(&self) -> Result<&str> {
        require(&self.key, "bucket key")
    }
}

impl RunscopeClient {
    /// Create a bucket owned by `bucket.team`
    pub async fn create_bucket(&self, bucket: &Bucket) -> Result<Bucket> {
        let team = bucket
            .team
            .as_ref()
            .ok_or(RunscopeError::MissingIdentifier("bucket team"))?;
        let form = NewBucketForm {
            name: &bucket.name,
            team_uuid: require(&team.id, "team id")?,
        };

        let response = self
            .create_form_resource(&form, "bucket", &bucket.name, &endpoints::buckets())
            .await?;
        decode(response.data, "bucket")
    }

    pub async fn read_bucket(&self, key: &str) -> Result<Bucket> {
        let key = require(key, "bucket key")?;
        let response = self
            .read_resource("bucket", key, &endpoints::bucket(key))
            .await?;
        decode(response.data, "bucket")
    }

    /// List all buckets visible to the token
    pub async fn list_buckets(&self) -> Result<Vec<Bucket>> {
        let response = self
            .read_resource("buckets", "all", &endpoints::buckets())
            .await?;
        decode::<Option<Vec<Bucket>>>(response.data, "buckets").map(Option::unwrap_or_default)
    }

    pub async fn delete_bucket(&self, bucket: &Bucket) -> Result<()> {
        let key = bucket.key()?;
        self.delete_resource("bucket", key, &endpoints::bucket(key))
            .await
    }
}
