//! Runscope API Tests

use super::bucket::Bucket;
use super::client::{decode, require, RunscopeClient};
use super::endpoints;
use super::environment::{Contact, Environment};
use super::error::Result;
use super::{nullable, timestamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An API test inside a bucket
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Test {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Contact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_environment_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_url: Option<String>,
    #[serde(default, with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "nullable::deserialize",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub environments: Vec<Environment>,

    /// Key of the owning bucket. Not part of the wire format; filled in by
    /// the client for every test it returns.
    #[serde(skip)]
    pub bucket_key: String,
}

impl Test {
    /// A test handle for an existing test in `bucket_key`
    pub fn in_bucket(bucket_key: &str, id: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            bucket_key: bucket_key.to_string(),
            ..Self::default()
        }
    }

    pub(crate) fn id(&self) -> Result<&str> {
        require(self.id.as_deref().unwrap_or_default(), "test id")
    }

    pub(crate) fn bucket_key(&self) -> Result<&str> {
        require(&self.bucket_key, "bucket key")
    }

    fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    fn owned_by(mut self, bucket_key: &str) -> Self {
        self.bucket_key = bucket_key.to_string();
        self
    }
}

impl RunscopeClient {
    /// Create `test` in `bucket`
    pub async fn create_test(&self, test: &Test, bucket: &Bucket) -> Result<Test> {
        let key = bucket.key()?;
        let response = self
            .create_resource(test, "test", test.display_name(), &endpoints::tests(key))
            .await?;
        decode::<Test>(response.data, "test").map(|t| t.owned_by(key))
    }

    pub async fn read_test(&self, test: &Test) -> Result<Test> {
        let key = test.bucket_key()?;
        let id = test.id()?;
        let response = self
            .read_resource("test", id, &endpoints::test(key, id))
            .await?;
        decode::<Test>(response.data, "test").map(|t| t.owned_by(key))
    }

    pub async fn list_tests(&self, bucket: &Bucket) -> Result<Vec<Test>> {
        let key = bucket.key()?;
        let response = self
            .read_resource("tests", key, &endpoints::tests(key))
            .await?;
        let tests = decode::<Option<Vec<Test>>>(response.data, "tests")?.unwrap_or_default();
        Ok(tests.into_iter().map(|t| t.owned_by(key)).collect())
    }

    pub async fn update_test(&self, test: &Test) -> Result<Test> {
        let key = test.bucket_key()?;
        let id = test.id()?;
        let response = self
            .update_resource(test, "test", id, &endpoints::test(key, id))
            .await?;
        decode::<Test>(response.data, "test").map(|t| t.owned_by(key))
    }

    pub async fn delete_test(&self, test: &Test) -> Result<()> {
        let key = test.bucket_key()?;
        let id = test.id()?;
        self.delete_resource("test", id, &endpoints::test(key, id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bucket_key_is_not_serialized() {
        let test = Test::in_bucket("bkt", "t-1");
        assert_eq!(serde_json::to_value(&test).unwrap(), json!({"id": "t-1"}));
    }

    #[test]
    fn test_decode_test_payload() {
        let test: Test = serde_json::from_value(json!({
            "id": "9b47981a-98fd-4dac-8f32-c05aa60b8caf",
            "name": "Sample Name",
            "description": null,
            "created_at": 1438832081,
            "created_by": {"email": "grace@example.com", "name": "Grace Hopper", "id": "4ee15ecc"},
            "default_environment_id": "a50b63cc-c377-4823-9a95-8b91f12326f2",
            "last_updated": 1438832081.218,
            "trigger_url": "https://api.runscope.com/radar/b96ecee2/trigger",
            "environments": null,
            "steps": []
        }))
        .unwrap();

        assert_eq!(test.name.as_deref(), Some("Sample Name"));
        assert_eq!(test.description, None);
        assert_eq!(test.created_at.unwrap().timestamp(), 1438832081);
        assert_eq!(test.last_updated.unwrap().timestamp(), 1438832081);
        assert_eq!(
            test.created_by.unwrap().name.as_deref(),
            Some("Grace Hopper")
        );
        assert!(test.environments.is_empty());
        assert!(test.bucket_key.is_empty());
    }

    #[test]
    fn test_handle_requires_identifiers() {
        assert!(Test::default().id().is_err());
        assert!(Test::default().bucket_key().is_err());
        let test = Test::in_bucket("bkt", "t-1");
        assert_eq!(test.id().unwrap(), "t-1");
        assert_eq!(test.bucket_key().unwrap(), "bkt");
    }
}
