//! Team integrations (Slack, PagerDuty, Datadog...)
//!
//! Environments reference these by id through `EnvironmentIntegration`.

use super::client::{decode, require, RunscopeClient};
use super::endpoints;
use super::environment::EnvironmentIntegration;
use super::error::Result;
use super::nullable;
use serde::{Deserialize, Serialize};

/// Integration configured on a team
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Integration {
    #[serde(
        rename = "uuid",
        alias = "id",
        default,
        deserialize_with = "nullable::deserialize"
    )]
    pub id: String,
    #[serde(rename = "type", default, deserialize_with = "nullable::deserialize")]
    pub integration_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&Integration> for EnvironmentIntegration {
    fn from(integration: &Integration) -> Self {
        Self {
            id: integration.id.clone(),
            integration_type: integration.integration_type.clone(),
            description: integration.description.clone(),
        }
    }
}

impl RunscopeClient {
    /// List the integrations configured for `team_id`
    pub async fn list_integrations(&self, team_id: &str) -> Result<Vec<Integration>> {
        let team_id = require(team_id, "team id")?;
        let response = self
            .read_resource("integrations", team_id, &endpoints::team_integrations(team_id))
            .await?;
        decode::<Option<Vec<Integration>>>(response.data, "integrations")
            .map(Option::unwrap_or_default)
    }
}
