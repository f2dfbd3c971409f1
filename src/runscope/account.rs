//! Account owning the access token

use super::bucket::Team;
use super::client::{decode, RunscopeClient};
use super::endpoints;
use super::error::Result;
use super::nullable;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "uuid", default, deserialize_with = "nullable::deserialize")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub teams: Vec<Team>,
}

impl Account {
    /// First team on the account; used as the default team
    pub fn primary_team(&self) -> Option<&Team> {
        self.teams.first()
    }
}

impl RunscopeClient {
    pub async fn read_account(&self) -> Result<Account> {
        let response = self
            .read_resource("account", "current", &endpoints::account())
            .await?;
        decode(response.data, "account")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_account() {
        let account: Account = serde_json::from_value(json!({
            "email": "grace@example.com",
            "name": "Grace Hopper",
            "uuid": "1aa2b3c4-0000-4000-8000-000000000000",
            "teams": [
                {"name": "Grace Hopper's Team", "uuid": "7a7a0917-91d7-43ef-b8f4-fe31762167e0"}
            ]
        }))
        .unwrap();

        assert_eq!(account.id, "1aa2b3c4-0000-4000-8000-000000000000");
        assert_eq!(
            account.primary_team().unwrap().id,
            "7a7a0917-91d7-43ef-b8f4-fe31762167e0"
        );
    }

    #[test]
    fn test_account_without_teams() {
        let account: Account = serde_json::from_value(json!({"uuid": "a", "teams": null})).unwrap();
        assert!(account.primary_team().is_none());
    }
}
