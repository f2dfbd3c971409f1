//! Runscope API paths
//!
//! Every identifier is percent-encoded as a single path segment. Bucket keys,
//! test/environment UUIDs and team UUIDs only contain unreserved characters,
//! so for real identifiers the paths match the documented templates verbatim.

use urlencoding::encode;

pub fn account() -> String {
    "/account".to_string()
}

pub fn buckets() -> String {
    "/buckets".to_string()
}

/// `/buckets/{bucket}`
pub fn bucket(bucket_key: &str) -> String {
    format!("/buckets/{}", encode(bucket_key))
}

/// `/buckets/{bucket}/tests`
pub fn tests(bucket_key: &str) -> String {
    format!("{}/tests", bucket(bucket_key))
}

/// `/buckets/{bucket}/tests/{test}`
pub fn test(bucket_key: &str, test_id: &str) -> String {
    format!("{}/{}", tests(bucket_key), encode(test_id))
}

/// `/buckets/{bucket}/environments`
pub fn shared_environments(bucket_key: &str) -> String {
    format!("{}/environments", bucket(bucket_key))
}

/// `/buckets/{bucket}/environments/{id}`
pub fn shared_environment(bucket_key: &str, environment_id: &str) -> String {
    format!(
        "{}/{}",
        shared_environments(bucket_key),
        encode(environment_id)
    )
}

/// `/buckets/{bucket}/tests/{test}/environments`
pub fn test_environments(bucket_key: &str, test_id: &str) -> String {
    format!("{}/environments", test(bucket_key, test_id))
}

/// `/buckets/{bucket}/tests/{test}/environments/{id}`
pub fn test_environment(bucket_key: &str, test_id: &str, environment_id: &str) -> String {
    format!(
        "{}/{}",
        test_environments(bucket_key, test_id),
        encode(environment_id)
    )
}

/// `/teams/{team}/integrations`
pub fn team_integrations(team_id: &str) -> String {
    format!("/teams/{}/integrations", encode(team_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_templates() {
        assert_eq!(shared_environments("abc123"), "/buckets/abc123/environments");
        assert_eq!(
            shared_environment("abc123", "env-1"),
            "/buckets/abc123/environments/env-1"
        );
        assert_eq!(
            test_environments("abc123", "t-1"),
            "/buckets/abc123/tests/t-1/environments"
        );
        assert_eq!(
            test_environment("abc123", "t-1", "env-1"),
            "/buckets/abc123/tests/t-1/environments/env-1"
        );
    }

    #[test]
    fn test_bucket_and_team_templates() {
        assert_eq!(account(), "/account");
        assert_eq!(buckets(), "/buckets");
        assert_eq!(bucket("k"), "/buckets/k");
        assert_eq!(tests("k"), "/buckets/k/tests");
        assert_eq!(test("k", "t"), "/buckets/k/tests/t");
        assert_eq!(team_integrations("team-uuid"), "/teams/team-uuid/integrations");
    }

    #[test]
    fn test_identifiers_cannot_escape_their_segment() {
        assert_eq!(bucket("../account"), "/buckets/..%2Faccount");
        assert_eq!(
            shared_environment("k", "a b?c"),
            "/buckets/k/environments/a%20b%3Fc"
        );
    }
}
