use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use serde::Deserialize;
use serde_json::json;
use snafu::{OptionExt, ResultExt};

use crate::github::utils::repo::RepoIdentity;
use crate::github::utils::response::classify_response;
use crate::github::{FetchError, InvalidTokenSnafu, MissingDiskUsageSnafu, TransportSnafu};

/// Trait for reading a repository's size with a personal access token.
pub trait AuthenticatedSizeFetcher {
    /// Fetch the disk usage of any repository the token can see.
    ///
    /// # Arguments
    /// * `repo` - Repository to query
    /// * `token` - Bearer token sent in the `Authorization` header
    ///
    /// # Returns
    /// * `Result<u64, FetchError>` - Disk usage in kilobytes
    async fn fetch_size(&self, repo: &RepoIdentity, token: &str) -> Result<u64, FetchError>;
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<GraphQlData>,
}

#[derive(Debug, Deserialize)]
struct GraphQlData {
    repository: Option<GraphQlRepository>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlRepository {
    disk_usage: Option<u64>,
}

/// Build the disk usage query for a repository.
pub fn disk_usage_query(repo: &RepoIdentity) -> String {
    format!(
        "query {{ repository(owner: \"{}\", name: \"{}\") {{ diskUsage }} }}",
        repo.owner, repo.name
    )
}

/// Implementation of AuthenticatedSizeFetcher for the GraphQL v4 API.
pub struct GraphQlSizeFetcher {
    client: Client,
    endpoint: String,
}

impl GraphQlSizeFetcher {
    /// Create a new fetcher against the given GraphQL endpoint.
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

impl AuthenticatedSizeFetcher for GraphQlSizeFetcher {
    async fn fetch_size(&self, repo: &RepoIdentity, token: &str) -> Result<u64, FetchError> {
        let authorization =
            HeaderValue::from_str(&format!("Bearer {token}")).context(InvalidTokenSnafu)?;

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, authorization)
            .body(json!({ "query": disk_usage_query(repo) }).to_string())
            .send()
            .await
            .context(TransportSnafu)?;

        let body: GraphQlResponse = classify_response(response).await?;
        body.data
            .and_then(|data| data.repository)
            .and_then(|repository| repository.disk_usage)
            .context(MissingDiskUsageSnafu)
    }
}
