use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use snafu::ResultExt;

use crate::github::constants::GITHUB_ACCEPT;
use crate::github::utils::repo::RepoIdentity;
use crate::github::utils::response::classify_response;
use crate::github::{FetchError, TransportSnafu};

/// Trait for reading a repository's size without credentials.
pub trait AnonymousSizeFetcher {
    /// Fetch the disk usage of a public repository.
    ///
    /// # Arguments
    /// * `repo` - Repository to query
    ///
    /// # Returns
    /// * `Result<u64, FetchError>` - Disk usage in kilobytes
    async fn fetch_size(&self, repo: &RepoIdentity) -> Result<u64, FetchError>;
}

/// Subset of the REST repository payload we care about.
#[derive(Debug, Deserialize)]
struct RestRepository {
    size: u64,
}

/// Implementation of AnonymousSizeFetcher for the REST v3 API.
pub struct RestSizeFetcher {
    client: Client,
    base_url: String,
}

impl RestSizeFetcher {
    /// Create a new fetcher against the given REST base URL.
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn repository_url(&self, repo: &RepoIdentity) -> String {
        format!(
            "{}/repos/{}/{}",
            self.base_url.trim_end_matches('/'),
            repo.owner,
            repo.name
        )
    }
}

impl AnonymousSizeFetcher for RestSizeFetcher {
    async fn fetch_size(&self, repo: &RepoIdentity) -> Result<u64, FetchError> {
        let response = self
            .client
            .get(self.repository_url(repo))
            .header(ACCEPT, GITHUB_ACCEPT)
            .send()
            .await
            .context(TransportSnafu)?;

        let body: RestRepository = classify_response(response).await?;
        Ok(body.size)
    }
}
