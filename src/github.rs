use reqwest::Client;
use snafu::Snafu;

use crate::error::Result;

pub mod constants;
pub mod operations;
pub mod utils;

use self::constants::{DEFAULT_GRAPHQL_URL, DEFAULT_REST_URL};
use self::operations::graphql::GraphQlSizeFetcher;
use self::operations::rest::RestSizeFetcher;
use self::operations::{AnonymousSizeFetcher, AuthenticatedSizeFetcher};
use self::utils::repo::RepoIdentity;

/// Why a size could not be fetched. Collapses to [`FetchErrorKind`] for display.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum FetchError {
    #[snafu(display("Token rejected by the API"))]
    Unauthorized,

    #[snafu(display("Unexpected HTTP status {status}"))]
    Status { status: u16 },

    #[snafu(display("Request failed: {source}"))]
    Transport { source: reqwest::Error },

    #[snafu(display("Malformed response body: {source}"))]
    Decode { source: serde_json::Error },

    #[snafu(display("Response did not contain a disk usage value"))]
    MissingDiskUsage,

    #[snafu(display("Token cannot be sent as a header: {source}"))]
    InvalidToken {
        source: reqwest::header::InvalidHeaderValue,
    },
}

/// The two failure kinds a user gets to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    Unauthorized,
    Unknown,
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Unauthorized => FetchErrorKind::Unauthorized,
            _ => FetchErrorKind::Unknown,
        }
    }
}

/// Source of repository sizes, in kilobytes.
///
/// The anonymous path is only used when no token is stored; the
/// authenticated path whenever one is.
pub trait SizeSource {
    async fn anonymous(&self, repo: &RepoIdentity) -> std::result::Result<u64, FetchError>;

    async fn authenticated(
        &self,
        repo: &RepoIdentity,
        token: &str,
    ) -> std::result::Result<u64, FetchError>;
}

/// Endpoints and client identity for the GitHub API.
#[derive(Debug, Clone)]
pub struct GithubConfig {
    pub rest_url: String,
    pub graphql_url: String,
    pub user_agent: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            rest_url: DEFAULT_REST_URL.to_string(),
            graphql_url: DEFAULT_GRAPHQL_URL.to_string(),
            user_agent: format!("reposize/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// GitHub API client for repository sizes.
#[derive(Clone)]
pub struct GithubClient {
    client: Client,
    config: GithubConfig,
}

impl GithubClient {
    pub fn new(config: GithubConfig) -> Result<Self> {
        let client = Client::builder().user_agent(&config.user_agent).build()?;
        Ok(Self { client, config })
    }
}

impl SizeSource for GithubClient {
    async fn anonymous(&self, repo: &RepoIdentity) -> std::result::Result<u64, FetchError> {
        log::debug!(
            "anonymous size fetch repo={} rest_url={}",
            repo,
            self.config.rest_url
        );
        let fetcher = RestSizeFetcher::new(self.client.clone(), &self.config.rest_url);
        fetcher.fetch_size(repo).await
    }

    async fn authenticated(
        &self,
        repo: &RepoIdentity,
        token: &str,
    ) -> std::result::Result<u64, FetchError> {
        log::debug!(
            "authenticated size fetch repo={} graphql_url={}",
            repo,
            self.config.graphql_url
        );
        let fetcher = GraphQlSizeFetcher::new(self.client.clone(), &self.config.graphql_url);
        fetcher.fetch_size(repo, token).await
    }
}
