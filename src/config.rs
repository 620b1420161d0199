use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::github::GithubConfig;
use crate::github::constants::DEFAULT_WAIT_TIMEOUT_MS;

const SETTINGS_DIR: &str = "reposize";
const SETTINGS_FILE: &str = "settings.json";

/// Runtime configuration assembled from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub github: GithubConfig,
    pub wait_timeout: Duration,
    pub settings_file: PathBuf,
}

/// Load configuration from environment variables
pub fn load_config() -> Result<Config> {
    let mut github = GithubConfig::default();
    if let Ok(rest_url) = env::var("REPOSIZE_REST_URL") {
        github.rest_url = rest_url;
    }
    if let Ok(graphql_url) = env::var("REPOSIZE_GRAPHQL_URL") {
        github.graphql_url = graphql_url;
    }
    if let Ok(user_agent) = env::var("REPOSIZE_USER_AGENT") {
        github.user_agent = user_agent;
    }

    Ok(Config {
        github,
        wait_timeout: load_wait_timeout()?,
        settings_file: load_settings_file()?,
    })
}

fn load_wait_timeout() -> Result<Duration> {
    let Ok(raw) = env::var("REPOSIZE_WAIT_TIMEOUT_MS") else {
        return Ok(Duration::from_millis(DEFAULT_WAIT_TIMEOUT_MS));
    };
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|e| Error::InvalidConfig {
            key: "REPOSIZE_WAIT_TIMEOUT_MS".to_string(),
            value: raw.clone(),
            reason: e.to_string(),
        })
}

fn load_settings_file() -> Result<PathBuf> {
    if let Ok(path) = env::var("REPOSIZE_SETTINGS_FILE") {
        return Ok(PathBuf::from(path));
    }
    dirs::config_dir()
        .map(|dir| dir.join(SETTINGS_DIR).join(SETTINGS_FILE))
        .ok_or(Error::MissingConfigDir)
}
