use snafu::Snafu;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Invalid value '{value}' for '{key}': {reason}"))]
    InvalidConfig {
        key: String,
        value: String,
        reason: String,
    },

    #[snafu(display("Cannot determine a configuration directory; set REPOSIZE_SETTINGS_FILE"))]
    MissingConfigDir,

    #[snafu(display("Not a repository path: '{input}'"))]
    InvalidRepository { input: String },

    #[snafu(display("Repository size unavailable: {message}"))]
    SizeUnavailable { message: String },

    #[snafu(display("No token was provided"))]
    EmptyToken,

    #[snafu(display("Failed to read settings from '{}': {source}", path.display()))]
    SettingsReadFailed { path: PathBuf, source: Box<Error> },

    #[snafu(display("Failed to write settings to '{}': {source}", path.display()))]
    SettingsWriteFailed { path: PathBuf, source: Box<Error> },

    #[snafu(display("Settings file is not a JSON object: {}", path.display()))]
    MalformedSettings { path: PathBuf },

    #[snafu(display("HTTP client error: {source}"))]
    HttpClient { source: reqwest::Error },

    #[snafu(display("JSON error: {source}"))]
    Json { source: serde_json::Error },

    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Error::HttpClient { source: error }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Json { source: error }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io { source: error }
    }
}

/// Map the error of a fallible expression into a variant that boxes it as
/// `source`, e.g. `wrap_err!(fs::read(&path).await, SettingsReadFailed { path })`.
#[macro_export]
macro_rules! wrap_err {
    ($expr:expr, $variant:ident { $($field:ident : $value:expr),* $(,)? }) => {
        $expr.map_err(|e| $crate::error::Error::$variant {
            $($field: $value,)*
            source: Box::new($crate::error::Error::from(e)),
        })
    };
}
