// Repository identity helpers shared by the fetcher and the reconciler
use std::fmt;
use url::{ParseError, Url};

use crate::github::constants::GITHUB_WEB_URL;

/// Owner/name pair taken from a repository page path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoIdentity {
    pub owner: String,
    pub name: String,
}

impl RepoIdentity {
    /// Parse a page path with the leading slash already stripped.
    ///
    /// Returns `None` when the path has fewer than two segments. Segments are
    /// taken verbatim; the API is left to reject names it does not know.
    pub fn from_path(path: &str) -> Option<Self> {
        let mut segments = path.split('/');
        let owner = segments.next()?;
        let name = segments.next()?;
        Some(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    /// Parse either `owner/name[/...]` or a page URL such as
    /// `https://github.com/owner/name/tree/main`.
    pub fn from_url(input: &str) -> Option<Self> {
        let url = match Url::parse(input) {
            Ok(url) if url.has_host() => url,
            Ok(_) => return None,
            Err(ParseError::RelativeUrlWithoutBase) => without_scheme(input)?,
            Err(_) => return None,
        };
        Self::from_path(url.path().trim_start_matches('/'))
    }
}

/// Resolve input that carries no scheme. Owner names cannot contain a dot, so
/// a dotted first segment is a host such as `github.com`.
fn without_scheme(input: &str) -> Option<Url> {
    let host_first = !input.starts_with('/')
        && input
            .split(['/', '?', '#'])
            .next()
            .is_some_and(|segment| segment.contains('.'));
    if host_first {
        Url::parse(&format!("https://{input}")).ok()
    } else {
        Url::parse(GITHUB_WEB_URL).ok()?.join(input).ok()
    }
}

impl fmt::Display for RepoIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
