//! Hosting platform abstraction
//!
//! The only question tag-bump asks the platform is "which pull requests
//! contain this commit?". [PullRequestSource] captures that query so the
//! classifier can run against GitHub ([github::GitHubClient]) or an
//! in-memory table ([mock::MockPullRequestSource]).

pub mod github;
pub mod mock;

pub use github::GitHubClient;
pub use mock::MockPullRequestSource;

use crate::error::{Result as VersioningResult, VersioningError};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors from a single platform query
#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("request timed out")]
    Timeout,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// The part of a pull request record the classifier consumes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub number: u64,
    /// Source branch name (`head.ref`)
    pub head_ref: String,
}

impl PullRequest {
    pub fn new(number: u64, head_ref: impl Into<String>) -> Self {
        PullRequest {
            number,
            head_ref: head_ref.into(),
        }
    }
}

/// Lists the pull requests associated with a commit
///
/// Implementations must preserve the platform's ordering; callers treat the
/// first entry as authoritative.
pub trait PullRequestSource: Send + Sync {
    fn pulls_for_commit(&self, sha: &str) -> Result<Vec<PullRequest>, PlatformError>;
}

/// `owner/repo` identifier of a hosted repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub repo: String,
}

impl RepoSlug {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        RepoSlug {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Parse a GitHub remote URL into owner and repository name.
    ///
    /// Supports both SSH and HTTPS formats:
    /// - `git@github.com:owner/repo.git`
    /// - `https://github.com/owner/repo.git`
    /// - `https://github.com/owner/repo`
    pub fn from_remote_url(url: &str) -> Option<Self> {
        let url = url.trim();
        let rest = url
            .strip_prefix("git@github.com:")
            .or_else(|| url.strip_prefix("ssh://git@github.com/"))
            .or_else(|| url.strip_prefix("https://github.com/"))
            .or_else(|| url.strip_prefix("http://github.com/"))?;
        let rest = rest.trim_end_matches('/');
        let rest = rest.strip_suffix(".git").unwrap_or(rest);

        rest.parse().ok()
    }

    /// Pick the repository to query: an explicit value first, then the
    /// configured `github.repository`, then the origin remote URL.
    pub fn resolve(
        explicit: Option<&RepoSlug>,
        configured: Option<&str>,
        remote_url: Option<&str>,
    ) -> VersioningResult<RepoSlug> {
        if let Some(slug) = explicit {
            return Ok(slug.clone());
        }
        if let Some(configured) = configured {
            return configured
                .parse()
                .map_err(|e| VersioningError::config(format!("github.repository: {}", e)));
        }
        match remote_url {
            Some(url) => Self::from_remote_url(url).ok_or_else(|| {
                VersioningError::repository(format!(
                    "Cannot derive owner/repo from remote URL '{}'; pass --repository",
                    url
                ))
            }),
            None => Err(VersioningError::repository(
                "No origin remote; pass --repository or set github.repository",
            )),
        }
    }
}

impl FromStr for RepoSlug {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once('/') {
            Some((owner, repo))
                if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') =>
            {
                Ok(RepoSlug::new(owner, repo))
            }
            _ => Err(format!("expected 'owner/repo', got '{}'", s)),
        }
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_from_str() {
        let slug: RepoSlug = "acme/widgets".parse().unwrap();
        assert_eq!(slug, RepoSlug::new("acme", "widgets"));
        assert_eq!(slug.to_string(), "acme/widgets");

        assert!("acme".parse::<RepoSlug>().is_err());
        assert!("/widgets".parse::<RepoSlug>().is_err());
        assert!("acme/widgets/extra".parse::<RepoSlug>().is_err());
    }

    #[test]
    fn test_slug_from_ssh_url() {
        assert_eq!(
            RepoSlug::from_remote_url("git@github.com:octocat/hello-world.git"),
            Some(RepoSlug::new("octocat", "hello-world"))
        );
        assert_eq!(
            RepoSlug::from_remote_url("git@github.com:octocat/hello-world"),
            Some(RepoSlug::new("octocat", "hello-world"))
        );
    }

    #[test]
    fn test_slug_from_https_url() {
        assert_eq!(
            RepoSlug::from_remote_url("https://github.com/octocat/hello-world.git"),
            Some(RepoSlug::new("octocat", "hello-world"))
        );
        assert_eq!(
            RepoSlug::from_remote_url("https://github.com/octocat/hello-world/"),
            Some(RepoSlug::new("octocat", "hello-world"))
        );
    }

    #[test]
    fn test_resolve_precedence() {
        let explicit = RepoSlug::new("cli", "repo");
        let remote = Some("git@github.com:remote/repo.git");

        assert_eq!(
            RepoSlug::resolve(Some(&explicit), Some("cfg/repo"), remote).unwrap(),
            explicit
        );
        assert_eq!(
            RepoSlug::resolve(None, Some("cfg/repo"), remote).unwrap(),
            RepoSlug::new("cfg", "repo")
        );
        assert_eq!(
            RepoSlug::resolve(None, None, remote).unwrap(),
            RepoSlug::new("remote", "repo")
        );
    }

    #[test]
    fn test_resolve_failures() {
        assert!(matches!(
            RepoSlug::resolve(None, Some("not-a-slug"), None),
            Err(VersioningError::Config(_))
        ));
        assert!(matches!(
            RepoSlug::resolve(None, None, Some("https://example.com/x.git")),
            Err(VersioningError::Repository(_))
        ));
        assert!(matches!(
            RepoSlug::resolve(None, None, None),
            Err(VersioningError::Repository(_))
        ));
    }

    #[test]
    fn test_slug_from_foreign_url() {
        assert_eq!(
            RepoSlug::from_remote_url("git@gitlab.com:octocat/hello-world.git"),
            None
        );
        assert_eq!(RepoSlug::from_remote_url("https://github.com/octocat"), None);
    }
}
