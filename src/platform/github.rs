//! GitHub REST implementation of [PullRequestSource].
//!
//! Uses `GET /repos/{owner}/{repo}/commits/{sha}/pulls`. Requests are
//! blocking, bounded by a per-request timeout and never retried; the
//! classifier decides what a failure means for the run.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::Deserialize;

use super::{PlatformError, PullRequest, PullRequestSource, RepoSlug};
use crate::error::{Result, VersioningError};

/// Default GitHub API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "tag-bump";

#[derive(Debug, Deserialize)]
struct PullRecord {
    number: u64,
    head: HeadRecord,
}

#[derive(Debug, Deserialize)]
struct HeadRecord {
    #[serde(rename = "ref")]
    ref_name: String,
}

#[derive(Debug, Deserialize)]
struct GitHubErrorResponse {
    message: String,
}

/// GitHub client for commit-to-pull-request lookups
pub struct GitHubClient {
    client: Client,
    slug: RepoSlug,
    api_base: String,
    authenticated: bool,
}

// Custom Debug so the configured headers never reach logs
impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("slug", &self.slug)
            .field("api_base", &self.api_base)
            .field("authenticated", &self.authenticated)
            .finish()
    }
}

impl GitHubClient {
    /// Build a client for `slug`.
    ///
    /// `token` is sent as a bearer token when present. `timeout` bounds each
    /// request from connect to the end of the body.
    pub fn new(
        api_base: impl Into<String>,
        slug: RepoSlug,
        token: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );

        let authenticated = match token.map(str::trim).filter(|t| !t.is_empty()) {
            Some(token) => {
                let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|_| VersioningError::config("GitHub token contains invalid characters"))?;
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
                true
            }
            None => false,
        };

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT_VALUE)
            .timeout(timeout)
            .build()
            .map_err(|e| VersioningError::config(format!("Cannot build HTTP client: {}", e)))?;

        Ok(GitHubClient {
            client,
            slug,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            authenticated,
        })
    }

    /// Whether requests carry an Authorization header
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Build URL for a repository endpoint.
    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_base, self.slug.owner, self.slug.repo, path
        )
    }

    /// Map a non-success response to [PlatformError::Status], keeping the
    /// API's own message when the body carries one.
    fn error_from_response(response: Response) -> PlatformError {
        let status = response.status().as_u16();
        let message = match response.json::<GitHubErrorResponse>() {
            Ok(err) => err.message,
            Err(_) => "Unknown error".to_string(),
        };

        PlatformError::Status { status, message }
    }
}

fn classify_transport_error(err: reqwest::Error) -> PlatformError {
    if err.is_timeout() {
        PlatformError::Timeout
    } else {
        PlatformError::Http(err)
    }
}

impl PullRequestSource for GitHubClient {
    fn pulls_for_commit(&self, sha: &str) -> std::result::Result<Vec<PullRequest>, PlatformError> {
        let url = self.repo_url(&format!("commits/{}/pulls", sha));
        tracing::debug!(%url, "querying pull requests");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(classify_transport_error)?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response));
        }

        let records: Vec<PullRecord> = response.json().map_err(|e| {
            if e.is_timeout() {
                PlatformError::Timeout
            } else {
                PlatformError::Decode(e.to_string())
            }
        })?;

        Ok(records
            .into_iter()
            .map(|record| PullRequest::new(record.number, record.head.ref_name))
            .collect())
    }
}
