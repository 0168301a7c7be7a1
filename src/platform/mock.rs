use super::{PlatformError, PullRequest, PullRequestSource};
use std::collections::HashMap;
use std::sync::Mutex;

enum Canned {
    Pulls(Vec<PullRequest>),
    Failure { status: u16, message: String },
    Timeout,
}

/// In-memory pull request lookups for testing without network access
///
/// Commits with nothing registered have no associated pull requests.
pub struct MockPullRequestSource {
    responses: HashMap<String, Canned>,
    queried: Mutex<Vec<String>>,
}

impl MockPullRequestSource {
    /// Create a new mock with no pull requests
    pub fn new() -> Self {
        MockPullRequestSource {
            responses: HashMap::new(),
            queried: Mutex::new(Vec::new()),
        }
    }

    /// Associate a pull request with a commit; repeated calls append in order
    pub fn add_pull(&mut self, sha: impl Into<String>, number: u64, head_ref: impl Into<String>) {
        let entry = self
            .responses
            .entry(sha.into())
            .or_insert_with(|| Canned::Pulls(Vec::new()));
        match entry {
            Canned::Pulls(pulls) => pulls.push(PullRequest::new(number, head_ref)),
            other => *other = Canned::Pulls(vec![PullRequest::new(number, head_ref)]),
        }
    }

    /// Make lookups for a commit fail with an HTTP status
    pub fn add_failure(&mut self, sha: impl Into<String>, status: u16, message: impl Into<String>) {
        self.responses.insert(
            sha.into(),
            Canned::Failure {
                status,
                message: message.into(),
            },
        );
    }

    /// Make lookups for a commit time out
    pub fn add_timeout(&mut self, sha: impl Into<String>) {
        self.responses.insert(sha.into(), Canned::Timeout);
    }

    /// Commit hashes queried so far, in call order
    pub fn queried(&self) -> Vec<String> {
        self.queried
            .lock()
            .map(|q| q.clone())
            .unwrap_or_default()
    }
}

impl Default for MockPullRequestSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PullRequestSource for MockPullRequestSource {
    fn pulls_for_commit(&self, sha: &str) -> Result<Vec<PullRequest>, PlatformError> {
        if let Ok(mut queried) = self.queried.lock() {
            queried.push(sha.to_string());
        }

        match self.responses.get(sha) {
            None => Ok(Vec::new()),
            Some(Canned::Pulls(pulls)) => Ok(pulls.clone()),
            Some(Canned::Failure { status, message }) => Err(PlatformError::Status {
                status: *status,
                message: message.clone(),
            }),
            Some(Canned::Timeout) => Err(PlatformError::Timeout),
        }
    }
}
