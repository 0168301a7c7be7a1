use crate::boundary::BoundaryWarning;
use crate::domain::BranchContext;
use crate::error::{Result, VersioningError};
use crate::git::CommitInfo;
use crate::platform::PullRequestSource;

/// Change-type keyword resolved for one commit, with where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeType {
    pub keyword: String,
    pub branch: String,
    pub pull_number: u64,
}

/// Resolves commits to the change type of the pull request that merged them
pub struct CommitClassifier<'a> {
    source: &'a dyn PullRequestSource,
    concurrency: usize,
}

impl<'a> CommitClassifier<'a> {
    /// Create a sequential classifier
    pub fn new(source: &'a dyn PullRequestSource) -> Self {
        CommitClassifier {
            source,
            concurrency: 1,
        }
    }

    /// Allow up to `concurrency` lookups in flight at once
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Source branch of the first pull request associated with `commit`.
    ///
    /// The platform's ordering is authoritative; later pull requests are
    /// reported and ignored. `Ok(None)` means no pull request contains the
    /// commit.
    pub fn lookup_branch(&self, commit: &CommitInfo) -> Result<Option<(u64, String)>> {
        let pulls = self
            .source
            .pulls_for_commit(&commit.hash)
            .map_err(|e| VersioningError::PlatformQueryFailed {
                commit: commit.hash.clone(),
                reason: e.to_string(),
            })?;

        let mut pulls = pulls.into_iter();
        let Some(first) = pulls.next() else {
            return Ok(None);
        };

        let ignored: Vec<u64> = pulls.map(|pull| pull.number).collect();
        if !ignored.is_empty() {
            BoundaryWarning::MultiplePullRequests {
                commit: commit.hash.clone(),
                used: first.number,
                ignored,
            }
            .emit();
        }

        Ok(Some((first.number, first.head_ref)))
    }

    /// Change-type keyword for `commit`, or `None` when the commit carries
    /// no signal. Lookup failures are logged and isolated to this commit.
    pub fn resolve_change_type(&self, commit: &CommitInfo) -> Option<ChangeType> {
        let (pull_number, branch) = match self.lookup_branch(commit) {
            Ok(Some(found)) => found,
            Ok(None) => {
                BoundaryWarning::NoPullRequest {
                    commit: commit.hash.clone(),
                }
                .emit();
                return None;
            }
            Err(VersioningError::PlatformQueryFailed { commit, reason }) => {
                BoundaryWarning::PlatformQueryFailed { commit, reason }.emit();
                return None;
            }
            Err(other) => {
                BoundaryWarning::PlatformQueryFailed {
                    commit: commit.hash.clone(),
                    reason: other.to_string(),
                }
                .emit();
                return None;
            }
        };

        let context = BranchContext::new(&branch);
        match context.change_type() {
            Some(keyword) => {
                tracing::debug!(
                    commit = commit.short_hash(),
                    pull = pull_number,
                    branch = %branch,
                    keyword,
                    "classified commit"
                );
                Some(ChangeType {
                    keyword: keyword.to_string(),
                    branch: branch.clone(),
                    pull_number,
                })
            }
            None => {
                BoundaryWarning::UnrecognizedKeyword {
                    commit: commit.hash.clone(),
                    branch,
                    keyword: None,
                }
                .emit();
                None
            }
        }
    }
}
