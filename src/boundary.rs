use std::fmt;

/// Non-fatal conditions met while classifying commits.
/// Each one means a commit (or the whole range) contributes no signal.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// No new commits since the baseline tag
    NoNewCommits { latest_tag: String },
    /// The platform knows no pull request containing the commit
    NoPullRequest { commit: String },
    /// The pull request branch carries a keyword missing from the table
    UnrecognizedKeyword {
        commit: String,
        branch: String,
        keyword: Option<String>,
    },
    /// The commit belongs to several pull requests; the first one is used
    MultiplePullRequests {
        commit: String,
        used: u64,
        ignored: Vec<u64>,
    },
    /// The platform lookup failed or timed out
    PlatformQueryFailed { commit: String, reason: String },
}

fn short(hash: &str) -> &str {
    hash.get(..7).unwrap_or(hash)
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoNewCommits { latest_tag } => {
                write!(f, "No new commits since tag '{}'", latest_tag)
            }
            BoundaryWarning::NoPullRequest { commit } => {
                write!(f, "Commit {} is not part of any pull request", short(commit))
            }
            BoundaryWarning::UnrecognizedKeyword {
                commit,
                branch,
                keyword,
            } => match keyword {
                Some(keyword) => write!(
                    f,
                    "Commit {}: keyword '{}' from branch '{}' is not configured",
                    short(commit),
                    keyword,
                    branch
                ),
                None => write!(
                    f,
                    "Commit {}: branch '{}' carries no change-type keyword",
                    short(commit),
                    branch
                ),
            },
            BoundaryWarning::MultiplePullRequests {
                commit,
                used,
                ignored,
            } => {
                let ignored: Vec<String> = ignored.iter().map(|n| format!("#{}", n)).collect();
                write!(
                    f,
                    "Commit {} belongs to several pull requests; using #{} and ignoring {}",
                    short(commit),
                    used,
                    ignored.join(", ")
                )
            }
            BoundaryWarning::PlatformQueryFailed { commit, reason } => {
                write!(
                    f,
                    "Pull request lookup failed for commit {}: {}",
                    short(commit),
                    reason
                )
            }
        }
    }
}

impl BoundaryWarning {
    /// Report through tracing; lookup failures are warnings, the rest are
    /// expected in ordinary histories and logged at info.
    pub fn emit(&self) {
        match self {
            BoundaryWarning::PlatformQueryFailed { .. } => tracing::warn!("{}", self),
            _ => tracing::info!("{}", self),
        }
    }
}
