//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the read-only Git
//! queries tag-bump needs: listing tags, locating the baseline commit and
//! walking the commits that follow it.
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A linear-history mock for testing
//!
//! ```rust
//! # use tag_bump::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> tag_bump::Result<()> {
//! let head = repo.head_oid()?;
//! if let Some(tag_oid) = repo.find_tag_oid("v1.0.0")? {
//!     let commits = repo.get_commits_between(tag_oid, head)?;
//!     println!("{} commits since v1.0.0", commits.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use git2::Oid;

/// Commit information for classification
#[derive(Debug, Clone, PartialEq)]
pub struct CommitInfo {
    /// The full commit hash
    pub hash: String,
    /// First line of the commit message
    pub summary: String,
}

impl CommitInfo {
    pub fn new(hash: impl Into<String>, summary: impl Into<String>) -> Self {
        CommitInfo {
            hash: hash.into(),
            summary: summary.into(),
        }
    }

    /// Seven-character abbreviation used in log output
    pub fn short_hash(&self) -> &str {
        self.hash.get(..7).unwrap_or(&self.hash)
    }
}

/// Read-only git queries used to resolve the next version
///
/// All methods return [crate::error::Result<T>]; implementations map
/// `git2::Error` through [crate::error::VersioningError::Git].
pub trait Repository {
    /// Get the OID of the commit HEAD points at
    fn head_oid(&self) -> Result<Oid>;

    /// Get commits between two OIDs
    ///
    /// Returns commits reachable from `to_oid` (inclusive) that are not
    /// reachable from `from_oid` (exclusive), most recent first. This is the
    /// `from..to` range of `git log`.
    fn get_commits_between(&self, from_oid: Oid, to_oid: Oid) -> Result<Vec<CommitInfo>>;

    /// Find a tag by name and get the OID of the commit it points at
    ///
    /// Handles both lightweight and annotated tags. Returns `Ok(None)` if
    /// the tag does not exist.
    fn find_tag_oid(&self, tag_name: &str) -> Result<Option<Oid>>;

    /// Get all tag names in the repository
    fn list_tags(&self) -> Result<Vec<String>>;

    /// URL of the named remote, if it is configured
    fn remote_url(&self, remote: &str) -> Result<Option<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_hash() {
        let commit = CommitInfo::new("0123456789abcdef", "subject");
        assert_eq!(commit.short_hash(), "0123456");

        let short = CommitInfo::new("abc", "subject");
        assert_eq!(short.short_hash(), "abc");
    }
}
