use crate::error::{Result, VersioningError};
use crate::git::{CommitInfo, Repository};
use git2::Oid;
use std::collections::HashMap;

/// Mock repository with a single linear history, for testing without git
pub struct MockRepository {
    /// Oldest first
    history: Vec<(Oid, CommitInfo)>,
    tags: HashMap<String, Oid>,
    remotes: HashMap<String, String>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            history: Vec::new(),
            tags: HashMap::new(),
            remotes: HashMap::new(),
        }
    }

    /// Append a commit on top of the history; it becomes HEAD
    pub fn add_commit(&mut self, oid: Oid, summary: impl Into<String>) {
        self.history
            .push((oid, CommitInfo::new(oid.to_string(), summary)));
    }

    /// Add a tag pointing to an OID
    pub fn add_tag(&mut self, name: impl Into<String>, oid: Oid) {
        self.tags.insert(name.into(), oid);
    }

    /// Configure a remote URL
    pub fn add_remote(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.remotes.insert(name.into(), url.into());
    }

    fn position(&self, oid: Oid) -> Result<usize> {
        self.history
            .iter()
            .position(|(candidate, _)| *candidate == oid)
            .ok_or_else(|| VersioningError::repository(format!("Unknown commit: {}", oid)))
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn head_oid(&self) -> Result<Oid> {
        self.history
            .last()
            .map(|(oid, _)| *oid)
            .ok_or_else(|| VersioningError::repository("Repository has no commits"))
    }

    fn get_commits_between(&self, from_oid: Oid, to_oid: Oid) -> Result<Vec<CommitInfo>> {
        let from = self.position(from_oid)?;
        let to = self.position(to_oid)?;
        if to <= from {
            return Ok(Vec::new());
        }

        Ok(self.history[from + 1..=to]
            .iter()
            .rev()
            .map(|(_, info)| info.clone())
            .collect())
    }

    fn find_tag_oid(&self, tag_name: &str) -> Result<Option<Oid>> {
        Ok(self.tags.get(tag_name).copied())
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        let mut tags: Vec<String> = self.tags.keys().cloned().collect();
        tags.sort();
        Ok(tags)
    }

    fn remote_url(&self, remote: &str) -> Result<Option<String>> {
        Ok(self.remotes.get(remote).cloned())
    }
}
