use crate::error::{Result, VersioningError};
use crate::git::CommitInfo;
use git2::{ObjectType, Oid, Repository as Git2Repo, Sort};
use std::path::Path;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path.as_ref()).map_err(|e| {
            VersioningError::repository(format!(
                "Not in a git repository ({}): {}",
                path.as_ref().display(),
                e.message()
            ))
        })?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }
}

impl super::Repository for Git2Repository {
    fn head_oid(&self) -> Result<Oid> {
        let head = self.repo.head()?;
        let commit = head.peel_to_commit()?;
        Ok(commit.id())
    }

    fn get_commits_between(&self, from_oid: Oid, to_oid: Oid) -> Result<Vec<CommitInfo>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(to_oid)?;
        revwalk.hide(from_oid)?;

        let mut commits = Vec::new();

        for oid_result in revwalk {
            let oid = oid_result?;
            let commit = self.repo.find_commit(oid)?;
            let summary = commit.summary().unwrap_or("(empty message)").to_string();

            commits.push(CommitInfo::new(oid.to_string(), summary));
        }

        Ok(commits)
    }

    fn find_tag_oid(&self, tag_name: &str) -> Result<Option<Oid>> {
        let reference_name = format!("refs/tags/{}", tag_name);

        match self.repo.find_reference(&reference_name) {
            Ok(reference) => {
                let oid = reference.peel(ObjectType::Commit)?.id();
                Ok(Some(oid))
            }
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(None)?;

        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn remote_url(&self, remote: &str) -> Result<Option<String>> {
        match self.repo.find_remote(remote) {
            Ok(remote) => Ok(remote.url().map(|url| url.to_string())),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::Repository;
    use git2::Signature;
    use tempfile::TempDir;

    fn commit(repo: &Git2Repo, message: &str, parents: &[Oid]) -> Oid {
        let sig = Signature::now("Test User", "test@example.com").unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let parents: Vec<_> = parents
            .iter()
            .map(|oid| repo.find_commit(*oid).unwrap())
            .collect();
        let parent_refs: Vec<_> = parents.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
            .unwrap()
    }

    #[test]
    fn test_range_excludes_tagged_commit() {
        let dir = TempDir::new().unwrap();
        let raw = Git2Repo::init(dir.path()).unwrap();
        let first = commit(&raw, "initial", &[]);
        raw.tag_lightweight("v1.0.0", &raw.find_object(first, None).unwrap(), false)
            .unwrap();
        let second = commit(&raw, "second", &[first]);
        let third = commit(&raw, "third", &[second]);

        let repo = Git2Repository::from_git2(raw);
        let tag_oid = repo.find_tag_oid("v1.0.0").unwrap().unwrap();
        assert_eq!(tag_oid, first);
        assert_eq!(repo.head_oid().unwrap(), third);

        let commits = repo.get_commits_between(tag_oid, third).unwrap();
        let hashes: Vec<_> = commits.iter().map(|c| c.hash.clone()).collect();
        assert_eq!(hashes, vec![third.to_string(), second.to_string()]);
        assert_eq!(commits[0].summary, "third");
    }

    #[test]
    fn test_annotated_tag_peels_to_commit() {
        let dir = TempDir::new().unwrap();
        let raw = Git2Repo::init(dir.path()).unwrap();
        let first = commit(&raw, "initial", &[]);
        let sig = Signature::now("Test User", "test@example.com").unwrap();
        raw.tag(
            "v2.0.0",
            &raw.find_object(first, None).unwrap(),
            &sig,
            "release",
            false,
        )
        .unwrap();

        let repo = Git2Repository::from_git2(raw);
        assert_eq!(repo.find_tag_oid("v2.0.0").unwrap(), Some(first));
        assert_eq!(repo.find_tag_oid("v9.9.9").unwrap(), None);
        assert_eq!(repo.list_tags().unwrap(), vec!["v2.0.0".to_string()]);
    }

    #[test]
    fn test_remote_url() {
        let dir = TempDir::new().unwrap();
        let raw = Git2Repo::init(dir.path()).unwrap();
        raw.remote("origin", "git@github.com:acme/widgets.git")
            .unwrap();

        let repo = Git2Repository::from_git2(raw);
        assert_eq!(
            repo.remote_url("origin").unwrap().as_deref(),
            Some("git@github.com:acme/widgets.git")
        );
        assert_eq!(repo.remote_url("upstream").unwrap(), None);
    }

    #[test]
    fn test_open_outside_repository() {
        let dir = TempDir::new().unwrap();
        // A path that does not exist cannot be discovered, whatever encloses it
        let missing = dir.path().join("no-such-dir");
        match Git2Repository::open(&missing) {
            Err(err) => {
                assert!(matches!(err, VersioningError::Repository(_)));
                assert!(err.to_string().contains("Not in a git repository"));
            }
            Ok(_) => panic!("opened a repository at {}", missing.display()),
        }
    }
}
