use crate::analyzer::classifier::{ChangeType, CommitClassifier};
use crate::boundary::BoundaryWarning;
use crate::config::KeywordConfig;
use crate::domain::VersionBump;
use crate::error::{Result, VersioningError};
use crate::git::CommitInfo;
use std::collections::HashMap;
use std::thread;

/// Keyword -> severity lookup built from `[keyword]` configuration
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KeywordPriorityTable {
    levels: HashMap<String, VersionBump>,
}

impl KeywordPriorityTable {
    /// Invert the level -> keywords configuration.
    ///
    /// A keyword listed under two different levels is rejected with
    /// [VersioningError::DuplicateKeyword]. Repeating a keyword within one
    /// level is harmless.
    pub fn build(config: &KeywordConfig) -> Result<Self> {
        let mut levels: HashMap<String, VersionBump> = HashMap::new();

        let groups = [
            (VersionBump::Patch, &config.patch),
            (VersionBump::Minor, &config.minor),
            (VersionBump::Major, &config.major),
        ];

        for (level, keywords) in groups {
            for keyword in keywords {
                let keyword = keyword.trim();
                if keyword.is_empty() {
                    return Err(VersioningError::config(format!(
                        "Empty keyword under '{}'",
                        level
                    )));
                }

                match levels.get(keyword) {
                    Some(existing) if *existing != level => {
                        return Err(VersioningError::DuplicateKeyword {
                            keyword: keyword.to_string(),
                            first: existing.to_string(),
                            second: level.to_string(),
                        });
                    }
                    Some(_) => {}
                    None => {
                        levels.insert(keyword.to_string(), level);
                    }
                }
            }
        }

        Ok(KeywordPriorityTable { levels })
    }

    /// Severity for a keyword; unknown keywords carry no signal
    pub fn level_of(&self, keyword: &str) -> Option<VersionBump> {
        self.levels.get(keyword).copied()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Severity contributed by one commit, if any
fn commit_level(
    commit: &CommitInfo,
    table: &KeywordPriorityTable,
    classifier: &CommitClassifier<'_>,
) -> Option<VersionBump> {
    let ChangeType {
        keyword, branch, ..
    } = classifier.resolve_change_type(commit)?;

    let level = table.level_of(&keyword);
    if level.is_none() {
        BoundaryWarning::UnrecognizedKeyword {
            commit: commit.hash.clone(),
            branch,
            keyword: Some(keyword),
        }
        .emit();
    }
    level
}

/// Highest severity among `commits`, or `None` when no commit carries a
/// signal.
///
/// The reduction is a plain maximum, so commit order and the classifier's
/// concurrency never change the result.
pub fn resolve_highest(
    commits: &[CommitInfo],
    table: &KeywordPriorityTable,
    classifier: &CommitClassifier<'_>,
) -> Option<VersionBump> {
    let level_of = |commit: &CommitInfo| commit_level(commit, table, classifier);
    let workers = classifier.concurrency().min(commits.len());

    if workers <= 1 {
        return commits.iter().filter_map(level_of).max();
    }

    let chunk_size = commits.len().div_ceil(workers);
    thread::scope(|scope| {
        let handles: Vec<_> = commits
            .chunks(chunk_size)
            .map(|chunk| scope.spawn(move || chunk.iter().filter_map(level_of).max()))
            .collect();

        handles
            .into_iter()
            .filter_map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
            })
            .max()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MockPullRequestSource;

    fn keywords(patch: &[&str], minor: &[&str], major: &[&str]) -> KeywordConfig {
        let owned = |list: &[&str]| list.iter().map(|s| s.to_string()).collect();
        KeywordConfig {
            patch: owned(patch),
            minor: owned(minor),
            major: owned(major),
        }
    }

    fn default_table() -> KeywordPriorityTable {
        KeywordPriorityTable::build(&keywords(
            &["fix", "refactor"],
            &["feat"],
            &["breaking"],
        ))
        .unwrap()
    }

    #[test]
    fn test_build_inverts_levels() {
        let table = default_table();
        assert_eq!(table.len(), 4);
        assert_eq!(table.level_of("fix"), Some(VersionBump::Patch));
        assert_eq!(table.level_of("refactor"), Some(VersionBump::Patch));
        assert_eq!(table.level_of("feat"), Some(VersionBump::Minor));
        assert_eq!(table.level_of("breaking"), Some(VersionBump::Major));
        assert_eq!(table.level_of("docs"), None);
    }

    #[test]
    fn test_duplicate_keyword_rejected() {
        let result = KeywordPriorityTable::build(&keywords(&["fix"], &["feat", "fix"], &[]));
        match result {
            Err(VersioningError::DuplicateKeyword {
                keyword,
                first,
                second,
            }) => {
                assert_eq!(keyword, "fix");
                assert_eq!(first, "patch");
                assert_eq!(second, "minor");
            }
            other => panic!("expected DuplicateKeyword, got {:?}", other),
        }
    }

    #[test]
    fn test_repeat_within_level_allowed() {
        let table = KeywordPriorityTable::build(&keywords(&["fix", "fix"], &[], &[])).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_empty_keyword_rejected() {
        assert!(KeywordPriorityTable::build(&keywords(&[" "], &[], &[])).is_err());
    }

    fn scenario() -> (Vec<CommitInfo>, MockPullRequestSource) {
        let mut source = MockPullRequestSource::new();
        source.add_pull("a", 1, "feat/a");
        source.add_pull("b", 2, "fix/b");
        source.add_pull("c", 3, "breaking/c");
        let commits = vec![
            CommitInfo::new("a", "A"),
            CommitInfo::new("b", "B"),
            CommitInfo::new("c", "C"),
        ];
        (commits, source)
    }

    #[test]
    fn test_highest_is_order_independent() {
        let (commits, source) = scenario();
        let table = default_table();
        let classifier = CommitClassifier::new(&source);

        let orders = [[0, 1, 2], [2, 1, 0], [1, 2, 0], [1, 0, 2]];
        for order in orders {
            let ordered: Vec<_> = order.iter().map(|i| commits[*i].clone()).collect();
            assert_eq!(
                resolve_highest(&ordered, &table, &classifier),
                Some(VersionBump::Major)
            );
        }
    }

    #[test]
    fn test_highest_with_concurrency_matches_sequential() {
        let (commits, source) = scenario();
        let table = default_table();

        for workers in 1..=4 {
            let classifier = CommitClassifier::new(&source).with_concurrency(workers);
            assert_eq!(
                resolve_highest(&commits, &table, &classifier),
                Some(VersionBump::Major)
            );
        }
        // 4 runs x 3 commits
        assert_eq!(source.queried().len(), 12);
    }

    #[test]
    fn test_unsignalled_commits_do_not_lower_result() {
        let mut source = MockPullRequestSource::new();
        source.add_pull("a", 1, "feat/a");
        source.add_pull("b", 2, "docs/readme");
        source.add_failure("c", 500, "boom");
        let commits = vec![
            CommitInfo::new("a", "A"),
            CommitInfo::new("b", "B"),
            CommitInfo::new("c", "C"),
            CommitInfo::new("d", "no pull request"),
        ];

        let classifier = CommitClassifier::new(&source);
        assert_eq!(
            resolve_highest(&commits, &default_table(), &classifier),
            Some(VersionBump::Minor)
        );
    }

    #[test]
    fn test_no_signal() {
        let mut source = MockPullRequestSource::new();
        source.add_pull("a", 1, "chore/deps");
        let commits = vec![CommitInfo::new("a", "A"), CommitInfo::new("b", "B")];

        let classifier = CommitClassifier::new(&source);
        assert_eq!(resolve_highest(&commits, &default_table(), &classifier), None);
        assert_eq!(resolve_highest(&[], &default_table(), &classifier), None);
    }
}
