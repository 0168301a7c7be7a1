//! Version resolution workflow
//!
//! The [Driver] owns the validated configuration and the repository and runs
//! the resolution in order: find the baseline tag, decide the severity
//! (classify commits or take an explicit level), then increment. It never
//! reads the environment; everything arrives through its constructor and
//! [LevelSource].

use crate::analyzer::{resolve_highest, CommitClassifier, KeywordPriorityTable};
use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::domain::{find_latest_matching_tag, increment, VersionBump, VersionTag, VersionTemplate};
use crate::error::{Result, VersioningError};
use crate::git::Repository;
use crate::platform::PullRequestSource;

/// Where the severity for a run comes from
pub enum LevelSource<'a> {
    /// Classify commits since the baseline through this platform
    Auto(&'a dyn PullRequestSource),
    /// Use a caller-supplied level; no commit is inspected
    Fixed(VersionBump),
}

/// Outcome of a resolution
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// A new tag should be created
    Bump {
        level: VersionBump,
        baseline: VersionTag,
        next: String,
    },
    /// No commit carried a signal; nothing to release
    NoBump { baseline: Option<VersionTag> },
}

impl Resolution {
    /// Token printed on stdout: the next version, or `none`
    pub fn output_token(&self) -> &str {
        match self {
            Resolution::Bump { next, .. } => next,
            Resolution::NoBump { .. } => "none",
        }
    }

    /// Token printed in level-only mode: `patch`, `minor`, `major` or `none`
    pub fn level_token(&self) -> &'static str {
        match self {
            Resolution::Bump { level, .. } => level.as_str(),
            Resolution::NoBump { .. } => "none",
        }
    }
}

/// Resolves the next version tag for one repository
pub struct Driver<R: Repository> {
    config: Config,
    template: VersionTemplate,
    table: KeywordPriorityTable,
    repo: R,
}

impl<R: Repository> Driver<R> {
    /// Validate configuration up front: template and keyword errors surface
    /// here, before any git or network access.
    pub fn new(config: Config, repo: R) -> Result<Self> {
        let template = VersionTemplate::compile(&config.tag_format)?;
        let table = KeywordPriorityTable::build(&config.keyword)?;

        Ok(Driver {
            config,
            template,
            table,
            repo,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn template(&self) -> &VersionTemplate {
        &self.template
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Highest existing tag conforming to the configured template
    pub fn latest_tag(&self) -> Result<Option<VersionTag>> {
        let tags = self.repo.list_tags()?;
        Ok(find_latest_matching_tag(&tags, &self.template))
    }

    /// Severity from the pull requests of commits in `baseline..HEAD`
    pub fn classify_since(
        &self,
        baseline: &VersionTag,
        source: &dyn PullRequestSource,
    ) -> Result<Option<VersionBump>> {
        let from = self.repo.find_tag_oid(&baseline.name)?.ok_or_else(|| {
            VersioningError::repository(format!("Tag '{}' disappeared", baseline.name))
        })?;
        let head = self.repo.head_oid()?;
        let commits = self.repo.get_commits_between(from, head)?;

        if commits.is_empty() {
            BoundaryWarning::NoNewCommits {
                latest_tag: baseline.name.clone(),
            }
            .emit();
            return Ok(None);
        }

        tracing::info!(
            count = commits.len(),
            baseline = %baseline.name,
            "classifying commits"
        );

        let classifier =
            CommitClassifier::new(source).with_concurrency(self.config.github.concurrency);
        Ok(resolve_highest(&commits, &self.table, &classifier))
    }

    /// Run the full resolution
    pub fn run(&self, level_source: LevelSource<'_>) -> Result<Resolution> {
        let baseline = self.latest_tag()?;
        match &baseline {
            Some(tag) => tracing::info!(tag = %tag.name, version = %tag.version, "baseline tag"),
            None => tracing::info!(template = %self.template, "no tag matches template"),
        }

        let level = match level_source {
            LevelSource::Fixed(level) => Some(level),
            LevelSource::Auto(source) => {
                let tag = baseline
                    .as_ref()
                    .ok_or_else(|| VersioningError::NoBaselineTag {
                        template: self.template.as_str().to_string(),
                    })?;
                self.classify_since(tag, source)?
            }
        };

        let Some(level) = level else {
            tracing::info!("no commit carries a version signal");
            return Ok(Resolution::NoBump { baseline });
        };

        let next = increment(baseline.as_ref(), level, &self.template)?;
        tracing::info!(%level, %next, "resolved next version");

        let baseline = baseline.ok_or_else(|| VersioningError::NoBaselineTag {
            template: self.template.as_str().to_string(),
        })?;

        Ok(Resolution::Bump {
            level,
            baseline,
            next,
        })
    }
}
