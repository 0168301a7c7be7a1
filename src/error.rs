use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for tag-bump operations
#[derive(Error, Debug)]
pub enum VersioningError {
    #[error("Configuration not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid tag template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    #[error("No existing tag matches template '{template}'")]
    NoBaselineTag { template: String },

    #[error("Tag '{tag}' does not match template '{template}'")]
    TemplateMismatch { tag: String, template: String },

    #[error("Cannot apply a {level} bump to '{tag}': version component overflows")]
    VersionOverflow { tag: String, level: String },

    #[error("Keyword '{keyword}' is listed under both '{first}' and '{second}'")]
    DuplicateKeyword {
        keyword: String,
        first: String,
        second: String,
    },

    #[error("Pull request lookup failed for commit {commit}: {reason}")]
    PlatformQueryFailed { commit: String, reason: String },

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in tag-bump
pub type Result<T> = std::result::Result<T, VersioningError>;

impl VersioningError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        VersioningError::Config(msg.into())
    }

    /// Create a template error for `template`
    pub fn invalid_template(template: impl Into<String>, reason: impl Into<String>) -> Self {
        VersioningError::InvalidTemplate {
            template: template.into(),
            reason: reason.into(),
        }
    }

    /// Create a repository resolution error with context
    pub fn repository(msg: impl Into<String>) -> Self {
        VersioningError::Repository(msg.into())
    }

    /// True for errors that come from configuration content rather than
    /// repository state.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            VersioningError::ConfigNotFound(_)
                | VersioningError::Config(_)
                | VersioningError::InvalidTemplate { .. }
                | VersioningError::DuplicateKeyword { .. }
        )
    }
}
