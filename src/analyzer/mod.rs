//! Analysis engine for determining version bumps from pull request branches

pub mod classifier;
pub mod priority;

pub use classifier::{ChangeType, CommitClassifier};
pub use priority::{resolve_highest, KeywordPriorityTable};
