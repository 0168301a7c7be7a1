//! Domain logic - pure business rules independent of git and the hosting platform

pub mod branch;
pub mod tag;
pub mod version;

pub use branch::BranchContext;
pub use tag::{find_latest_matching_tag, increment, VersionTag, VersionTemplate};
pub use version::{LevelSelector, Version, VersionBump};
