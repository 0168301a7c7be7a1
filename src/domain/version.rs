use crate::error::{Result, VersioningError};
use std::fmt;
use std::str::FromStr;

/// Version triple extracted from a tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// Create a new version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Bump version according to bump type
    ///
    /// Lower components reset to zero: a major bump clears minor and patch,
    /// a minor bump clears patch. Returns `None` if the bumped component
    /// would overflow.
    pub fn bump(&self, bump_type: VersionBump) -> Option<Self> {
        let next = match bump_type {
            VersionBump::Major => Version {
                major: self.major.checked_add(1)?,
                minor: 0,
                patch: 0,
            },
            VersionBump::Minor => Version {
                major: self.major,
                minor: self.minor.checked_add(1)?,
                patch: 0,
            },
            VersionBump::Patch => Version {
                major: self.major,
                minor: self.minor,
                patch: self.patch.checked_add(1)?,
            },
        };
        Some(next)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Severity of a change. Ordering is `Patch < Minor < Major`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VersionBump {
    Patch,
    Minor,
    Major,
}

impl VersionBump {
    pub const ALL: [VersionBump; 3] = [VersionBump::Patch, VersionBump::Minor, VersionBump::Major];

    pub fn as_str(&self) -> &'static str {
        match self {
            VersionBump::Patch => "patch",
            VersionBump::Minor => "minor",
            VersionBump::Major => "major",
        }
    }
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VersionBump {
    type Err = VersioningError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "patch" => Ok(VersionBump::Patch),
            "minor" => Ok(VersionBump::Minor),
            "major" => Ok(VersionBump::Major),
            other => Err(VersioningError::config(format!(
                "Unknown severity level '{}' (expected patch, minor or major)",
                other
            ))),
        }
    }
}

/// How the severity for a run is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelSelector {
    /// Classify the commits since the baseline tag
    Auto,
    /// Use this level and skip classification
    Fixed(VersionBump),
}

impl FromStr for LevelSelector {
    type Err = VersioningError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(LevelSelector::Auto),
            other => other.parse().map(LevelSelector::Fixed).map_err(|_| {
                VersioningError::config(format!(
                    "Unknown level selector '{}' (expected auto, patch, minor or major)",
                    s
                ))
            }),
        }
    }
}

impl fmt::Display for LevelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelSelector::Auto => f.write_str("auto"),
            LevelSelector::Fixed(level) => level.fmt(f),
        }
    }
}
