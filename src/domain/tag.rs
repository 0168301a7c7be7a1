use crate::domain::version::{Version, VersionBump};
use crate::error::{Result, VersioningError};
use regex::Regex;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Component {
    Major,
    Minor,
    Patch,
}

impl Component {
    fn from_placeholder(name: &str) -> Option<Self> {
        match name {
            "major" => Some(Component::Major),
            "minor" => Some(Component::Minor),
            "patch" => Some(Component::Patch),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Component::Major => "major",
            Component::Minor => "minor",
            Component::Patch => "patch",
        }
    }

    fn value(&self, version: &Version) -> u64 {
        match self {
            Component::Major => version.major,
            Component::Minor => version.minor,
            Component::Patch => version.patch,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Component),
}

/// Tag naming template (e.g. "v{major}.{minor}.{patch}", "release/{major}.{minor}.{patch}")
///
/// Each of `{major}`, `{minor}` and `{patch}` must appear exactly once and
/// be separated from its neighbours by at least one literal character. A
/// literal may not touch a placeholder with a digit, so that a formatted tag
/// always parses back to the same triple.
#[derive(Debug, Clone)]
pub struct VersionTemplate {
    source: String,
    segments: Vec<Segment>,
    regex: Regex,
}

impl VersionTemplate {
    /// Compile a template into an anchored matching pattern
    pub fn compile(template: &str) -> Result<Self> {
        let invalid = |reason: String| VersioningError::invalid_template(template, reason);

        let mut segments = Vec::new();
        let mut seen: Vec<Component> = Vec::new();
        let mut rest = template;

        while !rest.is_empty() {
            match rest.find(['{', '}']) {
                None => {
                    segments.push(Segment::Literal(rest.to_string()));
                    rest = "";
                }
                Some(pos) => {
                    if pos > 0 {
                        segments.push(Segment::Literal(rest[..pos].to_string()));
                    }
                    let tail = &rest[pos..];
                    if tail.starts_with('}') {
                        return Err(invalid("unmatched '}'".to_string()));
                    }
                    let close = tail
                        .find('}')
                        .ok_or_else(|| invalid("unclosed '{'".to_string()))?;
                    let name = &tail[1..close];
                    if name.contains('{') {
                        return Err(invalid("nested '{'".to_string()));
                    }
                    let component = Component::from_placeholder(name)
                        .ok_or_else(|| invalid(format!("unknown placeholder '{{{}}}'", name)))?;
                    if seen.contains(&component) {
                        return Err(invalid(format!(
                            "placeholder '{{{}}}' appears more than once",
                            component.name()
                        )));
                    }
                    if matches!(segments.last(), Some(Segment::Field(_))) {
                        return Err(invalid(
                            "placeholders must be separated by a literal".to_string(),
                        ));
                    }
                    seen.push(component);
                    segments.push(Segment::Field(component));
                    rest = &tail[close + 1..];
                }
            }
        }

        for required in [Component::Major, Component::Minor, Component::Patch] {
            if !seen.contains(&required) {
                return Err(invalid(format!(
                    "missing placeholder '{{{}}}'",
                    required.name()
                )));
            }
        }

        for pair in segments.windows(2) {
            let digit_edge = match pair {
                [Segment::Literal(text), Segment::Field(_)] => {
                    text.ends_with(|c: char| c.is_ascii_digit())
                }
                [Segment::Field(_), Segment::Literal(text)] => {
                    text.starts_with(|c: char| c.is_ascii_digit())
                }
                _ => false,
            };
            if digit_edge {
                return Err(invalid(
                    "a digit must not be adjacent to a placeholder".to_string(),
                ));
            }
        }

        let mut pattern = String::from("^");
        for segment in &segments {
            match segment {
                Segment::Literal(text) => pattern.push_str(&regex::escape(text)),
                Segment::Field(component) => {
                    pattern.push_str(&format!(r"(?P<{}>\d+)", component.name()))
                }
            }
        }
        pattern.push('$');

        let regex = Regex::new(&pattern).map_err(|e| invalid(e.to_string()))?;

        Ok(VersionTemplate {
            source: template.to_string(),
            segments,
            regex,
        })
    }

    /// The template text as configured
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether `tag` conforms to this template
    pub fn matches(&self, tag: &str) -> bool {
        self.regex.is_match(tag)
    }

    /// Extract the version triple from a tag, if it conforms
    pub fn parse(&self, tag: &str) -> Option<Version> {
        let captures = self.regex.captures(tag)?;
        let field = |name: &str| captures.name(name)?.as_str().parse::<u64>().ok();

        Some(Version::new(field("major")?, field("minor")?, field("patch")?))
    }

    /// Format a version according to template
    /// Example: template="v{major}.{minor}.{patch}", version=1.2.3 -> "v1.2.3"
    pub fn format(&self, version: &Version) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => text.clone(),
                Segment::Field(component) => component.value(version).to_string(),
            })
            .collect()
    }
}

impl fmt::Display for VersionTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// An existing tag together with the version parsed from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionTag {
    pub name: String,
    pub version: Version,
}

impl VersionTag {
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        VersionTag {
            name: name.into(),
            version,
        }
    }
}

/// Find the highest tag conforming to `template`.
///
/// Tags are compared by their numeric (major, minor, patch) triple, never as
/// strings. Two tags with the same triple (e.g. `v1.02.0` and `v1.2.0`) are
/// broken by name so the result does not depend on input order.
pub fn find_latest_matching_tag<I, S>(tags: I, template: &VersionTemplate) -> Option<VersionTag>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .filter_map(|tag| {
            let name = tag.as_ref();
            template
                .parse(name)
                .map(|version| VersionTag::new(name, version))
        })
        .max_by(|a, b| {
            a.version
                .cmp(&b.version)
                .then_with(|| a.name.cmp(&b.name))
        })
}

/// Apply `level` to the baseline tag and render the next tag name.
pub fn increment(
    baseline: Option<&VersionTag>,
    level: VersionBump,
    template: &VersionTemplate,
) -> Result<String> {
    let tag = baseline.ok_or_else(|| VersioningError::NoBaselineTag {
        template: template.as_str().to_string(),
    })?;

    let current = template
        .parse(&tag.name)
        .ok_or_else(|| VersioningError::TemplateMismatch {
            tag: tag.name.clone(),
            template: template.as_str().to_string(),
        })?;

    let next = current
        .bump(level)
        .ok_or_else(|| VersioningError::VersionOverflow {
            tag: tag.name.clone(),
            level: level.to_string(),
        })?;

    Ok(template.format(&next))
}
