use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A mod version as declared in the descriptor.
///
/// Versions that parse as semantic versions compare by release ordering;
/// anything else is kept verbatim and compares lexically. The two families
/// still form one total order (semantic sorts above raw) so candidate
/// selection stays deterministic whatever people put in their descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Version {
    Semantic(semver::Version),
    Raw(String),
}

impl Version {
    pub fn parse(raw: &str) -> Self {
        match semver::Version::parse(raw) {
            Ok(version) => Version::Semantic(version),
            Err(_) => Version::Raw(raw.to_string()),
        }
    }
}

impl From<String> for Version {
    fn from(raw: String) -> Self {
        Version::parse(&raw)
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.to_string()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Version::Semantic(version) => write!(f, "{version}"),
            Version::Raw(raw) => f.write_str(raw),
        }
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Version::Semantic(a), Version::Semantic(b)) => a.cmp(b),
            (Version::Semantic(_), Version::Raw(_)) => Ordering::Greater,
            (Version::Raw(_), Version::Semantic(_)) => Ordering::Less,
            (Version::Raw(a), Version::Raw(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A version-range constraint attached to a dependency relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionRange {
    req: semver::VersionReq,
}

impl VersionRange {
    pub fn any() -> Self {
        Self {
            req: semver::VersionReq::STAR,
        }
    }

    /// Raw versions only satisfy the wildcard range; numeric matching is
    /// meaningless for them.
    pub fn matches(&self, version: &Version) -> bool {
        match version {
            Version::Semantic(version) => self.req.matches(version),
            Version::Raw(_) => self.req == semver::VersionReq::STAR,
        }
    }
}

impl TryFrom<String> for VersionRange {
    type Error = semver::Error;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Ok(Self {
            req: semver::VersionReq::parse(&raw)?,
        })
    }
}

impl From<VersionRange> for String {
    fn from(range: VersionRange) -> Self {
        range.req.to_string()
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.req)
    }
}
