pub mod ident;
pub mod version;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::DiscoveryError;

pub use ident::{MAX_ID_LENGTH, MIN_ID_LENGTH, validate_id};
pub use version::{Version, VersionRange};

/// Well-known relative path of the descriptor inside every mod location.
pub const DESCRIPTOR_NAME: &str = "quarry.mod.json";

/// Newest descriptor schema this engine understands. Winners declaring an
/// older schema get an advisory warning after selection.
pub const LATEST_SCHEMA_VERSION: u32 = 1;

/// Ids synthesized for packages shipping no descriptor start with this, which
/// keeps them out of the grammar's way of ordinary mods.
pub const SYNTHESIZED_ID_PREFIX: &str = "unmanaged";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Client,
    Server,
    #[default]
    #[serde(alias = "*")]
    Universal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedJarEntry {
    pub file: String,
}

/// Parsed mod descriptor. Immutable once constructed; shared between
/// concurrently running discovery tasks behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModMetadata {
    #[serde(default)]
    pub schema_version: u32,
    pub id: String,
    pub version: Version,
    #[serde(default)]
    pub provides: Vec<String>,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub entrypoints: BTreeMap<String, Vec<String>>,
    #[serde(default, rename = "nestedJars")]
    pub jars: Vec<NestedJarEntry>,
    #[serde(default)]
    pub depends: BTreeMap<String, VersionRange>,
    #[serde(default)]
    pub recommends: BTreeMap<String, VersionRange>,
    #[serde(default)]
    pub suggests: BTreeMap<String, VersionRange>,
    #[serde(default)]
    pub conflicts: BTreeMap<String, VersionRange>,
    #[serde(default)]
    pub breaks: BTreeMap<String, VersionRange>,
    /// Pre-schema-1 spelling of `depends`. Still accepted, but flagged.
    #[serde(default)]
    pub requires: BTreeMap<String, VersionRange>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub custom_values: BTreeMap<String, serde_json::Value>,
}

impl ModMetadata {
    /// Parse a descriptor blob. Malformed syntax and missing required fields
    /// are both fatal: a broken descriptor means an unusable package the user
    /// has to fix, unlike a missing one (see [`ModMetadata::synthesize`]).
    pub fn parse(bytes: &[u8], origin: &str) -> Result<Self, DiscoveryError> {
        serde_json::from_slice(bytes).map_err(|e| DiscoveryError::InvalidMetadata {
            origin: origin.to_string(),
            reason: e.to_string(),
        })
    }

    /// Placeholder metadata for a package carrying no descriptor at all:
    /// the id is derived from the file name (extension stripped, lowercased,
    /// every character outside `a-z` dropped) behind a fixed prefix, the
    /// version is a fixed default and every optional collection is empty.
    pub fn synthesize(file_name: &str) -> Self {
        let stem = std::path::Path::new(file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(file_name);
        let derived: String = stem
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_lowercase())
            .collect();

        Self {
            schema_version: LATEST_SCHEMA_VERSION,
            id: format!("{SYNTHESIZED_ID_PREFIX}{derived}"),
            version: Version::parse("1.0.0"),
            provides: Vec::new(),
            environment: Environment::Universal,
            entrypoints: BTreeMap::new(),
            jars: Vec::new(),
            depends: BTreeMap::new(),
            recommends: BTreeMap::new(),
            suggests: BTreeMap::new(),
            conflicts: BTreeMap::new(),
            breaks: BTreeMap::new(),
            requires: BTreeMap::new(),
            name: None,
            description: None,
            custom_values: BTreeMap::new(),
        }
    }

    /// Advisory format problems to surface for a winning candidate. These
    /// never change the resolution result.
    pub fn format_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if !self.requires.is_empty() {
            warnings.push(
                "uses the deprecated `requires` relation, rename it to `depends`".to_string(),
            );
        }
        warnings
    }
}
