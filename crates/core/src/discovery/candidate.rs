use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::metadata::ModMetadata;

/// One discovered package instance, tied to the canonical origin it was found
/// at. Immutable after creation; duplicates are detected purely by origin.
#[derive(Debug, Clone, Serialize)]
pub struct ModCandidate {
    pub metadata: Arc<ModMetadata>,
    /// Canonical origin string; the deduplication key.
    pub origin: String,
    pub depth: u32,
    pub requires_remap: bool,
}

impl ModCandidate {
    pub fn new(metadata: Arc<ModMetadata>, origin: String, depth: u32, requires_remap: bool) -> Self {
        Self {
            metadata,
            origin,
            depth,
            requires_remap,
        }
    }

    pub fn id(&self) -> &str {
        &self.metadata.id
    }

    /// Selection ranking between two candidates for the same id. Total and
    /// independent of discovery order: newest version first, then the
    /// shallower nesting depth, then candidates that need no remapping, and
    /// finally the ascending canonical origin as a stable last resort.
    pub fn selection_cmp(&self, other: &Self) -> Ordering {
        other
            .metadata
            .version
            .cmp(&self.metadata.version)
            .then_with(|| self.depth.cmp(&other.depth))
            .then_with(|| self.requires_remap.cmp(&other.requires_remap))
            .then_with(|| self.origin.cmp(&other.origin))
    }
}

impl fmt::Display for ModCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({})",
            self.metadata.id, self.metadata.version, self.origin
        )
    }
}

/// All non-duplicate candidates seen for one id. Created lazily on the first
/// sighting, grows monotonically while discovery runs (guarded by the
/// surrounding map's per-key entry lock), then is reduced to a single winner.
#[derive(Debug, Default)]
pub struct CandidateSet {
    origins: HashSet<String>,
    candidates: Vec<ModCandidate>,
}

impl CandidateSet {
    /// Register a candidate. Returns false (and does nothing) when this
    /// origin was already registered, so duplicate submissions are no-ops.
    pub fn add(&mut self, candidate: ModCandidate) -> bool {
        if !self.origins.insert(candidate.origin.clone()) {
            return false;
        }
        self.candidates.push(candidate);
        true
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Reduce to the winner under the selection ranking.
    pub fn select(&self) -> Option<&ModCandidate> {
        self.candidates.iter().min_by(|a, b| a.selection_cmp(b))
    }
}
