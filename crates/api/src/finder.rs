use std::path::{Path, PathBuf};

use crate::error::FinderError;

/// Enumerates root locations that may contain mods.
///
/// A finder makes no promise about how it enumerates (directory scan,
/// classpath scan, configuration-driven list); it only invokes the callback
/// once per discovered root, together with a flag telling the engine whether
/// candidates from that root need remap processing before they can be loaded.
pub trait CandidateFinder: Send + Sync {
    fn find_candidates(
        &self,
        found: &mut dyn FnMut(PathBuf, bool),
    ) -> Result<(), FinderError>;
}

/// Receives directories that should join the broader classpath.
///
/// Used by development launches where a build tool splits one mod across
/// several output directories: a directory with no descriptor is proposed
/// here instead of being rejected.
pub trait ClasspathProposer: Send + Sync {
    fn propose(&self, path: &Path);
}
