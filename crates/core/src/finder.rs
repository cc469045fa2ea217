use std::path::PathBuf;

use quarry_api::{CandidateFinder, FinderError};
use tracing::debug;
use walkdir::WalkDir;

/// Scans one directory, non-recursively, for `*.jar` mod archives and
/// directory-form mods. The standard launch path: everything found here
/// needs remapping unless the game runs in a development workspace.
pub struct DirectoryModFinder {
    dir: PathBuf,
    requires_remap: bool,
}

impl DirectoryModFinder {
    pub fn new(dir: PathBuf, requires_remap: bool) -> Self {
        Self { dir, requires_remap }
    }
}

impl CandidateFinder for DirectoryModFinder {
    fn find_candidates(&self, found: &mut dyn FnMut(PathBuf, bool)) -> Result<(), FinderError> {
        if !self.dir.exists() {
            std::fs::create_dir_all(&self.dir)?;
            debug!("created empty mod directory {}", self.dir.display());
            return Ok(());
        }
        for entry in WalkDir::new(&self.dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| FinderError::Scan(e.to_string()))?;
            let path = entry.path();
            let is_jar = path.is_file() && path.extension().is_some_and(|ext| ext == "jar");
            if is_jar || path.is_dir() {
                found(path.to_path_buf(), self.requires_remap);
            }
        }
        Ok(())
    }
}

/// Yields an explicit list of classpath roots (directories or jars), as a
/// development launch does; classpath entries never need remapping.
pub struct ClasspathEntryFinder {
    entries: Vec<PathBuf>,
}

impl ClasspathEntryFinder {
    pub fn new(entries: Vec<PathBuf>) -> Self {
        Self { entries }
    }
}

impl CandidateFinder for ClasspathEntryFinder {
    fn find_candidates(&self, found: &mut dyn FnMut(PathBuf, bool)) -> Result<(), FinderError> {
        for entry in &self.entries {
            found(entry.clone(), false);
        }
        Ok(())
    }
}
