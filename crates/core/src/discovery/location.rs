use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::PathBuf;
use std::sync::Arc;

use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::DiscoveryError;
use crate::metadata::DESCRIPTOR_NAME;

/// Where a location's bytes live. Roots are on disk; nested jars are copied
/// into memory during extraction so the outer archive is never held open.
#[derive(Debug, Clone)]
pub enum LocationSource {
    Disk(PathBuf),
    Memory { name: String, bytes: Arc<[u8]> },
}

/// One place a mod may live: a directory, a jar on disk, or a nested jar
/// extracted into memory. Immutable once created; `depth` counts nesting
/// levels from the finder-submitted root and `requires_remap` is inherited
/// from the finder that discovered the root.
#[derive(Debug, Clone)]
pub struct Location {
    pub source: LocationSource,
    pub depth: u32,
    pub requires_remap: bool,
}

impl Location {
    pub fn root(path: PathBuf, requires_remap: bool) -> Self {
        Self {
            source: LocationSource::Disk(path),
            depth: 0,
            requires_remap,
        }
    }

    /// Child location for a nested jar extracted from this one.
    pub fn nested(&self, name: String, bytes: Arc<[u8]>) -> Self {
        Self {
            source: LocationSource::Memory { name, bytes },
            depth: self.depth + 1,
            requires_remap: self.requires_remap,
        }
    }

    /// The deduplication key: symlink-resolved absolute path for disk
    /// locations, the synthetic `outer!/inner` name for in-memory ones
    /// (unique by construction).
    pub fn canonical_origin(&self) -> Result<String, DiscoveryError> {
        match &self.source {
            LocationSource::Disk(path) => {
                let canonical =
                    std::fs::canonicalize(path).map_err(|e| DiscoveryError::ArchiveIo {
                        origin: path.display().to_string(),
                        source: e,
                    })?;
                Ok(canonical.display().to_string())
            }
            LocationSource::Memory { name, .. } => Ok(name.clone()),
        }
    }

    /// Last path segment, used when synthesizing metadata for a package
    /// without a descriptor.
    pub fn file_name(&self) -> String {
        match &self.source {
            LocationSource::Disk(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            LocationSource::Memory { name, .. } => name
                .rsplit('/')
                .next()
                .unwrap_or(name)
                .to_string(),
        }
    }

    pub fn display_name(&self) -> String {
        match &self.source {
            LocationSource::Disk(path) => path.display().to_string(),
            LocationSource::Memory { name, .. } => name.clone(),
        }
    }
}

pub(crate) trait ReadSeek: Read + Seek + Send {}
impl<T: Read + Seek + Send> ReadSeek for T {}

/// Result of looking up one relative path inside a package.
pub(crate) enum EntryLookup {
    File(Vec<u8>),
    Directory,
    Missing,
}

/// An opened package: a directory on disk or a zip archive (from disk or
/// memory). Opening classifies the location and surfaces unreadable or
/// corrupt archives as this task's fatal error.
pub(crate) enum PackageReader {
    Directory(PathBuf),
    Archive(ZipArchive<Box<dyn ReadSeek>>),
}

fn zip_open_error(origin: &str, error: ZipError) -> DiscoveryError {
    match error {
        ZipError::Io(source) => DiscoveryError::ArchiveIo {
            origin: origin.to_string(),
            source,
        },
        other => DiscoveryError::CorruptArchive {
            origin: origin.to_string(),
            source: other,
        },
    }
}

impl PackageReader {
    pub fn open(location: &Location, origin: &str) -> Result<Self, DiscoveryError> {
        match &location.source {
            LocationSource::Disk(path) if path.is_dir() => Ok(Self::Directory(path.clone())),
            LocationSource::Disk(path) => {
                let file = File::open(path).map_err(|e| DiscoveryError::ArchiveIo {
                    origin: origin.to_string(),
                    source: e,
                })?;
                let archive = ZipArchive::new(Box::new(file) as Box<dyn ReadSeek>)
                    .map_err(|e| zip_open_error(origin, e))?;
                Ok(Self::Archive(archive))
            }
            LocationSource::Memory { bytes, .. } => {
                let cursor = Cursor::new(Arc::clone(bytes));
                let archive = ZipArchive::new(Box::new(cursor) as Box<dyn ReadSeek>)
                    .map_err(|e| zip_open_error(origin, e))?;
                Ok(Self::Archive(archive))
            }
        }
    }

    /// Read the descriptor at its well-known path. `Ok(None)` means the
    /// package ships no descriptor, which is recoverable for the caller.
    pub fn read_descriptor(&mut self, origin: &str) -> Result<Option<Vec<u8>>, DiscoveryError> {
        match self.lookup(DESCRIPTOR_NAME, origin)? {
            EntryLookup::File(bytes) => Ok(Some(bytes)),
            EntryLookup::Directory | EntryLookup::Missing => Ok(None),
        }
    }

    /// Look up a relative, `/`-separated path inside the package.
    pub fn lookup(&mut self, rel: &str, origin: &str) -> Result<EntryLookup, DiscoveryError> {
        match self {
            Self::Directory(dir) => {
                let path = dir.join(rel);
                if path.is_dir() {
                    return Ok(EntryLookup::Directory);
                }
                match std::fs::read(&path) {
                    Ok(bytes) => Ok(EntryLookup::File(bytes)),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(EntryLookup::Missing),
                    Err(e) => Err(DiscoveryError::ArchiveIo {
                        origin: origin.to_string(),
                        source: e,
                    }),
                }
            }
            Self::Archive(archive) => {
                // Resolve the name to an index before opening the entry, so
                // the directory probe below does not overlap a live borrow.
                // Directory entries carry a trailing separator.
                let Some(index) = archive.index_for_name(rel) else {
                    return if archive.index_for_name(&format!("{rel}/")).is_some() {
                        Ok(EntryLookup::Directory)
                    } else {
                        Ok(EntryLookup::Missing)
                    };
                };
                let mut entry = archive
                    .by_index(index)
                    .map_err(|e| zip_open_error(origin, e))?;
                if entry.is_dir() {
                    return Ok(EntryLookup::Directory);
                }
                let mut bytes = Vec::with_capacity(entry.size() as usize);
                entry
                    .read_to_end(&mut bytes)
                    .map_err(|e| DiscoveryError::ArchiveIo {
                        origin: origin.to_string(),
                        source: e,
                    })?;
                Ok(EntryLookup::File(bytes))
            }
        }
    }
}
