use std::sync::{Arc, Mutex, PoisonError};

use dashmap::DashMap;
use futures::FutureExt;
use futures::future::BoxFuture;
use quarry_api::ClasspathProposer;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::discovery::cache::{ExtractedJar, ExtractionCache};
use crate::discovery::candidate::{CandidateSet, ModCandidate};
use crate::discovery::location::{EntryLookup, Location, PackageReader};
use crate::error::{DiscoveryError, IdentifierKind};
use crate::metadata::{DESCRIPTOR_NAME, ModMetadata, NestedJarEntry, validate_id};

/// State shared by every task of one resolution sweep. The candidate map and
/// the extraction cache are the only mutable shared structures; both give
/// atomic insert-if-absent semantics keyed by a stable identity.
pub(crate) struct DiscoveryState {
    pub candidates: DashMap<String, CandidateSet>,
    pub cache: ExtractionCache,
    pub limiter: Arc<Semaphore>,
    pub failures: Mutex<Vec<DiscoveryError>>,
    pub proposer: Option<Arc<dyn ClasspathProposer>>,
    pub development: bool,
}

impl DiscoveryState {
    pub fn record_failure(&self, error: DiscoveryError) {
        warn!("discovery task failed: {error}");
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(error);
    }
}

/// Run one discovery task and, recursively, every child task it spawns for
/// extracted nested jars. The permit bounds only the blocking scan, so a
/// parent awaiting its children never starves the pool; the parent completes
/// only after all of its children have (structured join). Failures go to the
/// shared collector instead of aborting siblings.
pub(crate) fn run(state: Arc<DiscoveryState>, location: Location) -> BoxFuture<'static, ()> {
    async move {
        let display = location.display_name();
        let Ok(permit) = Arc::clone(&state.limiter).acquire_owned().await else {
            return;
        };

        let scan = {
            let state = Arc::clone(&state);
            tokio::task::spawn_blocking(move || scan_location(&state, location))
        };
        let children = match scan.await {
            Ok(Ok(children)) => children,
            Ok(Err(error)) => {
                state.record_failure(error);
                Vec::new()
            }
            Err(join_error) => {
                state.record_failure(DiscoveryError::TaskPanic {
                    origin: display.clone(),
                    reason: join_error.to_string(),
                });
                Vec::new()
            }
        };
        drop(permit);

        if children.is_empty() {
            return;
        }
        let handles: Vec<_> = children
            .into_iter()
            .map(|child| tokio::spawn(run(Arc::clone(&state), child)))
            .collect();
        for handle in handles {
            if let Err(join_error) = handle.await {
                state.record_failure(DiscoveryError::TaskPanic {
                    origin: display.clone(),
                    reason: join_error.to_string(),
                });
            }
        }
    }
    .boxed()
}

/// The blocking body of one task: canonicalize, classify and open the
/// location, parse (or synthesize) its metadata, validate identifiers,
/// register the candidate and extract declared nested jars. Returns the
/// child locations to scan next.
fn scan_location(
    state: &DiscoveryState,
    location: Location,
) -> Result<Vec<Location>, DiscoveryError> {
    let origin = location.canonical_origin()?;
    debug!("testing {origin}");

    let mut reader = PackageReader::open(&location, &origin)?;

    if state.development {
        if let PackageReader::Directory(dir) = &reader {
            if !dir.join(DESCRIPTOR_NAME).is_file() {
                warn!(
                    "adding directory {} to the mod classpath: no {DESCRIPTOR_NAME} in a \
                     development launch, assuming split build output",
                    dir.display()
                );
                if let Some(proposer) = &state.proposer {
                    proposer.propose(dir);
                }
            }
        }
    }

    let metadata = match reader.read_descriptor(&origin)? {
        Some(bytes) => ModMetadata::parse(&bytes, &origin)?,
        None => {
            warn!(
                "non-conforming package at {origin} has no {DESCRIPTOR_NAME}, \
                 registering it with synthesized metadata"
            );
            ModMetadata::synthesize(&location.file_name())
        }
    };

    let violations = validate_id(&metadata.id);
    if !violations.is_empty() {
        return Err(DiscoveryError::InvalidIdentifier {
            origin,
            kind: IdentifierKind::Id,
            id: metadata.id.clone(),
            violations,
        });
    }
    for alias in &metadata.provides {
        let violations = validate_id(alias);
        if !violations.is_empty() {
            return Err(DiscoveryError::InvalidIdentifier {
                origin,
                kind: IdentifierKind::Provides,
                id: alias.clone(),
                violations,
            });
        }
    }

    let metadata = Arc::new(metadata);
    let candidate = ModCandidate::new(
        Arc::clone(&metadata),
        origin.clone(),
        location.depth,
        location.requires_remap,
    );

    let newly_added = state
        .candidates
        .entry(metadata.id.clone())
        .or_default()
        .add(candidate);
    if !newly_added {
        debug!("{origin} already registered for `{}`", metadata.id);
        return Ok(Vec::new());
    }
    debug!(
        "added candidate `{}` {} from {origin} (depth {})",
        metadata.id, metadata.version, location.depth
    );

    if metadata.jars.is_empty() {
        return Ok(Vec::new());
    }
    let extracted = state.cache.get_or_extract(&origin, || {
        debug!("searching for nested jars in {origin}");
        extract_nested(&mut reader, &origin, &metadata.jars)
    })?;

    Ok(extracted
        .iter()
        .map(|jar| location.nested(jar.name.clone(), Arc::clone(&jar.bytes)))
        .collect())
}

/// Copy each declared nested entry that resolves to a `.jar` file out of the
/// parent, once. Entries resolving to directories are skipped; a declared
/// entry that is missing altogether is this task's fatal error.
fn extract_nested(
    reader: &mut PackageReader,
    origin: &str,
    declared: &[NestedJarEntry],
) -> Result<Vec<ExtractedJar>, DiscoveryError> {
    let mut jars = Vec::with_capacity(declared.len());
    for entry in declared {
        if !entry.file.ends_with(".jar") {
            debug!("skipping nested entry {}: not a jar", entry.file);
            continue;
        }
        match reader.lookup(&entry.file, origin)? {
            EntryLookup::Directory => {
                debug!("skipping nested entry {}: resolves to a directory", entry.file);
            }
            EntryLookup::Missing => {
                return Err(DiscoveryError::NestedExtraction {
                    origin: origin.to_string(),
                    entry: entry.file.clone(),
                    reason: "declared entry is not present in the package".to_string(),
                });
            }
            EntryLookup::File(bytes) => {
                let name = format!("{origin}!/{}", entry.file);
                debug!("found nested jar {name} ({} bytes)", bytes.len());
                jars.push(ExtractedJar {
                    name,
                    bytes: Arc::from(bytes.into_boxed_slice()),
                });
            }
        }
    }
    Ok(jars)
}
