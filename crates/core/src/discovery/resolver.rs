use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use futures::future::join_all;
use quarry_api::{CandidateFinder, ClasspathProposer};
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::discovery::cache::ExtractionCache;
use crate::discovery::candidate::ModCandidate;
use crate::discovery::location::Location;
use crate::discovery::task::{self, DiscoveryState};
use crate::error::{ResolveError, Result};
use crate::metadata::LATEST_SCHEMA_VERSION;

fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(2)
        .saturating_sub(1)
        .max(1)
}

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Wall-clock budget for the whole discovery sweep. Work still in flight
    /// when it elapses is reported as a timeout; the tasks themselves are not
    /// forcibly interrupted and may keep running in the background.
    pub deadline: Duration,
    /// Concurrent discovery scans. Defaults to available parallelism minus
    /// one, never below one.
    pub workers: usize,
    /// Development launches tolerate descriptor-less directories by proposing
    /// them to the broader classpath.
    pub development: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            deadline: Duration::from_secs(30),
            workers: default_worker_count(),
            development: false,
        }
    }
}

/// Discovers, deduplicates and selects mod candidates.
///
/// Finders enumerate root locations; each root becomes a discovery task, and
/// tasks recursively spawn more tasks for nested jars on the same bounded
/// pool. Once every transitively spawned task has finished (or the deadline
/// elapses), the per-id candidate sets are reduced to one winner each.
pub struct ModResolver {
    finders: Vec<Box<dyn CandidateFinder>>,
    proposer: Option<Arc<dyn ClasspathProposer>>,
    config: ResolverConfig,
}

impl ModResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            finders: Vec::new(),
            proposer: None,
            config,
        }
    }

    pub fn add_finder(&mut self, finder: impl CandidateFinder + 'static) -> &mut Self {
        self.finders.push(Box::new(finder));
        self
    }

    pub fn set_proposer(&mut self, proposer: Arc<dyn ClasspathProposer>) -> &mut Self {
        self.proposer = Some(proposer);
        self
    }

    /// Run the full sweep. Returns the winning candidate per id, or a single
    /// aggregated failure; partial results are never returned.
    pub async fn resolve(&self) -> Result<BTreeMap<String, ModCandidate>> {
        let state = Arc::new(DiscoveryState {
            candidates: DashMap::new(),
            cache: ExtractionCache::new(),
            limiter: Arc::new(Semaphore::new(self.config.workers.max(1))),
            failures: Mutex::new(Vec::new()),
            proposer: self.proposer.clone(),
            development: self.config.development,
        });

        let detection_started = Instant::now();

        let mut roots = Vec::new();
        for finder in &self.finders {
            finder.find_candidates(&mut |path, requires_remap| {
                roots.push(Location::root(path, requires_remap));
            })?;
        }
        debug!("discovered {} root locations", roots.len());

        // Plain handles joined without abort-on-drop: a timeout gives up on
        // the results, it does not interrupt in-flight work.
        let handles: Vec<_> = roots
            .into_iter()
            .map(|root| tokio::spawn(task::run(Arc::clone(&state), root)))
            .collect();

        if tokio::time::timeout(self.config.deadline, join_all(handles))
            .await
            .is_err()
        {
            return Err(ResolveError::Timeout {
                deadline: self.config.deadline,
            });
        }

        let mut failures = std::mem::take(
            &mut *state
                .failures
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        if !failures.is_empty() {
            let primary = failures.remove(0);
            return Err(ResolveError::Failed {
                primary,
                suppressed: failures,
            });
        }
        debug!("mod detection time: {:?}", detection_started.elapsed());

        let selection_started = Instant::now();
        let mut winners = BTreeMap::new();
        for entry in state.candidates.iter() {
            if let Some(winner) = entry.value().select() {
                winners.insert(entry.key().clone(), winner.clone());
            }
        }
        debug!("mod selection time: {:?}", selection_started.elapsed());

        for candidate in winners.values() {
            if candidate.metadata.schema_version < LATEST_SCHEMA_VERSION {
                warn!(
                    "mod `{}` uses outdated descriptor schema version {} < {}",
                    candidate.id(),
                    candidate.metadata.schema_version,
                    LATEST_SCHEMA_VERSION
                );
            }
            for warning in candidate.metadata.format_warnings() {
                warn!("mod `{}` {warning}", candidate.id());
            }
        }

        Ok(winners)
    }
}
