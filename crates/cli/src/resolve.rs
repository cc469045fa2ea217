use std::path::PathBuf;
use std::time::Duration;

use quarry_core::discovery::{ModCandidate, ModResolver, ResolverConfig};
use quarry_core::finder::DirectoryModFinder;
use quarry_core::ResolveError;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct CandidateRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "VERSION")]
    version: String,
    #[tabled(rename = "ORIGIN")]
    origin: String,
}

impl From<&ModCandidate> for CandidateRow {
    fn from(candidate: &ModCandidate) -> Self {
        Self {
            id: candidate.id().to_string(),
            version: candidate.metadata.version.to_string(),
            origin: candidate.origin.clone(),
        }
    }
}

pub async fn run_resolve(
    dirs: Vec<PathBuf>,
    dev: bool,
    deadline_secs: u64,
    json: bool,
) -> Result<(), ResolveError> {
    let config = ResolverConfig {
        deadline: Duration::from_secs(deadline_secs),
        development: dev,
        ..ResolverConfig::default()
    };

    let mut resolver = ModResolver::new(config);
    for dir in dirs {
        resolver.add_finder(DirectoryModFinder::new(dir, !dev));
    }

    let winners = resolver.resolve().await?;

    if json {
        match serde_json::to_string_pretty(&winners) {
            Ok(rendered) => println!("{rendered}"),
            Err(e) => tracing::error!("failed to render result as JSON: {e}"),
        }
    } else if winners.is_empty() {
        println!("no mods found");
    } else {
        let rows: Vec<CandidateRow> = winners.values().map(CandidateRow::from).collect();
        println!("{}", Table::new(rows));
    }

    Ok(())
}
