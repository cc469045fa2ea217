mod resolve;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use resolve::run_resolve;

#[derive(Parser)]
#[command(
    name = "quarry",
    version,
    about = "Discover, deduplicate and select mod packages",
    long_about = "Quarry walks mod directories and classpath entries, parses each package's \
                  descriptor (recursing into nested jars), resolves conflicting ids and prints \
                  the winning candidate per mod id."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the mods found under one or more directories
    #[command(
        long_about = "Scans every given directory for mod jars, recurses into nested jars, and \
                      prints one winning candidate per mod id. Fails with the full aggregated \
                      error report if any package is unusable or the deadline elapses."
    )]
    Resolve {
        /// Mod directories to scan
        #[arg(value_name = "MOD_DIR", required = true)]
        dirs: Vec<PathBuf>,
        /// Treat this as a development launch (tolerates descriptor-less
        /// directories, skips remapping)
        #[arg(long)]
        dev: bool,
        /// Discovery deadline in seconds
        #[arg(long, default_value_t = 30)]
        deadline_secs: u64,
        /// Print the result as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}
