use clap::Parser;
use quarry_cli::{Cli, Commands, run_resolve};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let _guard = quarry_core::logging::init_logging("cli", true);

    let result = match cli.command {
        Commands::Resolve {
            dirs,
            dev,
            deadline_secs,
            json,
        } => run_resolve(dirs, dev, deadline_secs, json).await,
    };

    if let Err(error) = result {
        eprintln!("{error}");
        std::process::exit(1);
    }
}
