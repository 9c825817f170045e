use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use actorgraph::{DiscoverOptions, run_main};

#[derive(Parser, Debug)]
#[command(
    name = "actorgraph",
    about = "Discover actors, models, tags, topics and workflows of a repository",
    version
)]
pub struct Cli {
    /// Directory to start looking for repository.toml from
    #[arg(short = 'r', long = "repository", value_name = "DIR", default_value = ".")]
    repository: PathBuf,

    /// Output in json format instead of human readable form
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Include items from linked repositories
    #[arg(long, default_value_t = false)]
    all: bool,

    /// Read the manifest leniently, skipping actor entries that fail to load
    #[arg(long, default_value_t = false)]
    safe: bool,

    /// Export repository information as a DOT graph
    #[arg(long = "as-graph", default_value_t = false)]
    as_graph: bool,

    /// Export repository information only related to the given entity (repeatable)
    #[arg(
        short = 'f',
        long = "only-related-to",
        value_name = "ENTITY",
        action = clap::ArgAction::Append
    )]
    only_related_to: Vec<String>,

    /// Do not include actors that indirectly relate to entities
    #[arg(long, default_value_t = false)]
    tight: bool,

    /// Output file path (writes to file instead of stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,
}

pub fn run(args: Cli) -> ExitCode {
    let total_start = Instant::now();

    // Logging goes to stderr and only when asked for, stdout carries DOT/JSON.
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let opts = DiscoverOptions {
        repository: args.repository,
        json: args.json,
        all: args.all,
        safe: args.safe,
        as_graph: args.as_graph,
        only_related_to: args.only_related_to,
        tight: args.tight,
    };

    let output = match run_main(&opts) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("{}", e.message());
            tracing::error!(kind = %e.kind(), error = %e, "discovery failed");
            return ExitCode::from(1);
        }
    };

    for warning in &output.warnings {
        eprintln!("warning: {warning}");
    }

    if let Some(ref path) = args.output {
        if let Err(e) = std::fs::write(path, &output.text) {
            eprintln!("failed to write {}: {e}", path.display());
            return ExitCode::from(1);
        }
        tracing::info!(path = %path.display(), "output written");
    } else {
        print!("{}", output.text);
    }

    tracing::info!(total_secs = total_start.elapsed().as_secs_f64(), "complete");
    ExitCode::SUCCESS
}

pub fn main() -> ExitCode {
    let args = Cli::parse();
    run(args)
}
