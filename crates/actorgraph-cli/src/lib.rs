//! actorgraph command-line interface.
//!
pub mod listing;
pub mod output;
pub mod report;
pub mod repository;
pub mod safe;

use std::path::PathBuf;

use actorgraph_error::{Error, Result};

pub use output::generate_dot_output;
pub use report::DiscoveryReport;
pub use repository::{Repository, find_repository_basedir};

/// Options for running a discovery.
#[derive(Debug, Clone, Default)]
pub struct DiscoverOptions {
    /// Directory to start the manifest search from.
    pub repository: PathBuf,
    pub json: bool,
    /// Include models, tags, topics and workflows of linked repositories.
    pub all: bool,
    pub safe: bool,
    pub as_graph: bool,
    pub only_related_to: Vec<String>,
    pub tight: bool,
}

/// Text to print plus warnings for stderr.
#[derive(Debug, Default)]
pub struct DiscoverOutput {
    pub text: String,
    pub warnings: Vec<String>,
}

/// Main entry point
pub fn run_main(opts: &DiscoverOptions) -> Result<DiscoverOutput> {
    if opts.safe && opts.json {
        return Err(Error::conflicting_options("safe", "json").with_operation("run_main"));
    }

    let base_dir = find_repository_basedir(&opts.repository)?;
    let cwd = std::env::current_dir()?
        .canonicalize()
        .unwrap_or_else(|_| base_dir.clone());

    if opts.safe {
        let report = safe::safe_discover(&base_dir, &cwd)?;
        return Ok(DiscoverOutput {
            text: report.output,
            warnings: report.skipped,
        });
    }

    let repository = Repository::load(&base_dir)?;

    let text = if opts.as_graph {
        generate_dot_output(opts, &repository)
    } else if opts.json {
        DiscoveryReport::new(&repository, opts.all).to_json()?
    } else {
        listing::render_listing(&repository, opts.all, &cwd)
    };

    Ok(DiscoverOutput {
        text,
        warnings: Vec::new(),
    })
}
