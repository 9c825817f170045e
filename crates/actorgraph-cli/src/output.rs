//! Output generation (DOT graphs).

use std::time::Instant;

use tracing::info;

use actorgraph_core::{Reachability, build_graph};
use actorgraph_dot::render_graph;

use crate::DiscoverOptions;
use crate::repository::Repository;

/// Build the actor graph, optionally narrow it, and render it as DOT.
pub fn generate_dot_output(opts: &DiscoverOptions, repository: &Repository) -> String {
    let build_start = Instant::now();
    let mut graph = build_graph(repository.actors());

    if !opts.only_related_to.is_empty() {
        let reachability = Reachability::from_tight(opts.tight);
        graph = graph.make_subgraph_related_to(&opts.only_related_to, reachability);
    }

    info!(
        "Graph building: {:.4}s ({} actors, {} edges)",
        build_start.elapsed().as_secs_f64(),
        graph.node_count(),
        graph.edge_count()
    );

    render_graph(&graph)
}
