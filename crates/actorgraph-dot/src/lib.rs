//! Render a [`DependencyGraph`] as a DOT digraph.
//!
//! The output grammar is fixed:
//!
//! ```text
//! digraph "leapp-actors" {
//! nodesep=2
//! ranksep=2
//! rankdir=LR
//! <actor> [label=<actor>]
//! <source> -> <target> [label=<message>]
//! }
//! ```
//!
//! Every message type on an edge gets its own line. Nodes come out sorted by
//! name and edges by (source, target, message), so the text is stable
//! between runs.

mod dot;

use actorgraph_core::DependencyGraph;

pub use dot::DotBuilder;

pub const GRAPH_NAME: &str = "leapp-actors";

pub fn render_graph(graph: &DependencyGraph) -> String {
    let mut dot = DotBuilder::new(GRAPH_NAME);
    dot.attr("nodesep", "2")
        .attr("ranksep", "2")
        .attr("rankdir", "LR");

    for actor in graph.nodes() {
        dot.node(actor, actor);
    }
    for (source, message, target) in graph.iter_edges() {
        dot.edge(source, target, message);
    }

    tracing::debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "graph rendered"
    );

    dot.build()
}
