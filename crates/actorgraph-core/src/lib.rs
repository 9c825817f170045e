//! Dependency graph between actors that exchange typed messages.
//!
//! Actors are described by a [`Descriptor`]: a name plus the message types it
//! produces and consumes. [`build_graph`] turns a list of descriptors into a
//! [`DependencyGraph`] with one edge per (producer, consumer) pair, labelled
//! with every message type flowing between them. The graph can then be
//! narrowed to the part related to a few actors or message types with
//! [`DependencyGraph::make_subgraph_related_to`].

pub mod descriptor;
pub mod graph;
pub mod graph_builder;
pub mod subgraph;

pub use descriptor::{ActorDef, Descriptor};
pub use graph::DependencyGraph;
pub use graph_builder::{MessageTables, build_graph};
pub use subgraph::{Reachability, Seeds};
