//! Narrowing a dependency graph down to the actors related to some entities.
//!
//! An entity is either an actor name or a message type. Actor names seed the
//! scan in both directions. A message type seeds the backward scan with its
//! producers and the forward scan with its consumers.
//!
//! Two notions of "related" are supported:
//!
//! - [`Reachability::Tight`]: everything downstream of the forward seeds plus
//!   everything upstream of the backward seeds.
//! - [`Reachability::Loose`]: the whole weakly connected part of the graph
//!   around the seeds. Always a superset of the tight result.

use std::collections::BTreeSet;

use tracing::debug;

use crate::graph::DependencyGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reachability {
    /// Follow edge directions only.
    Tight,
    /// Ignore edge directions.
    #[default]
    Loose,
}

impl Reachability {
    pub fn from_tight(tight: bool) -> Self {
        if tight { Self::Tight } else { Self::Loose }
    }
}

/// Start points for the reachability scans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Seeds {
    pub forward: BTreeSet<String>,
    pub backward: BTreeSet<String>,
}

impl Seeds {
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty() && self.backward.is_empty()
    }

    pub fn merge(&mut self, other: Seeds) {
        self.forward.extend(other.forward);
        self.backward.extend(other.backward);
    }

    /// Union of both directions.
    pub fn all(&self) -> BTreeSet<String> {
        self.forward.union(&self.backward).cloned().collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
    Both,
}

impl DependencyGraph {
    /// Seeds for `entity` if it names an actor in the graph.
    pub fn classify_as_component(&self, entity: &str) -> Option<Seeds> {
        if !self.contains_node(entity) {
            return None;
        }
        let actor = BTreeSet::from([entity.to_string()]);
        Some(Seeds {
            forward: actor.clone(),
            backward: actor,
        })
    }

    /// Seeds for `entity` read as a message type carried by some edge.
    pub fn classify_as_message_label(&self, entity: &str) -> Option<Seeds> {
        let mut seeds = Seeds::default();
        for ((source, target), labels) in self.edges() {
            if labels.contains(entity) {
                seeds.backward.insert(source.clone());
                seeds.forward.insert(target.clone());
            }
        }
        if seeds.is_empty() { None } else { Some(seeds) }
    }

    /// Classify every entity; names matching nothing are ignored.
    pub fn collect_seeds<I, S>(&self, entities: I) -> Seeds
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seeds = Seeds::default();
        for entity in entities {
            let entity = entity.as_ref();
            match self
                .classify_as_component(entity)
                .or_else(|| self.classify_as_message_label(entity))
            {
                Some(found) => seeds.merge(found),
                None => debug!(entity, "entity matches no actor or message type"),
            }
        }
        seeds
    }

    /// Nodes reachable from `start` along edge directions, `start` included.
    pub fn forward_scan<'a, I>(&'a self, start: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.scan(start, Direction::Forward)
    }

    /// Nodes reaching `start` along edge directions, `start` included.
    pub fn backward_scan<'a, I>(&'a self, start: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.scan(start, Direction::Backward)
    }

    /// Nodes connected to `start` when edge directions are ignored.
    pub fn undirected_scan<'a, I>(&'a self, start: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.scan(start, Direction::Both)
    }

    fn scan<'a, I>(&'a self, start: I, direction: Direction) -> BTreeSet<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut visited: BTreeSet<&'a str> = BTreeSet::new();
        let mut worklist: Vec<&'a str> = Vec::new();

        for node in start {
            if visited.insert(node) {
                worklist.push(node);
            }
        }

        while let Some(node) = worklist.pop() {
            if direction != Direction::Backward {
                for target in self.successors(node) {
                    if visited.insert(target) {
                        worklist.push(target);
                    }
                }
            }
            if direction != Direction::Forward {
                for source in self.predecessors(node) {
                    if visited.insert(source) {
                        worklist.push(source);
                    }
                }
            }
        }

        visited.into_iter().map(str::to_string).collect()
    }

    /// Restrict the graph to `keep`, copying label sets of surviving edges.
    ///
    /// The node set of the result is exactly `keep`, isolated nodes included.
    pub fn induced_subgraph(&self, keep: &BTreeSet<String>) -> DependencyGraph {
        let mut result = DependencyGraph::new();
        for node in keep {
            result.insert_node(node);
        }
        for ((source, target), labels) in self.edges() {
            if keep.contains(source) && keep.contains(target) {
                result.insert_labels(source, target, labels);
            }
        }
        result
    }

    /// The part of the graph related to `entities` (actor names or message
    /// types). `self` is left untouched.
    pub fn make_subgraph_related_to<I, S>(
        &self,
        entities: I,
        reachability: Reachability,
    ) -> DependencyGraph
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let seeds = self.collect_seeds(entities);

        let seen = match reachability {
            Reachability::Tight => {
                let mut seen = self.forward_scan(seeds.forward.iter().map(String::as_str));
                seen.extend(self.backward_scan(seeds.backward.iter().map(String::as_str)));
                seen
            }
            Reachability::Loose => {
                let start = seeds.all();
                self.undirected_scan(start.iter().map(String::as_str))
            }
        };

        debug!(
            ?reachability,
            forward_seeds = seeds.forward.len(),
            backward_seeds = seeds.backward.len(),
            kept = seen.len(),
            "subgraph extracted"
        );

        self.induced_subgraph(&seen)
    }
}
