use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

/// (source, target) pair identifying one edge.
pub type EdgeKey = (String, String);

/// Directed, edge-labelled graph over actor names.
///
/// # Overview
/// Each edge connects a producer to a consumer and carries the set of message
/// types flowing along it. There is at most one edge per ordered pair; more
/// message types between the same pair become more labels on that edge.
///
/// # Invariants
/// - A label set is never empty. Labels are only ever added.
/// - `reverse_edges[target]` contains `source` iff the edge `(source, target)`
///   exists.
/// - Every edge endpoint is in `nodes`. Graphs produced by the builder contain
///   no other nodes; induced subgraphs may also hold isolated nodes.
///
/// All containers are ordered, so nodes iterate by name and edges by
/// (source, target, label).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    nodes: BTreeSet<String>,
    edges: BTreeMap<EdgeKey, BTreeSet<String>>,
    reverse_edges: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `message_type` flows from `source` to `target`.
    ///
    /// Adding the same triple twice is a no-op.
    pub fn add_edge(&mut self, source: &str, message_type: &str, target: &str) {
        self.nodes.insert(source.to_string());
        self.nodes.insert(target.to_string());

        match self.edges.entry((source.to_string(), target.to_string())) {
            Entry::Occupied(mut labels) => {
                labels.get_mut().insert(message_type.to_string());
            }
            Entry::Vacant(slot) => {
                slot.insert(BTreeSet::from([message_type.to_string()]));
            }
        }

        self.link_reverse(source, target);
    }

    /// Iterate `(source, message_type, target)`, one triple per label.
    pub fn iter_edges(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.edges.iter().flat_map(|((source, target), labels)| {
            labels
                .iter()
                .map(move |label| (source.as_str(), label.as_str(), target.as_str()))
        })
    }

    pub fn nodes(&self) -> &BTreeSet<String> {
        &self.nodes
    }

    pub fn edges(&self) -> &BTreeMap<EdgeKey, BTreeSet<String>> {
        &self.edges
    }

    pub fn reverse_edges(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.reverse_edges
    }

    pub fn contains_node(&self, node: &str) -> bool {
        self.nodes.contains(node)
    }

    /// Targets of edges leaving `node`, sorted by name.
    pub fn successors<'a>(&'a self, node: &'a str) -> impl Iterator<Item = &'a str> {
        self.edges
            .range((node.to_string(), String::new())..)
            .take_while(move |((source, _), _)| source == node)
            .map(|((_, target), _)| target.as_str())
    }

    /// Sources of edges entering `node`, sorted by name.
    pub fn predecessors<'a>(&'a self, node: &'a str) -> impl Iterator<Item = &'a str> {
        self.reverse_edges
            .get(node)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Message types on the edge `source -> target`, if it exists.
    pub fn labels(&self, source: &str, target: &str) -> Option<&BTreeSet<String>> {
        self.edges.get(&(source.to_string(), target.to_string()))
    }

    /// True if any edge carries `message_type`.
    pub fn has_label(&self, message_type: &str) -> bool {
        self.edges.values().any(|labels| labels.contains(message_type))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct (source, target) pairs.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn insert_node(&mut self, node: &str) {
        self.nodes.insert(node.to_string());
    }

    /// Copy a whole label set onto `source -> target`.
    pub(crate) fn insert_labels(&mut self, source: &str, target: &str, labels: &BTreeSet<String>) {
        if labels.is_empty() {
            return;
        }

        self.nodes.insert(source.to_string());
        self.nodes.insert(target.to_string());

        match self.edges.entry((source.to_string(), target.to_string())) {
            Entry::Occupied(mut existing) => {
                existing.get_mut().extend(labels.iter().cloned());
            }
            Entry::Vacant(slot) => {
                slot.insert(labels.clone());
            }
        }

        self.link_reverse(source, target);
    }

    fn link_reverse(&mut self, source: &str, target: &str) {
        match self.reverse_edges.get_mut(target) {
            Some(sources) => {
                sources.insert(source.to_string());
            }
            None => {
                self.reverse_edges
                    .insert(target.to_string(), BTreeSet::from([source.to_string()]));
            }
        }
    }
}
