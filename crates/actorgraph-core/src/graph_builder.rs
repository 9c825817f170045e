use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::descriptor::Descriptor;
use crate::graph::DependencyGraph;

/// Who produces and who consumes each message type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageTables {
    producers: BTreeMap<String, BTreeSet<String>>,
    consumers: BTreeMap<String, BTreeSet<String>>,
}

impl MessageTables {
    pub fn from_descriptors<'a, D, I>(descriptors: I) -> Self
    where
        I: IntoIterator<Item = &'a D>,
        D: Descriptor + 'a,
    {
        let mut tables = Self::default();
        let mut seen = BTreeSet::new();

        for actor in descriptors {
            let name = actor.name();
            if !seen.insert(name.to_string()) {
                // Contributions of the same name simply merge.
                debug!(actor = name, "duplicate actor name");
            }
            for message in actor.produces() {
                register(&mut tables.producers, message, name);
            }
            for message in actor.consumes() {
                register(&mut tables.consumers, message, name);
            }
        }

        tables
    }

    /// Message types with at least one producer and at least one consumer.
    pub fn spoken(&self) -> impl Iterator<Item = &str> {
        self.producers
            .keys()
            .filter(|message| self.consumers.contains_key(*message))
            .map(String::as_str)
    }

    pub fn producers_of(&self, message: &str) -> Option<&BTreeSet<String>> {
        self.producers.get(message)
    }

    pub fn consumers_of(&self, message: &str) -> Option<&BTreeSet<String>> {
        self.consumers.get(message)
    }
}

fn register(table: &mut BTreeMap<String, BTreeSet<String>>, message: &str, actor: &str) {
    match table.get_mut(message) {
        Some(actors) => {
            actors.insert(actor.to_string());
        }
        None => {
            table.insert(message.to_string(), BTreeSet::from([actor.to_string()]));
        }
    }
}

/// Build the dependency graph for a set of actors.
///
/// Every message type that is both produced and consumed yields an edge from
/// each of its producers to each of its consumers. Message types missing
/// either side are dropped.
pub fn build_graph<'a, D, I>(descriptors: I) -> DependencyGraph
where
    I: IntoIterator<Item = &'a D>,
    D: Descriptor + 'a,
{
    let tables = MessageTables::from_descriptors(descriptors);
    let mut graph = DependencyGraph::new();
    let mut spoken = 0usize;

    for message in tables.spoken() {
        spoken += 1;
        let (Some(producers), Some(consumers)) =
            (tables.producers_of(message), tables.consumers_of(message))
        else {
            continue;
        };

        for producer in producers {
            for consumer in consumers {
                graph.add_edge(producer, message, consumer);
            }
        }
    }

    debug!(
        spoken,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "dependency graph built"
    );

    graph
}
