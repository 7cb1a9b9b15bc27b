//! Relation index and per-relation graph views.
//!
//! - [`RelationIndex`]: synset id → relation type → ordered target ids, giving O(1) fan-out
//! - [`RelationSubGraph`]: a petgraph view restricted to a single relation type, used for the
//!   whole-graph measures (reachability, distances)

use crate::properties::{RelationType, Synset};
use petgraph::{
    algo::dijkstra,
    graphmap::GraphMap,
    visit::{depth_first_search, DfsEvent},
    Directed, Direction,
};
use std::collections::{BTreeSet, HashMap};

/// Edge weight is the position of the edge in the source synset's relation list.
pub type RelationSubGraph<'a> = GraphMap<&'a str, u16, Directed>;

#[derive(Debug, Clone, Default)]
pub struct RelationIndex(HashMap<String, HashMap<RelationType, Vec<String>>>);

impl RelationIndex {
    pub fn from_synsets<'a, I>(synsets: I) -> Self
    where
        I: IntoIterator<Item = &'a Synset>,
    {
        let mut index: HashMap<String, HashMap<RelationType, Vec<String>>> = HashMap::new();
        for synset in synsets {
            let by_kind = index.entry(synset.id.clone()).or_default();
            for relation in synset.relations.iter() {
                by_kind
                    .entry(relation.kind.clone())
                    .or_default()
                    .push(relation.target.clone());
            }
        }
        RelationIndex(index)
    }

    /// Targets of `kind` edges leaving `id`, in stored order. Empty for unknown ids and for
    /// relation types the synset does not use.
    pub fn targets(&self, id: &str, kind: &RelationType) -> &[String] {
        self.0
            .get(id)
            .and_then(|by_kind| by_kind.get(kind))
            .map(|targets| targets.as_slice())
            .unwrap_or(&[])
    }

    /// Relation types used by `id`, sorted by name.
    pub fn kinds(&self, id: &str) -> Vec<&RelationType> {
        let mut kinds = self
            .0
            .get(id)
            .map(|by_kind| by_kind.keys().collect::<Vec<_>>())
            .unwrap_or_default();
        kinds.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        kinds
    }

    pub fn edge_count(&self) -> usize {
        self.0
            .values()
            .flat_map(|by_kind| by_kind.values())
            .map(|targets| targets.len())
            .sum()
    }

    /// All `kind` edges of the lexicon as a graph. Only synsets touching such an edge appear as
    /// nodes. Dangling targets appear as ordinary nodes without outgoing edges.
    pub fn subgraph(&self, kind: &RelationType) -> RelationSubGraph<'_> {
        let mut graph = RelationSubGraph::new();
        for (source, by_kind) in self.0.iter() {
            if let Some(targets) = by_kind.get(kind) {
                for (position, target) in targets.iter().enumerate() {
                    let position = u16::try_from(position).unwrap_or(u16::MAX);
                    graph.add_edge(source.as_str(), target.as_str(), position);
                }
            }
        }
        graph
    }
}

/// Every node reachable from `start` along the graph's edges, `start` included.
pub fn sink_subgraph<'a>(graph: &RelationSubGraph<'a>, start: &'a str) -> BTreeSet<&'a str> {
    let mut subtree_nodes = BTreeSet::new();
    if graph.contains_node(start) {
        depth_first_search(graph, Some(start), |event| {
            if let DfsEvent::Discover(id, _) = event {
                subtree_nodes.insert(id);
            }
        });
    } else {
        subtree_nodes.insert(start);
    }
    subtree_nodes
}

/// Shortest edge count from `start` to every node it reaches (`start` itself at 0).
pub fn distances_from<'a>(graph: &RelationSubGraph<'a>, start: &'a str) -> HashMap<&'a str, usize> {
    if graph.contains_node(start) {
        dijkstra(graph, start, None, |_| 1usize)
    } else {
        HashMap::from([(start, 0)])
    }
}

/// Nodes without outgoing edges.
pub fn is_terminal<'a>(graph: &RelationSubGraph<'a>, id: &'a str) -> bool {
    !graph.contains_node(id)
        || graph
            .neighbors_directed(id, Direction::Outgoing)
            .next()
            .is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::PartOfSpeech;

    fn chain() -> Vec<Synset> {
        vec![
            Synset::new("A", PartOfSpeech::Noun)
                .with_relation("B", "hyponym")
                .with_relation("C", "hyponym")
                .with_relation("Z", "hypernym"),
            Synset::new("B", PartOfSpeech::Noun).with_relation("D", "hyponym"),
            Synset::new("C", PartOfSpeech::Noun).with_relation("D", "hyponym"),
            Synset::new("D", PartOfSpeech::Noun),
        ]
    }

    #[test]
    fn test_index_targets_and_kinds() {
        let synsets = chain();
        let index = RelationIndex::from_synsets(synsets.iter());
        assert_eq!(index.targets("A", &RelationType::Hyponym), ["B", "C"]);
        assert!(index.targets("D", &RelationType::Hyponym).is_empty());
        assert!(index.targets("nope", &RelationType::Hyponym).is_empty());
        assert_eq!(
            index.kinds("A"),
            vec![&RelationType::Hypernym, &RelationType::Hyponym]
        );
        assert_eq!(index.edge_count(), 5);
    }

    #[test]
    fn test_subgraph_reachability_and_distances() {
        let synsets = chain();
        let index = RelationIndex::from_synsets(synsets.iter());
        let graph = index.subgraph(&RelationType::Hyponym);
        assert_eq!(graph.edge_count(), 4);

        let reached = sink_subgraph(&graph, "A");
        assert_eq!(reached, BTreeSet::from(["A", "B", "C", "D"]));
        assert_eq!(sink_subgraph(&graph, "Q"), BTreeSet::from(["Q"]));

        let distances = distances_from(&graph, "A");
        assert_eq!(distances.get("D"), Some(&2));
        assert_eq!(distances.get("A"), Some(&0));
        assert!(is_terminal(&graph, "D"));
        assert!(!is_terminal(&graph, "B"));
    }
}
