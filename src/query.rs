//! Read-only queries over a [Lexicon]: relation traversal, sense resolution and the graph
//! measures built on top of them.
//!
//! Every traversal carries an explicit visited set, so cycles and diamonds in the relation graph
//! never cause a node to be emitted twice and every call terminates.

use std::{
    collections::{HashMap, HashSet},
    fmt::{self, Write as _},
};

use serde::{Deserialize, Serialize};

use crate::{
    error::WnError,
    lexicon::{
        graph::{distances_from, is_terminal, sink_subgraph},
        Lexicon,
    },
    properties::{PartOfSpeech, RelationType, Synset},
};

/// Depth constant of the Leacock-Chodorow measure. Should be at least the depth of the deepest
/// hierarchy in the resource.
pub const LEACOCK_CHODOROW_D: f64 = 20.0;

/// Score reported for synset pairs without a connecting path.
pub const NO_CONNECTION: f64 = -1.0;

/// Id of the artificial root joined to every terminal synset when requested.
pub const ARTIFICIAL_TOP: &str = "#TOP#";

/// One node of a traversal result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceEntry<'a> {
    pub id: &'a str,
    /// Distance from the start synset, which itself is not part of the result. Direct targets
    /// sit at depth 1.
    pub depth: usize,
    /// `None` when the id is a dangling relation target.
    pub synset: Option<&'a Synset>,
}

/// The traversal for one sense of a word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenseTrace<'a> {
    pub sense: &'a Synset,
    pub entries: Vec<TraceEntry<'a>>,
}

impl fmt::Display for SenseTrace<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_trace(self.sense, &self.entries))
    }
}

/// Similarity of one sense pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Similarity {
    pub first: String,
    pub second: String,
    pub score: f64,
}

impl fmt::Display for Similarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}  {}  {}", self.score, self.first, self.second)
    }
}

/// Indented tree rendering of a traversal: the root on the first line, then one line per entry
/// indented two spaces per depth level.
pub fn render_trace(root: &Synset, entries: &[TraceEntry<'_>]) -> String {
    let mut out = root.to_string();
    for entry in entries {
        let indent = "  ".repeat(entry.depth);
        // writing to a String cannot fail
        let _ = match entry.synset {
            Some(synset) => write!(out, "\n{indent}{synset}"),
            None => write!(out, "\n{indent}{}  <missing synset>", entry.id),
        };
    }
    out
}

#[derive(Debug, Clone, Copy)]
pub struct QueryEngine<'a> {
    lexicon: &'a Lexicon,
}

impl<'a> QueryEngine<'a> {
    pub fn new(lexicon: &'a Lexicon) -> Self {
        QueryEngine { lexicon }
    }

    pub fn lexicon(&self) -> &'a Lexicon {
        self.lexicon
    }

    /// Synsets reachable from `id` along `relation` edges, in pre-order.
    ///
    /// Without `transitive` only the direct targets are returned, each once and in stored order,
    /// including the synset itself when it points at itself. A transitive traversal never
    /// revisits the start, and `max_depth` bounds how far it descends. Fails if `id` is unknown; a relation type the synset does not
    /// use yields an empty result.
    pub fn related_synsets(
        &self,
        id: &str,
        relation: &RelationType,
        transitive: bool,
        max_depth: Option<usize>,
    ) -> Result<Vec<TraceEntry<'a>>, WnError> {
        let root = self.lexicon.get_synset(id)?;
        let limit = match (transitive, max_depth) {
            (false, _) => 1,
            (true, Some(depth)) => depth,
            (true, None) => usize::MAX,
        };

        let mut entries = Vec::new();
        let mut visited: HashSet<&'a str> = HashSet::new();
        if transitive {
            visited.insert(root.id.as_str());
        }
        let mut stack: Vec<(&'a str, usize)> = Vec::new();
        if limit > 0 {
            self.push_children(&mut stack, &root.id, relation, 1);
        }
        while let Some((node, depth)) = stack.pop() {
            if !visited.insert(node) {
                continue;
            }
            let synset = self.lexicon.synset(node);
            entries.push(TraceEntry {
                id: node,
                depth,
                synset,
            });
            if synset.is_some() && depth < limit {
                self.push_children(&mut stack, node, relation, depth + 1);
            }
        }
        tracing::debug!(
            "Traced {} '{}' from {} ({} entries)",
            if transitive { "transitive" } else { "direct" },
            relation,
            id,
            entries.len()
        );
        Ok(entries)
    }

    /// Children are pushed in reverse so they pop in stored order.
    fn push_children(
        &self,
        stack: &mut Vec<(&'a str, usize)>,
        id: &str,
        relation: &RelationType,
        depth: usize,
    ) {
        stack.extend(
            self.lexicon
                .targets(id, relation)
                .iter()
                .rev()
                .map(|target| (target.as_str(), depth)),
        );
    }

    /// [QueryEngine::related_synsets] for every sense of `word`, in literal index order.
    pub fn resolve_query(
        &self,
        word: &str,
        pos: PartOfSpeech,
        relation: &RelationType,
        transitive: bool,
        max_depth: Option<usize>,
    ) -> Result<Vec<SenseTrace<'a>>, WnError> {
        self.lexicon
            .find_by_literal(word, pos)
            .into_iter()
            .map(|sense| {
                Ok(SenseTrace {
                    sense,
                    entries: self.related_synsets(&sense.id, relation, transitive, max_depth)?,
                })
            })
            .collect()
    }

    /// Direct targets of `relation` leaving `id`; empty for unknown ids.
    pub fn lookup_relation(&self, id: &str, relation: &RelationType) -> Vec<&'a str> {
        self.lexicon
            .targets(id, relation)
            .iter()
            .map(|target| target.as_str())
            .collect()
    }

    /// Length of the longest `relation` chain starting at `id`, counted in synsets: 1 when `id`
    /// has no such edges. Edges closing a cycle are not followed.
    pub fn max_depth(&self, id: &str, relation: &RelationType) -> Result<usize, WnError> {
        let root = self.lexicon.get_synset(id)?;
        let root = root.id.as_str();

        let mut longest: HashMap<&'a str, usize> = HashMap::new();
        let mut on_path: HashSet<&'a str> = HashSet::from([root]);
        // (node, index of the next child to visit)
        let mut stack: Vec<(&'a str, usize)> = vec![(root, 0)];
        while let Some((node, next)) = stack.last().copied() {
            let targets = self.lexicon.targets(node, relation);
            if let Some(child) = targets.get(next) {
                if let Some(top) = stack.last_mut() {
                    top.1 += 1;
                }
                let child = child.as_str();
                if !longest.contains_key(child) && on_path.insert(child) {
                    stack.push((child, 0));
                }
            } else {
                stack.pop();
                on_path.remove(node);
                let below = targets
                    .iter()
                    .filter_map(|target| longest.get(target.as_str()).map(|len| len + 1))
                    .max()
                    .unwrap_or(0);
                longest.insert(node, below);
            }
        }
        Ok(longest.get(root).copied().unwrap_or(0) + 1)
    }

    /// Number of distinct synsets reachable from `id` along `relation`, `id` included.
    pub fn subgraph_size(&self, id: &str, relation: &RelationType) -> Result<usize, WnError> {
        let root = self.lexicon.get_synset(id)?;
        let graph = self.lexicon.relation_subgraph(relation);
        Ok(sink_subgraph(&graph, root.id.as_str()).len())
    }

    /// First id of `targets` reached from `id` along `relation` (`id` itself counts), searching
    /// depth first in stored order.
    pub fn is_connected_with<S: AsRef<str>>(
        &self,
        id: &str,
        relation: &RelationType,
        targets: &[S],
    ) -> Option<String> {
        let wanted: HashSet<&str> = targets.iter().map(|t| t.as_ref()).collect();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut stack: Vec<&str> = vec![id];
        while let Some(node) = stack.pop() {
            if !visited.insert(node) {
                continue;
            }
            if wanted.contains(node) {
                return Some(node.to_string());
            }
            stack.extend(
                self.lexicon
                    .targets(node, relation)
                    .iter()
                    .rev()
                    .map(|target| target.as_str()),
            );
        }
        None
    }

    /// `(sense id, reached target)` for the first sense of `word` connected with `targets`.
    pub fn is_literal_connected_with<S: AsRef<str>>(
        &self,
        word: &str,
        pos: PartOfSpeech,
        relation: &RelationType,
        targets: &[S],
    ) -> Option<(String, String)> {
        self.lexicon
            .find_by_literal(word, pos)
            .into_iter()
            .find_map(|sense| {
                self.is_connected_with(&sense.id, relation, targets)
                    .map(|found| (sense.id.clone(), found))
            })
    }

    /// Whether synset `id` contains `word`, or, with `hyponyms`, any of its transitive hyponyms
    /// does.
    pub fn is_literal_compatible_with_synset(&self, word: &str, id: &str, hyponyms: bool) -> bool {
        let Some(synset) = self.lexicon.synset(id) else {
            return false;
        };
        if synset.has_word(word) {
            return true;
        }
        if !hyponyms {
            return false;
        }
        match self.related_synsets(id, &RelationType::Hyponym, true, None) {
            Ok(entries) => entries
                .iter()
                .filter_map(|entry| entry.synset)
                .any(|hyponym| hyponym.has_word(word)),
            Err(_) => false,
        }
    }

    /// Id of a synset of `pos` holding both words, if any.
    pub fn are_synonyms(&self, first: &str, second: &str, pos: PartOfSpeech) -> Option<String> {
        self.lexicon
            .find_by_literal(first, pos)
            .into_iter()
            .find(|sense| sense.has_word(second))
            .map(|sense| sense.id.clone())
    }

    /// Leacock-Chodorow similarity of every sense pair of the two words:
    /// `-log10(path_len / (2 * D))`, `path_len` being the number of synsets on the shortest path
    /// joining the senses through a common `relation` ancestor. Pairs without one score
    /// [NO_CONNECTION]. With `add_top` every terminal synset is joined to [ARTIFICIAL_TOP], so all
    /// pairs connect. Sorted by descending score.
    pub fn similarity_leacock_chodorow(
        &self,
        first: &str,
        second: &str,
        pos: PartOfSpeech,
        relation: &RelationType,
        add_top: bool,
    ) -> Vec<Similarity> {
        let firsts = self.lexicon.find_by_literal(first, pos);
        let seconds = self.lexicon.find_by_literal(second, pos);
        if firsts.is_empty() || seconds.is_empty() {
            return Vec::new();
        }

        let graph = self.lexicon.relation_subgraph(relation);
        let reach = |id: &'a str| -> HashMap<&'a str, usize> {
            let mut reached: HashMap<&'a str, usize> = distances_from(&graph, id)
                .into_iter()
                .filter(|(node, _)| self.lexicon.contains(node))
                .collect();
            if add_top {
                let top = reached
                    .iter()
                    .filter(|(node, _)| is_terminal(&graph, node))
                    .map(|(_, distance)| distance + 1)
                    .min();
                if let Some(top) = top {
                    reached.insert(ARTIFICIAL_TOP, top);
                }
            }
            reached
        };

        let max_len = 2.0 * LEACOCK_CHODOROW_D;
        let reaches: Vec<(&'a str, HashMap<&'a str, usize>)> = seconds
            .iter()
            .map(|sense| (sense.id.as_str(), reach(sense.id.as_str())))
            .collect();
        let mut results = Vec::with_capacity(firsts.len() * seconds.len());
        for sense in firsts.iter() {
            let from_first = reach(sense.id.as_str());
            for (other, from_second) in reaches.iter() {
                // shared node counted once; paths as long as 2 * D do not count
                let path_len = from_first
                    .iter()
                    .filter_map(|(node, d1)| from_second.get(node).map(|d2| d1 + d2 + 1))
                    .filter(|len| ((len + 1) as f64) < max_len)
                    .min();
                let score = match path_len {
                    Some(len) => -(len as f64 / max_len).log10(),
                    None => NO_CONNECTION,
                };
                results.push(Similarity {
                    first: sense.id.clone(),
                    second: other.to_string(),
                    score,
                });
            }
        }
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results
    }
}
