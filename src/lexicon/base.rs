//! Lexicon: the loaded resource.
//!
//! Holds every synset in an arena keyed by id, plus the indices derived from them. A lexicon is
//! assembled once through [LexiconBuilder] and never mutated afterwards, so shared references to
//! it can be handed to any number of readers.

use crate::{
    codec::LoadDiagnostic,
    error::WnError,
    properties::{PartOfSpeech, Relation, RelationType, Synset},
};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashMap, HashSet},
    fmt,
};

use super::graph::{RelationIndex, RelationSubGraph};

#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    synsets: BTreeMap<String, Synset>,
    literals: HashMap<PartOfSpeech, HashMap<String, Vec<String>>>,
    relations: RelationIndex,
    diagnostics: Vec<LoadDiagnostic>,
}

impl fmt::Display for Lexicon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lexicon({} synsets, {} relations)",
            self.synsets.len(),
            self.relations.edge_count()
        )
    }
}

impl Lexicon {
    /// Build a lexicon directly from synsets, without relation inversion.
    pub fn from_synsets<I: IntoIterator<Item = Synset>>(synsets: I) -> Lexicon {
        let mut builder = LexiconBuilder::new().invert_relations(false);
        for synset in synsets {
            builder.insert(synset, 0);
        }
        builder.build()
    }

    pub fn len(&self) -> usize {
        self.synsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.synsets.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.synsets.contains_key(id)
    }

    pub fn synset(&self, id: &str) -> Option<&Synset> {
        self.synsets.get(id)
    }

    pub fn get_synset(&self, id: &str) -> Result<&Synset, WnError> {
        self.synsets
            .get(id)
            .ok_or_else(|| WnError::Lookup(format!("Synset id not found: {id}")))
    }

    /// All synsets, ordered by id.
    pub fn synsets(&self) -> impl Iterator<Item = &Synset> {
        self.synsets.values()
    }

    /// Synsets containing `word` as a literal, ordered by the literal's sense number.
    pub fn find_by_literal(&self, word: &str, pos: PartOfSpeech) -> Vec<&Synset> {
        self.literal_ids(word, pos)
            .iter()
            .filter_map(|id| self.synsets.get(id))
            .collect()
    }

    pub fn literal_ids(&self, word: &str, pos: PartOfSpeech) -> &[String] {
        self.literals
            .get(&pos)
            .and_then(|words| words.get(word))
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
    }

    /// The synset holding `word` with the given sense number.
    pub fn find_sense(&self, word: &str, sense: u32, pos: PartOfSpeech) -> Option<&Synset> {
        self.find_by_literal(word, pos).into_iter().find(|synset| {
            synset
                .literals
                .iter()
                .any(|l| l.word == word && l.sense_number() == Some(sense))
        })
    }

    /// Like [Lexicon::find_by_literal] but demands exactly one sense.
    pub fn find_unique(&self, word: &str, pos: PartOfSpeech) -> Result<&Synset, WnError> {
        match self.find_by_literal(word, pos).as_slice() {
            [synset] => Ok(*synset),
            [] => Err(WnError::Lookup(format!("Literal not found: {word} ({pos})"))),
            senses => Err(WnError::Lookup(format!(
                "Literal {word} ({pos}) is ambiguous: {} senses",
                senses.len()
            ))),
        }
    }

    pub fn targets(&self, id: &str, kind: &RelationType) -> &[String] {
        self.relations.targets(id, kind)
    }

    pub fn relation_types(&self, id: &str) -> Vec<&RelationType> {
        self.relations.kinds(id)
    }

    pub fn relation_count(&self) -> usize {
        self.relations.edge_count()
    }

    pub fn relation_subgraph(&self, kind: &RelationType) -> RelationSubGraph<'_> {
        self.relations.subgraph(kind)
    }

    /// Inconsistencies recorded while the lexicon was built.
    pub fn diagnostics(&self) -> &[LoadDiagnostic] {
        &self.diagnostics
    }

    pub fn stats(&self) -> LexiconStats {
        let mut per_pos: BTreeMap<PartOfSpeech, PosStats> = PartOfSpeech::all()
            .iter()
            .map(|pos| (*pos, PosStats::default()))
            .collect();
        let mut distinct = HashSet::new();
        let mut literal_occurrence_count = 0;
        for synset in self.synsets.values() {
            let entry = per_pos.entry(synset.pos).or_default();
            entry.synsets += 1;
            entry.word_senses += synset.literals.len();
            literal_occurrence_count += synset.literals.len();
            distinct.extend(synset.literals.iter().map(|l| l.word.as_str()));
        }
        for (pos, words) in self.literals.iter() {
            per_pos.entry(*pos).or_default().words = words.len();
        }
        LexiconStats {
            synset_count: self.synsets.len(),
            literal_occurrence_count,
            distinct_literal_count: distinct.len(),
            per_pos,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosStats {
    pub synsets: usize,
    pub word_senses: usize,
    /// Distinct words within this part of speech.
    pub words: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconStats {
    pub synset_count: usize,
    pub literal_occurrence_count: usize,
    /// Unique word strings across every part of speech.
    pub distinct_literal_count: usize,
    pub per_pos: BTreeMap<PartOfSpeech, PosStats>,
}

impl fmt::Display for LexiconStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<12}{:>12}{:>14}{:>10}", "PoS", "#synsets", "#word senses", "#words")?;
        for (pos, stats) in self.per_pos.iter() {
            writeln!(
                f,
                "{:<12}{:>12}{:>14}{:>10}",
                pos.name(),
                stats.synsets,
                stats.word_senses,
                stats.words
            )?;
        }
        write!(
            f,
            "{:<12}{:>12}{:>14}{:>10}",
            "total", self.synset_count, self.literal_occurrence_count, self.distinct_literal_count
        )
    }
}

/// Accumulates synsets in load order and turns them into a [Lexicon].
///
/// Duplicate ids replace the earlier record ("keep last"); every such event and every dangling
/// or self-referencing relation is recorded as a [LoadDiagnostic].
#[derive(Debug)]
pub struct LexiconBuilder {
    synsets: BTreeMap<String, Synset>,
    diagnostics: Vec<LoadDiagnostic>,
    invert_relations: bool,
}

impl Default for LexiconBuilder {
    fn default() -> Self {
        LexiconBuilder {
            synsets: BTreeMap::new(),
            diagnostics: Vec::new(),
            invert_relations: true,
        }
    }
}

impl LexiconBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the inverse of every invertible relation to its target (see
    /// [RelationType::inverse]). On by default.
    pub fn invert_relations(mut self, invert: bool) -> Self {
        self.invert_relations = invert;
        self
    }

    pub fn len(&self) -> usize {
        self.synsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.synsets.is_empty()
    }

    pub fn push_diagnostic(&mut self, diagnostic: LoadDiagnostic) {
        tracing::warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    /// `line` is where the record starts in the source, for diagnostics.
    pub fn insert(&mut self, mut synset: Synset, line: usize) {
        let mut seen = HashSet::new();
        let mut repeated = Vec::new();
        synset.literals.retain(|l| {
            let first = seen.insert((l.word.clone(), l.sense.clone()));
            if !first {
                repeated.push((l.word.clone(), l.sense.clone()));
            }
            first
        });
        for (word, sense) in repeated {
            self.push_diagnostic(LoadDiagnostic::DuplicateLiteral {
                id: synset.id.clone(),
                word,
                sense,
                line,
            });
        }

        if self.synsets.contains_key(&synset.id) {
            self.push_diagnostic(LoadDiagnostic::DuplicateId {
                id: synset.id.clone(),
                line,
            });
        }
        self.synsets.insert(synset.id.clone(), synset);
    }

    pub fn build(mut self) -> Lexicon {
        self.check_relations();
        let literals = self.literal_index();
        let relations = RelationIndex::from_synsets(self.synsets.values());
        let lexicon = Lexicon {
            synsets: self.synsets,
            literals,
            relations,
            diagnostics: self.diagnostics,
        };
        tracing::info!(
            "Built {} with {} diagnostics",
            lexicon,
            lexicon.diagnostics.len()
        );
        lexicon
    }

    /// Records dangling and self-referencing relations and, when enabled, adds inverse edges.
    fn check_relations(&mut self) {
        let mut found = Vec::new();
        let mut inverses: Vec<(String, Relation)> = Vec::new();
        for (id, synset) in self.synsets.iter() {
            for relation in synset.relations.iter() {
                if &relation.target == id {
                    found.push(LoadDiagnostic::SelfReference {
                        id: id.clone(),
                        kind: relation.kind.clone(),
                    });
                } else if !self.synsets.contains_key(&relation.target) {
                    found.push(LoadDiagnostic::DanglingRelation {
                        source: id.clone(),
                        target: relation.target.clone(),
                        kind: relation.kind.clone(),
                    });
                } else if self.invert_relations {
                    if let Some(inverse) = relation.kind.inverse() {
                        inverses.push((relation.target.clone(), Relation::new(id.clone(), inverse)));
                    }
                }
            }
        }
        for diagnostic in found {
            self.push_diagnostic(diagnostic);
        }

        let mut added = 0usize;
        for (target, inverse) in inverses {
            if let Some(target_synset) = self.synsets.get_mut(&target) {
                if !target_synset.relations.contains(&inverse) {
                    tracing::debug!(
                        "Added inverted relation (target={},type={}) to synset {}",
                        inverse.target,
                        inverse.kind,
                        target
                    );
                    target_synset.relations.push(inverse);
                    added += 1;
                }
            }
        }
        if self.invert_relations {
            tracing::info!("Inverted relations: {} edges added", added);
        }
    }

    fn literal_index(&self) -> HashMap<PartOfSpeech, HashMap<String, Vec<String>>> {
        let mut senses: HashMap<PartOfSpeech, HashMap<String, Vec<(Option<u32>, &str)>>> =
            HashMap::new();
        for synset in self.synsets.values() {
            for literal in synset.literals.iter() {
                senses
                    .entry(synset.pos)
                    .or_default()
                    .entry(literal.word.clone())
                    .or_default()
                    .push((literal.sense_number(), synset.id.as_str()));
            }
        }

        senses
            .into_iter()
            .map(|(pos, words)| {
                let words = words
                    .into_iter()
                    .map(|(word, mut entries)| {
                        // Stable: equal sense numbers keep id order. Unnumbered senses go last.
                        entries.sort_by_key(|(sense, _)| sense.unwrap_or(u32::MAX));
                        let mut ids: Vec<String> = Vec::with_capacity(entries.len());
                        for (_, id) in entries {
                            if !ids.iter().any(|known| known == id) {
                                ids.push(id.to_string());
                            }
                        }
                        (word, ids)
                    })
                    .collect();
                (pos, words)
            })
            .collect()
    }
}
