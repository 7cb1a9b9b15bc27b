//! Diagnostic types for lexicon loading.
//!
//! A VisDic resource is frequently a little inconsistent (hand-edited ids, relations into synsets
//! that were deleted later). None of these stop the load; each one is recorded as a
//! [LoadDiagnostic] and kept on the resulting [`Lexicon`](crate::lexicon::Lexicon).

use serde::{Deserialize, Serialize};

use crate::properties::RelationType;

/// Non-fatal inconsistency found while loading a resource.
///
/// `line` is the input line on which the affected `<SYNSET>` starts (1-based).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadDiagnostic {
    /// A synset id was seen twice. The later record replaced the earlier one.
    DuplicateId { id: String, line: usize },

    /// The `<POS>` value is not one of `n`, `v`, `a`, `b`. The record was skipped.
    InvalidPos {
        id: String,
        pos: String,
        line: usize,
    },

    /// The same `(word, sense)` pair appears twice in one synset. The first occurrence is kept.
    DuplicateLiteral {
        id: String,
        word: String,
        sense: String,
        line: usize,
    },

    /// A relation points at an id that is not in the lexicon. The edge is kept and behaves as a
    /// terminal node during traversal.
    DanglingRelation {
        source: String,
        target: String,
        kind: RelationType,
    },

    /// A relation points back at its own synset. The edge is kept but never inverted.
    SelfReference { id: String, kind: RelationType },
}

impl LoadDiagnostic {
    /// Id of the synset the diagnostic is about.
    pub fn synset_id(&self) -> &str {
        match self {
            Self::DuplicateId { id, .. }
            | Self::InvalidPos { id, .. }
            | Self::DuplicateLiteral { id, .. }
            | Self::SelfReference { id, .. } => id,
            Self::DanglingRelation { source, .. } => source,
        }
    }

    pub fn line(&self) -> Option<usize> {
        match self {
            Self::DuplicateId { line, .. }
            | Self::InvalidPos { line, .. }
            | Self::DuplicateLiteral { line, .. } => Some(*line),
            Self::DanglingRelation { .. } | Self::SelfReference { .. } => None,
        }
    }

    pub fn is_dangling_relation(&self) -> bool {
        matches!(self, Self::DanglingRelation { .. })
    }

    pub fn is_duplicate_id(&self) -> bool {
        matches!(self, Self::DuplicateId { .. })
    }
}

impl std::fmt::Display for LoadDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId { id, line } => {
                write!(f, "synset with id {id} already exists (input line {line})")
            }
            Self::InvalidPos { id, pos, line } => {
                write!(f, "invalid POS '{pos}' for synset {id} (input line {line})")
            }
            Self::DuplicateLiteral {
                id,
                word,
                sense,
                line,
            } => write!(
                f,
                "literal {word}:{sense} repeated in synset {id} (input line {line})"
            ),
            Self::DanglingRelation {
                source,
                target,
                kind,
            } => write!(
                f,
                "synset {target} is missing ('{kind}' target from synset {source})"
            ),
            Self::SelfReference { id, kind } => {
                write!(f, "self-referencing relation '{kind}' for synset {id}")
            }
        }
    }
}
