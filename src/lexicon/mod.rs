//! Lexicon module: the in-memory wordnet.
//!
//! # Module Organization
//!
//! - [`base`]: [`Lexicon`] itself, its statistics and the [`LexiconBuilder`] used by the loader
//! - [`graph`]: relation index and per-relation petgraph views
//!
//! ```rust
//! use wnxml::lexicon::{Lexicon, LexiconStats};
//! ```

mod base;
pub mod graph;


pub use base::{Lexicon, LexiconBuilder, LexiconStats, PosStats};
pub use graph::{RelationIndex, RelationSubGraph};
