//! # wnxml
//!
//! Load a WordNet-style lexicon stored in the BalkaNet/VisDic XML dialect, look up word senses and
//! traverse the typed relation graph between synsets.
//!
//! ## Overview
//!
//! A wordnet groups synonymous word senses into *synsets* and links synsets by semantic relations
//! (hypernym, hyponym, meronym, ...). wnxml reads the whole resource into memory once, builds a
//! literal index and a relation index alongside it, and answers queries such as "all hyponyms of
//! every sense of *kutya*, to depth 3" against the immutable result.
//!
//! ### Key Features
//!
//! - **Tolerant loading**: duplicate ids, dangling relation targets and invalid parts of speech are
//!   recorded as diagnostics instead of aborting the load
//! - **Cycle-safe traversal**: every walk of the relation graph carries a visited set
//! - **Lossless round-trip**: every resource-specific tag is preserved and text is escaped so that
//!   reading written XML reproduces the lexicon
//! - **Console**: the `wnquery` binary (feature `bin`) offers the classic dot-command query shell
//!
//! ## Architecture
//!
//! - **[`properties`]**: synsets, literals, relation types, parts of speech
//! - **[`codec`]**: XML reader (`load`) and writer (`write_synset`, `write_lexicon`)
//! - **[`lexicon`]**: the loaded resource and its indices
//! - **[`query`]**: traversals and graph measures over a lexicon
//! - **[`semfeatures`]**: semantic feature to synset mappings
//! - **[`commands`]**, **[`console`]**: console command grammar and execution
//! - **[`config`]**: console settings stored as TOML
//!
//! ## Quick Start
//!
//! ```rust
//! use wnxml::{codec::load, properties::{PartOfSpeech, RelationType}, query::QueryEngine};
//!
//! let lexicon = load(r#"<WNXML>
//! <SYNSET><ID>dog</ID><POS>n</POS><SYNONYM><LITERAL>kutya<SENSE>1</SENSE></LITERAL></SYNONYM><ILR>canine<TYPE>hypernym</TYPE></ILR></SYNSET>
//! <SYNSET><ID>canine</ID><POS>n</POS><SYNONYM><LITERAL>kutyaféle<SENSE>1</SENSE></LITERAL></SYNONYM></SYNSET>
//! </WNXML>"#)?;
//!
//! let engine = QueryEngine::new(&lexicon);
//! for trace in engine.resolve_query("kutya", PartOfSpeech::Noun, &RelationType::Hypernym, true, None)? {
//!     println!("{trace}");
//! }
//! // hypernym edges are inverted at load time
//! assert_eq!(lexicon.targets("canine", &RelationType::Hyponym), ["dog"]);
//! # Ok::<(), wnxml::WnError>(())
//! ```
//!
//! ## Features
//!
//! - **default**: library only
//! - **bin**: the `wnquery` command-line tool
//! - **readline**: line editing and history in the console

pub mod codec;
pub mod commands;
pub mod config;
pub mod console;
pub mod error;
pub mod lexicon;
pub mod properties;
pub mod query;
pub mod semfeatures;

pub use error::*;
