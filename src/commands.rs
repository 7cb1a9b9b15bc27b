use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::{
    error::WnError,
    properties::{PartOfSpeech, RelationType},
};

pub const HELP: &str = "\
Available commands:
.h                                                this help
.q                                                quit
.i   <id>                                         look up synset id
.l   <literal>                                    look up all synsets containing literal in all POS
.l   <literal> <pos>                              look up all synsets containing literal in given POS
.l   <literal> <sensenum> <pos>                   look up synset containing literal with given sense number in given POS
.rl  <literal> <pos>                              list known relations of all senses of literal in POS
.rl  <literal> <pos> <relation>                   look up relation of all senses of literal in POS, list targets
.ri  <id> <relation>                              look up relation of synset with id, list targets
.ti  <id> <relation> [<depth>]                    trace relations of synset with id
.tl  <literal> <pos> <relation> [<depth>]         trace relations of all senses of literal in POS
.ci  <id> <relation> <id1> [<id2>...]             check if any of id1,id2,... is reachable from id by following relation
.cl  <literal> <pos> <relation> <id1> [<id2>...]  check if any of id1,id2,... is reachable from any sense of literal by following relation
.cli <literal> <id> [hyponyms]                    check if synset contains literal, or if \"hyponyms\" is added, any of its hyponyms
.slc <literal1> <literal2> <pos> <relation> [top] calculate Leacock-Chodorow similarity for all senses of literals in pos using relation
                                                  if 'top' is added, an artificial root node is added to relation paths, making WN interconnected.
.md  <id> <relation>                              calculate the longest possible path from synset with id using relation
.sg  <id> <relation>                              calculate the number of nodes reachable from synset with id using relation
.st                                               statistics of the loaded wordnet
.x   <id>                                         print synset with id as XML
Arguments are separated by whitespace, so literals containing spaces (e.g. \"domestic dog\") cannot be queried.";

pub const FEATURE_HELP: &str = "\
.s   <feature>                                    look up semantic feature
.sc  <literal> <pos> <feature>                    check whether any sense of literal is compatible with semantic feature";

/// One console command, parsed from a line such as `.tl kutya n hypernym`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    Help,
    Quit,
    /// `.i`
    Synset(String),
    /// `.l`, with the optional sense number and part of speech.
    Literal {
        word: String,
        sense: Option<u32>,
        pos: Option<PartOfSpeech>,
    },
    /// `.rl`: the relation types of every sense, or the targets of one of them.
    LiteralRelations {
        word: String,
        pos: PartOfSpeech,
        relation: Option<RelationType>,
    },
    /// `.ri`
    Relation { id: String, relation: RelationType },
    /// `.ti`
    TraceId {
        id: String,
        relation: RelationType,
        depth: Option<usize>,
    },
    /// `.tl`
    TraceLiteral {
        word: String,
        pos: PartOfSpeech,
        relation: RelationType,
        depth: Option<usize>,
    },
    /// `.ci`
    ConnectId {
        id: String,
        relation: RelationType,
        targets: Vec<String>,
    },
    /// `.cl`
    ConnectLiteral {
        word: String,
        pos: PartOfSpeech,
        relation: RelationType,
        targets: Vec<String>,
    },
    /// `.cli`
    LiteralInSynset {
        word: String,
        id: String,
        hyponyms: bool,
    },
    /// `.slc`
    Similarity {
        first: String,
        second: String,
        pos: PartOfSpeech,
        relation: RelationType,
        add_top: bool,
    },
    /// `.md`
    MaxDepth { id: String, relation: RelationType },
    /// `.sg`
    SubGraphSize { id: String, relation: RelationType },
    /// `.st`
    Stats,
    /// `.x`
    Xml(String),
    /// `.s`
    Feature(String),
    /// `.sc`
    FeatureCompatible {
        word: String,
        pos: PartOfSpeech,
        feature: String,
    },
}

fn format_error(command: &str) -> WnError {
    WnError::Command(format!("Incorrect format for command {command}"))
}

fn parse_pos(command: &str, token: &str) -> Result<PartOfSpeech, WnError> {
    token
        .parse()
        .map_err(|_| WnError::Command(format!("{command}: invalid POS '{token}' (use n, v, a or b)")))
}

fn parse_depth(command: &str, token: Option<&&str>) -> Result<Option<usize>, WnError> {
    token
        .map(|depth| {
            depth
                .parse()
                .map_err(|_| WnError::Command(format!("{command}: invalid depth '{depth}'")))
        })
        .transpose()
}

impl Op {
    pub fn parse(line: &str) -> Result<Op, WnError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = tokens.split_first() else {
            return Err(WnError::Command("empty command".to_string()));
        };
        let string = |idx: usize| args[idx].to_string();
        let relation = |idx: usize| RelationType::from(args[idx]);

        let op = match (command, args.len()) {
            (".h", 0) => Op::Help,
            (".q", 0) => Op::Quit,
            (".i", 1) => Op::Synset(string(0)),
            (".l", 1) => Op::Literal {
                word: string(0),
                sense: None,
                pos: None,
            },
            (".l", 2) => Op::Literal {
                word: string(0),
                sense: None,
                pos: Some(parse_pos(command, args[1])?),
            },
            (".l", 3) => Op::Literal {
                word: string(0),
                sense: Some(args[1].parse().map_err(|_| {
                    WnError::Command(format!("{command}: invalid sense number '{}'", args[1]))
                })?),
                pos: Some(parse_pos(command, args[2])?),
            },
            (".rl", 2 | 3) => Op::LiteralRelations {
                word: string(0),
                pos: parse_pos(command, args[1])?,
                relation: args.get(2).map(|rel| RelationType::from(*rel)),
            },
            (".ri", 2) => Op::Relation {
                id: string(0),
                relation: relation(1),
            },
            (".ti", 2 | 3) => Op::TraceId {
                id: string(0),
                relation: relation(1),
                depth: parse_depth(command, args.get(2))?,
            },
            (".tl", 3 | 4) => Op::TraceLiteral {
                word: string(0),
                pos: parse_pos(command, args[1])?,
                relation: relation(2),
                depth: parse_depth(command, args.get(3))?,
            },
            (".ci", n) if n >= 3 => Op::ConnectId {
                id: string(0),
                relation: relation(1),
                targets: args[2..].iter().map(|t| t.to_string()).collect(),
            },
            (".cl", n) if n >= 4 => Op::ConnectLiteral {
                word: string(0),
                pos: parse_pos(command, args[1])?,
                relation: relation(2),
                targets: args[3..].iter().map(|t| t.to_string()).collect(),
            },
            (".cli", 2) => Op::LiteralInSynset {
                word: string(0),
                id: string(1),
                hyponyms: false,
            },
            (".cli", 3) if args[2] == "hyponyms" => Op::LiteralInSynset {
                word: string(0),
                id: string(1),
                hyponyms: true,
            },
            (".slc", 4) => Op::Similarity {
                first: string(0),
                second: string(1),
                pos: parse_pos(command, args[2])?,
                relation: relation(3),
                add_top: false,
            },
            (".slc", 5) if args[4] == "top" => Op::Similarity {
                first: string(0),
                second: string(1),
                pos: parse_pos(command, args[2])?,
                relation: relation(3),
                add_top: true,
            },
            (".md", 2) => Op::MaxDepth {
                id: string(0),
                relation: relation(1),
            },
            (".sg", 2) => Op::SubGraphSize {
                id: string(0),
                relation: relation(1),
            },
            (".st", 0) => Op::Stats,
            (".x", 1) => Op::Xml(string(0)),
            (".s", 1) => Op::Feature(string(0)),
            (".sc", 3) => Op::FeatureCompatible {
                word: string(0),
                pos: parse_pos(command, args[1])?,
                feature: string(2),
            },
            (
                ".h" | ".q" | ".i" | ".l" | ".rl" | ".ri" | ".ti" | ".tl" | ".ci" | ".cl" | ".cli"
                | ".slc" | ".md" | ".sg" | ".st" | ".x" | ".s" | ".sc",
                _,
            ) => return Err(format_error(command)),
            _ => return Err(WnError::Command(format!("Unknown command {command}"))),
        };
        Ok(op)
    }
}

/// Writes the command back in console syntax.
impl Display for Op {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let opt = |depth: &Option<usize>| depth.map(|d| format!(" {d}")).unwrap_or_default();
        match self {
            Op::Help => write!(f, ".h"),
            Op::Quit => write!(f, ".q"),
            Op::Synset(id) => write!(f, ".i {id}"),
            Op::Literal { word, sense, pos } => {
                write!(f, ".l {word}")?;
                if let Some(sense) = sense {
                    write!(f, " {sense}")?;
                }
                if let Some(pos) = pos {
                    write!(f, " {pos}")?;
                }
                Ok(())
            }
            Op::LiteralRelations {
                word,
                pos,
                relation,
            } => match relation {
                Some(relation) => write!(f, ".rl {word} {pos} {relation}"),
                None => write!(f, ".rl {word} {pos}"),
            },
            Op::Relation { id, relation } => write!(f, ".ri {id} {relation}"),
            Op::TraceId {
                id,
                relation,
                depth,
            } => write!(f, ".ti {id} {relation}{}", opt(depth)),
            Op::TraceLiteral {
                word,
                pos,
                relation,
                depth,
            } => write!(f, ".tl {word} {pos} {relation}{}", opt(depth)),
            Op::ConnectId {
                id,
                relation,
                targets,
            } => write!(f, ".ci {id} {relation} {}", targets.join(" ")),
            Op::ConnectLiteral {
                word,
                pos,
                relation,
                targets,
            } => write!(f, ".cl {word} {pos} {relation} {}", targets.join(" ")),
            Op::LiteralInSynset { word, id, hyponyms } => write!(
                f,
                ".cli {word} {id}{}",
                if *hyponyms { " hyponyms" } else { "" }
            ),
            Op::Similarity {
                first,
                second,
                pos,
                relation,
                add_top,
            } => write!(
                f,
                ".slc {first} {second} {pos} {relation}{}",
                if *add_top { " top" } else { "" }
            ),
            Op::MaxDepth { id, relation } => write!(f, ".md {id} {relation}"),
            Op::SubGraphSize { id, relation } => write!(f, ".sg {id} {relation}"),
            Op::Stats => write!(f, ".st"),
            Op::Xml(id) => write!(f, ".x {id}"),
            Op::Feature(feature) => write!(f, ".s {feature}"),
            Op::FeatureCompatible { word, pos, feature } => {
                write!(f, ".sc {word} {pos} {feature}")
            }
        }
    }
}
