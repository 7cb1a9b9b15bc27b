//! [crate::properties] contains the basic building blocks of a [crate::lexicon::Lexicon]: synsets,
//! their literals and the typed relations between them.
pub use enumset::EnumSet;
use enumset::*;
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use crate::error::WnError;

/// Grammatical category partitioning the synset space. VisDic encodes it as a one letter tag.
#[derive(EnumSetType, Debug, Default, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[enumset(serialize_repr = "list")]
pub enum PartOfSpeech {
    #[default]
    #[serde(rename = "n")]
    Noun,
    #[serde(rename = "v")]
    Verb,
    #[serde(rename = "a")]
    Adjective,
    #[serde(rename = "b")]
    Adverb,
}

impl PartOfSpeech {
    pub fn all() -> &'static [PartOfSpeech] {
        &[
            PartOfSpeech::Noun,
            PartOfSpeech::Verb,
            PartOfSpeech::Adjective,
            PartOfSpeech::Adverb,
        ]
    }

    /// The tag used inside `<POS>` elements.
    pub fn tag(&self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "n",
            PartOfSpeech::Verb => "v",
            PartOfSpeech::Adjective => "a",
            PartOfSpeech::Adverb => "b",
        }
    }

    pub fn from_tag(tag: &str) -> Option<PartOfSpeech> {
        match tag {
            "n" => Some(PartOfSpeech::Noun),
            "v" => Some(PartOfSpeech::Verb),
            "a" => Some(PartOfSpeech::Adjective),
            "b" => Some(PartOfSpeech::Adverb),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "noun",
            PartOfSpeech::Verb => "verb",
            PartOfSpeech::Adjective => "adjective",
            PartOfSpeech::Adverb => "adverb",
        }
    }
}

impl Display for PartOfSpeech {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Accepts both the VisDic tag (`n`) and the full name (`noun`).
impl FromStr for PartOfSpeech {
    type Err = WnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PartOfSpeech::from_tag(s)
            .or_else(|| {
                PartOfSpeech::all()
                    .iter()
                    .copied()
                    .find(|pos| pos.name() == s)
            })
            .ok_or_else(|| WnError::Lookup(format!("Invalid POS '{s}'")))
    }
}

macro_rules! relation_types {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// Type of an internal (ILR) relation edge. Relation names outside the known VisDic
        /// vocabulary are kept verbatim in [RelationType::Other].
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum RelationType {
            $($variant,)+
            Other(String),
        }

        impl RelationType {
            pub fn as_str(&self) -> &str {
                match self {
                    $(RelationType::$variant => $name,)+
                    RelationType::Other(name) => name.as_str(),
                }
            }

            /// Every relation type with a fixed name.
            pub fn known() -> &'static [RelationType] {
                &[$(RelationType::$variant,)+]
            }
        }

        impl From<&str> for RelationType {
            fn from(name: &str) -> RelationType {
                match name {
                    $($name => RelationType::$variant,)+
                    other => RelationType::Other(other.to_string()),
                }
            }
        }
    };
}

relation_types! {
    Hypernym => "hypernym",
    Hyponym => "hyponym",
    HoloMember => "holo_member",
    MeroMember => "mero_member",
    HoloPart => "holo_part",
    MeroPart => "mero_part",
    HoloPortion => "holo_portion",
    MeroPortion => "mero_portion",
    RegionDomain => "region_domain",
    RegionMember => "region_member",
    UsageDomain => "usage_domain",
    UsageMember => "usage_member",
    CategoryDomain => "category_domain",
    CategoryMember => "category_member",
    NearAntonym => "near_antonym",
    Middle => "middle",
    VerbGroup => "verb_group",
    SimilarTo => "similar_to",
    AlsoSee => "also_see",
    BeInState => "be_in_state",
    EngDerivative => "eng_derivative",
    IsConsequentStateOf => "is_consequent_state_of",
    HasConsequentState => "has_consequent_state",
    IsPreparatoryPhaseOf => "is_preparatory_phase_of",
    HasPreparatoryPhase => "has_preparatory_phase",
    IsTelosOf => "is_telos_of",
    HasTelos => "has_telos",
    Subevent => "subevent",
    HasSubevent => "has_subevent",
    Causes => "causes",
    CausedBy => "caused_by",
}

impl RelationType {
    /// The relation added to the target synset when relations are inverted at load time.
    ///
    /// Only the "source" side of each pair inverts (hypernym yields hyponym, not the other way
    /// around), matching how VisDic resources record one direction and derive the other.
    pub fn inverse(&self) -> Option<RelationType> {
        use RelationType::*;
        match self {
            Hypernym => Some(Hyponym),
            HoloMember => Some(MeroMember),
            HoloPart => Some(MeroPart),
            HoloPortion => Some(MeroPortion),
            RegionDomain => Some(RegionMember),
            UsageDomain => Some(UsageMember),
            CategoryDomain => Some(CategoryMember),
            NearAntonym => Some(NearAntonym),
            Middle => Some(Middle),
            VerbGroup => Some(VerbGroup),
            SimilarTo => Some(SimilarTo),
            AlsoSee => Some(AlsoSee),
            BeInState => Some(BeInState),
            EngDerivative => Some(EngDerivative),
            IsConsequentStateOf => Some(HasConsequentState),
            IsPreparatoryPhaseOf => Some(HasPreparatoryPhase),
            IsTelosOf => Some(HasTelos),
            Subevent => Some(HasSubevent),
            Causes => Some(CausedBy),
            _ => None,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, RelationType::Other(_))
    }
}

impl From<String> for RelationType {
    fn from(name: String) -> RelationType {
        RelationType::from(name.as_str())
    }
}

impl From<RelationType> for String {
    fn from(src: RelationType) -> String {
        src.as_str().to_string()
    }
}

impl FromStr for RelationType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(RelationType::from(s))
    }
}

impl Display for RelationType {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A word sense: one word of a synset together with its sense number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Literal {
    pub word: String,
    /// Sense number as written in the source, so it survives a write/read cycle untouched.
    pub sense: String,
    pub lnote: String,
    pub nucleus: String,
}

impl Literal {
    pub fn new(word: impl Into<String>, sense: impl Into<String>) -> Self {
        Literal {
            word: word.into(),
            sense: sense.into(),
            ..Default::default()
        }
    }

    pub fn sense_number(&self) -> Option<u32> {
        self.sense.trim().parse().ok()
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}:{}", self.word, self.sense)
    }
}

/// Directed, typed edge to another synset of the same resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relation {
    pub target: String,
    pub kind: RelationType,
}

impl Relation {
    pub fn new(target: impl Into<String>, kind: impl Into<RelationType>) -> Self {
        Relation {
            target: target.into(),
            kind: kind.into(),
        }
    }
}

/// Opaque resource-specific pointer (SUMO, ELR, ELR3, EKSZ, VFRAME). The query engine never
/// interprets these; they are carried so serialization loses nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    pub target: String,
    pub kind: String,
}

impl Link {
    pub fn new(target: impl Into<String>, kind: impl Into<String>) -> Self {
        Link {
            target: target.into(),
            kind: kind.into(),
        }
    }
}

/// A node of the semantic graph.
///
/// String fields that are optional in the VisDic schema (`definition`, `bcs`, `stamp`, ...) use
/// the empty string for "absent".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Synset {
    pub id: String,
    /// PWN 3.0 synset id.
    pub id3: String,
    pub pos: PartOfSpeech,
    pub literals: Vec<Literal>,
    pub definition: String,
    pub relations: Vec<Relation>,
    pub bcs: String,
    pub stamp: String,
    pub domain: String,
    pub nl: String,
    pub tnl: String,
    pub usages: Vec<String>,
    pub snotes: Vec<String>,
    pub sumo: Vec<Link>,
    pub elrs: Vec<Link>,
    pub elrs3: Vec<Link>,
    pub eksz: Vec<Link>,
    pub vframes: Vec<Link>,
}

impl Synset {
    pub fn new(id: impl Into<String>, pos: PartOfSpeech) -> Self {
        Synset {
            id: id.into(),
            pos,
            ..Default::default()
        }
    }

    pub fn with_literal(mut self, word: impl Into<String>, sense: impl Into<String>) -> Self {
        self.literals.push(Literal::new(word, sense));
        self
    }

    pub fn with_relation(mut self, target: impl Into<String>, kind: impl Into<RelationType>) -> Self {
        self.relations.push(Relation::new(target, kind));
        self
    }

    pub fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = definition.into();
        self
    }

    pub fn has_word(&self, word: &str) -> bool {
        self.literals.iter().any(|l| l.word == word)
    }

    /// Targets of all relations of the given type, in stored order.
    pub fn targets<'a>(&'a self, kind: &'a RelationType) -> impl Iterator<Item = &'a str> + 'a {
        self.relations
            .iter()
            .filter(move |r| &r.kind == kind)
            .map(|r| r.target.as_str())
    }

    /// `word:sense, word:sense, ...`
    pub fn literal_summary(&self) -> String {
        self.literals
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<String>>()
            .join(", ")
    }
}

/// `<id>  {<word>:<sense>, ...}  (<definition>)`, the one-line form used by the console.
impl Display for Synset {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}  {{{}}}  ({})",
            self.id,
            self.literal_summary(),
            self.definition
        )
    }
}
