//! Semantic features: named sets of synset ids, read from a small companion XML file.
//!
//! ```xml
//! <semfeatures>
//!   <semfeature name="animate"><synset id="ENG20-00004258-n"/></semfeature>
//! </semfeatures>
//! ```
//!
//! A word is compatible with a feature when one of its senses reaches one of the feature's
//! synsets along `hypernym` edges.

use quick_xml::{events::Event, Reader};
use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::Path,
};

use crate::{
    codec::reader::{locate, to_offset},
    error::WnError,
    properties::{PartOfSpeech, RelationType},
    query::QueryEngine,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SemFeatures {
    features: BTreeMap<String, Vec<String>>,
}

impl SemFeatures {
    pub fn load(text: &str) -> Result<SemFeatures, WnError> {
        let mut reader = Reader::from_str(text);
        let mut features: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut current = String::new();
        let mut depth = 0usize;
        loop {
            let event = reader.read_event().map_err(|err| {
                let (line, column) = locate(text, to_offset(reader.error_position()));
                WnError::parse(line, column, err.to_string())
            })?;
            let (element, opens) = match event {
                Event::Start(e) => (e, true),
                Event::Empty(e) => (e, false),
                Event::End(_) => {
                    depth = depth.saturating_sub(1);
                    continue;
                }
                Event::Eof => break,
                _ => continue,
            };
            if opens {
                depth += 1;
            }
            let attribute = |name: &str| -> Result<Option<String>, WnError> {
                let invalid = |message: String| {
                    let (line, column) = locate(text, to_offset(reader.buffer_position()));
                    WnError::parse(line, column, message)
                };
                let value = element
                    .try_get_attribute(name)
                    .map_err(|err| invalid(err.to_string()))?;
                match value {
                    Some(attr) => Ok(Some(
                        attr.unescape_value()
                            .map_err(|err| invalid(err.to_string()))?
                            .into_owned(),
                    )),
                    None => Ok(None),
                }
            };
            match element.name().as_ref() {
                b"semfeature" => {
                    if let Some(name) = attribute("name")? {
                        current = name;
                    }
                }
                b"synset" => {
                    if let Some(id) = attribute("id")? {
                        features.entry(current.clone()).or_default().push(id);
                    }
                }
                _ => {}
            }
        }
        if depth != 0 {
            let (line, column) = locate(text, to_offset(reader.buffer_position()));
            return Err(WnError::parse(
                line,
                column,
                "end of file reached inside an open element",
            ));
        }
        let loaded = SemFeatures { features };
        tracing::info!(
            "Read {} semantic features ({} feature-synset pairs)",
            loaded.features.len(),
            loaded.pair_count()
        );
        Ok(loaded)
    }

    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<SemFeatures, WnError> {
        let text = fs::read_to_string(path)?;
        SemFeatures::load(&text)
    }

    /// Synset ids mapped to `feature`; empty for unknown features.
    pub fn lookup(&self, feature: &str) -> BTreeSet<&str> {
        self.features
            .get(feature)
            .map(|ids| ids.iter().map(|id| id.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.features.keys().map(|name| name.as_str())
    }

    /// Number of feature name / synset id pairs.
    pub fn pair_count(&self) -> usize {
        self.features.values().map(|ids| ids.len()).sum()
    }

    /// `(sense id, feature synset id)` when some sense of `word` is a direct or distant hyponym
    /// of a synset of `feature`.
    pub fn is_literal_compatible(
        &self,
        engine: &QueryEngine<'_>,
        word: &str,
        pos: PartOfSpeech,
        feature: &str,
    ) -> Option<(String, String)> {
        let ids: Vec<&str> = self.lookup(feature).into_iter().collect();
        if ids.is_empty() {
            return None;
        }
        engine.is_literal_connected_with(word, pos, &RelationType::Hypernym, &ids)
    }
}
