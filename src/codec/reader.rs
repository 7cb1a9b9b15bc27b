//! VisDic XML reader.
//!
//! Walks the document with a quick-xml pull parser, keeping the path of open elements so that
//! character data can be routed by context (`SYNSET/SYNONYM/LITERAL/SENSE`, `SYNSET/ILR/TYPE`,
//! ...). Elements the dialect does not define are skipped along with their text.

use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};
use std::{fs, path::Path};

use crate::{
    error::WnError,
    lexicon::{Lexicon, LexiconBuilder},
    properties::{Link, Literal, PartOfSpeech, Relation, Synset},
};

use super::{writer::is_xml_char, LoadDiagnostic};

/// Options controlling how a resource is turned into a [Lexicon].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Add inverse edges (hypernym → hyponym, holo_* → mero_*, ...) to relation targets.
    pub invert_relations: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            invert_relations: true,
        }
    }
}

/// Parse a VisDic XML document with default [LoadOptions].
pub fn load(text: &str) -> Result<Lexicon, WnError> {
    load_with(text, &LoadOptions::default())
}

pub fn load_with(text: &str, options: &LoadOptions) -> Result<Lexicon, WnError> {
    let mut builder = LexiconBuilder::new().invert_relations(options.invert_relations);
    VisDicReader::new(text).read_into(&mut builder)?;
    Ok(builder.build())
}

pub fn load_file<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Lexicon, WnError> {
    tracing::info!("Reading XML from {:?}", path.as_ref());
    let text = fs::read_to_string(path)?;
    load_with(&text, options)
}

/// Which pointer list a link-bearing element feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkTag {
    Ilr,
    Sumo,
    Elr,
    Elr3,
    Eksz,
    Vframe,
    /// `EQ_NEAR_SYNONYM`, `EQ_HYPERNYM`, `EQ_HYPONYM`: ELR shorthands with an implied type.
    EqShorthand(&'static str),
}

impl LinkTag {
    fn from_name(name: &str) -> Option<LinkTag> {
        match name {
            "ILR" => Some(LinkTag::Ilr),
            "SUMO" => Some(LinkTag::Sumo),
            "ELR" => Some(LinkTag::Elr),
            "ELR3" => Some(LinkTag::Elr3),
            "EKSZ" => Some(LinkTag::Eksz),
            "VFRAME" => Some(LinkTag::Vframe),
            "EQ_NEAR_SYNONYM" => Some(LinkTag::EqShorthand("eq_near_synonym")),
            "EQ_HYPERNYM" => Some(LinkTag::EqShorthand("eq_has_hypernym")),
            "EQ_HYPONYM" => Some(LinkTag::EqShorthand("eq_has_hyponym")),
            _ => None,
        }
    }

    /// Whether a nested `<TYPE>` carries the link type.
    fn has_type_child(&self) -> bool {
        !matches!(self, LinkTag::EqShorthand(_))
    }
}

/// Destination of a run of character data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Id,
    Id3,
    Pos,
    Word,
    Sense,
    LNote,
    Nucleus,
    Definition,
    Bcs,
    Usage,
    SNote,
    Stamp,
    Domain,
    Nl,
    Tnl,
    LinkTarget,
    LinkType,
}

/// Route text by the innermost three open elements.
fn text_slot(path: &[String]) -> Option<Slot> {
    let (parent, gparent, ggparent) = (
        ancestor(path, 0),
        ancestor(path, 1),
        ancestor(path, 2),
    );
    match (parent, gparent) {
        ("ID", "SYNSET") => Some(Slot::Id),
        ("ID3", "SYNSET") => Some(Slot::Id3),
        ("POS", "SYNSET") => Some(Slot::Pos),
        ("LITERAL", "SYNONYM") if ggparent == "SYNSET" => Some(Slot::Word),
        ("SENSE", "LITERAL") if ggparent == "SYNONYM" => Some(Slot::Sense),
        ("LNOTE", "LITERAL") if ggparent == "SYNONYM" => Some(Slot::LNote),
        ("NUCLEUS", "LITERAL") if ggparent == "SYNONYM" => Some(Slot::Nucleus),
        ("DEF", "SYNSET") => Some(Slot::Definition),
        ("BCS", "SYNSET") => Some(Slot::Bcs),
        ("USAGE", "SYNSET") => Some(Slot::Usage),
        ("SNOTE", "SYNSET") => Some(Slot::SNote),
        ("STAMP", "SYNSET") => Some(Slot::Stamp),
        ("DOMAIN", "SYNSET") => Some(Slot::Domain),
        ("NL", "SYNSET") => Some(Slot::Nl),
        ("TNL", "SYNSET") => Some(Slot::Tnl),
        (link, "SYNSET") if LinkTag::from_name(link).is_some() => Some(Slot::LinkTarget),
        ("TYPE", link) if ggparent == "SYNSET" => LinkTag::from_name(link)
            .filter(|tag| tag.has_type_child())
            .map(|_| Slot::LinkType),
        _ => None,
    }
}

/// Name of the element `depth` levels above the innermost open one, `""` past the root.
fn ancestor(path: &[String], depth: usize) -> &str {
    path.len()
        .checked_sub(depth + 1)
        .map(|idx| path[idx].as_str())
        .unwrap_or("")
}

/// The synset currently being read plus everything needed to finish it.
#[derive(Debug, Default)]
struct SynsetRecord {
    synset: Synset,
    pos: String,
    line: usize,
    column: usize,
    link: Option<(LinkTag, Link)>,
}

impl SynsetRecord {
    fn push_text(&mut self, slot: Slot, text: &str) {
        let synset = &mut self.synset;
        match slot {
            Slot::Id => synset.id.push_str(text),
            Slot::Id3 => synset.id3.push_str(text),
            Slot::Pos => self.pos.push_str(text),
            Slot::Word => last_literal(synset).word.push_str(text),
            Slot::Sense => last_literal(synset).sense.push_str(text),
            Slot::LNote => last_literal(synset).lnote.push_str(text),
            Slot::Nucleus => last_literal(synset).nucleus.push_str(text),
            Slot::Definition => synset.definition.push_str(text),
            Slot::Bcs => synset.bcs.push_str(text),
            Slot::Usage => last_string(&mut synset.usages).push_str(text),
            Slot::SNote => last_string(&mut synset.snotes).push_str(text),
            Slot::Stamp => synset.stamp.push_str(text),
            Slot::Domain => synset.domain.push_str(text),
            Slot::Nl => synset.nl.push_str(text),
            Slot::Tnl => synset.tnl.push_str(text),
            Slot::LinkTarget => {
                if let Some((_, link)) = self.link.as_mut() {
                    link.target.push_str(text);
                }
            }
            Slot::LinkType => {
                if let Some((_, link)) = self.link.as_mut() {
                    link.kind.push_str(text);
                }
            }
        }
    }

    fn finish_link(&mut self) {
        let Some((tag, link)) = self.link.take() else {
            return;
        };
        let link = Link::new(link.target.trim(), link.kind.trim());
        let synset = &mut self.synset;
        match tag {
            LinkTag::Ilr => synset
                .relations
                .push(Relation::new(link.target, link.kind.as_str())),
            LinkTag::Sumo => synset.sumo.push(link),
            LinkTag::Elr => synset.elrs.push(link),
            LinkTag::Elr3 => synset.elrs3.push(link),
            LinkTag::Eksz => synset.eksz.push(link),
            LinkTag::Vframe => synset.vframes.push(link),
            LinkTag::EqShorthand(kind) => synset.elrs.push(Link::new(link.target, kind)),
        }
    }
}

fn last_literal(synset: &mut Synset) -> &mut Literal {
    if synset.literals.is_empty() {
        synset.literals.push(Literal::default());
    }
    let last = synset.literals.len() - 1;
    &mut synset.literals[last]
}

fn last_string(strings: &mut Vec<String>) -> &mut String {
    if strings.is_empty() {
        strings.push(String::new());
    }
    let last = strings.len() - 1;
    &mut strings[last]
}

/// Converts byte offsets into 1-based line/column pairs. Offsets are expected to grow
/// monotonically, which keeps the scan linear over the whole document.
struct LineTracker<'a> {
    text: &'a [u8],
    offset: usize,
    line: usize,
    line_start: usize,
}

impl<'a> LineTracker<'a> {
    fn new(text: &'a str) -> Self {
        LineTracker {
            text: text.as_bytes(),
            offset: 0,
            line: 1,
            line_start: 0,
        }
    }

    fn locate(&mut self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.text.len());
        if offset < self.offset {
            self.offset = 0;
            self.line = 1;
            self.line_start = 0;
        }
        for (idx, byte) in self.text[self.offset..offset].iter().enumerate() {
            if *byte == b'\n' {
                self.line += 1;
                self.line_start = self.offset + idx + 1;
            }
        }
        self.offset = offset;
        (self.line, offset - self.line_start + 1)
    }
}

pub(crate) fn to_offset<P: TryInto<usize>>(position: P) -> usize {
    position.try_into().unwrap_or(usize::MAX)
}

/// 1-based line and column of a byte offset into `text`.
pub(crate) fn locate(text: &str, offset: usize) -> (usize, usize) {
    LineTracker::new(text).locate(offset)
}

pub(crate) struct VisDicReader<'a> {
    reader: Reader<&'a [u8]>,
    lines: LineTracker<'a>,
    path: Vec<String>,
    record: Option<SynsetRecord>,
    saw_root: bool,
    synset_count: usize,
}

impl<'a> VisDicReader<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        VisDicReader {
            reader: Reader::from_str(text),
            lines: LineTracker::new(text),
            path: Vec::new(),
            record: None,
            saw_root: false,
            synset_count: 0,
        }
    }

    fn error_at(&mut self, offset: usize, message: impl Into<String>) -> WnError {
        let (line, column) = self.lines.locate(offset);
        WnError::parse(line, column, message)
    }

    pub(crate) fn read_into(mut self, builder: &mut LexiconBuilder) -> Result<(), WnError> {
        loop {
            let offset = to_offset(self.reader.buffer_position());
            let event = match self.reader.read_event() {
                Ok(event) => event,
                Err(err) => {
                    let at = to_offset(self.reader.error_position());
                    return Err(self.error_at(at, err.to_string()));
                }
            };
            match event {
                Event::Start(e) => self.open(&e, offset)?,
                Event::Empty(e) => {
                    self.open(&e, offset)?;
                    self.close(offset, builder)?;
                }
                Event::End(_) => self.close(offset, builder)?,
                Event::Text(e) => {
                    let text = e
                        .unescape()
                        .map_err(|err| self.error_at(offset, err.to_string()))?;
                    self.text(&text, offset)?;
                }
                Event::CData(e) => {
                    let raw = e.into_inner();
                    let text = std::str::from_utf8(&raw)
                        .map_err(|err| self.error_at(offset, err.to_string()))?
                        .to_string();
                    self.text(&text, offset)?;
                }
                Event::Eof => break,
                // declaration, doctype, comments, processing instructions
                _ => {}
            }
        }

        let end = to_offset(self.reader.buffer_position());
        if let Some(open) = self.path.last().cloned() {
            return Err(self.error_at(end, format!("end of file reached before </{open}>")));
        }
        if !self.saw_root {
            return Err(self.error_at(end, "document has no root element"));
        }
        tracing::debug!("Read {} synset records", self.synset_count);
        Ok(())
    }

    fn open(&mut self, element: &BytesStart<'_>, offset: usize) -> Result<(), WnError> {
        let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
        self.saw_root = true;
        let (parent, gparent) = (ancestor(&self.path, 0), ancestor(&self.path, 1));

        if name == "SYNSET" {
            if self.record.is_some() {
                return Err(self.error_at(offset, "SYNSET element nested inside another SYNSET"));
            }
            let (line, column) = self.lines.locate(offset);
            self.record = Some(SynsetRecord {
                line,
                column,
                ..Default::default()
            });
        } else if let Some(record) = self.record.as_mut() {
            match (name.as_str(), parent) {
                ("LITERAL", "SYNONYM") if gparent == "SYNSET" => {
                    record.synset.literals.push(Literal::default())
                }
                ("USAGE", "SYNSET") => record.synset.usages.push(String::new()),
                ("SNOTE", "SYNSET") => record.synset.snotes.push(String::new()),
                (link, "SYNSET") => {
                    if let Some(tag) = LinkTag::from_name(link) {
                        record.link = Some((tag, Link::default()));
                    }
                }
                _ => {}
            }
        }
        self.path.push(name);
        Ok(())
    }

    fn close(&mut self, offset: usize, builder: &mut LexiconBuilder) -> Result<(), WnError> {
        let Some(name) = self.path.pop() else {
            return Err(self.error_at(offset, "end tag without a matching start tag"));
        };
        let parent = self.path.last().map(|p| p.as_str()).unwrap_or("");

        if name == "SYNSET" {
            if let Some(record) = self.record.take() {
                self.finish_synset(record, builder)?;
            }
        } else if parent == "SYNSET" && LinkTag::from_name(&name).is_some() {
            if let Some(record) = self.record.as_mut() {
                record.finish_link();
            }
        }
        Ok(())
    }

    /// Character references can smuggle in characters the writer could never emit, so every
    /// run is checked after unescaping.
    fn text(&mut self, text: &str, offset: usize) -> Result<(), WnError> {
        if let Some(bad) = text.chars().find(|c| !is_xml_char(*c)) {
            return Err(self.error_at(
                offset,
                format!("character U+{:04X} not allowed in XML 1.0", bad as u32),
            ));
        }
        if self.path.is_empty() {
            if !text.trim().is_empty() {
                return Err(self.error_at(offset, "text outside the root element"));
            }
            return Ok(());
        }
        if let (Some(record), Some(slot)) = (self.record.as_mut(), text_slot(&self.path)) {
            record.push_text(slot, text);
        }
        Ok(())
    }

    fn finish_synset(
        &mut self,
        mut record: SynsetRecord,
        builder: &mut LexiconBuilder,
    ) -> Result<(), WnError> {
        self.synset_count += 1;
        let id = record.synset.id.trim().to_string();
        if id.is_empty() {
            return Err(WnError::parse(
                record.line,
                record.column,
                "SYNSET record has no ID",
            ));
        }
        let pos_tag = record.pos.trim();
        if pos_tag.is_empty() {
            return Err(WnError::parse(
                record.line,
                record.column,
                format!("SYNSET {id} has no POS"),
            ));
        }
        let Some(pos) = PartOfSpeech::from_tag(pos_tag) else {
            builder.push_diagnostic(LoadDiagnostic::InvalidPos {
                id,
                pos: pos_tag.to_string(),
                line: record.line,
            });
            return Ok(());
        };
        record.synset.id = id;
        record.synset.id3 = record.synset.id3.trim().to_string();
        record.synset.pos = pos;
        builder.insert(record.synset, record.line);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::RelationType;
    use test_log::test;

    const DOG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE WNXML SYSTEM "wnxml.dtd">
<WNXML>
<SYNSET><ID>ENG20-02084071-n</ID><ID3>02084071-n</ID3><POS>n</POS><SYNONYM><LITERAL>dog<SENSE>1</SENSE></LITERAL><LITERAL>domestic dog<SENSE>1</SENSE><LNOTE>x</LNOTE></LITERAL></SYNONYM><ILR>ENG20-02083346-n<TYPE>hypernym</TYPE></ILR><DEF>a member of the genus Canis</DEF><USAGE>the dog barked</USAGE><DOMAIN>zoology</DOMAIN><ELR>ENG-1<TYPE>eq_synonym</TYPE></ELR><EQ_NEAR_SYNONYM>ENG-2</EQ_NEAR_SYNONYM></SYNSET>
<SYNSET><ID>ENG20-02083346-n</ID><POS>n</POS><SYNONYM><LITERAL>canine<SENSE>2</SENSE></LITERAL></SYNONYM><DEF>any of various fissiped mammals</DEF></SYNSET>
</WNXML>
"#;

    #[test]
    fn test_reads_all_fields() {
        let lexicon = load(DOG).unwrap();
        assert_eq!(lexicon.len(), 2);
        let dog = lexicon.get_synset("ENG20-02084071-n").unwrap();
        assert_eq!(dog.id3, "02084071-n");
        assert_eq!(dog.pos, PartOfSpeech::Noun);
        assert_eq!(dog.literals.len(), 2);
        assert_eq!(dog.literals[1].word, "domestic dog");
        assert_eq!(dog.literals[1].lnote, "x");
        assert_eq!(dog.definition, "a member of the genus Canis");
        assert_eq!(dog.usages, vec!["the dog barked".to_string()]);
        assert_eq!(dog.domain, "zoology");
        assert_eq!(
            dog.relations,
            vec![Relation::new("ENG20-02083346-n", RelationType::Hypernym)]
        );
        assert_eq!(
            dog.elrs,
            vec![
                Link::new("ENG-1", "eq_synonym"),
                Link::new("ENG-2", "eq_near_synonym")
            ]
        );
        assert!(lexicon.diagnostics().is_empty());
    }

    #[test]
    fn test_inverts_hypernyms_by_default() {
        let lexicon = load(DOG).unwrap();
        assert_eq!(
            lexicon.targets("ENG20-02083346-n", &RelationType::Hyponym),
            ["ENG20-02084071-n"]
        );
        let plain = load_with(
            DOG,
            &LoadOptions {
                invert_relations: false,
            },
        )
        .unwrap();
        assert!(plain
            .targets("ENG20-02083346-n", &RelationType::Hyponym)
            .is_empty());
    }

    #[test]
    fn test_unescapes_entities() {
        let xml = "<WNXML><SYNSET><ID>X</ID><POS>n</POS><SYNONYM><LITERAL>AT&amp;T &lt;co&gt; &quot;q&quot; &apos;a&apos; &#233;</LITERAL></SYNONYM><DEF><![CDATA[a < b & c]]></DEF></SYNSET></WNXML>";
        let lexicon = load(xml).unwrap();
        let synset = lexicon.get_synset("X").unwrap();
        assert_eq!(synset.literals[0].word, "AT&T <co> \"q\" 'a' é");
        assert_eq!(synset.definition, "a < b & c");
    }

    #[test]
    fn test_missing_root_is_tolerated() {
        let xml = "<SYNSET><ID>A</ID><POS>v</POS></SYNSET>";
        let lexicon = load(xml).unwrap();
        assert_eq!(lexicon.get_synset("A").unwrap().pos, PartOfSpeech::Verb);
    }

    #[test]
    fn test_missing_id_is_fatal() {
        let xml = "<WNXML>\n<SYNSET><POS>n</POS></SYNSET>\n</WNXML>";
        match load(xml).unwrap_err() {
            WnError::Parse { line, message, .. } => {
                assert_eq!(line, 2);
                assert!(message.contains("no ID"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_missing_pos_is_fatal() {
        let xml = "<WNXML><SYNSET><ID>A</ID></SYNSET></WNXML>";
        let err = load(xml).unwrap_err();
        assert_eq!(err.kind(), "ParseError");
        assert!(err.to_string().contains("has no POS"));
    }

    #[test]
    fn test_invalid_pos_is_skipped_with_diagnostic() {
        let xml = "<WNXML><SYNSET><ID>A</ID><POS>q</POS></SYNSET><SYNSET><ID>B</ID><POS>n</POS></SYNSET></WNXML>";
        let lexicon = load(xml).unwrap();
        assert_eq!(lexicon.len(), 1);
        assert!(matches!(
            lexicon.diagnostics(),
            [LoadDiagnostic::InvalidPos { .. }]
        ));
    }

    #[test]
    fn test_malformed_xml_reports_position() {
        let xml = "<WNXML>\n<SYNSET><ID>A</ID><POS>n</POS>\n</SYNONYM></SYNSET>\n</WNXML>";
        match load(xml).unwrap_err() {
            WnError::Parse { line, .. } => assert!(line > 1),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_unclosed_document_is_fatal() {
        let xml = "<WNXML><SYNSET><ID>A</ID><POS>n</POS></SYNSET>";
        assert_eq!(load(xml).unwrap_err().kind(), "ParseError");
        assert_eq!(load("").unwrap_err().kind(), "ParseError");
    }

    #[test]
    fn test_unknown_entity_is_fatal() {
        let xml = "<WNXML><SYNSET><ID>A</ID><POS>n</POS><DEF>caf&eacute;</DEF></SYNSET></WNXML>";
        assert_eq!(load(xml).unwrap_err().kind(), "ParseError");
    }

    #[test]
    fn test_disallowed_character_reference_is_fatal() {
        let xml = "<WNXML><SYNSET><ID>A</ID><POS>n</POS><SYNONYM><LITERAL>x&#1;y<SENSE>1</SENSE></LITERAL></SYNONYM></SYNSET></WNXML>";
        let err = load(xml).unwrap_err();
        assert_eq!(err.kind(), "ParseError");
        assert!(err.to_string().contains("U+0001"));

        let cdata = "<WNXML><SYNSET><ID>A</ID><POS>n</POS><DEF><![CDATA[a\u{1}b]]></DEF></SYNSET></WNXML>";
        assert_eq!(load(cdata).unwrap_err().kind(), "ParseError");

        let tab = "<WNXML><SYNSET><ID>A</ID><POS>n</POS><DEF>a&#9;b</DEF></SYNSET></WNXML>";
        assert_eq!(load(tab).unwrap().get_synset("A").unwrap().definition, "a\tb");
    }

    #[test]
    fn test_text_outside_root_is_fatal() {
        let xml = "garbage<SYNSET><ID>A</ID><POS>n</POS></SYNSET>";
        match load(xml).unwrap_err() {
            WnError::Parse { line, message, .. } => {
                assert_eq!(line, 1);
                assert!(message.contains("outside the root element"));
            }
            other => panic!("unexpected error {other:?}"),
        }

        let trailing = "<SYNSET><ID>A</ID><POS>n</POS></SYNSET>\ntrailing\n";
        assert_eq!(load(trailing).unwrap_err().kind(), "ParseError");

        let spaced = "\n<SYNSET><ID>A</ID><POS>n</POS></SYNSET>\n\n<SYNSET><ID>B</ID><POS>n</POS></SYNSET>\n";
        assert_eq!(load(spaced).unwrap().len(), 2);
    }

    #[test]
    fn test_line_tracker() {
        let mut lines = LineTracker::new("ab\ncd\n\nef");
        assert_eq!(lines.locate(0), (1, 1));
        assert_eq!(lines.locate(4), (2, 2));
        assert_eq!(lines.locate(7), (4, 1));
        assert_eq!(lines.locate(1), (1, 2));
    }
}
