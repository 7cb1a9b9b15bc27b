//! VisDic XML writer.
//!
//! Synsets are written one per line with no inner whitespace, children in schema order. Every
//! text node goes through [escape_text], so any string the reader produced is written back
//! unchanged after a second read.

use quick_xml::escape::escape;
use std::{collections::HashSet, fmt::Write as _, io};

use crate::{
    error::WnError,
    lexicon::Lexicon,
    properties::{Link, Synset},
};

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const DOCTYPE: &str = r#"<!DOCTYPE WNXML SYSTEM "wnxml.dtd">"#;

pub fn write_header() -> String {
    format!("{XML_DECL}\n{DOCTYPE}\n<WNXML>")
}

pub fn write_footer() -> String {
    "</WNXML>".to_string()
}

/// Replace the five reserved characters with entity references. Fails on characters that XML
/// 1.0 cannot carry at all.
pub fn escape_text(text: &str) -> Result<String, WnError> {
    if let Some(bad) = text.chars().find(|c| !is_xml_char(*c)) {
        return Err(WnError::Serialization(format!(
            "character U+{:04X} cannot be represented in XML 1.0",
            bad as u32
        )));
    }
    Ok(escape(text).into_owned())
}

/// Whether XML 1.0 allows `c` in character data.
pub(crate) fn is_xml_char(c: char) -> bool {
    match c {
        '\t' | '\n' | '\r' => true,
        '\u{FFFE}' | '\u{FFFF}' => false,
        c => c >= '\u{20}',
    }
}

fn element(out: &mut String, tag: &str, text: &str) -> Result<(), WnError> {
    write!(out, "<{tag}>{}</{tag}>", escape_text(text)?)?;
    Ok(())
}

fn optional_element(out: &mut String, tag: &str, text: &str) -> Result<(), WnError> {
    if text.is_empty() {
        return Ok(());
    }
    element(out, tag, text)
}

fn typed_link(out: &mut String, tag: &str, target: &str, kind: &str) -> Result<(), WnError> {
    write!(
        out,
        "<{tag}>{}<TYPE>{}</TYPE></{tag}>",
        escape_text(target)?,
        escape_text(kind)?
    )?;
    Ok(())
}

fn links(out: &mut String, tag: &str, links: &[Link]) -> Result<(), WnError> {
    for link in links {
        typed_link(out, tag, &link.target, &link.kind)?;
    }
    Ok(())
}

/// One `<SYNSET>` element, without a trailing newline.
pub fn write_synset(synset: &Synset) -> Result<String, WnError> {
    let mut out = String::with_capacity(256);
    out.push_str("<SYNSET>");
    element(&mut out, "ID", &synset.id)?;
    optional_element(&mut out, "ID3", &synset.id3)?;
    element(&mut out, "POS", synset.pos.tag())?;

    out.push_str("<SYNONYM>");
    for literal in synset.literals.iter() {
        write!(out, "<LITERAL>{}", escape_text(&literal.word)?)?;
        element(&mut out, "SENSE", &literal.sense)?;
        optional_element(&mut out, "LNOTE", &literal.lnote)?;
        optional_element(&mut out, "NUCLEUS", &literal.nucleus)?;
        out.push_str("</LITERAL>");
    }
    out.push_str("</SYNONYM>");

    let mut written = HashSet::new();
    for relation in synset.relations.iter() {
        if written.insert(relation) {
            typed_link(&mut out, "ILR", &relation.target, relation.kind.as_str())?;
        }
    }

    optional_element(&mut out, "DEF", &synset.definition)?;
    optional_element(&mut out, "BCS", &synset.bcs)?;
    for usage in synset.usages.iter() {
        element(&mut out, "USAGE", usage)?;
    }
    for snote in synset.snotes.iter() {
        element(&mut out, "SNOTE", snote)?;
    }
    optional_element(&mut out, "STAMP", &synset.stamp)?;
    optional_element(&mut out, "DOMAIN", &synset.domain)?;
    links(&mut out, "SUMO", &synset.sumo)?;
    optional_element(&mut out, "NL", &synset.nl)?;
    optional_element(&mut out, "TNL", &synset.tnl)?;
    links(&mut out, "ELR", &synset.elrs)?;
    links(&mut out, "ELR3", &synset.elrs3)?;
    links(&mut out, "EKSZ", &synset.eksz)?;
    links(&mut out, "VFRAME", &synset.vframes)?;
    out.push_str("</SYNSET>");
    Ok(out)
}

/// A complete document holding `synsets`, one per line.
pub fn write_synsets<'a, I, W>(synsets: I, mut out: W) -> Result<(), WnError>
where
    I: IntoIterator<Item = &'a Synset>,
    W: io::Write,
{
    writeln!(out, "{}", write_header())?;
    let mut count = 0usize;
    for synset in synsets {
        writeln!(out, "{}", write_synset(synset)?)?;
        count += 1;
    }
    writeln!(out, "{}", write_footer())?;
    out.flush()?;
    tracing::debug!("Wrote {} synsets", count);
    Ok(())
}

pub fn write_lexicon<W: io::Write>(lexicon: &Lexicon, out: W) -> Result<(), WnError> {
    write_synsets(lexicon.synsets(), out)
}
