//! Interactive console: runs [Op]s against a loaded lexicon and prints the results.
//!
//! Output goes to any [io::Write], so the whole command surface can be driven from tests. Line
//! input comes from a [LineEditor]; [PlainEditor] reads any buffered reader, and with the
//! `readline` feature [RustylineEditor] adds history and line editing on a terminal.

use std::{
    collections::BTreeSet,
    io::{self, BufRead, Write},
};

use crate::{
    codec::write_synset,
    commands::{Op, FEATURE_HELP, HELP},
    config::Settings,
    error::WnError,
    lexicon::Lexicon,
    properties::{PartOfSpeech, RelationType, Synset},
    query::{render_trace, QueryEngine},
    semfeatures::SemFeatures,
};

/// Source of command lines.
pub trait LineEditor {
    /// The next line without its terminator, or `None` once input is exhausted.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, WnError>;

    fn add_history(&mut self, _line: &str) {}
}

/// Reads lines from a [BufRead] without editing or history.
pub struct PlainEditor<R> {
    input: R,
    show_prompt: bool,
}

impl<R: BufRead> PlainEditor<R> {
    pub fn new(input: R) -> Self {
        PlainEditor {
            input,
            show_prompt: false,
        }
    }
}

impl PlainEditor<io::StdinLock<'static>> {
    /// Standard input, with the prompt printed to standard error.
    pub fn stdin() -> Self {
        PlainEditor {
            input: io::stdin().lock(),
            show_prompt: true,
        }
    }
}

impl<R: BufRead> LineEditor for PlainEditor<R> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, WnError> {
        if self.show_prompt {
            let mut err = io::stderr();
            write!(err, "{prompt}")?;
            err.flush()?;
        }
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

#[cfg(feature = "readline")]
pub use self::readline::RustylineEditor;

#[cfg(feature = "readline")]
mod readline {
    use rustyline::{error::ReadlineError, DefaultEditor};
    use std::path::PathBuf;

    use super::LineEditor;
    use crate::error::WnError;

    /// Terminal line editor with history, saved to `history` when dropped.
    pub struct RustylineEditor {
        editor: DefaultEditor,
        history: Option<PathBuf>,
    }

    impl RustylineEditor {
        pub fn new(history: Option<PathBuf>) -> Result<Self, WnError> {
            let mut editor = DefaultEditor::new().map_err(|e| WnError::Io(e.to_string()))?;
            if let Some(path) = history.as_ref().filter(|path| path.exists()) {
                if let Err(e) = editor.load_history(path) {
                    tracing::warn!("Could not load history from {:?}: {}", path, e);
                }
            }
            Ok(RustylineEditor { editor, history })
        }
    }

    impl LineEditor for RustylineEditor {
        fn read_line(&mut self, prompt: &str) -> Result<Option<String>, WnError> {
            match self.editor.readline(prompt) {
                Ok(line) => Ok(Some(line)),
                Err(ReadlineError::Eof | ReadlineError::Interrupted) => Ok(None),
                Err(e) => Err(WnError::Io(e.to_string())),
            }
        }

        fn add_history(&mut self, line: &str) {
            if let Err(e) = self.editor.add_history_entry(line) {
                tracing::debug!("History entry dropped: {}", e);
            }
        }
    }

    impl Drop for RustylineEditor {
        fn drop(&mut self) {
            if let Some(path) = self.history.as_ref() {
                if let Err(e) = self.editor.save_history(path) {
                    tracing::warn!("Could not save history to {:?}: {}", path, e);
                }
            }
        }
    }
}

/// What the command loop does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Console<'a> {
    engine: QueryEngine<'a>,
    features: Option<&'a SemFeatures>,
    max_depth: Option<usize>,
    prompt: String,
}

impl<'a> Console<'a> {
    pub fn new(lexicon: &'a Lexicon, features: Option<&'a SemFeatures>, settings: &Settings) -> Self {
        Console {
            engine: QueryEngine::new(lexicon),
            features,
            max_depth: settings.max_depth,
            prompt: settings.prompt.clone(),
        }
    }

    fn lexicon(&self) -> &'a Lexicon {
        self.engine.lexicon()
    }

    /// Read, run and print until `.q` or end of input. Failed commands print their error and
    /// the loop continues.
    pub fn run<E, W>(&self, editor: &mut E, out: &mut W) -> Result<(), WnError>
    where
        E: LineEditor + ?Sized,
        W: Write,
    {
        while let Some(line) = editor.read_line(&self.prompt)? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            editor.add_history(line);
            match self.run_line(line, out) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(err) => {
                    tracing::debug!("{} failed: {:?}", line, err);
                    writeln!(out, "{err}\n")?;
                }
            }
            out.flush()?;
        }
        Ok(())
    }

    pub fn run_line<W: Write>(&self, line: &str, out: &mut W) -> Result<Flow, WnError> {
        let op = Op::parse(line)?;
        self.execute(&op, out)
    }

    pub fn execute<W: Write>(&self, op: &Op, out: &mut W) -> Result<Flow, WnError> {
        tracing::debug!("Executing {}", op);
        let lexicon = self.lexicon();
        match op {
            Op::Quit => return Ok(Flow::Quit),
            Op::Help => {
                writeln!(out, "{HELP}")?;
                if self.features.is_some() {
                    writeln!(out, "{FEATURE_HELP}")?;
                }
                writeln!(out)?;
            }
            Op::Synset(id) => match lexicon.synset(id) {
                Some(synset) => writeln!(out, "{synset}\n")?,
                None => writeln!(out, "Synset not found\n")?,
            },
            Op::Literal { word, sense, pos } => {
                let found: Vec<&Synset> = match (sense, pos) {
                    (Some(sense), Some(pos)) => lexicon.find_sense(word, *sense, *pos).into_iter().collect(),
                    (_, Some(pos)) => lexicon.find_by_literal(word, *pos),
                    (_, None) => PartOfSpeech::all()
                        .iter()
                        .flat_map(|pos| lexicon.find_by_literal(word, *pos))
                        .collect(),
                };
                if found.is_empty() {
                    let what = if sense.is_some() { "Word sense" } else { "Literal" };
                    writeln!(out, "{what} not found\n")?;
                } else {
                    for synset in found {
                        writeln!(out, "{synset}")?;
                    }
                    writeln!(out)?;
                }
            }
            Op::LiteralRelations {
                word,
                pos,
                relation,
            } => {
                let senses = lexicon.find_by_literal(word, *pos);
                if senses.is_empty() {
                    writeln!(out, "Literal not found\n")?;
                }
                for sense in senses {
                    writeln!(out, "{sense}")?;
                    match relation {
                        None => {
                            let mut seen = BTreeSet::new();
                            for kind in sense.relations.iter().map(|r| &r.kind) {
                                if seen.insert(kind) {
                                    writeln!(out, "  {kind}")?;
                                }
                            }
                        }
                        Some(relation) => {
                            self.write_targets(&sense.id, relation, "  ", out)?;
                        }
                    }
                    writeln!(out)?;
                }
            }
            Op::Relation { id, relation } => {
                if self.engine.lookup_relation(id, relation).is_empty() {
                    writeln!(
                        out,
                        "Synset not found or has no relations of the specified type\n"
                    )?;
                } else {
                    self.write_targets(id, relation, "", out)?;
                    writeln!(out)?;
                }
            }
            Op::TraceId {
                id,
                relation,
                depth,
            } => {
                let root = lexicon.get_synset(id)?;
                let entries =
                    self.engine
                        .related_synsets(id, relation, true, depth.or(self.max_depth))?;
                writeln!(out, "{}\n", render_trace(root, &entries))?;
            }
            Op::TraceLiteral {
                word,
                pos,
                relation,
                depth,
            } => {
                let traces = self.engine.resolve_query(
                    word,
                    *pos,
                    relation,
                    true,
                    depth.or(self.max_depth),
                )?;
                if traces.is_empty() {
                    writeln!(out, "Literal not found\n")?;
                }
                for trace in traces {
                    writeln!(out, "{trace}\n")?;
                }
            }
            Op::ConnectId {
                id,
                relation,
                targets,
            } => match self.engine.is_connected_with(id, relation, targets.as_slice()) {
                Some(found) => writeln!(out, "Connection found to {found}")?,
                None => writeln!(out, "No connection found")?,
            },
            Op::ConnectLiteral {
                word,
                pos,
                relation,
                targets,
            } => match self
                .engine
                .is_literal_connected_with(word, *pos, relation, targets.as_slice())
            {
                Some((sense, found)) => writeln!(
                    out,
                    "Connection found:\nSense of literal: {sense}\nTarget id: {found}"
                )?,
                None => writeln!(out, "No connection found")?,
            },
            Op::LiteralInSynset { word, id, hyponyms } => {
                if self
                    .engine
                    .is_literal_compatible_with_synset(word, id, *hyponyms)
                {
                    writeln!(out, "Compatible")?;
                } else {
                    writeln!(out, "Not compatible")?;
                }
            }
            Op::Similarity {
                first,
                second,
                pos,
                relation,
                add_top,
            } => {
                writeln!(out, "Results:")?;
                for similarity in self
                    .engine
                    .similarity_leacock_chodorow(first, second, *pos, relation, *add_top)
                {
                    writeln!(
                        out,
                        "  {:.5}\t{}  {}",
                        similarity.score, similarity.first, similarity.second
                    )?;
                }
            }
            Op::MaxDepth { id, relation } => {
                writeln!(out, "{}", self.engine.max_depth(id, relation)?)?;
            }
            Op::SubGraphSize { id, relation } => {
                writeln!(out, "{}", self.engine.subgraph_size(id, relation)?)?;
            }
            Op::Stats => writeln!(out, "{}\n", lexicon.stats())?,
            Op::Xml(id) => writeln!(out, "{}\n", write_synset(lexicon.get_synset(id)?)?)?,
            Op::Feature(feature) => {
                let Some(features) = self.features else {
                    writeln!(out, "Sorry, semantic features not loaded.")?;
                    return Ok(Flow::Continue);
                };
                let ids = features.lookup(feature);
                if ids.is_empty() {
                    writeln!(out, "Semantic feature not found")?;
                } else {
                    writeln!(out, "{} synset(s) found:", ids.len())?;
                    for id in ids {
                        writeln!(out, "{id}")?;
                    }
                }
            }
            Op::FeatureCompatible { word, pos, feature } => {
                let Some(features) = self.features else {
                    writeln!(out, "Sorry, semantic features not loaded.")?;
                    return Ok(Flow::Continue);
                };
                match features.is_literal_compatible(&self.engine, word, *pos, feature) {
                    Some((sense, found)) => {
                        writeln!(out, "Compatibility found:")?;
                        writeln!(out, "Sense of literal: {}", self.describe(&sense))?;
                        writeln!(out, "Synset ID pertaining to feature: {}", self.describe(&found))?;
                    }
                    None => writeln!(out, "Compatibility not found")?,
                }
            }
        }
        Ok(Flow::Continue)
    }

    /// Targets of `relation` leaving `id`, one synset per line. Dangling targets are skipped.
    fn write_targets<W: Write>(
        &self,
        id: &str,
        relation: &RelationType,
        indent: &str,
        out: &mut W,
    ) -> Result<(), WnError> {
        for target in self.engine.lookup_relation(id, relation) {
            if let Some(synset) = self.lexicon().synset(target) {
                writeln!(out, "{indent}{synset}")?;
            }
        }
        Ok(())
    }

    fn describe(&self, id: &str) -> String {
        self.lexicon()
            .synset(id)
            .map(|synset| synset.to_string())
            .unwrap_or_else(|| id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use test_log::test;

    fn lexicon() -> Lexicon {
        Lexicon::from_synsets([
            Synset::new("S1", PartOfSpeech::Noun)
                .with_literal("kutya", "1")
                .with_relation("S3", "hypernym")
                .with_definition("dog"),
            Synset::new("S2", PartOfSpeech::Noun)
                .with_literal("kutya", "2")
                .with_relation("S3", "hypernym"),
            Synset::new("S3", PartOfSpeech::Noun)
                .with_literal("állat", "1")
                .with_relation("S1", "hyponym")
                .with_relation("S2", "hyponym"),
        ])
    }

    fn run(console: &Console<'_>, line: &str) -> (Result<Flow, WnError>, String) {
        let mut out = Vec::new();
        let result = console.run_line(line, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_trace_literal_prints_every_sense() {
        let lexicon = lexicon();
        let console = Console::new(&lexicon, None, &Settings::default());
        let (result, out) = run(&console, ".tl kutya n hypernym");
        assert_eq!(result.unwrap(), Flow::Continue);
        assert_eq!(
            out,
            "S1  {kutya:1}  (dog)\n  S3  {állat:1}  ()\n\nS2  {kutya:2}  ()\n  S3  {állat:1}  ()\n\n"
        );
    }

    #[test]
    fn test_lookups() {
        let lexicon = lexicon();
        let console = Console::new(&lexicon, None, &Settings::default());
        assert_eq!(run(&console, ".i S1").1, "S1  {kutya:1}  (dog)\n\n");
        assert_eq!(run(&console, ".i S9").1, "Synset not found\n\n");
        assert_eq!(run(&console, ".l kutya 2 n").1, "S2  {kutya:2}  ()\n\n");
        assert_eq!(run(&console, ".l macska").1, "Literal not found\n\n");
        assert_eq!(
            run(&console, ".ri S3 hyponym").1,
            "S1  {kutya:1}  (dog)\nS2  {kutya:2}  ()\n\n"
        );
        assert_eq!(run(&console, ".rl kutya n").1.lines().nth(1), Some("  hypernym"));
        assert_eq!(run(&console, ".md S3 hyponym").1, "2\n");
        assert_eq!(run(&console, ".sg S3 hyponym").1, "3\n");
        assert_eq!(run(&console, ".cli kutya S3 hyponyms").1, "Compatible\n");
        assert_eq!(run(&console, ".ci S1 hypernym S3").1, "Connection found to S3\n");
        assert!(run(&console, ".x S1").1.starts_with("<SYNSET><ID>S1</ID>"));
    }

    #[test]
    fn test_errors_surface_as_values() {
        let lexicon = lexicon();
        let console = Console::new(&lexicon, None, &Settings::default());
        assert_eq!(run(&console, ".ti S9 hyponym").0.unwrap_err().kind(), "LookupError");
        assert_eq!(run(&console, ".ti").0.unwrap_err().kind(), "CommandError");
        assert_eq!(
            run(&console, ".s animate").1,
            "Sorry, semantic features not loaded.\n"
        );
    }

    #[test]
    fn test_loop_continues_after_errors_and_stops_at_quit() {
        let lexicon = lexicon();
        let console = Console::new(&lexicon, None, &Settings::default());
        let mut editor = PlainEditor::new(Cursor::new(".bogus\n\n.i S2\r\n.q\n.i S1\n"));
        let mut out = Vec::new();
        console.run(&mut editor, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(
            out,
            "Invalid command: Unknown command .bogus\n\nS2  {kutya:2}  ()\n\n"
        );
    }

    #[test]
    fn test_configured_depth_applies_when_command_gives_none() {
        let lexicon = Lexicon::from_synsets([
            Synset::new("A", PartOfSpeech::Noun).with_relation("B", "hyponym"),
            Synset::new("B", PartOfSpeech::Noun).with_relation("C", "hyponym"),
            Synset::new("C", PartOfSpeech::Noun),
        ]);
        let settings = Settings {
            max_depth: Some(1),
            ..Settings::default()
        };
        let console = Console::new(&lexicon, None, &settings);
        assert_eq!(run(&console, ".ti A hyponym").1, "A  {}  ()\n  B  {}  ()\n\n");
        assert_eq!(
            run(&console, ".ti A hyponym 5").1,
            "A  {}  ()\n  B  {}  ()\n    C  {}  ()\n\n"
        );
    }
}
