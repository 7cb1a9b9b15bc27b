//! Traversal and lookup behaviour against loaded lexicons.

mod common;

use test_log::test;

use wnxml::{
    codec::load,
    lexicon::Lexicon,
    properties::{PartOfSpeech, RelationType, Synset},
    query::{QueryEngine, TraceEntry},
    WnError,
};

fn chain(ids: &[&str], closing: bool) -> Lexicon {
    let mut synsets: Vec<Synset> = ids
        .windows(2)
        .map(|pair| Synset::new(pair[0], PartOfSpeech::Noun).with_relation(pair[1], "hyponym"))
        .collect();
    let last = Synset::new(ids[ids.len() - 1], PartOfSpeech::Noun);
    synsets.push(if closing {
        last.with_relation(ids[0], "hyponym")
    } else {
        last
    });
    Lexicon::from_synsets(synsets)
}

fn ids_and_depths<'a>(entries: &[TraceEntry<'a>]) -> Vec<(&'a str, usize)> {
    entries.iter().map(|e| (e.id, e.depth)).collect()
}

#[test]
fn test_traversal_terminates_on_cycles() {
    let lexicon = chain(&["A", "B", "C"], true);
    let engine = QueryEngine::new(&lexicon);
    let entries = engine
        .related_synsets("A", &RelationType::Hyponym, true, None)
        .unwrap();
    assert_eq!(ids_and_depths(&entries), [("B", 1), ("C", 2)]);
}

#[test]
fn test_depth_labels_and_bound() {
    let lexicon = chain(&["A", "B", "C", "D"], false);
    let engine = QueryEngine::new(&lexicon);

    let unbounded = engine
        .related_synsets("A", &RelationType::Hyponym, true, None)
        .unwrap();
    assert_eq!(ids_and_depths(&unbounded), [("B", 1), ("C", 2), ("D", 3)]);

    let bounded = engine
        .related_synsets("A", &RelationType::Hyponym, true, Some(1))
        .unwrap();
    assert_eq!(ids_and_depths(&bounded), [("B", 1)]);

    let direct = engine
        .related_synsets("A", &RelationType::Hyponym, false, None)
        .unwrap();
    assert_eq!(ids_and_depths(&direct), [("B", 1)]);
}

#[test]
fn test_unknown_id_is_a_lookup_error() {
    let lexicon = chain(&["A", "B"], false);
    let engine = QueryEngine::new(&lexicon);
    let err = engine
        .related_synsets("NO-SUCH-ID", &RelationType::Hyponym, false, None)
        .unwrap_err();
    assert!(matches!(err, WnError::Lookup(_)));
}

#[test]
fn test_every_sense_is_resolved() {
    let lexicon = load(common::WORDNET).unwrap();
    let engine = QueryEngine::new(&lexicon);
    let traces = engine
        .resolve_query("kutya", PartOfSpeech::Noun, &RelationType::Hypernym, true, None)
        .unwrap();

    let senses: Vec<&str> = traces.iter().map(|t| t.sense.id.as_str()).collect();
    assert_eq!(senses, ["HUN-1", "HUN-2"]);
    assert_eq!(ids_and_depths(&traces[0].entries), [("HUN-3", 1), ("HUN-4", 2)]);
    assert_eq!(ids_and_depths(&traces[1].entries), [("HUN-5", 1), ("HUN-4", 2)]);

    let rendered = traces[0].to_string();
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("HUN-1  {kutya:1, eb:1}"));
    assert!(lines[1].starts_with("  HUN-3  {kutyaféle:1}"));
    assert!(lines[2].starts_with("    HUN-4  {élőlény:1}"));
}

#[test]
fn test_dangling_target_is_a_terminal_entry() {
    let lexicon = load(common::WORDNET).unwrap();
    let engine = QueryEngine::new(&lexicon);
    let also_see = RelationType::AlsoSee;
    let entries = engine.related_synsets("HUN-6", &also_see, true, None).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, "HUN-99");
    assert!(entries[0].synset.is_none());
}

#[test]
fn test_distinct_literal_count_spans_parts_of_speech() {
    let lexicon = Lexicon::from_synsets([
        Synset::new("N-1", PartOfSpeech::Noun)
            .with_literal("fut", "1")
            .with_literal("futás", "1"),
        Synset::new("N-2", PartOfSpeech::Noun).with_literal("fut", "2"),
        Synset::new("V-1", PartOfSpeech::Verb).with_literal("fut", "1"),
    ]);
    let stats = lexicon.stats();
    assert_eq!(stats.synset_count, 3);
    assert_eq!(stats.literal_occurrence_count, 4);
    assert_eq!(stats.distinct_literal_count, 2);
    assert_eq!(stats.per_pos[&PartOfSpeech::Noun].words, 2);
    assert_eq!(stats.per_pos[&PartOfSpeech::Verb].words, 1);
}

#[test]
fn test_graph_measures_on_loaded_wordnet() {
    let lexicon = load(common::WORDNET).unwrap();
    let engine = QueryEngine::new(&lexicon);
    let hypernym = RelationType::Hypernym;
    let hyponym = RelationType::Hyponym;

    assert_eq!(engine.max_depth("HUN-1", &hypernym).unwrap(), 3);
    assert_eq!(engine.max_depth("HUN-4", &hyponym).unwrap(), 3);
    assert_eq!(engine.subgraph_size("HUN-4", &hyponym).unwrap(), 5);
    assert_eq!(
        engine.is_connected_with("HUN-2", &hypernym, &["HUN-3", "HUN-4"]),
        Some("HUN-4".to_string())
    );
    assert!(engine.is_literal_compatible_with_synset("kutya", "HUN-4", true));
    assert!(!engine.is_literal_compatible_with_synset("kutya", "HUN-4", false));
    assert_eq!(
        engine.are_synonyms("kutya", "gazember", PartOfSpeech::Noun),
        Some("HUN-2".to_string())
    );

    let scores = engine.similarity_leacock_chodorow(
        "kutya",
        "kutya",
        PartOfSpeech::Noun,
        &hypernym,
        false,
    );
    assert_eq!(scores.len(), 4);
    assert!((scores[0].score - -(1.0f64 / 40.0).log10()).abs() < 1e-9);
}

#[test]
fn test_lexicon_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Lexicon>();

    let lexicon = load(common::WORDNET).unwrap();
    std::thread::scope(|scope| {
        for word in ["kutya", "ember"] {
            let lexicon = &lexicon;
            scope.spawn(move || {
                assert!(!lexicon.find_by_literal(word, PartOfSpeech::Noun).is_empty());
            });
        }
    });
}
