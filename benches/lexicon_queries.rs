//! Performance benchmarks for loading and querying a lexicon
//!
//! The corpus is generated: a balanced hypernym tree with a literal per synset, with every
//! `SHARED_EVERY`th synset also carrying a shared literal so that multi-sense lookups fan out.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::fmt::Write;
use wnxml::{
    codec::{load, write_lexicon},
    properties::{PartOfSpeech, RelationType},
    query::QueryEngine,
};

const SYNSETS: usize = 20_000;
const BRANCHING: usize = 4;
const SHARED_EVERY: usize = 500;

fn corpus() -> String {
    let mut xml = String::from("<WNXML>\n");
    for idx in 0..SYNSETS {
        write!(
            xml,
            "<SYNSET><ID>BENCH-{idx}</ID><POS>n</POS><SYNONYM><LITERAL>word{idx}<SENSE>1</SENSE></LITERAL>"
        )
        .unwrap();
        if idx % SHARED_EVERY == 0 {
            write!(
                xml,
                "<LITERAL>shared<SENSE>{}</SENSE></LITERAL>",
                idx / SHARED_EVERY + 1
            )
            .unwrap();
        }
        xml.push_str("</SYNONYM>");
        if idx > 0 {
            write!(
                xml,
                "<ILR>BENCH-{}<TYPE>hypernym</TYPE></ILR>",
                (idx - 1) / BRANCHING
            )
            .unwrap();
        }
        writeln!(xml, "<DEF>gloss &amp; text {idx}</DEF></SYNSET>").unwrap();
    }
    xml.push_str("</WNXML>\n");
    xml
}

fn bench_load(c: &mut Criterion) {
    let xml = corpus();
    c.bench_function("load_20k_synsets", |b| {
        b.iter(|| load(black_box(&xml)).unwrap())
    });
}

fn bench_serialize(c: &mut Criterion) {
    let lexicon = load(&corpus()).unwrap();
    c.bench_function("write_20k_synsets", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(4 << 20);
            write_lexicon(black_box(&lexicon), &mut out).unwrap();
            out
        })
    });
}

fn bench_queries(c: &mut Criterion) {
    let lexicon = load(&corpus()).unwrap();
    let engine = QueryEngine::new(&lexicon);

    c.bench_function("trace_hyponyms_from_root", |b| {
        b.iter(|| {
            engine
                .related_synsets(black_box("BENCH-0"), &RelationType::Hyponym, true, None)
                .unwrap()
        })
    });

    c.bench_function("resolve_shared_literal", |b| {
        b.iter(|| {
            engine
                .resolve_query(
                    black_box("shared"),
                    PartOfSpeech::Noun,
                    &RelationType::Hypernym,
                    true,
                    None,
                )
                .unwrap()
        })
    });

    c.bench_function("similarity_shared_literal", |b| {
        b.iter(|| {
            engine.similarity_leacock_chodorow(
                black_box("word19999"),
                black_box("shared"),
                PartOfSpeech::Noun,
                &RelationType::Hypernym,
                true,
            )
        })
    });
}

criterion_group!(benches, bench_load, bench_serialize, bench_queries);
criterion_main!(benches);
